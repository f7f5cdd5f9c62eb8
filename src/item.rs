//! ListItem - identity-keyed records held by a list cache.

use std::fmt;

/// A record that can live in a [`ListCache`](crate::ListCache).
///
/// Identity is defined solely by [`id`](ListItem::id); every other field is
/// opaque payload to the cache. Use `#[derive(ListItem)]` to generate the
/// draft and patch types from the struct definition.
///
/// ## Example
///
/// ```ignore
/// use optimistic_list::ListItem;
///
/// #[derive(Clone, Debug, ListItem)]
/// struct Note {
///     id: i64,
///     body: String,
///     pinned: bool,
/// }
///
/// let mut note = Note::from_draft(-1, NoteDraft { body: "hi".into(), pinned: false });
/// note.merge(NotePatch { pinned: Some(true), ..Default::default() });
/// ```
pub trait ListItem: Clone + Send + Sync + 'static {
    /// Identity type. Server-assigned and temporary ids share this domain.
    type Id: Clone + PartialEq + fmt::Debug + Send + Sync + 'static;

    /// The item without its identity.
    type Draft;

    /// Partial fields merged into an existing item.
    type Patch;

    /// Returns the identity of this item.
    fn id(&self) -> &Self::Id;

    /// Builds a full item from an identity and a draft.
    fn from_draft(id: Self::Id, draft: Self::Draft) -> Self;

    /// Merges `patch` into this item. Fields absent from the patch are kept.
    fn merge(&mut self, patch: Self::Patch);
}
