mod list_item;

use proc_macro::TokenStream;

/// Derive macro for the `ListItem` trait.
///
/// Generates a `<Name>Draft` struct (every field except the identity) and a
/// `<Name>Patch` struct (every non-identity field wrapped in `Option`), then
/// implements `optimistic_list::ListItem` on top of them.
///
/// # Usage
///
/// ```ignore
/// #[derive(Clone, Debug, ListItem)]
/// struct Todo {
///     id: i64,
///     title: String,
///     completed: bool,
/// }
///
/// // Generated:
/// // struct TodoDraft { title: String, completed: bool }
/// // struct TodoPatch { title: Option<String>, completed: Option<bool> }
/// ```
///
/// Attributes:
/// - `#[list_item(id)]` on a field: use it as the identity (default: the field named `id`)
/// - `#[list_item(skip_patch)]` on a field: leave it out of the patch type
/// - `#[list_item(draft = "NewTodo", patch = "TodoChanges")]` on the struct: rename the generated types
#[proc_macro_derive(ListItem, attributes(list_item))]
pub fn derive_list_item(input: TokenStream) -> TokenStream {
    list_item::derive_list_item(input)
}
