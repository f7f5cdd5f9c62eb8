//! ListCache - optimistic, identity-keyed mirror of a remote list resource.
//!
//! The cache offers primitive mutators (`get`, `set`, `add`, `remove`,
//! `update`, `find`) over a [`QueryUtils`] binding, plus
//! [`with_optimistic`](ListCache::with_optimistic), which turns a local
//! action into the full optimistic lifecycle:
//! snapshot → speculative apply → remote call → rollback-on-failure → refetch.
//!
//! ## Example
//!
//! ```ignore
//! use optimistic_list::{ListCache, Mutation, OptimisticOptions, QueryClient};
//!
//! let client = QueryClient::new();
//! let cache = ListCache::new(client.list_query("todo.getAll", api.clone()));
//!
//! let create = Mutation::new(
//!     "todo.create",
//!     cache.with_optimistic(|cache| {
//!         let cache = cache.clone();
//!         OptimisticOptions::new(move |input: &CreateTodoInput| {
//!             cache.add(TodoDraft::pending(&input.title));
//!         })
//!         .on_error(|err| eprintln!("Failed to create todo: {}", err.message()))
//!     }),
//!     move |input| { let api = api.clone(); async move { api.create(input).await } },
//! );
//!
//! create.mutate(CreateTodoInput { title: "Buy milk".into() }).await?;
//! ```

#[cfg(feature = "emitter")]
mod events;
mod optimistic;

use std::sync::Arc;

use crate::identity::{DefaultTempIds, TempIdGenerator};
use crate::item::ListItem;
use crate::query::QueryUtils;

#[cfg(feature = "emitter")]
pub use events::CacheEvents;
pub use optimistic::{MutationContext, OptimisticHooks, OptimisticOptions};

/// Change notifications published by a [`ListCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheEvent {
    /// The collection was replaced (any mutator, including rollback).
    Updated,
    /// A failed mutation restored its snapshot.
    RolledBack,
    /// An invalidation finished. The refetch may have been applied, failed
    /// (see [`ListQuery::last_error`](crate::ListQuery::last_error)) or been
    /// superseded by a later `cancel` or fetch.
    Invalidated,
}

impl CacheEvent {
    /// Event name used on the emitter.
    pub fn name(&self) -> &'static str {
        match self {
            CacheEvent::Updated => "cache:updated",
            CacheEvent::RolledBack => "cache:rolled_back",
            CacheEvent::Invalidated => "cache:invalidated",
        }
    }
}

/// Client-side mirror of a remote collection, keyed by item identity.
///
/// Every mutator replaces the whole collection through
/// [`QueryUtils::set_data`]; there is no field-level merging across
/// concurrent writers. Mutators on an id that is not cached are no-ops.
/// Cheap to clone; clones operate on the same query.
pub struct ListCache<T: ListItem, Q> {
    query: Q,
    temp_ids: Arc<dyn TempIdGenerator<T::Id>>,
    #[cfg(feature = "emitter")]
    events: Option<CacheEvents>,
}

impl<T: ListItem, Q: Clone> Clone for ListCache<T, Q> {
    fn clone(&self) -> Self {
        Self {
            query: self.query.clone(),
            temp_ids: Arc::clone(&self.temp_ids),
            #[cfg(feature = "emitter")]
            events: self.events.clone(),
        }
    }
}

impl<T, Q> ListCache<T, Q>
where
    T: ListItem,
    Q: QueryUtils<T> + Clone,
{
    /// Create a cache using the default temporary id generator for `T::Id`.
    pub fn new(query: Q) -> Self
    where
        T::Id: DefaultTempIds,
    {
        Self::with_temp_ids(query, <T::Id as DefaultTempIds>::default_generator())
    }

    /// Create a cache with a custom temporary id generator.
    pub fn with_temp_ids(query: Q, temp_ids: Arc<dyn TempIdGenerator<T::Id>>) -> Self {
        Self {
            query,
            temp_ids,
            #[cfg(feature = "emitter")]
            events: None,
        }
    }

    /// Publish change notifications through `events`.
    #[cfg(feature = "emitter")]
    pub fn with_events(mut self, events: CacheEvents) -> Self {
        self.events = Some(events);
        self
    }

    #[cfg(feature = "emitter")]
    pub(crate) fn notify(&self, event: CacheEvent) {
        if let Some(events) = &self.events {
            events.emit(event);
        }
    }

    #[cfg(not(feature = "emitter"))]
    pub(crate) fn notify(&self, _event: CacheEvent) {}

    /// The underlying query binding.
    pub fn query(&self) -> &Q {
        &self.query
    }

    /// Suppress any background refresh racing a speculative change.
    pub async fn cancel(&self) {
        self.query.cancel().await;
    }

    /// The cached collection, or an empty one if nothing has been fetched.
    pub fn get(&self) -> Vec<T> {
        self.query.get_data().unwrap_or_default()
    }

    /// Replace the cached collection with `updater(current)`.
    pub fn set<U>(&self, updater: U)
    where
        U: FnOnce(Option<Vec<T>>) -> Option<Vec<T>>,
    {
        self.query.set_data(updater);
        self.notify(CacheEvent::Updated);
    }

    /// Mark the collection stale and refetch it from the store.
    ///
    /// Publishes [`CacheEvent::Invalidated`] once the refetch has finished,
    /// whether or not its result was applied.
    pub async fn invalidate(&self) {
        self.query.invalidate().await;
        self.notify(CacheEvent::Invalidated);
    }

    /// Append a new item under a fresh temporary id and return that id.
    pub fn add(&self, draft: T::Draft) -> T::Id {
        let id = self.temp_ids.next_id();
        self.insert(T::from_draft(id.clone(), draft));
        id
    }

    /// Append an item that already carries its identity.
    pub fn insert(&self, item: T) {
        self.set(move |old| {
            let mut items = old.unwrap_or_default();
            items.push(item);
            Some(items)
        });
    }

    /// Remove the item with identity `id`, if cached.
    pub fn remove(&self, id: &T::Id) {
        self.set(|old| old.map(|items| items.into_iter().filter(|item| item.id() != id).collect()));
    }

    /// Merge `patch` into the item with identity `id`, if cached.
    pub fn update(&self, id: &T::Id, patch: T::Patch) {
        self.update_with(id, move |item| item.merge(patch));
    }

    /// Apply `f` to the item with identity `id`, if cached.
    pub fn update_with<F>(&self, id: &T::Id, f: F)
    where
        F: FnOnce(&mut T),
    {
        self.set(|old| {
            old.map(|mut items| {
                if let Some(item) = items.iter_mut().find(|item| item.id() == id) {
                    f(item);
                }
                items
            })
        });
    }

    /// The cached item with identity `id`.
    pub fn find(&self, id: &T::Id) -> Option<T> {
        self.query
            .get_data()
            .and_then(|items| items.into_iter().find(|item| item.id() == id))
    }

    /// Build the lifecycle hooks of an optimistic mutation.
    ///
    /// `options_fn` receives this cache and describes the speculative action
    /// plus an optional failure callback. See [`OptimisticHooks`] for the
    /// protocol the hooks run.
    pub fn with_optimistic<I, F>(&self, options_fn: F) -> OptimisticHooks<T, Q, I>
    where
        F: FnOnce(&ListCache<T, Q>) -> OptimisticOptions<I>,
    {
        let options = options_fn(self);
        OptimisticHooks::new(self.clone(), options)
    }
}
