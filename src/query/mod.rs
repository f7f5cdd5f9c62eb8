//! Query layer - the client-side binding of a remote list store.
//!
//! [`QueryUtils`] is the capability set the optimistic cache depends on:
//! `{cancel, get_data, set_data, invalidate}`. Any transport can provide it;
//! [`ListQuery`] is the implementation backed by a [`ListFetcher`].
//!
//! ## Example
//!
//! ```ignore
//! use optimistic_list::{QueryClient, QueryUtils};
//!
//! let client = QueryClient::new();
//! let todos = client.list_query("todo.getAll", todo_client.clone());
//! todos.fetch().await?;
//!
//! todos.set_data(|old| old.map(|mut items| { items.truncate(1); items }));
//! todos.invalidate().await; // back to the store's truth
//! ```

mod client;
mod list_query;

use std::future::Future;

use crate::RemoteError;

/// Capability set of a remote list resource, as seen by the cache.
///
/// `get_data` and `set_data` never suspend; `cancel` and `invalidate` may.
pub trait QueryUtils<T>: Send + Sync {
    /// Suppress any in-flight background refresh so its result cannot
    /// overwrite a speculative change applied after this call.
    fn cancel(&self) -> impl Future<Output = ()> + Send;

    /// The cached collection, or `None` if nothing has been fetched yet.
    fn get_data(&self) -> Option<Vec<T>>;

    /// Replace the cached collection with `updater(current)`.
    fn set_data<U>(&self, updater: U)
    where
        U: FnOnce(Option<Vec<T>>) -> Option<Vec<T>>;

    /// Mark the collection stale and refetch it from the store.
    fn invalidate(&self) -> impl Future<Output = ()> + Send;
}

/// The query operation of a remote list store: fetch the full collection.
///
/// Any `Fn() -> impl Future<Output = Result<Vec<T>, RemoteError>>` closure is a fetcher.
pub trait ListFetcher<T>: Send + Sync {
    fn fetch_all(&self) -> impl Future<Output = Result<Vec<T>, RemoteError>> + Send;
}

impl<T, F, Fut> ListFetcher<T> for F
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<Vec<T>, RemoteError>> + Send,
{
    fn fetch_all(&self) -> impl Future<Output = Result<Vec<T>, RemoteError>> + Send {
        self()
    }
}

pub use client::QueryClient;
pub use list_query::ListQuery;
