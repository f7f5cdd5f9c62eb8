//! QueryClient - registry of cached queries for one application root.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use super::list_query::{QueryState, SharedState};
use super::{ListFetcher, ListQuery};

type Registry = HashMap<(String, TypeId), Arc<dyn Any + Send + Sync>>;

/// Owns the cached state of every query in an application.
///
/// Construct one per application root and pass it down explicitly; handles
/// obtained for the same key and item type share one cached collection.
/// Clone-friendly via Arc.
#[derive(Clone, Default)]
pub struct QueryClient {
    queries: Arc<RwLock<Registry>>,
}

impl QueryClient {
    /// Create an empty client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a handle to the list query stored under `key`, creating its
    /// cache entry on first use.
    pub fn list_query<T, F>(&self, key: &str, fetcher: F) -> ListQuery<T, F>
    where
        T: Clone + Send + Sync + 'static,
        F: ListFetcher<T>,
    {
        let registry_key = (key.to_string(), TypeId::of::<T>());
        let mut queries = self.queries.write().unwrap_or_else(PoisonError::into_inner);

        let entry = queries
            .entry(registry_key)
            .or_insert_with(|| -> Arc<dyn Any + Send + Sync> {
                Arc::new(RwLock::new(QueryState::<T>::default()))
            });

        let state: SharedState<T> = match Arc::clone(entry).downcast::<RwLock<QueryState<T>>>() {
            Ok(state) => state,
            // The registry key includes the item TypeId, so this cannot happen.
            Err(_) => Arc::new(RwLock::new(QueryState::default())),
        };

        ListQuery::from_shared(key.to_string(), state, fetcher)
    }

    /// Whether any query has been registered under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.queries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .any(|(k, _)| k == key)
    }

    /// Forget every query registered under `key`. Returns true if any existed.
    ///
    /// Handles already given out keep their (now unshared) state.
    pub fn remove_query(&self, key: &str) -> bool {
        let mut queries = self.queries.write().unwrap_or_else(PoisonError::into_inner);
        let before = queries.len();
        queries.retain(|(k, _), _| k != key);
        queries.len() != before
    }

    /// Forget every registered query.
    pub fn clear(&self) {
        self.queries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Number of registered queries.
    pub fn len(&self) -> usize {
        self.queries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
