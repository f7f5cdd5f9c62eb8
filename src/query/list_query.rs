//! ListQuery - cached collection for one list resource, refreshed by a fetcher.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;

use log::{debug, warn};

use super::{ListFetcher, QueryUtils};
use crate::RemoteError;

/// Shared state behind every handle to the same query.
pub(crate) struct QueryState<T> {
    data: Option<Vec<T>>,
    stale: bool,
    /// Bumped by every `cancel` and every fetch start. A fetch only applies
    /// its result if the generation it started with is still current.
    generation: u64,
    in_flight: usize,
    fetch_count: u64,
    last_error: Option<RemoteError>,
    updated_at: Option<Instant>,
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self {
            data: None,
            stale: true,
            generation: 0,
            in_flight: 0,
            fetch_count: 0,
            last_error: None,
            updated_at: None,
        }
    }
}

pub(crate) type SharedState<T> = Arc<RwLock<QueryState<T>>>;

/// A cached list resource.
///
/// Cheap to clone; clones share the same cached collection. Lock poisoning
/// is recovered rather than surfaced, so reads and writes never fail.
pub struct ListQuery<T, F> {
    key: Arc<str>,
    state: SharedState<T>,
    fetcher: Arc<F>,
}

impl<T, F> Clone for ListQuery<T, F> {
    fn clone(&self) -> Self {
        Self {
            key: Arc::clone(&self.key),
            state: Arc::clone(&self.state),
            fetcher: Arc::clone(&self.fetcher),
        }
    }
}

impl<T, F> ListQuery<T, F>
where
    T: Clone + Send + Sync + 'static,
    F: ListFetcher<T>,
{
    /// Create a standalone query that shares its cache with nobody.
    ///
    /// Use [`QueryClient::list_query`](super::QueryClient::list_query) to share
    /// one cached collection between several handles.
    pub fn new(key: impl Into<String>, fetcher: F) -> Self {
        Self::from_shared(key.into(), Arc::new(RwLock::new(QueryState::default())), fetcher)
    }

    pub(crate) fn from_shared(key: String, state: SharedState<T>, fetcher: F) -> Self {
        Self {
            key: Arc::from(key),
            state,
            fetcher: Arc::new(fetcher),
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, QueryState<T>> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, QueryState<T>> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// The query key (e.g. `"todo.getAll"`).
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Fetch the collection and replace the cache with it.
    ///
    /// If a `cancel` or a newer fetch happened while this one was in flight,
    /// the result is discarded. A failed fetch keeps the cached data and is
    /// recorded in [`last_error`](Self::last_error).
    pub async fn fetch(&self) -> Result<(), RemoteError> {
        let generation = {
            let mut state = self.write_state();
            state.stale = true;
            state.generation += 1;
            state.in_flight += 1;
            state.generation
        };
        debug!("fetching {} (generation {})", self.key, generation);

        let result = self.fetcher.fetch_all().await;

        let mut state = self.write_state();
        state.in_flight = state.in_flight.saturating_sub(1);

        if state.generation != generation {
            debug!(
                "discarding superseded fetch of {} (generation {}, current {})",
                self.key, generation, state.generation
            );
            return result.map(|_| ());
        }

        match result {
            Ok(items) => {
                state.data = Some(items);
                state.stale = false;
                state.last_error = None;
                state.fetch_count += 1;
                state.updated_at = Some(Instant::now());
                Ok(())
            }
            Err(err) => {
                warn!("fetch of {} failed: {}", self.key, err);
                state.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Fetch only if nothing has been fetched yet and no fetch is running.
    pub async fn ensure_data(&self) -> Result<(), RemoteError> {
        let needs_fetch = {
            let state = self.read_state();
            state.data.is_none() && state.in_flight == 0
        };
        if needs_fetch {
            self.fetch().await
        } else {
            Ok(())
        }
    }

    /// Drop the result of every fetch currently in flight.
    pub fn cancel_fetches(&self) {
        let mut state = self.write_state();
        state.generation += 1;
        if state.in_flight > 0 {
            debug!(
                "cancelled {} in-flight fetch(es) of {}",
                state.in_flight, self.key
            );
        }
    }

    /// The cached collection, if any.
    pub fn data(&self) -> Option<Vec<T>> {
        self.read_state().data.clone()
    }

    /// Whether the cache is known to be out of date.
    pub fn is_stale(&self) -> bool {
        self.read_state().stale
    }

    /// Whether any fetch is in flight.
    pub fn is_fetching(&self) -> bool {
        self.read_state().in_flight > 0
    }

    /// First load: no data yet and a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        let state = self.read_state();
        state.data.is_none() && state.in_flight > 0
    }

    /// Error of the last applied fetch, cleared by the next successful one.
    pub fn last_error(&self) -> Option<RemoteError> {
        self.read_state().last_error.clone()
    }

    /// Number of fetches whose result was applied to the cache.
    pub fn fetch_count(&self) -> u64 {
        self.read_state().fetch_count
    }

    /// When the cache was last replaced by a fetch.
    pub fn updated_at(&self) -> Option<Instant> {
        self.read_state().updated_at
    }
}

impl<T, F> QueryUtils<T> for ListQuery<T, F>
where
    T: Clone + Send + Sync + 'static,
    F: ListFetcher<T>,
{
    async fn cancel(&self) {
        self.cancel_fetches();
    }

    fn get_data(&self) -> Option<Vec<T>> {
        self.data()
    }

    fn set_data<U>(&self, updater: U)
    where
        U: FnOnce(Option<Vec<T>>) -> Option<Vec<T>>,
    {
        let mut state = self.write_state();
        let current = state.data.take();
        state.data = updater(current);
    }

    async fn invalidate(&self) {
        // Failures are recorded on the query; the cache keeps its data.
        let _ = self.fetch().await;
    }
}
