//! Optimistic lifecycle hooks built by [`ListCache::with_optimistic`].

use log::{debug, warn};

use super::{CacheEvent, ListCache};
use crate::item::ListItem;
use crate::mutation::MutationLifecycle;
use crate::query::QueryUtils;
use crate::RemoteError;

type Action<I> = Box<dyn Fn(&I) + Send + Sync>;
type ErrorCallback = Box<dyn Fn(&RemoteError) + Send + Sync>;

/// What an optimistic mutation does locally, and who hears about failures.
///
/// `action` must be total: it is a pure local mutation of the cache and the
/// protocol does not catch its panics.
pub struct OptimisticOptions<I> {
    action: Action<I>,
    on_error: Option<ErrorCallback>,
}

impl<I> OptimisticOptions<I> {
    /// Speculatively apply `action` to the cache for each input.
    pub fn new<A>(action: A) -> Self
    where
        A: Fn(&I) + Send + Sync + 'static,
    {
        Self {
            action: Box::new(action),
            on_error: None,
        }
    }

    /// Called after the automatic rollback when the remote call fails.
    pub fn on_error<E>(mut self, callback: E) -> Self
    where
        E: Fn(&RemoteError) + Send + Sync + 'static,
    {
        self.on_error = Some(Box::new(callback));
        self
    }
}

/// Snapshot of the collection taken before one speculative apply.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationContext<T> {
    pub previous: Vec<T>,
}

/// The three lifecycle hooks of an optimistic mutation.
///
/// 1. [`on_mutate`](Self::on_mutate): cancel racing refreshes, snapshot the
///    collection, apply the action.
/// 2. [`on_error`](Self::on_error): restore the snapshot, then call the
///    caller's error callback.
/// 3. [`on_settled`](Self::on_settled): refetch, whatever the outcome.
///
/// Concurrent mutations each hold their own snapshot, so a rollback may
/// discard a later mutation's speculative change; the final refetch
/// converges the cache to the store either way.
pub struct OptimisticHooks<T: ListItem, Q, I> {
    cache: ListCache<T, Q>,
    options: OptimisticOptions<I>,
}

impl<T, Q, I> OptimisticHooks<T, Q, I>
where
    T: ListItem,
    Q: QueryUtils<T> + Clone,
{
    pub(crate) fn new(cache: ListCache<T, Q>, options: OptimisticOptions<I>) -> Self {
        Self { cache, options }
    }

    /// The cache these hooks mutate.
    pub fn cache(&self) -> &ListCache<T, Q> {
        &self.cache
    }

    /// Before send: cancel, snapshot, speculatively apply.
    pub async fn on_mutate(&self, input: &I) -> MutationContext<T> {
        self.cache.cancel().await;
        let previous = self.cache.get();
        (self.options.action)(input);
        MutationContext { previous }
    }

    /// On failure: roll back to the snapshot, then notify.
    ///
    /// Without a context the cache is reset to an empty collection.
    pub fn on_error(&self, err: &RemoteError, _input: &I, context: Option<MutationContext<T>>) {
        let previous = context.map(|ctx| ctx.previous).unwrap_or_default();
        debug!("rolling back to {} item(s) after: {}", previous.len(), err);
        self.cache.set(move |_| Some(previous));
        self.cache.notify(CacheEvent::RolledBack);

        match &self.options.on_error {
            Some(callback) => callback(err),
            None => warn!("optimistic mutation failed: {}", err),
        }
    }

    /// On completion: refetch so the cache converges to the store.
    pub async fn on_settled(&self) {
        self.cache.invalidate().await;
    }
}

impl<T, Q, I> MutationLifecycle<I> for OptimisticHooks<T, Q, I>
where
    T: ListItem,
    Q: QueryUtils<T> + Clone,
    I: Sync,
{
    type Context = MutationContext<T>;

    async fn on_mutate(&self, input: &I) -> Self::Context {
        OptimisticHooks::on_mutate(self, input).await
    }

    fn on_error(&self, error: &RemoteError, input: &I, context: Option<Self::Context>) {
        OptimisticHooks::on_error(self, error, input, context);
    }

    async fn on_settled(&self) {
        OptimisticHooks::on_settled(self).await;
    }
}
