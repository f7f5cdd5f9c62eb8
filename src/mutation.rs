//! Mutation - runs an async remote write inside a three-phase lifecycle.
//!
//! The lifecycle (before send, on failure, on completion) is transport
//! agnostic: [`MutationLifecycle`] is what any hook set implements, and
//! [`Mutation`] binds one to a remote call.
//!
//! ## Example
//!
//! ```ignore
//! let toggle = Mutation::new("todo.toggle", hooks, move |input: ToggleTodoInput| {
//!     let api = api.clone();
//!     async move { api.toggle(input).await }
//! });
//!
//! let updated = toggle.mutate(ToggleTodoInput { id: 5 }).await?;
//! ```

use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use log::{debug, warn};

use crate::RemoteError;

/// Hooks attached to a remote mutation.
pub trait MutationLifecycle<I>: Send + Sync {
    /// State captured before the remote call, handed back on failure.
    type Context: Send;

    /// Before send. Runs to completion before the remote call starts.
    fn on_mutate(&self, input: &I) -> impl Future<Output = Self::Context> + Send;

    /// The remote call failed.
    fn on_error(&self, error: &RemoteError, input: &I, context: Option<Self::Context>);

    /// The remote call succeeded.
    fn on_success(&self, _input: &I) {}

    /// After success or failure.
    fn on_settled(&self) -> impl Future<Output = ()> + Send;
}

/// Where one pending mutation is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationPhase {
    Idle,
    Snapshotting,
    SpeculativelyApplied,
    RemoteSucceeded,
    RemoteFailed,
    Settling,
}

impl fmt::Display for MutationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MutationPhase::Idle => "idle",
            MutationPhase::Snapshotting => "snapshotting",
            MutationPhase::SpeculativelyApplied => "speculatively-applied",
            MutationPhase::RemoteSucceeded => "remote-success",
            MutationPhase::RemoteFailed => "remote-failure",
            MutationPhase::Settling => "settling",
        };
        f.write_str(name)
    }
}

/// Decrements the pending counter when a `mutate` call ends, even if its
/// future is dropped early.
struct PendingGuard<'a>(&'a AtomicUsize);

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// A named remote write bound to its lifecycle hooks.
///
/// `remote` is called once per [`mutate`](Self::mutate) with an owned copy of
/// the input. Several calls may be in flight at once; each one runs its own
/// lifecycle.
pub struct Mutation<I, O, H, R> {
    name: String,
    hooks: H,
    remote: R,
    pending: Arc<AtomicUsize>,
    _marker: PhantomData<fn(I) -> O>,
}

impl<I, O, H, R, Fut> Mutation<I, O, H, R>
where
    I: Clone + Send + Sync,
    H: MutationLifecycle<I>,
    R: Fn(I) -> Fut + Send + Sync,
    Fut: Future<Output = Result<O, RemoteError>> + Send,
{
    pub fn new(name: impl Into<String>, hooks: H, remote: R) -> Self {
        Self {
            name: name.into(),
            hooks,
            remote,
            pending: Arc::new(AtomicUsize::new(0)),
            _marker: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    /// Whether any call to `mutate` has not finished yet.
    pub fn is_pending(&self) -> bool {
        self.pending_count() > 0
    }

    pub fn pending_count(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    fn enter(&self, phase: MutationPhase) {
        debug!("{}: {}", self.name, phase);
    }

    /// Run the full lifecycle for `input` and return the remote result.
    ///
    /// Order: `on_mutate` → remote call → `on_error` or `on_success` →
    /// `on_settled`. The remote failure is returned after settlement; it has
    /// already been rolled back and reported by the hooks.
    pub async fn mutate(&self, input: I) -> Result<O, RemoteError> {
        self.pending.fetch_add(1, Ordering::SeqCst);
        let _pending = PendingGuard(&self.pending);

        self.enter(MutationPhase::Snapshotting);
        let context = self.hooks.on_mutate(&input).await;
        self.enter(MutationPhase::SpeculativelyApplied);

        let result = (self.remote)(input.clone()).await;

        match &result {
            Ok(_) => {
                self.enter(MutationPhase::RemoteSucceeded);
                self.hooks.on_success(&input);
            }
            Err(err) => {
                self.enter(MutationPhase::RemoteFailed);
                warn!("{} failed: {}", self.name, err);
                self.hooks.on_error(err, &input, Some(context));
            }
        }

        self.enter(MutationPhase::Settling);
        self.hooks.on_settled().await;
        self.enter(MutationPhase::Idle);

        result
    }
}
