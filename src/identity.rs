//! Temporary identities for speculatively added items.
//!
//! An item added before the store confirms it needs a placeholder id that can
//! never collide with a server-assigned one. Integer ids use strictly negative
//! values; string ids use a reserved prefix.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};

/// Reserved prefix for temporary string identities.
pub const TEMP_ID_PREFIX: &str = "tmp-";

/// Produces temporary identities for [`ListCache::add`](crate::ListCache::add).
///
/// Any `Fn() -> Id + Send + Sync` closure is a generator.
pub trait TempIdGenerator<Id>: Send + Sync {
    fn next_id(&self) -> Id;
}

impl<Id, F> TempIdGenerator<Id> for F
where
    F: Fn() -> Id + Send + Sync,
{
    fn next_id(&self) -> Id {
        self()
    }
}

/// Negative-timestamp ids: `-(milliseconds since the epoch)`.
///
/// Two calls within the same millisecond (or a clock stepping backwards)
/// fall back to one below the previously issued id, so every id is strictly
/// negative and distinct from all earlier ones.
#[derive(Debug, Default)]
pub struct NegativeTimestampIds {
    last: AtomicI64,
}

impl NegativeTimestampIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide generator used as the default for `i64` ids.
    pub fn shared() -> Arc<NegativeTimestampIds> {
        static SHARED: OnceLock<Arc<NegativeTimestampIds>> = OnceLock::new();
        Arc::clone(SHARED.get_or_init(|| Arc::new(NegativeTimestampIds::new())))
    }

}

/// Milliseconds since the Unix epoch, `0` if the clock is before it.
pub(crate) fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}

impl TempIdGenerator<i64> for NegativeTimestampIds {
    fn next_id(&self) -> i64 {
        let stamp = -now_millis();
        let mut last = self.last.load(Ordering::SeqCst);
        loop {
            let candidate = stamp.min(last - 1);
            match self
                .last
                .compare_exchange(last, candidate, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => return candidate,
                Err(actual) => last = actual,
            }
        }
    }
}

/// String ids of the form `"<prefix><n>"` with `n` from an atomic counter.
///
/// Ids are unique per generator, so caches sharing one collection must
/// share one generator. [`shared`](Self::shared) is the process-wide default.
#[derive(Debug)]
pub struct PrefixedIds {
    prefix: String,
    counter: AtomicU64,
}

impl PrefixedIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicU64::new(1),
        }
    }

    /// The process-wide `tmp-` generator used as the default for `String` ids.
    pub fn shared() -> Arc<PrefixedIds> {
        static SHARED: OnceLock<Arc<PrefixedIds>> = OnceLock::new();
        Arc::clone(SHARED.get_or_init(|| Arc::new(PrefixedIds::default())))
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Whether `id` carries this generator's prefix.
    pub fn is_temporary(&self, id: &str) -> bool {
        id.starts_with(self.prefix.as_str())
    }
}

impl Default for PrefixedIds {
    fn default() -> Self {
        Self::new(TEMP_ID_PREFIX)
    }
}

impl TempIdGenerator<String> for PrefixedIds {
    fn next_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        format!("{}{}", self.prefix, n)
    }
}

/// Tells a temporary identity apart from a store-assigned one.
///
/// For strings this checks the reserved [`TEMP_ID_PREFIX`]. Ids from a
/// [`PrefixedIds`] built with another prefix are recognised by
/// [`PrefixedIds::is_temporary`] instead.
pub trait TemporaryId {
    fn is_temporary(&self) -> bool;
}

impl TemporaryId for i64 {
    fn is_temporary(&self) -> bool {
        *self < 0
    }
}

impl TemporaryId for i32 {
    fn is_temporary(&self) -> bool {
        *self < 0
    }
}

impl TemporaryId for String {
    fn is_temporary(&self) -> bool {
        self.starts_with(TEMP_ID_PREFIX)
    }
}

/// Id types with a built-in temporary id generator.
pub trait DefaultTempIds: Sized {
    fn default_generator() -> Arc<dyn TempIdGenerator<Self>>;
}

impl DefaultTempIds for i64 {
    fn default_generator() -> Arc<dyn TempIdGenerator<Self>> {
        NegativeTimestampIds::shared()
    }
}

impl DefaultTempIds for String {
    fn default_generator() -> Arc<dyn TempIdGenerator<Self>> {
        PrefixedIds::shared()
    }
}
