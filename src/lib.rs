extern crate self as optimistic_list;

pub mod cache;
pub mod config;
mod error;
pub mod identity;
mod item;
pub mod mutation;
pub mod notify;
pub mod query;
pub mod rpc;
pub mod todo;

pub use cache::{CacheEvent, ListCache, MutationContext, OptimisticHooks, OptimisticOptions};
pub use config::{ClientConfig, ServerConfig};
pub use error::RemoteError;
pub use identity::{
    DefaultTempIds, NegativeTimestampIds, PrefixedIds, TempIdGenerator, TemporaryId,
    TEMP_ID_PREFIX,
};
pub use item::ListItem;
pub use mutation::{Mutation, MutationLifecycle, MutationPhase};
pub use notify::{LogNotifier, Notification, NotificationLevel, Notifier, RecordingNotifier};
pub use query::{ListFetcher, ListQuery, QueryClient, QueryUtils};

#[cfg(feature = "emitter")]
pub use cache::CacheEvents;

// Re-export the derive macro (same name as the trait, different namespace)
pub use optimistic_list_macros::ListItem;
