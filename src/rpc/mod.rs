//! rpc - named procedures over shared state.
//!
//! Register query and mutation handlers on a [`Router`]. Each handler gets a
//! [`Context`] with the input payload, the caller's [`Session`] and the
//! router's state. Protected procedures require a signed-in user.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use optimistic_list::rpc::{self, Router, Session};
//! use serde_json::json;
//!
//! let router = Arc::new(
//!     Router::new(TodoStore::new())
//!         .query("todo.getAll", |ctx| Ok(serde_json::to_value(ctx.state().get_all(ctx.owner())?)?))
//! );
//!
//! // Direct dispatch
//! let todos = router.dispatch("todo.getAll", json!(null), Session::new())?;
//!
//! // HTTP transport (requires "http" feature)
//! // rpc::serve(router, &ServerConfig::from_env()).await?;
//! ```

mod context;
mod error;
mod router;
mod session;

pub use context::Context;
pub use error::ProcedureError;
pub use router::{Access, CallRequest, CallResponse, ProcedureKind, Router};
pub use session::{Session, USER_ID, USER_NAME};

// HTTP transport (requires "http" feature)
#[cfg(feature = "http")]
mod http;
#[cfg(feature = "http")]
pub use http::{router, serve};
