//! Router - procedure registry and dispatch.
//!
//! `Router<S>` holds shared state and a set of named procedures. Each
//! procedure is a query (read) or a mutation (write), public or protected.
//! Protected procedures reject calls without a signed-in user before the
//! handler runs.
//!
//! ## Example
//!
//! ```ignore
//! use optimistic_list::rpc::{Router, Session};
//! use serde_json::json;
//!
//! let router = Router::new(TodoStore::new())
//!     .query("todo.getAll", |ctx| Ok(serde_json::to_value(ctx.state().get_all(ctx.owner())?)?))
//!     .protected_mutation("todo.delete", |ctx| { /* ... */ });
//!
//! let todos = router.dispatch("todo.getAll", json!(null), Session::new())?;
//! ```

use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::context::Context;
use super::error::ProcedureError;
use super::session::Session;

type Handler<S> = Box<dyn Fn(&Context<S>) -> Result<Value, ProcedureError> + Send + Sync>;

/// Read or write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcedureKind {
    Query,
    Mutation,
}

/// Who may call a procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    /// Requires a session user id.
    Protected,
}

struct Procedure<S> {
    kind: ProcedureKind,
    access: Access,
    handle: Handler<S>,
}

/// A procedure call as it arrives over a transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallRequest {
    pub procedure: String,
    #[serde(default)]
    pub input: Value,
    #[serde(default)]
    pub session_variables: HashMap<String, String>,
}

/// The result of a [`CallRequest`]: `{ "result": ... }` or `{ "error": ... }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallResponse {
    pub status: u16,
    pub body: Value,
}

impl CallResponse {
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A set of named procedures over shared state `S`.
pub struct Router<S> {
    state: S,
    procedures: HashMap<String, Procedure<S>>,
}

impl<S: Send + Sync + 'static> Router<S> {
    /// Create an empty router over `state`.
    pub fn new(state: S) -> Self {
        Self {
            state,
            procedures: HashMap::new(),
        }
    }

    /// Register a procedure.
    ///
    /// Returns `self` for chaining. Registering a name twice replaces the
    /// earlier procedure.
    pub fn procedure<F>(mut self, name: &str, kind: ProcedureKind, access: Access, handler: F) -> Self
    where
        F: Fn(&Context<S>) -> Result<Value, ProcedureError> + Send + Sync + 'static,
    {
        self.procedures.insert(
            name.to_string(),
            Procedure {
                kind,
                access,
                handle: Box::new(handler),
            },
        );
        self
    }

    pub fn query<F>(self, name: &str, handler: F) -> Self
    where
        F: Fn(&Context<S>) -> Result<Value, ProcedureError> + Send + Sync + 'static,
    {
        self.procedure(name, ProcedureKind::Query, Access::Public, handler)
    }

    pub fn mutation<F>(self, name: &str, handler: F) -> Self
    where
        F: Fn(&Context<S>) -> Result<Value, ProcedureError> + Send + Sync + 'static,
    {
        self.procedure(name, ProcedureKind::Mutation, Access::Public, handler)
    }

    pub fn protected_query<F>(self, name: &str, handler: F) -> Self
    where
        F: Fn(&Context<S>) -> Result<Value, ProcedureError> + Send + Sync + 'static,
    {
        self.procedure(name, ProcedureKind::Query, Access::Protected, handler)
    }

    pub fn protected_mutation<F>(self, name: &str, handler: F) -> Self
    where
        F: Fn(&Context<S>) -> Result<Value, ProcedureError> + Send + Sync + 'static,
    {
        self.procedure(name, ProcedureKind::Mutation, Access::Protected, handler)
    }

    /// Dispatch a procedure by name, whatever its kind.
    pub fn dispatch(&self, name: &str, input: Value, session: Session) -> Result<Value, ProcedureError> {
        self.call(name, None, input, session)
    }

    /// Dispatch a procedure by name, failing with `WrongKind` unless it is a `kind`.
    pub fn dispatch_kind(
        &self,
        kind: ProcedureKind,
        name: &str,
        input: Value,
        session: Session,
    ) -> Result<Value, ProcedureError> {
        self.call(name, Some(kind), input, session)
    }

    fn call(
        &self,
        name: &str,
        expected: Option<ProcedureKind>,
        input: Value,
        session: Session,
    ) -> Result<Value, ProcedureError> {
        let procedure = self
            .procedures
            .get(name)
            .ok_or_else(|| ProcedureError::UnknownProcedure(name.to_string()))?;

        if let Some(kind) = expected {
            if kind != procedure.kind {
                return Err(ProcedureError::WrongKind(name.to_string()));
            }
        }

        if procedure.access == Access::Protected && session.user_id().is_none() {
            return Err(ProcedureError::Unauthorized(format!(
                "{} requires a signed-in user",
                name
            )));
        }

        debug!("dispatching {:?} {}", procedure.kind, name);
        let ctx = Context::new(name.to_string(), input, session, &self.state);
        (procedure.handle)(&ctx)
    }

    /// Dispatch a `CallRequest`, returning a `CallResponse`.
    pub fn dispatch_request(&self, request: &CallRequest) -> CallResponse {
        let session = Session::from_map(request.session_variables.clone());
        match self.dispatch(&request.procedure, request.input.clone(), session) {
            Ok(value) => CallResponse {
                status: 200,
                body: serde_json::json!({ "result": value }),
            },
            Err(e) => CallResponse {
                status: e.status_code(),
                body: serde_json::json!({ "error": e.message() }),
            },
        }
    }

    /// Registered procedure names, sorted.
    pub fn procedures(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.procedures.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn kind_of(&self, name: &str) -> Option<ProcedureKind> {
        self.procedures.get(name).map(|p| p.kind)
    }

    /// Get a reference to the shared state.
    pub fn state(&self) -> &S {
        &self.state
    }
}
