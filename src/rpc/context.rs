//! Context passed to procedure handlers.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::ProcedureError;
use super::session::Session;

/// The context passed to every procedure handler.
///
/// Generic over `S`, the shared state the router was built with (usually a
/// store handle).
///
/// ## Example
///
/// ```ignore
/// fn toggle(ctx: &Context<TodoStore>) -> Result<Value, ProcedureError> {
///     let input = ctx.input::<ToggleTodoInput>()?;
///     let todo = ctx.state().toggle(ctx.owner(), input.id)?;
///     Ok(serde_json::to_value(todo)?)
/// }
/// ```
pub struct Context<'a, S> {
    procedure: String,
    input: Value,
    session: Session,
    state: &'a S,
}

impl<'a, S> Context<'a, S> {
    pub(crate) fn new(procedure: String, input: Value, session: Session, state: &'a S) -> Self {
        Self {
            procedure,
            input,
            session,
            state,
        }
    }

    /// Deserialize the input payload into a typed struct.
    pub fn input<T: DeserializeOwned>(&self) -> Result<T, ProcedureError> {
        serde_json::from_value(self.input.clone())
            .map_err(|e| ProcedureError::DecodeFailed(e.to_string()))
    }

    pub fn raw_input(&self) -> &Value {
        &self.input
    }

    /// The procedure name being handled.
    pub fn procedure(&self) -> &str {
        &self.procedure
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The signed-in user's id. Returns `Unauthorized` if there is none.
    pub fn user_id(&self) -> Result<&str, ProcedureError> {
        self.session
            .user_id()
            .ok_or_else(|| ProcedureError::Unauthorized("not signed in".into()))
    }

    /// Row owner for this call: the signed-in user, or `""` when anonymous.
    pub fn owner(&self) -> &str {
        self.session.user_id().unwrap_or("")
    }

    /// The router's shared state.
    pub fn state(&self) -> &S {
        self.state
    }
}
