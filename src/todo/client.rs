//! TodoClient - typed calls to the `todo.*` procedures.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::input::{CreateTodoInput, DeleteResult, DeleteTodoInput, ToggleTodoInput};
use super::model::Todo;
use super::procedures::{CREATE, DELETE, GET_ALL, TOGGLE};
use super::store::TodoStore;
use crate::query::ListFetcher;
use crate::rpc::{Router, Session};
use crate::RemoteError;

/// Calls a todo router on behalf of one session.
///
/// Failures come back as [`RemoteError`]s, the way a network client would
/// see them. Clone-friendly via Arc.
#[derive(Clone)]
pub struct TodoClient {
    router: Arc<Router<TodoStore>>,
    session: Session,
}

impl TodoClient {
    pub fn new(router: Arc<Router<TodoStore>>, session: Session) -> Self {
        Self { router, session }
    }

    /// A client for the anonymous session.
    pub fn anonymous(router: Arc<Router<TodoStore>>) -> Self {
        Self::new(router, Session::new())
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn call<In: Serialize, Out: DeserializeOwned>(
        &self,
        procedure: &str,
        input: &In,
    ) -> Result<Out, RemoteError> {
        let input = serde_json::to_value(input)?;
        let output = self
            .router
            .dispatch(procedure, input, self.session.clone())
            .map_err(RemoteError::from)?;
        Ok(serde_json::from_value(output)?)
    }

    pub async fn get_all(&self) -> Result<Vec<Todo>, RemoteError> {
        self.call(GET_ALL, &Value::Null)
    }

    pub async fn create(&self, input: CreateTodoInput) -> Result<Todo, RemoteError> {
        self.call(CREATE, &input)
    }

    pub async fn toggle(&self, input: ToggleTodoInput) -> Result<Todo, RemoteError> {
        self.call(TOGGLE, &input)
    }

    pub async fn delete(&self, input: DeleteTodoInput) -> Result<DeleteResult, RemoteError> {
        self.call(DELETE, &input)
    }
}

impl ListFetcher<Todo> for TodoClient {
    async fn fetch_all(&self) -> Result<Vec<Todo>, RemoteError> {
        self.get_all().await
    }
}
