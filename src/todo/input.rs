//! Procedure inputs for `todo.*`.

use serde::{Deserialize, Serialize};

use crate::rpc::ProcedureError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTodoInput {
    pub title: String,
}

impl CreateTodoInput {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    /// The title must be non-empty.
    pub fn validate(&self) -> Result<(), ProcedureError> {
        if self.title.is_empty() {
            return Err(ProcedureError::Invalid("Title is required".into()));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleTodoInput {
    pub id: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteTodoInput {
    pub id: i64,
}

/// Result of `todo.delete`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResult {
    pub success: bool,
}
