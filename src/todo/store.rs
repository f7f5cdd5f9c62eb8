//! TodoStore - authoritative in-memory todo table.

use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, RwLock};

use super::model::Todo;
use crate::identity::now_millis;
use crate::rpc::ProcedureError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    LockPoisoned,
    NotFound(i64),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::LockPoisoned => write!(f, "lock poisoned"),
            StoreError::NotFound(id) => write!(f, "todo {} not found", id),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<StoreError> for ProcedureError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => ProcedureError::NotFound("Todo not found".into()),
            StoreError::LockPoisoned => ProcedureError::Store(err.to_string()),
        }
    }
}

/// In-memory todo table with autoincrement ids starting at 1.
///
/// Rows are scoped by owner: every operation only sees rows whose `user_id`
/// equals the given owner. Clone-friendly via Arc.
#[derive(Clone)]
pub struct TodoStore {
    rows: Arc<RwLock<Vec<Todo>>>,
    next_id: Arc<AtomicI64>,
}

impl Default for TodoStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TodoStore {
    pub fn new() -> Self {
        Self {
            rows: Arc::new(RwLock::new(Vec::new())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }

    /// All of `owner`'s todos, oldest first.
    pub fn get_all(&self, owner: &str) -> Result<Vec<Todo>, StoreError> {
        let rows = self.rows.read().map_err(|_| StoreError::LockPoisoned)?;
        let mut todos: Vec<Todo> = rows.iter().filter(|t| t.user_id == owner).cloned().collect();
        todos.sort_by_key(|t| (t.created_at, t.id));
        Ok(todos)
    }

    /// Insert a new, not completed todo and return it.
    pub fn create(&self, owner: &str, title: &str) -> Result<Todo, StoreError> {
        let mut rows = self.rows.write().map_err(|_| StoreError::LockPoisoned)?;
        let todo = Todo {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            title: title.to_string(),
            completed: false,
            created_at: now_millis(),
            user_id: owner.to_string(),
        };
        rows.push(todo.clone());
        Ok(todo)
    }

    /// Flip `completed` and return the updated row.
    pub fn toggle(&self, owner: &str, id: i64) -> Result<Todo, StoreError> {
        let mut rows = self.rows.write().map_err(|_| StoreError::LockPoisoned)?;
        let todo = rows
            .iter_mut()
            .find(|t| t.id == id && t.user_id == owner)
            .ok_or(StoreError::NotFound(id))?;
        todo.completed = !todo.completed;
        Ok(todo.clone())
    }

    /// Delete the row if present. Deleting a missing id succeeds.
    pub fn delete(&self, owner: &str, id: i64) -> Result<(), StoreError> {
        let mut rows = self.rows.write().map_err(|_| StoreError::LockPoisoned)?;
        rows.retain(|t| !(t.id == id && t.user_id == owner));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rows.read().map(|rows| rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
