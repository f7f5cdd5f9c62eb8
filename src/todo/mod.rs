//! The todo application built on the optimistic list cache.
//!
//! Server side: [`TodoStore`] plus the `todo.*` procedures from
//! [`public_router`] / [`protected_router`]. Client side: [`TodoClient`]
//! for typed calls, and [`Todos`] for the optimistic list with
//! notifications.

mod client;
mod hooks;
mod input;
mod model;
mod procedures;
mod store;

pub use client::TodoClient;
pub use hooks::{TodoCache, TodoQuery, Todos};
pub use input::{CreateTodoInput, DeleteResult, DeleteTodoInput, ToggleTodoInput};
pub use model::{Todo, TodoDraft, TodoPatch};
pub use procedures::{protected_router, public_router, CREATE, DELETE, GET_ALL, TOGGLE};
pub use store::{StoreError, TodoStore};
