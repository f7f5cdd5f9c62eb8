//! `todo.*` procedures over a [`TodoStore`].

use serde_json::Value;

use super::input::{CreateTodoInput, DeleteResult, DeleteTodoInput, ToggleTodoInput};
use super::store::TodoStore;
use crate::rpc::{Access, Context, ProcedureError, ProcedureKind, Router};

pub const GET_ALL: &str = "todo.getAll";
pub const CREATE: &str = "todo.create";
pub const TOGGLE: &str = "todo.toggle";
pub const DELETE: &str = "todo.delete";

/// Todo procedures callable without signing in. Rows get the empty owner.
pub fn public_router(store: TodoStore) -> Router<TodoStore> {
    register(Router::new(store), Access::Public)
}

/// Todo procedures scoped to the session user.
pub fn protected_router(store: TodoStore) -> Router<TodoStore> {
    register(Router::new(store), Access::Protected)
}

fn register(router: Router<TodoStore>, access: Access) -> Router<TodoStore> {
    router
        .procedure(GET_ALL, ProcedureKind::Query, access, get_all)
        .procedure(CREATE, ProcedureKind::Mutation, access, create)
        .procedure(TOGGLE, ProcedureKind::Mutation, access, toggle)
        .procedure(DELETE, ProcedureKind::Mutation, access, delete)
}

fn get_all(ctx: &Context<TodoStore>) -> Result<Value, ProcedureError> {
    let todos = ctx.state().get_all(ctx.owner())?;
    Ok(serde_json::to_value(todos)?)
}

fn create(ctx: &Context<TodoStore>) -> Result<Value, ProcedureError> {
    let input = ctx.input::<CreateTodoInput>()?;
    input.validate()?;
    let todo = ctx.state().create(ctx.owner(), &input.title)?;
    Ok(serde_json::to_value(todo)?)
}

fn toggle(ctx: &Context<TodoStore>) -> Result<Value, ProcedureError> {
    let input = ctx.input::<ToggleTodoInput>()?;
    let todo = ctx.state().toggle(ctx.owner(), input.id)?;
    Ok(serde_json::to_value(todo)?)
}

fn delete(ctx: &Context<TodoStore>) -> Result<Value, ProcedureError> {
    let input = ctx.input::<DeleteTodoInput>()?;
    ctx.state().delete(ctx.owner(), input.id)?;
    Ok(serde_json::to_value(DeleteResult { success: true })?)
}
