//! Todos - the optimistic todo list as a UI layer consumes it.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use super::client::TodoClient;
use super::input::{CreateTodoInput, DeleteResult, DeleteTodoInput, ToggleTodoInput};
use super::model::{Todo, TodoDraft, TodoPatch};
use super::procedures::GET_ALL;
#[cfg(feature = "emitter")]
use crate::cache::CacheEvents;
use crate::cache::{ListCache, OptimisticHooks, OptimisticOptions};
use crate::mutation::Mutation;
use crate::notify::Notifier;
use crate::query::{ListQuery, QueryClient};
use crate::RemoteError;

pub type TodoQuery = ListQuery<Todo, TodoClient>;
pub type TodoCache = ListCache<Todo, TodoQuery>;

type RemoteFuture<O> = Pin<Box<dyn Future<Output = Result<O, RemoteError>> + Send>>;
type Remote<I, O> = Box<dyn Fn(I) -> RemoteFuture<O> + Send + Sync>;
type TodoMutation<I, O> = Mutation<I, O, OptimisticHooks<Todo, TodoQuery, I>, Remote<I, O>>;

const CREATE_FAILED: &str = "Failed to create todo";
const UPDATE_FAILED: &str = "Failed to update todo";
const DELETE_FAILED: &str = "Failed to delete todo";

/// The todo list with optimistic create, toggle and delete.
///
/// Each mutation applies its change to the cache before the server answers,
/// rolls back and notifies on failure, and refetches `todo.getAll` when it
/// settles.
///
/// ## Example
///
/// ```ignore
/// let todos = Todos::new(&queries, client, Arc::new(LogNotifier));
/// todos.load().await?;
/// todos.create("Buy milk").await?;
/// for todo in todos.todos() { println!("{} {}", todo.id, todo.title); }
/// ```
pub struct Todos {
    query: TodoQuery,
    cache: TodoCache,
    create: TodoMutation<CreateTodoInput, Todo>,
    toggle: TodoMutation<ToggleTodoInput, Todo>,
    delete: TodoMutation<DeleteTodoInput, DeleteResult>,
}

impl Todos {
    pub fn new(queries: &QueryClient, client: TodoClient, notifier: Arc<dyn Notifier>) -> Self {
        let query = queries.list_query(GET_ALL, client.clone());
        let cache = ListCache::new(query.clone());
        Self::build(query, cache, client, notifier)
    }

    /// Like [`new`](Self::new), publishing cache changes through `events`.
    #[cfg(feature = "emitter")]
    pub fn with_events(
        queries: &QueryClient,
        client: TodoClient,
        notifier: Arc<dyn Notifier>,
        events: CacheEvents,
    ) -> Self {
        let query = queries.list_query(GET_ALL, client.clone());
        let cache = ListCache::new(query.clone()).with_events(events);
        Self::build(query, cache, client, notifier)
    }

    fn build(query: TodoQuery, cache: TodoCache, client: TodoClient, notifier: Arc<dyn Notifier>) -> Self {
        let create = {
            let notifier = Arc::clone(&notifier);
            let hooks = cache.with_optimistic(|cache| {
                let cache = cache.clone();
                OptimisticOptions::new(move |input: &CreateTodoInput| {
                    cache.add(TodoDraft::pending(&input.title));
                })
                .on_error(move |err| notifier.error(CREATE_FAILED, err.message()))
            });
            let client = client.clone();
            let remote: Remote<CreateTodoInput, Todo> = Box::new(move |input| {
                let client = client.clone();
                Box::pin(async move { client.create(input).await })
            });
            Mutation::new("todo.create", hooks, remote)
        };

        let toggle = {
            let notifier = Arc::clone(&notifier);
            let hooks = cache.with_optimistic(|cache| {
                let cache = cache.clone();
                OptimisticOptions::new(move |input: &ToggleTodoInput| {
                    if let Some(todo) = cache.find(&input.id) {
                        cache.update(&input.id, TodoPatch::completed(!todo.completed));
                    }
                })
                .on_error(move |err| notifier.error(UPDATE_FAILED, err.message()))
            });
            let client = client.clone();
            let remote: Remote<ToggleTodoInput, Todo> = Box::new(move |input| {
                let client = client.clone();
                Box::pin(async move { client.toggle(input).await })
            });
            Mutation::new("todo.toggle", hooks, remote)
        };

        let delete = {
            let hooks = cache.with_optimistic(|cache| {
                let cache = cache.clone();
                OptimisticOptions::new(move |input: &DeleteTodoInput| cache.remove(&input.id))
                    .on_error(move |err| notifier.error(DELETE_FAILED, err.message()))
            });
            let remote: Remote<DeleteTodoInput, DeleteResult> = Box::new(move |input| {
                let client = client.clone();
                Box::pin(async move { client.delete(input).await })
            });
            Mutation::new("todo.delete", hooks, remote)
        };

        Self {
            query,
            cache,
            create,
            toggle,
            delete,
        }
    }

    /// The cached todos, empty until the first fetch.
    pub fn todos(&self) -> Vec<Todo> {
        self.cache.get()
    }

    /// True while the first fetch has not produced data.
    pub fn is_loading(&self) -> bool {
        self.query.is_loading()
    }

    /// Fetch the list from the server.
    pub async fn load(&self) -> Result<(), RemoteError> {
        self.query.fetch().await
    }

    pub async fn create(&self, title: &str) -> Result<Todo, RemoteError> {
        self.create.mutate(CreateTodoInput::new(title)).await
    }

    pub async fn toggle(&self, id: i64) -> Result<Todo, RemoteError> {
        self.toggle.mutate(ToggleTodoInput { id }).await
    }

    pub async fn delete(&self, id: i64) -> Result<DeleteResult, RemoteError> {
        self.delete.mutate(DeleteTodoInput { id }).await
    }

    /// Whether a create is waiting for the server.
    pub fn is_creating(&self) -> bool {
        self.create.is_pending()
    }

    pub fn cache(&self) -> &TodoCache {
        &self.cache
    }

    pub fn query(&self) -> &TodoQuery {
        &self.query
    }
}
