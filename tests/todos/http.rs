//! HTTP transport tests. Requires the `http` feature.

use std::sync::Arc;

use optimistic_list::rpc::{self, Router};
use optimistic_list::todo::{protected_router, public_router, Todo, TodoStore};
use serde_json::{json, Value};

const ENDPOINT: &str = "/api/trpc";

/// Start a server on a random port, return the endpoint URL.
async fn start_server(router: Router<TodoStore>) -> String {
    let app = rpc::router(Arc::new(router), ENDPOINT);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}{ENDPOINT}")
}

#[tokio::test]
async fn health_lists_procedures() {
    let base = start_server(public_router(TodoStore::new())).await;

    let resp = reqwest::get(format!("{base}/health")).await.unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["ok"], true);
    assert_eq!(
        body["procedures"],
        json!(["todo.create", "todo.delete", "todo.getAll", "todo.toggle"])
    );
}

#[tokio::test]
async fn create_then_query() {
    let base = start_server(public_router(TodoStore::new())).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/todo.create"))
        .json(&json!({ "title": "Buy milk" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let created: Todo = serde_json::from_value(body["result"].clone()).unwrap();
    assert_eq!(created.id, 1);
    assert_eq!(created.title, "Buy milk");

    let resp = client.get(format!("{base}/todo.getAll")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let todos: Vec<Todo> = serde_json::from_value(body["result"].clone()).unwrap();
    assert_eq!(todos, vec![created]);
}

#[tokio::test]
async fn validation_and_missing_rows_map_to_status_codes() {
    let base = start_server(public_router(TodoStore::new())).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/todo.create"))
        .json(&json!({ "title": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Title is required");

    let resp = client
        .post(format!("{base}/todo.toggle"))
        .json(&json!({ "id": 99 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Todo not found");
}

#[tokio::test]
async fn mutations_are_not_served_over_get() {
    let base = start_server(public_router(TodoStore::new())).await;

    let resp = reqwest::get(format!("{base}/todo.delete?input=%7B%22id%22%3A1%7D"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 405);

    let resp = reqwest::get(format!("{base}/todo.nope")).await.unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn user_header_flows_to_session() {
    let base = start_server(protected_router(TodoStore::new())).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/todo.create"))
        .json(&json!({ "title": "Mine" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);

    let resp = client
        .post(format!("{base}/todo.create"))
        .header("x-user-id", "alice")
        .json(&json!({ "title": "Mine" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["result"]["userId"], "alice");
}
