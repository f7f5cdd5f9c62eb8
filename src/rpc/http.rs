//! HTTP transport for the procedure router.
//!
//! Requires the `http` feature. Uses axum for routing.
//!
//! ## Routes (under the configured endpoint, `/api/trpc` by default)
//!
//! - `GET  {endpoint}/health` returns `{ "ok": true, "procedures": [...] }`.
//! - `GET  {endpoint}/:procedure?input=<json>` calls a query.
//! - `POST {endpoint}/:procedure` calls any procedure with the JSON body as input.
//!
//! Request headers become session variables. Successful calls answer
//! `{ "result": ... }`, failures `{ "error": "...", "code": <status> }`.
//!
//! ## Authentication
//!
//! This transport does not authenticate callers. The `x-user-id` header is
//! taken as sent, so protected procedures are effectively public unless a
//! trusted proxy in front of the server strips any client-supplied
//! `x-user-id` and sets it only for a verified session.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Json;
use log::info;
use serde_json::{json, Value};

use super::error::ProcedureError;
use super::router::{ProcedureKind, Router};
use super::session::Session;
use crate::config::ServerConfig;

/// Build an axum `Router` serving `procedures` under `endpoint`.
pub fn router<S: Send + Sync + 'static>(procedures: Arc<Router<S>>, endpoint: &str) -> axum::Router {
    let inner = axum::Router::new()
        .route("/health", get(health_handler::<S>))
        .route(
            "/:procedure",
            get(query_handler::<S>).post(call_handler::<S>),
        )
        .with_state(procedures);

    let endpoint = endpoint.trim_end_matches('/');
    if endpoint.is_empty() {
        inner
    } else {
        axum::Router::new().nest(endpoint, inner)
    }
}

/// Serve the router over HTTP with the given configuration.
pub async fn serve<S: Send + Sync + 'static>(
    procedures: Arc<Router<S>>,
    config: &ServerConfig,
) -> Result<(), std::io::Error> {
    let app = router(procedures, &config.endpoint);
    let listener = tokio::net::TcpListener::bind(config.addr()).await?;
    info!("serving procedures on {}{}", config.addr(), config.endpoint);
    axum::serve(listener, app).await
}

async fn health_handler<S: Send + Sync + 'static>(
    State(procedures): State<Arc<Router<S>>>,
) -> impl IntoResponse {
    Json(json!({ "ok": true, "procedures": procedures.procedures() }))
}

/// `GET /:procedure`, queries only. Input is the URL-encoded JSON `input` parameter.
async fn query_handler<S: Send + Sync + 'static>(
    State(procedures): State<Arc<Router<S>>>,
    Path(procedure): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let input = match params.get("input") {
        Some(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(value) => value,
            Err(e) => return error_response(ProcedureError::from(e)),
        },
        None => Value::Null,
    };
    let session = session_from_headers(&headers);
    respond(procedures.dispatch_kind(ProcedureKind::Query, &procedure, input, session))
}

/// `POST /:procedure` with an optional JSON body.
async fn call_handler<S: Send + Sync + 'static>(
    State(procedures): State<Arc<Router<S>>>,
    Path(procedure): Path<String>,
    headers: HeaderMap,
    body: Option<Json<Value>>,
) -> Response {
    let input = body.map(|Json(value)| value).unwrap_or(Value::Null);
    let session = session_from_headers(&headers);
    respond(procedures.dispatch(&procedure, input, session))
}

fn respond(result: Result<Value, ProcedureError>) -> Response {
    match result {
        Ok(value) => (StatusCode::OK, Json(json!({ "result": value }))).into_response(),
        Err(e) => error_response(e),
    }
}

fn error_response(err: ProcedureError) -> Response {
    let code = err.status_code();
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = json!({ "error": err.message(), "code": code });
    (status, Json(body)).into_response()
}

/// All headers are lowercased and included as session variables.
///
/// `x-user-id` is copied unchecked. See the module docs on authentication.
fn session_from_headers(headers: &HeaderMap) -> Session {
    let mut vars = HashMap::new();
    for (name, value) in headers.iter() {
        if let Ok(v) = value.to_str() {
            vars.insert(name.as_str().to_string(), v.to_string());
        }
    }
    Session::from_map(vars)
}
