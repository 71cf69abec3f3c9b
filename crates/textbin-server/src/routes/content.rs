//! Document API routes: `/fetch`, `/save`, `/append`.
//!
//! Fetch returns the document as plain text. Save and append accept a JSON
//! body `{"content": "..."}` and answer `{"status": "success"}` plus an
//! `X-Bytes-Written` header, or `{"status": "no changes"}` when nothing had
//! to be written.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, error};

use textbin_core::mutation::{Mutation, MutationStatus};

use crate::error::AppError;
use crate::state::AppState;

/// Response header reporting the size of the file write.
pub const BYTES_WRITTEN_HEADER: &str = "x-bytes-written";

/// Unauthenticated read routes.
pub fn read_router() -> Router<Arc<AppState>> {
    Router::new().route("/fetch", get(fetch))
}

/// Mutating routes. The caller is expected to put the token gate in front.
pub fn mutation_router() -> Router<Arc<AppState>> {
    // The document has no size limit, so neither does its request body.
    Router::new()
        .route("/save", post(save))
        .route("/append", post(append))
        .layer(DefaultBodyLimit::disable())
}

// ── Request / Response types ─────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct MutationResponse {
    pub status: MutationStatus,
}

// ── Handlers ─────────────────────────────────────────────────────────

/// Return the document as plain text, or `204 No Content` when it is empty.
async fn fetch(State(state): State<Arc<AppState>>) -> Response {
    let text = state.document.text().await;
    if text.is_empty() {
        return StatusCode::NO_CONTENT.into_response();
    }
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], text).into_response()
}

/// Replace the whole document.
async fn save(State(state): State<Arc<AppState>>, body: Bytes) -> Result<Response, AppError> {
    mutate(&state, Mutation::Save, &body).await
}

/// Append to the document.
async fn append(State(state): State<Arc<AppState>>, body: Bytes) -> Result<Response, AppError> {
    mutate(&state, Mutation::Append, &body).await
}

/// Shared body of the save and append handlers.
///
/// The body is decoded by hand rather than through the `Json` extractor so
/// that every malformed body, regardless of `Content-Type`, gets a `400`
/// with a descriptive message.
async fn mutate(state: &AppState, mutation: Mutation, body: &[u8]) -> Result<Response, AppError> {
    let request: Map<String, Value> = serde_json::from_slice(body).map_err(|e| {
        let msg = format!("error decoding JSON: {e}");
        debug!(%mutation, "{msg}");
        AppError::BadRequest(msg)
    })?;

    let content = content_field(&request).map_err(|msg| {
        debug!(%mutation, "{msg}");
        AppError::BadRequest(msg.to_owned())
    })?;

    let outcome = state
        .document
        .apply(mutation, content)
        .await
        .map_err(|e| {
            error!(%mutation, error = %e, "failed to persist document");
            AppError::from(e)
        })?;

    let mut response = Json(MutationResponse {
        status: outcome.status(),
    })
    .into_response();

    if outcome.changed {
        response.headers_mut().insert(
            BYTES_WRITTEN_HEADER,
            HeaderValue::from(outcome.bytes_written),
        );
    }

    Ok(response)
}

/// Pull `content` out of a request object.
///
/// An explicit `null` counts as the empty string; only an absent key is an
/// error.
fn content_field(request: &Map<String, Value>) -> Result<&str, &'static str> {
    match request.get("content") {
        None => Err("missing 'content' field in JSON"),
        Some(Value::Null) => Ok(""),
        Some(Value::String(content)) => Ok(content),
        Some(_) => Err("error decoding JSON: 'content' must be a string"),
    }
}
