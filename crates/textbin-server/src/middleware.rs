//! Authorization middleware for `textbin`.
//!
//! Extracts the `X-API-Token` header and checks it against the configured
//! token before the request reaches a save or append handler. Nothing in the
//! store or on disk is touched for a rejected request.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::warn;

use crate::error::AppError;
use crate::state::AppState;

/// Header carrying the API token.
pub const API_TOKEN_HEADER: &str = "x-api-token";

/// Middleware that validates the `X-API-Token` header.
///
/// A header that is present but not valid UTF-8 counts as an invalid
/// credential, not a missing one.
pub async fn require_api_token(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    let presented = req
        .headers()
        .get(API_TOKEN_HEADER)
        .map(|v| v.to_str().unwrap_or_default());

    match state.api_token.verify(presented) {
        Ok(()) => next.run(req).await,
        Err(err) => {
            warn!(path = %req.uri().path(), reason = %err, "rejected unauthorized request");
            AppError::from(err).into_response()
        }
    }
}
