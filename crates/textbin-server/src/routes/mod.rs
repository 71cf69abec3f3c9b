//! HTTP route handlers for `textbin`.
//!
//! Routes are organized by surface:
//! - `content`: the plain-text API (`/fetch`, `/save`, `/append`)
//! - `ui`: the browser editor at `/`

pub mod content;
pub mod ui;

use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, header};
use axum::middleware as axum_mw;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::{API_TOKEN_HEADER, require_api_token};
use crate::state::AppState;

/// Build the full router with all routes and middleware.
pub fn router(state: Arc<AppState>) -> Router {
    // Mutating routes go through the token gate; fetch and the editor do not.
    let protected = content::mutation_router().route_layer(axum_mw::from_fn_with_state(
        Arc::clone(&state),
        require_api_token,
    ));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(API_TOKEN_HEADER),
        ])
        .expose_headers([HeaderName::from_static(content::BYTES_WRITTEN_HEADER)]);

    Router::new()
        .merge(content::read_router())
        .merge(protected)
        .merge(ui::router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .with_state(state)
}
