//! `textbin` HTTP server.
//!
//! Wires the document, the API token, and the HTTP routes into an Axum
//! router. Serves the plain-text API at `/fetch`, `/save`, `/append` and the
//! browser editor at `/`.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;
