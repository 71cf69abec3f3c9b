//! Shared application state for the `textbin` server.
//!
//! A single [`AppState`] is constructed at startup and shared across all
//! Axum handlers via `Arc`. Tests build as many independent instances as they
//! like; nothing here is process-global.

use textbin_core::auth::ApiToken;
use textbin_core::document::Document;

use crate::config::Theme;

/// Shared application state passed to all HTTP handlers.
pub struct AppState {
    /// The managed document (store + backing file).
    pub document: Document,
    /// Secret required on mutating routes.
    pub api_token: ApiToken,
    /// Editor colour scheme.
    pub theme: Theme,
}

impl AppState {
    #[must_use]
    pub fn new(document: Document, api_token: ApiToken, theme: Theme) -> Self {
        Self {
            document,
            api_token,
            theme,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("document", &self.document)
            .field("theme", &self.theme)
            .finish_non_exhaustive()
    }
}
