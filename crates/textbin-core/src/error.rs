//! Error types for `textbin-core`.
//!
//! Error messages never include the API token or the document content.

use textbin_storage::StorageError;

/// Errors from loading the document at startup.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// The backing file could not be created, opened, or read.
    #[error("document storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Errors from a save or append request.
#[derive(Debug, thiserror::Error)]
pub enum MutationError {
    /// Writing the backing file failed; the in-memory document is unchanged.
    #[error("{0}")]
    Storage(#[from] StorageError),
}

/// Errors from the authorization gate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The request carried no credential at all.
    #[error("missing credential: X-API-Token header is required")]
    MissingCredential,

    /// The request carried a credential that does not match.
    #[error("invalid credential: X-API-Token does not match")]
    InvalidCredential,
}

/// Errors from API token construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// A token must be at least one character long.
    #[error("invalid token length {length}: must be at least 1")]
    InvalidLength { length: usize },
}
