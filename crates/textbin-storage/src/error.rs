//! Storage error types.
//!
//! Every variant carries the file location and the underlying reason so a
//! failure can be diagnosed from the log line alone.

/// Errors that can occur while touching the backing file.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The file did not exist and could not be created.
    #[error("unable to create storage file '{path}': {reason}")]
    Create { path: String, reason: String },

    /// The file exists but cannot be opened for reading and writing.
    #[error("unable to open storage file '{path}': {reason}")]
    Open { path: String, reason: String },

    /// The file could not be read, or its content is not valid UTF-8.
    #[error("unable to read storage file '{path}': {reason}")]
    Read { path: String, reason: String },

    /// Truncating and rewriting the file failed.
    #[error("unable to write storage file '{path}': {reason}")]
    Write { path: String, reason: String },

    /// Appending to the file failed.
    #[error("unable to append to storage file '{path}': {reason}")]
    Append { path: String, reason: String },
}
