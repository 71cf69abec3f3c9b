//! Backing file abstraction for `textbin`.
//!
//! This crate defines the [`DocumentFile`] trait, the durable side of the
//! single document served by `textbin`. It knows nothing about HTTP, tokens,
//! or change detection. The mutation protocol in `textbin-core` decides what
//! to write and calls into this layer only when a write is actually needed.
//!
//! Two implementations are provided:
//!
//! - [`FsDocumentFile`]: production default, a plain file on disk
//! - [`MemoryDocumentFile`]: in-memory, for testing only

mod error;
mod fs;
mod memory;

pub use error::StorageError;
pub use fs::FsDocumentFile;
pub use memory::MemoryDocumentFile;

/// The durable copy of the document.
///
/// The whole byte content of the file is the document. There is no header,
/// no sidecar metadata, and no framing between appended chunks.
///
/// Implementations must be safe to share across async tasks (`Send + Sync`).
#[async_trait::async_trait]
pub trait DocumentFile: Send + Sync + 'static {
    /// Human-readable location of the file, used in logs and error messages.
    fn location(&self) -> String;

    /// Create the file with `placeholder` as its content if it does not exist
    /// yet, then verify it can be opened for reading and writing.
    ///
    /// Returns `true` when the file was created by this call.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Create`] if the file cannot be created and
    /// [`StorageError::Open`] if an existing file cannot be opened read-write.
    async fn ensure_exists(&self, placeholder: &str) -> Result<bool, StorageError>;

    /// Read the full content of the file.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Read`] if the file is unreadable or not UTF-8.
    async fn read(&self) -> Result<String, StorageError>;

    /// Truncate the file and write `text` as its entire content.
    ///
    /// Returns the number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Write`] if the write fails.
    async fn overwrite(&self, text: &str) -> Result<usize, StorageError>;

    /// Append `text` to the end of the file without rereading it.
    ///
    /// Returns the number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Append`] if the write fails.
    async fn append(&self, text: &str) -> Result<usize, StorageError>;
}
