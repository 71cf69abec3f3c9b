//! Filesystem-backed document file.
//!
//! The file is created lazily at startup, truncated and rewritten on every
//! save, and opened in append mode on every append. It is never deleted.

use std::path::{Path, PathBuf};

use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::{DocumentFile, StorageError};

/// A document file stored at a fixed path on local disk.
///
/// # Examples
///
/// ```no_run
/// # use textbin_storage::{DocumentFile, FsDocumentFile};
/// # #[tokio::main]
/// # async fn main() {
/// let file = FsDocumentFile::new("/var/lib/textbin/.textbin");
/// file.ensure_exists("hello\n").await.unwrap();
/// let text = file.read().await.unwrap();
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FsDocumentFile {
    path: PathBuf,
}

impl FsDocumentFile {
    /// Bind to the file at `path`. Nothing is touched on disk until
    /// [`DocumentFile::ensure_exists`] or a write is called.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl DocumentFile for FsDocumentFile {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    async fn ensure_exists(&self, placeholder: &str) -> Result<bool, StorageError> {
        let exists = tokio::fs::try_exists(&self.path)
            .await
            .map_err(|e| StorageError::Open {
                path: self.location(),
                reason: e.to_string(),
            })?;

        if !exists {
            debug!(path = %self.path.display(), "storage file not found, creating it with placeholder content");
            tokio::fs::write(&self.path, placeholder)
                .await
                .map_err(|e| StorageError::Create {
                    path: self.location(),
                    reason: e.to_string(),
                })?;
        }

        OpenOptions::new()
            .read(true)
            .write(true)
            .open(&self.path)
            .await
            .map_err(|e| StorageError::Open {
                path: self.location(),
                reason: e.to_string(),
            })?;

        Ok(!exists)
    }

    async fn read(&self) -> Result<String, StorageError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| StorageError::Read {
                path: self.location(),
                reason: e.to_string(),
            })?;

        String::from_utf8(bytes).map_err(|e| StorageError::Read {
            path: self.location(),
            reason: format!("content is not valid UTF-8: {e}"),
        })
    }

    async fn overwrite(&self, text: &str) -> Result<usize, StorageError> {
        tokio::fs::write(&self.path, text)
            .await
            .map_err(|e| StorageError::Write {
                path: self.location(),
                reason: e.to_string(),
            })?;
        Ok(text.len())
    }

    async fn append(&self, text: &str) -> Result<usize, StorageError> {
        let append_err = |e: std::io::Error| StorageError::Append {
            path: self.location(),
            reason: e.to_string(),
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(append_err)?;

        file.write_all(text.as_bytes()).await.map_err(append_err)?;
        file.flush().await.map_err(append_err)?;

        Ok(text.len())
    }
}
