//! In-memory document file for testing.
//!
//! Keeps the "file" content in a `String` behind a `RwLock`. Nothing touches
//! disk. Every successful write bumps a counter, and writes can be forced to
//! fail, which lets tests observe write amplification and failure ordering.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tokio::sync::RwLock;

use crate::{DocumentFile, StorageError};

const LOCATION: &str = "memory://document";

/// An in-memory stand-in for the backing file.
///
/// Clones share state, so a test can keep one handle for inspection while
/// another is handed to the code under test.
///
/// # Examples
///
/// ```
/// # use textbin_storage::{DocumentFile, MemoryDocumentFile};
/// # #[tokio::main]
/// # async fn main() {
/// let file = MemoryDocumentFile::new();
/// file.overwrite("hello").await.unwrap();
/// assert_eq!(file.read().await.unwrap(), "hello");
/// assert_eq!(file.write_count(), 1);
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentFile {
    content: Arc<RwLock<Option<String>>>,
    writes: Arc<AtomicUsize>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryDocumentFile {
    /// Create a file that does not exist yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a file that already holds `text`.
    #[must_use]
    pub fn with_content(text: impl Into<String>) -> Self {
        Self {
            content: Arc::new(RwLock::new(Some(text.into()))),
            ..Self::default()
        }
    }

    /// Number of successful `overwrite`/`append` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Make every subsequent write fail (or succeed again).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Current content, or `None` if the file was never created.
    pub async fn contents(&self) -> Option<String> {
        self.content.read().await.clone()
    }

    fn check_writable(&self) -> Result<(), String> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err("simulated write failure".to_owned());
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl DocumentFile for MemoryDocumentFile {
    fn location(&self) -> String {
        LOCATION.to_owned()
    }

    async fn ensure_exists(&self, placeholder: &str) -> Result<bool, StorageError> {
        let mut content = self.content.write().await;
        if content.is_some() {
            return Ok(false);
        }
        *content = Some(placeholder.to_owned());
        Ok(true)
    }

    async fn read(&self) -> Result<String, StorageError> {
        self.content
            .read()
            .await
            .clone()
            .ok_or_else(|| StorageError::Read {
                path: LOCATION.to_owned(),
                reason: "file does not exist".to_owned(),
            })
    }

    async fn overwrite(&self, text: &str) -> Result<usize, StorageError> {
        self.check_writable().map_err(|reason| StorageError::Write {
            path: LOCATION.to_owned(),
            reason,
        })?;

        *self.content.write().await = Some(text.to_owned());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(text.len())
    }

    async fn append(&self, text: &str) -> Result<usize, StorageError> {
        self.check_writable().map_err(|reason| StorageError::Append {
            path: LOCATION.to_owned(),
            reason,
        })?;

        self.content
            .write()
            .await
            .get_or_insert_with(String::new)
            .push_str(text);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(text.len())
    }
}
