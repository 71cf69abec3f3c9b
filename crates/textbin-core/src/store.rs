//! In-memory document store.
//!
//! The store is the single source of truth for the current text. Readers
//! share a read lock; `set` and `append` take the write lock only for the
//! in-memory update itself. Callers do their file I/O before calling in, so
//! the lock is never held across a disk write.

use tokio::sync::RwLock;

/// Concurrency-safe holder of the document text.
#[derive(Debug, Default)]
pub struct DocumentStore {
    text: RwLock<String>,
}

impl DocumentStore {
    /// Create a store holding `initial`.
    #[must_use]
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            text: RwLock::new(initial.into()),
        }
    }

    /// Snapshot of the current text.
    pub async fn get(&self) -> String {
        self.text.read().await.clone()
    }

    /// Replace the text.
    pub async fn set(&self, text: impl Into<String>) {
        *self.text.write().await = text.into();
    }

    /// Concatenate `suffix` onto the current text in one critical section.
    pub async fn append(&self, suffix: &str) {
        self.text.write().await.push_str(suffix);
    }
}
