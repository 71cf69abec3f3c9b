//! The managed document: in-memory store plus backing file.
//!
//! [`Document`] owns both halves and runs the mutation protocol that keeps
//! them in step. The file is always written first and the store updated
//! second, so a failed write never advances the in-memory text.
//!
//! # Concurrency
//!
//! The store lock covers only the in-memory update. Two concurrent writers
//! can interleave their file writes with each other's store updates, so under
//! contention the file and the store each end up consistent but may reflect
//! different last writers. This is accepted: there is no cross-request
//! transaction.

use std::sync::Arc;

use textbin_storage::DocumentFile;
use tracing::{debug, trace};

use crate::error::{DocumentError, MutationError};
use crate::mutation::{Mutation, MutationOutcome};
use crate::store::DocumentStore;

/// Content written to the backing file the first time it is created.
pub const PLACEHOLDER: &str = "\
Welcome to textbin.

This file is the whole document. Edit it in the browser, or from a shell:

    textbin push \"replace everything with this\"
    textbin push --append \"add a line at the end\"
    textbin fetch
";

/// The single document served by `textbin`.
pub struct Document {
    store: DocumentStore,
    file: Arc<dyn DocumentFile>,
}

impl Document {
    /// Open the document: create the backing file with [`PLACEHOLDER`] if it
    /// is missing, then load its content into a fresh store.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Storage`] if the file cannot be created,
    /// opened read-write, or read.
    pub async fn open(file: Arc<dyn DocumentFile>) -> Result<Self, DocumentError> {
        let created = file.ensure_exists(PLACEHOLDER).await?;
        let text = file.read().await?;
        debug!(
            path = %file.location(),
            created,
            bytes = text.len(),
            "document loaded"
        );
        Ok(Self::with_store(DocumentStore::new(text), file))
    }

    /// Assemble a document from an already-loaded store.
    #[must_use]
    pub fn with_store(store: DocumentStore, file: Arc<dyn DocumentFile>) -> Self {
        Self { store, file }
    }

    /// Current document text.
    pub async fn text(&self) -> String {
        self.store.get().await
    }

    /// Location of the backing file.
    pub fn location(&self) -> String {
        self.file.location()
    }

    /// Replace the whole document with `content`.
    ///
    /// # Errors
    ///
    /// See [`Document::apply`].
    pub async fn save(&self, content: &str) -> Result<MutationOutcome, MutationError> {
        self.apply(Mutation::Save, content).await
    }

    /// Append `content` to the document.
    ///
    /// # Errors
    ///
    /// See [`Document::apply`].
    pub async fn append(&self, content: &str) -> Result<MutationOutcome, MutationError> {
        self.apply(Mutation::Append, content).await
    }

    /// Run one mutation: detect a no-op, otherwise write the file and then
    /// update the store.
    ///
    /// # Errors
    ///
    /// Returns [`MutationError::Storage`] if the file write fails. The store
    /// is left exactly as it was before the call.
    pub async fn apply(
        &self,
        mutation: Mutation,
        content: &str,
    ) -> Result<MutationOutcome, MutationError> {
        let old = self.store.get().await;

        if !mutation.changes(&old, content) {
            trace!(%mutation, "no changes, skipping write");
            return Ok(MutationOutcome::unchanged(old));
        }

        let merged = mutation.merge(&old, content);
        trace!(%mutation, content = %merged, "writing merged content");

        let bytes_written = mutation.write(self.file.as_ref(), &merged, content).await?;

        match mutation {
            Mutation::Save => self.store.set(merged.clone()).await,
            Mutation::Append => self.store.append(content).await,
        }

        debug!(
            %mutation,
            bytes = bytes_written,
            path = %self.file.location(),
            "document updated"
        );
        Ok(MutationOutcome::written(merged, bytes_written))
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("file", &self.file.location())
            .finish_non_exhaustive()
    }
}
