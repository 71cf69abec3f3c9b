//! Save and append semantics.
//!
//! Both mutations run the same routine (see [`Document::apply`]); they
//! differ only in three policies supplied by [`Mutation`]:
//!
//! | policy          | `Save`                    | `Append`                     |
//! |-----------------|---------------------------|------------------------------|
//! | merge           | `content`                 | `old + content`              |
//! | change detection| `old != content`          | `content != ""`              |
//! | file write      | truncate and rewrite all  | append `content` only        |
//!
//! Append is plain concatenation. No separator is inserted between the old
//! text and the new content; clients that want one must send it.
//!
//! [`Document::apply`]: crate::document::Document::apply

use serde::Serialize;
use textbin_storage::{DocumentFile, StorageError};

/// Which mutation a request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    /// Replace the whole document.
    Save,
    /// Add to the end of the document.
    Append,
}

impl Mutation {
    /// Candidate document text after this mutation.
    pub fn merge(self, old: &str, content: &str) -> String {
        match self {
            Self::Save => content.to_owned(),
            Self::Append => {
                let mut merged = String::with_capacity(old.len() + content.len());
                merged.push_str(old);
                merged.push_str(content);
                merged
            }
        }
    }

    /// Whether applying `content` would change a document holding `old`.
    pub fn changes(self, old: &str, content: &str) -> bool {
        match self {
            Self::Save => old != content,
            Self::Append => !content.is_empty(),
        }
    }

    /// Persist the mutation to the backing file.
    ///
    /// Save writes the whole merged text; append writes only `content`.
    /// Returns the number of bytes written.
    pub(crate) async fn write(
        self,
        file: &dyn DocumentFile,
        merged: &str,
        content: &str,
    ) -> Result<usize, StorageError> {
        match self {
            Self::Save => file.overwrite(merged).await,
            Self::Append => file.append(content).await,
        }
    }

    /// Route name, as used in logs and URLs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Save => "save",
            Self::Append => "append",
        }
    }
}

impl std::fmt::Display for Mutation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wire status of a mutation response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MutationStatus {
    #[serde(rename = "success")]
    Success,
    #[serde(rename = "no changes")]
    NoChanges,
}

/// Result of one save or append. Lives only as long as the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationOutcome {
    /// Whether the file and store were touched.
    pub changed: bool,
    /// Size of the incremental file write (0 when unchanged).
    pub bytes_written: usize,
    /// Document text as computed by this request.
    pub text: String,
}

impl MutationOutcome {
    pub(crate) fn unchanged(text: String) -> Self {
        Self {
            changed: false,
            bytes_written: 0,
            text,
        }
    }

    pub(crate) fn written(text: String, bytes_written: usize) -> Self {
        Self {
            changed: true,
            bytes_written,
            text,
        }
    }

    /// Status reported to the caller.
    pub fn status(&self) -> MutationStatus {
        if self.changed {
            MutationStatus::Success
        } else {
            MutationStatus::NoChanges
        }
    }
}
