//! Document source trait and supporting types.
//!
//! A document source is the external collaborator that resolves identifiers
//! to readable content and enumerates indexable documents. The core never
//! assumes where documents live; anything implementing [`DocumentSource`]
//! can feed the indexing pipeline.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::DocumentPath;

/// Errors that can occur while accessing a document source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("document source unavailable: {0}")]
    Unavailable(String),
}

/// Result type for document source operations.
pub type SourceResult<T> = Result<T, SourceError>;

/// An opaque handle to a resolvable document.
///
/// Holding a handle means the source reported the document present at
/// resolution time; reads can still fail if it disappears afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentHandle {
    path: DocumentPath,
}

impl DocumentHandle {
    /// Creates a handle for the given path.
    pub fn new(path: DocumentPath) -> Self {
        Self { path }
    }

    /// Returns the normalized document path this handle refers to.
    pub fn path(&self) -> &DocumentPath {
        &self.path
    }
}

/// Resolves document identifiers to readable content.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Resolves a path to a handle, or `None` when the document is absent.
    ///
    /// Absence is a soft miss, not an error; bulk indexing skips it.
    async fn resolve(&self, path: &DocumentPath) -> SourceResult<Option<DocumentHandle>>;

    /// Reads the full text content of a resolved document.
    async fn read(&self, handle: &DocumentHandle) -> SourceResult<String>;

    /// Enumerates all indexable documents in the source.
    async fn list(&self) -> SourceResult<Vec<DocumentHandle>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_exposes_its_path() {
        let handle = DocumentHandle::new(DocumentPath::new("notes/a.md"));
        assert_eq!(handle.path().as_str(), "notes/a.md");
    }

    #[test]
    fn source_error_display() {
        let err = SourceError::Unavailable("vault is locked".to_string());
        assert_eq!(err.to_string(), "document source unavailable: vault is locked");
    }
}
