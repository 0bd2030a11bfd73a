//! The chunk record, the unit of persistence.

use serde::{Deserialize, Serialize};

use super::DocumentPath;

/// One bounded-length contiguous piece of a document, paired with its
/// embedding vector.
///
/// Records are immutable once written: re-indexing a document replaces its
/// whole chunk set rather than mutating rows in place. Concatenating
/// `content` across ascending `chunk_index` for a path reproduces the
/// original document text exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// Storage-assigned row id. `None` before the record is written,
    /// always present on read-back.
    pub id: Option<i64>,
    /// Normalized path of the source document.
    pub path: DocumentPath,
    /// Zero-based position of this chunk within the document.
    pub chunk_index: usize,
    /// Exact chunk substring. May be empty for an empty document.
    pub content: String,
    /// Embedding vector. Dimensionality is fixed per embedding model.
    pub embedding: Vec<f32>,
}

impl ChunkRecord {
    /// Creates an unsaved record (no storage id yet).
    pub fn new(
        path: DocumentPath,
        chunk_index: usize,
        content: impl Into<String>,
        embedding: Vec<f32>,
    ) -> Self {
        Self {
            id: None,
            path,
            chunk_index,
            content: content.into(),
            embedding,
        }
    }

    /// Returns the dimensionality of the embedding.
    pub fn dimension(&self) -> usize {
        self.embedding.len()
    }
}
