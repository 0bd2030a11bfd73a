//! Indexing orchestration.
//!
//! [`IndexService`] drives the full pipeline for a set of documents:
//! read, chunk, embed, store. Documents are processed sequentially; the
//! embedding provider handles its own batching and concurrency internally.

use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;

use crate::chunking::Chunker;
use crate::domain::DocumentPath;
use crate::providers::documents::{DocumentHandle, DocumentSource, SourceError};
use crate::providers::embedding::{EmbedError, Embedder};
use crate::storage::{ChunkStore, StorageError};

/// Errors that can occur during an indexing run.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("document source error: {0}")]
    Source(#[from] SourceError),

    #[error("embedding error: {0}")]
    Embedding(#[from] EmbedError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result of an indexing run.
#[derive(Debug, Default)]
pub struct IndexOutcome {
    /// Documents whose chunks were written to the store.
    pub documents_indexed: usize,
    /// Requested paths that did not resolve to a readable document.
    pub documents_skipped: usize,
    /// Total chunk records written across all documents.
    pub chunks_written: usize,
    /// Per-document failures, recorded when the run continues past errors.
    pub failures: Vec<(DocumentPath, String)>,
    /// Wall-clock duration of the run in milliseconds.
    pub duration_ms: u64,
}

impl IndexOutcome {
    /// True when every resolved document was indexed without error.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Orchestrates chunking, embedding, and storage for document indexing.
///
/// All collaborators are injected at construction, so tests can substitute
/// in-memory fakes for the embedder and document source.
pub struct IndexService {
    chunker: Arc<dyn Chunker>,
    embedder: Arc<dyn Embedder>,
    store: ChunkStore,
    fail_fast: bool,
}

impl IndexService {
    /// Creates a service over the given pipeline stages.
    ///
    /// The default failure mode is fail-fast: the first document error
    /// aborts the run. See [`with_fail_fast`](Self::with_fail_fast).
    pub fn new(chunker: Arc<dyn Chunker>, embedder: Arc<dyn Embedder>, store: ChunkStore) -> Self {
        Self {
            chunker,
            embedder,
            store,
            fail_fast: true,
        }
    }

    /// Sets whether a document failure aborts the run.
    ///
    /// With `false`, failures are recorded in the outcome and the run
    /// continues with the next document. Documents already stored stay
    /// stored either way.
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Indexes the given paths from a document source.
    ///
    /// Paths that do not resolve to a document are skipped and counted, not
    /// treated as errors. Documents are processed one at a time, in the
    /// order given; each document's chunks become visible in the store
    /// atomically as that document completes.
    pub async fn index_paths(
        &self,
        source: &dyn DocumentSource,
        paths: &[DocumentPath],
    ) -> Result<IndexOutcome, IndexError> {
        let started = Instant::now();
        let mut outcome = IndexOutcome::default();

        tracing::info!(
            requested = paths.len(),
            model = self.embedder.model(),
            "starting indexing run"
        );

        for path in paths {
            let handle = match source.resolve(path).await {
                Ok(Some(handle)) => handle,
                Ok(None) => {
                    tracing::debug!(path = %path, "skipping unresolved document");
                    outcome.documents_skipped += 1;
                    continue;
                }
                Err(err) => {
                    self.record_failure(&mut outcome, path, err.into())?;
                    continue;
                }
            };

            match self.index_document(source, &handle).await {
                Ok(chunks) => {
                    outcome.documents_indexed += 1;
                    outcome.chunks_written += chunks;
                }
                Err(err) => self.record_failure(&mut outcome, path, err)?,
            }
        }

        outcome.duration_ms = started.elapsed().as_millis() as u64;
        tracing::info!(
            indexed = outcome.documents_indexed,
            skipped = outcome.documents_skipped,
            chunks = outcome.chunks_written,
            failures = outcome.failures.len(),
            duration_ms = outcome.duration_ms,
            "indexing run finished"
        );

        Ok(outcome)
    }

    /// Indexes every document the source can enumerate.
    pub async fn index_all(&self, source: &dyn DocumentSource) -> Result<IndexOutcome, IndexError> {
        let handles = source.list().await?;
        let paths: Vec<DocumentPath> = handles
            .into_iter()
            .map(|handle| handle.path().clone())
            .collect();
        self.index_paths(source, &paths).await
    }

    /// Runs one document through the pipeline. Returns the number of chunks
    /// written.
    async fn index_document(
        &self,
        source: &dyn DocumentSource,
        handle: &DocumentHandle,
    ) -> Result<usize, IndexError> {
        let text = source.read(handle).await?;
        let chunks = self.chunker.chunk(&text);

        tracing::debug!(path = %handle.path(), chunks = chunks.len(), "embedding document");
        let embeddings = self.embedder.embed_bulk(&chunks).await?;

        self.store
            .store_chunks(handle.path(), &chunks, &embeddings)
            .await?;
        Ok(chunks.len())
    }

    /// Either aborts the run or records the failure, per the configured
    /// failure mode.
    fn record_failure(
        &self,
        outcome: &mut IndexOutcome,
        path: &DocumentPath,
        err: IndexError,
    ) -> Result<(), IndexError> {
        if self.fail_fast {
            return Err(err);
        }
        tracing::warn!(path = %path, error = %err, "document failed, continuing");
        outcome.failures.push((path.clone(), err.to_string()));
        Ok(())
    }
}
