//! Durable chunk storage.
//!
//! This module provides the persistence layer for indexed chunks:
//!
//! - SQLite database holding one row per chunk, keyed by document path and
//!   position, with the embedding serialized alongside
//! - Atomic per-document writes (all-or-nothing visibility to readers)
//! - Async-safe operations via `tokio::task::spawn_blocking`

mod database;
pub mod queries;
mod schema;

pub use database::{Database, Result, StorageError};

use std::path::Path;

use crate::domain::{ChunkRecord, DocumentPath};

/// The embedding store: the public query surface over the chunks table.
///
/// This is the main entry point for storage operations. The store owns the
/// persisted representation; callers interact only through this API.
#[derive(Debug, Clone)]
pub struct ChunkStore {
    db: Database,
}

impl ChunkStore {
    /// Opens a store backed by a database file, creating it if necessary.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = Database::open(path).await?;
        Ok(Self { db })
    }

    /// Opens a store backed by an in-memory database, for tests.
    pub async fn in_memory() -> Result<Self> {
        let db = Database::open_in_memory().await?;
        Ok(Self { db })
    }

    /// Stores one document's chunks and embeddings atomically.
    ///
    /// Requires `chunks.len() == embeddings.len()`; a mismatch fails with
    /// [`StorageError::ChunkEmbeddingMismatch`] and writes nothing. Existing
    /// records for the path are replaced in the same transaction.
    pub async fn store_chunks(
        &self,
        path: &DocumentPath,
        chunks: &[String],
        embeddings: &[Vec<f32>],
    ) -> Result<()> {
        queries::chunks::store_chunks(&self.db, path, chunks, embeddings).await
    }

    /// Returns a document's chunks, ascending by chunk index.
    pub async fn chunks_for_path(&self, path: &DocumentPath) -> Result<Vec<ChunkRecord>> {
        queries::chunks::get_for_path(&self.db, path).await
    }

    /// Returns every stored chunk, ascending by `(file_path, chunk_index)`.
    pub async fn all_chunks(&self) -> Result<Vec<ChunkRecord>> {
        queries::chunks::get_all(&self.db).await
    }

    /// Deletes all chunks for a document; absent paths are a no-op.
    pub async fn delete_chunks_for_path(&self, path: &DocumentPath) -> Result<usize> {
        queries::chunks::delete_for_path(&self.db, path).await
    }

    /// Counts all stored chunk records.
    pub async fn count(&self) -> Result<u64> {
        queries::chunks::count(&self.db).await
    }

    /// Closes the store, releasing the underlying database resources.
    ///
    /// Subsequent operations fail with [`StorageError::Closed`].
    pub async fn close(&self) -> Result<()> {
        self.db.close().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_store_starts_empty() {
        let store = ChunkStore::in_memory().await.unwrap();
        assert_eq!(store.count().await.unwrap(), 0);
        assert!(store.all_chunks().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn store_round_trips_through_facade() {
        let store = ChunkStore::in_memory().await.unwrap();
        let path = DocumentPath::new("facade.md");

        store
            .store_chunks(&path, &["hello".to_string()], &[vec![1.0, 2.0]])
            .await
            .unwrap();

        let records = store.chunks_for_path(&path).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].content, "hello");
        assert_eq!(records[0].embedding, vec![1.0, 2.0]);
    }

    #[tokio::test]
    async fn closed_store_rejects_operations() {
        let store = ChunkStore::in_memory().await.unwrap();
        store.close().await.unwrap();

        let result = store.count().await;
        assert!(matches!(result, Err(StorageError::Closed)));
    }

    #[tokio::test]
    async fn on_disk_store_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("chunks.db");
        let path = DocumentPath::new("persist.md");

        {
            let store = ChunkStore::open(&db_path).await.unwrap();
            store
                .store_chunks(&path, &["durable".to_string()], &[vec![0.5]])
                .await
                .unwrap();
            store.close().await.unwrap();
        }

        let store = ChunkStore::open(&db_path).await.unwrap();
        let records = store.chunks_for_path(&path).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].content, "durable");
    }
}
