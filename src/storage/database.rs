//! Database connection wrapper and initialization.
//!
//! Provides a thread-safe wrapper around rusqlite for async operations.

use std::path::Path;
use std::sync::Arc;

use rusqlite::Connection;
use thiserror::Error;
use tokio::sync::Mutex;

use super::schema;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("chunk/embedding count mismatch: {chunks} chunks, {embeddings} embeddings")]
    ChunkEmbeddingMismatch { chunks: usize, embeddings: usize },

    #[error("store is closed")]
    Closed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("blocking task failed: {0}")]
    Task(String),
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Thread-safe database connection wrapper.
///
/// Uses a Mutex to ensure only one operation accesses the connection at a
/// time; all operations run via `spawn_blocking` to avoid blocking the async
/// runtime. A single connection with single-writer discipline is the
/// supported concurrency model; parallel indexing tasks must share one
/// instance.
///
/// The connection slot becomes `None` after [`close`](Database::close);
/// every subsequent operation fails with [`StorageError::Closed`].
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Option<Connection>>>,
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// Schema initialization is idempotent: migrations use
    /// `CREATE ... IF NOT EXISTS` and are safe to re-run on every open.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let conn = tokio::task::spawn_blocking(move || -> Result<Connection> {
            let conn = Connection::open(&path)?;
            conn.execute_batch("PRAGMA journal_mode = WAL;")?;
            Ok(conn)
        })
        .await
        .map_err(|e| StorageError::Task(e.to_string()))??;

        let db = Self {
            conn: Arc::new(Mutex::new(Some(conn))),
        };

        db.run_migrations().await?;

        Ok(db)
    }

    /// Opens an in-memory database for testing.
    pub async fn open_in_memory() -> Result<Self> {
        let conn = tokio::task::spawn_blocking(|| -> Result<Connection> {
            Ok(Connection::open_in_memory()?)
        })
        .await
        .map_err(|e| StorageError::Task(e.to_string()))??;

        let db = Self {
            conn: Arc::new(Mutex::new(Some(conn))),
        };

        db.run_migrations().await?;

        Ok(db)
    }

    /// Runs all schema migrations.
    async fn run_migrations(&self) -> Result<()> {
        self.with_conn(|conn| {
            for migration in schema::all_migrations() {
                conn.execute_batch(migration)?;
            }
            Ok(())
        })
        .await
    }

    /// Executes a function with access to the database connection.
    ///
    /// The function runs in a blocking task to avoid blocking the async
    /// runtime.
    pub async fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.conn.clone();

        tokio::task::spawn_blocking(move || {
            let guard = conn.blocking_lock();
            let conn = guard.as_ref().ok_or(StorageError::Closed)?;
            f(conn)
        })
        .await
        .map_err(|e| StorageError::Task(e.to_string()))?
    }

    /// Executes a transaction with the given function.
    ///
    /// The transaction is committed on success or rolled back on error;
    /// readers never observe a partial write.
    pub async fn transaction<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&rusqlite::Transaction<'_>) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.conn.clone();

        tokio::task::spawn_blocking(move || {
            let mut guard = conn.blocking_lock();
            let conn = guard.as_mut().ok_or(StorageError::Closed)?;
            let tx = conn.transaction()?;
            let result = f(&tx)?;
            tx.commit()?;
            Ok(result)
        })
        .await
        .map_err(|e| StorageError::Task(e.to_string()))?
    }

    /// Closes the database, releasing the underlying connection.
    ///
    /// Subsequent operations on this handle (or any clone of it) fail with
    /// [`StorageError::Closed`]. Closing an already-closed database is a
    /// no-op.
    pub async fn close(&self) -> Result<()> {
        let conn = self.conn.clone();

        tokio::task::spawn_blocking(move || {
            let mut guard = conn.blocking_lock();
            drop(guard.take());
            Ok(())
        })
        .await
        .map_err(|e| StorageError::Task(e.to_string()))?
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn open_in_memory_creates_schema() {
        let db = Database::open_in_memory().await.unwrap();

        let tables: Vec<String> = db
            .with_conn(|conn| {
                let mut stmt = conn
                    .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")?;
                let rows = stmt.query_map([], |row| row.get(0))?;
                Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
            })
            .await
            .unwrap();

        assert!(tables.contains(&"chunks".to_string()));
    }

    #[tokio::test]
    async fn with_conn_executes_query() {
        let db = Database::open_in_memory().await.unwrap();

        let count: i64 = db
            .with_conn(|conn| {
                let count = conn.query_row("SELECT COUNT(*) FROM chunks", [], |row| row.get(0))?;
                Ok(count)
            })
            .await
            .unwrap();

        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn transaction_commits_on_success() {
        let db = Database::open_in_memory().await.unwrap();

        db.transaction(|tx| {
            tx.execute(
                "INSERT INTO chunks (file_path, chunk_index, content, embedding_json, created_at)
                 VALUES (?, 0, 'text', '[]', '2025-01-01T00:00:00Z')",
                ["a.md"],
            )?;
            Ok(())
        })
        .await
        .unwrap();

        let count: i64 = db
            .with_conn(|conn| {
                Ok(conn.query_row("SELECT COUNT(*) FROM chunks", [], |row| row.get(0))?)
            })
            .await
            .unwrap();

        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn transaction_rolls_back_on_error() {
        let db = Database::open_in_memory().await.unwrap();

        let result: Result<()> = db
            .transaction(|tx| {
                tx.execute(
                    "INSERT INTO chunks (file_path, chunk_index, content, embedding_json, created_at)
                     VALUES (?, 0, 'text', '[]', '2025-01-01T00:00:00Z')",
                    ["rollback.md"],
                )?;
                Err(StorageError::Task("intentional error".to_string()))
            })
            .await;

        assert!(result.is_err());

        let count: i64 = db
            .with_conn(|conn| {
                Ok(conn.query_row(
                    "SELECT COUNT(*) FROM chunks WHERE file_path = ?",
                    ["rollback.md"],
                    |row| row.get(0),
                )?)
            })
            .await
            .unwrap();

        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn operations_after_close_fail() {
        let db = Database::open_in_memory().await.unwrap();
        db.close().await.unwrap();

        let result = db
            .with_conn(|conn| {
                Ok(conn.query_row("SELECT COUNT(*) FROM chunks", [], |row| row.get::<_, i64>(0))?)
            })
            .await;

        assert!(matches!(result, Err(StorageError::Closed)));
    }

    #[tokio::test]
    async fn close_propagates_to_clones() {
        let db1 = Database::open_in_memory().await.unwrap();
        let db2 = db1.clone();

        db1.close().await.unwrap();

        let result: Result<i64> = db2
            .with_conn(|conn| Ok(conn.query_row("SELECT 1", [], |row| row.get(0))?))
            .await;
        assert!(matches!(result, Err(StorageError::Closed)));
    }

    #[tokio::test]
    async fn double_close_is_a_noop() {
        let db = Database::open_in_memory().await.unwrap();
        db.close().await.unwrap();
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn open_on_disk_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chunks.db");

        let db = Database::open(&path).await.unwrap();
        db.close().await.unwrap();

        // Second open re-runs migrations against the existing file.
        let db = Database::open(&path).await.unwrap();
        let count: i64 = db
            .with_conn(|conn| {
                Ok(conn.query_row("SELECT COUNT(*) FROM chunks", [], |row| row.get(0))?)
            })
            .await
            .unwrap();
        assert_eq!(count, 0);
    }
}
