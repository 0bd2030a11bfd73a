//! Chunk record persistence operations.
//!
//! Writes go through [`store_chunks`], which replaces a document's chunk
//! set in a single transaction; reads come back ordered by position.

use chrono::Utc;
use rusqlite::{params, Row};

use crate::domain::{ChunkRecord, DocumentPath};
use crate::storage::database::{Database, Result, StorageError};

/// Stores the chunks of one document as a single atomic transaction.
///
/// `chunks` and `embeddings` are parallel: record `i` gets `chunk_index = i`.
/// A count mismatch fails with [`StorageError::ChunkEmbeddingMismatch`]
/// before anything touches the database.
///
/// Any rows previously stored for `path` are deleted inside the same
/// transaction, so re-indexing a document replaces its chunk set instead of
/// accumulating duplicates, and a failed write leaves the prior generation
/// intact.
pub async fn store_chunks(
    db: &Database,
    path: &DocumentPath,
    chunks: &[String],
    embeddings: &[Vec<f32>],
) -> Result<()> {
    if chunks.len() != embeddings.len() {
        return Err(StorageError::ChunkEmbeddingMismatch {
            chunks: chunks.len(),
            embeddings: embeddings.len(),
        });
    }

    let path = path.clone();
    let rows: Vec<(String, String)> = chunks
        .iter()
        .zip(embeddings)
        .map(|(content, embedding)| {
            let embedding_json =
                serde_json::to_string(embedding).expect("Vec<f32> always serializes");
            (content.clone(), embedding_json)
        })
        .collect();

    db.transaction(move |tx| {
        let now = Utc::now().to_rfc3339();

        tx.execute("DELETE FROM chunks WHERE file_path = ?1", [path.as_str()])?;

        let mut stmt = tx.prepare(
            r#"
            INSERT INTO chunks (file_path, chunk_index, content, embedding_json, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )?;

        for (index, (content, embedding_json)) in rows.iter().enumerate() {
            stmt.execute(params![
                path.as_str(),
                index as i64,
                content,
                embedding_json,
                now,
            ])?;
        }

        Ok(())
    })
    .await
}

/// Retrieves all chunks for a document, ascending by chunk index.
pub async fn get_for_path(db: &Database, path: &DocumentPath) -> Result<Vec<ChunkRecord>> {
    let path = path.clone();

    db.with_conn(move |conn| {
        let mut stmt = conn.prepare(
            r#"
            SELECT id, file_path, chunk_index, content, embedding_json
            FROM chunks
            WHERE file_path = ?1
            ORDER BY chunk_index ASC
            "#,
        )?;

        let rows = stmt.query_map([path.as_str()], row_to_chunk)?;
        let records: std::result::Result<Vec<_>, _> = rows.collect();
        Ok(records?)
    })
    .await
}

/// Retrieves every stored chunk, ascending by `(file_path, chunk_index)`.
pub async fn get_all(db: &Database) -> Result<Vec<ChunkRecord>> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(
            r#"
            SELECT id, file_path, chunk_index, content, embedding_json
            FROM chunks
            ORDER BY file_path ASC, chunk_index ASC
            "#,
        )?;

        let rows = stmt.query_map([], row_to_chunk)?;
        let records: std::result::Result<Vec<_>, _> = rows.collect();
        Ok(records?)
    })
    .await
}

/// Deletes all chunks for a document. Deleting a path with no records is
/// not an error.
pub async fn delete_for_path(db: &Database, path: &DocumentPath) -> Result<usize> {
    let path = path.clone();

    db.with_conn(move |conn| {
        let deleted = conn.execute("DELETE FROM chunks WHERE file_path = ?1", [path.as_str()])?;
        Ok(deleted)
    })
    .await
}

/// Counts all stored chunk records.
pub async fn count(db: &Database) -> Result<u64> {
    db.with_conn(|conn| {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM chunks", [], |row| row.get(0))?;
        Ok(count as u64)
    })
    .await
}

fn row_to_chunk(row: &Row<'_>) -> std::result::Result<ChunkRecord, rusqlite::Error> {
    let embedding_json: String = row.get(4)?;
    let embedding: Vec<f32> = serde_json::from_str(&embedding_json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
    })?;

    let chunk_index: i64 = row.get(2)?;

    Ok(ChunkRecord {
        id: Some(row.get(0)?),
        path: DocumentPath::new(row.get::<_, String>(1)?),
        chunk_index: chunk_index as usize,
        content: row.get(3)?,
        embedding,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fake_embeddings(n: usize) -> Vec<Vec<f32>> {
        (0..n).map(|i| vec![i as f32, 0.5, -1.25]).collect()
    }

    #[tokio::test]
    async fn store_and_read_back_in_order() {
        let db = Database::open_in_memory().await.unwrap();
        let path = DocumentPath::new("notes/a.md");
        let chunks = vec!["one".to_string(), "two".to_string(), "three".to_string()];
        let embeddings = fake_embeddings(3);

        store_chunks(&db, &path, &chunks, &embeddings).await.unwrap();

        let records = get_for_path(&db, &path).await.unwrap();
        assert_eq!(records.len(), 3);
        for (i, record) in records.iter().enumerate() {
            assert!(record.id.is_some());
            assert_eq!(record.chunk_index, i);
            assert_eq!(record.content, chunks[i]);
            assert_eq!(record.embedding, embeddings[i]);
            assert_eq!(record.path, path);
        }
    }

    #[tokio::test]
    async fn embeddings_round_trip_exactly() {
        let db = Database::open_in_memory().await.unwrap();
        let path = DocumentPath::new("precision.md");
        let embedding = vec![0.1_f32, -3.402_823_5e38, 1.192_092_9e-7, 0.0];

        store_chunks(&db, &path, &["c".to_string()], &[embedding.clone()])
            .await
            .unwrap();

        let records = get_for_path(&db, &path).await.unwrap();
        assert_eq!(records[0].embedding, embedding);
    }

    #[tokio::test]
    async fn count_mismatch_fails_with_no_writes() {
        let db = Database::open_in_memory().await.unwrap();
        let path = DocumentPath::new("mismatch.md");
        let chunks = vec!["one".to_string(), "two".to_string()];
        let embeddings = fake_embeddings(1);

        let err = store_chunks(&db, &path, &chunks, &embeddings)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StorageError::ChunkEmbeddingMismatch {
                chunks: 2,
                embeddings: 1
            }
        ));

        assert!(get_for_path(&db, &path).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn restore_replaces_previous_generation() {
        let db = Database::open_in_memory().await.unwrap();
        let path = DocumentPath::new("regen.md");

        store_chunks(
            &db,
            &path,
            &["old-1".to_string(), "old-2".to_string()],
            &fake_embeddings(2),
        )
        .await
        .unwrap();

        store_chunks(&db, &path, &["new".to_string()], &fake_embeddings(1))
            .await
            .unwrap();

        let records = get_for_path(&db, &path).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].content, "new");
        assert_eq!(count(&db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn get_all_orders_by_path_then_index() {
        let db = Database::open_in_memory().await.unwrap();

        // Insert out of path order to prove ordering comes from the query.
        store_chunks(
            &db,
            &DocumentPath::new("b.md"),
            &["b0".to_string(), "b1".to_string()],
            &fake_embeddings(2),
        )
        .await
        .unwrap();
        store_chunks(
            &db,
            &DocumentPath::new("a.md"),
            &["a0".to_string()],
            &fake_embeddings(1),
        )
        .await
        .unwrap();

        let all = get_all(&db).await.unwrap();
        let keys: Vec<(&str, usize)> = all
            .iter()
            .map(|r| (r.path.as_str(), r.chunk_index))
            .collect();
        assert_eq!(keys, vec![("a.md", 0), ("b.md", 0), ("b.md", 1)]);
    }

    #[tokio::test]
    async fn delete_removes_only_that_path() {
        let db = Database::open_in_memory().await.unwrap();
        let keep = DocumentPath::new("keep.md");
        let gone = DocumentPath::new("gone.md");

        store_chunks(&db, &keep, &["k".to_string()], &fake_embeddings(1))
            .await
            .unwrap();
        store_chunks(&db, &gone, &["g".to_string()], &fake_embeddings(1))
            .await
            .unwrap();

        let deleted = delete_for_path(&db, &gone).await.unwrap();
        assert_eq!(deleted, 1);
        assert!(get_for_path(&db, &gone).await.unwrap().is_empty());
        assert_eq!(get_for_path(&db, &keep).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_missing_path_is_not_an_error() {
        let db = Database::open_in_memory().await.unwrap();
        let deleted = delete_for_path(&db, &DocumentPath::new("never-stored.md"))
            .await
            .unwrap();
        assert_eq!(deleted, 0);
    }

    #[tokio::test]
    async fn equivalent_paths_share_one_key() {
        let db = Database::open_in_memory().await.unwrap();

        store_chunks(
            &db,
            &DocumentPath::new(r".\notes\\a.md"),
            &["x".to_string()],
            &fake_embeddings(1),
        )
        .await
        .unwrap();

        let records = get_for_path(&db, &DocumentPath::new("notes/a.md"))
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn empty_chunk_content_is_stored() {
        let db = Database::open_in_memory().await.unwrap();
        let path = DocumentPath::new("empty.md");

        store_chunks(&db, &path, &[String::new()], &[vec![0.0; 4]])
            .await
            .unwrap();

        let records = get_for_path(&db, &path).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].content, "");
    }
}
