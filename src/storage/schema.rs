//! SQL schema definitions as const strings.
//!
//! One table of chunk records plus a secondary index on the document path.
//! Embedding vectors are stored as JSON text in the same row; no separate
//! vector-index structure is built here.

/// SQL to create the chunks table.
pub const CREATE_CHUNKS: &str = r#"
CREATE TABLE IF NOT EXISTS chunks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    file_path TEXT NOT NULL,
    chunk_index INTEGER NOT NULL,
    content TEXT NOT NULL,
    embedding_json TEXT NOT NULL,
    created_at TEXT NOT NULL
)
"#;

/// SQL to create the file path index for fast per-document reads.
pub const CREATE_CHUNKS_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS idx_chunks_file_path ON chunks(file_path)
"#;

/// Returns all schema creation statements in order.
pub fn all_migrations() -> Vec<&'static str> {
    vec![CREATE_CHUNKS, CREATE_CHUNKS_INDEX]
}
