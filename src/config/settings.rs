//! Application settings with defaults.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::chunking::DEFAULT_CHUNK_SIZE;
use crate::providers::embedding::{
    DEFAULT_BATCH_SIZE, DEFAULT_MAX_CONCURRENCY, DEFAULT_MAX_RETRIES, DEFAULT_MODEL,
    VOYAGE_BASE_URL,
};

/// Top-level application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub chunking: ChunkingSettings,
    pub embedding: EmbeddingSettings,
    pub storage: StorageSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            chunking: ChunkingSettings::default(),
            embedding: EmbeddingSettings::default(),
            storage: StorageSettings::default(),
        }
    }
}

/// Chunking settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingSettings {
    /// Maximum chunk size in characters.
    pub chunk_size: usize,
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// Embedding provider settings.
///
/// The API key is deliberately absent: it is read from the
/// `VOYAGE_API_KEY` environment variable and never written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Embedding model identifier.
    pub model: String,
    /// Base URL of the embedding API.
    pub base_url: String,
    /// Maximum texts per request.
    pub batch_size: usize,
    /// Maximum batch requests in flight at once.
    pub max_concurrency: usize,
    /// Retry budget for transient API failures.
    pub max_retries: u32,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: VOYAGE_BASE_URL.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            max_retries: DEFAULT_MAX_RETRIES,
            request_timeout_secs: 60,
        }
    }
}

/// Storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Database file path. `None` means the platform data directory.
    pub db_path: Option<PathBuf>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self { db_path: None }
    }
}
