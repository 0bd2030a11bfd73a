//! Embedder trait and supporting types.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while acquiring embeddings.
///
/// Any failure poisons the whole bulk call: there are no partial results.
#[derive(Debug, Error)]
pub enum EmbedError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("embedding API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("retries exhausted after {attempts} attempts: {status} - {message}")]
    RetryExhausted {
        attempts: u32,
        status: u16,
        message: String,
    },

    #[error("invalid response format: {0}")]
    InvalidResponse(String),

    #[error("authentication failed: {0}")]
    Authentication(String),
}

/// Result type for embedding operations.
pub type EmbedResult<T> = Result<T, EmbedError>;

/// Produces one embedding vector per input text via an embedding model.
///
/// Implementations own their batching policy and wire protocol; callers see
/// only the order-preserving contract: `embed_bulk(texts)[i]` corresponds to
/// `texts[i]` for all `i`.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Returns the model identifier embeddings are produced with.
    fn model(&self) -> &str;

    /// Embeds a list of texts, returning one vector per text in input order.
    ///
    /// An empty input returns an empty result without any network call.
    async fn embed_bulk(&self, texts: &[String]) -> EmbedResult<Vec<Vec<f32>>>;

    /// Embeds a single text.
    async fn embed(&self, text: &str) -> EmbedResult<Vec<f32>> {
        let texts = [text.to_string()];
        let mut embeddings = self.embed_bulk(&texts).await?;
        embeddings
            .pop()
            .ok_or_else(|| EmbedError::InvalidResponse("empty result for single text".to_string()))
    }
}
