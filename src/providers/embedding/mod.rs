//! Embedding provider implementations.
//!
//! All providers implement the [`Embedder`] trait: one vector per input
//! text, in input order, with batching and concurrency handled internally.
//!
//! # Example
//!
//! ```rust,no_run
//! use mnemo::providers::embedding::{Embedder, VoyageEmbedder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let embedder = VoyageEmbedder::new("voyage-api-key").with_max_concurrency(8);
//!
//! let texts = vec!["first chunk".to_string(), "second chunk".to_string()];
//! let vectors = embedder.embed_bulk(&texts).await?;
//! assert_eq!(vectors.len(), texts.len());
//! # Ok(())
//! # }
//! ```

mod traits;
mod voyage;

pub use traits::{EmbedError, EmbedResult, Embedder};
pub use voyage::{
    VoyageEmbedder, DEFAULT_BATCH_SIZE, DEFAULT_MAX_CONCURRENCY, DEFAULT_MAX_RETRIES,
    DEFAULT_MODEL, VOYAGE_BASE_URL,
};
