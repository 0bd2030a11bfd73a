//! Domain layer types for the indexing pipeline.
//!
//! This module contains the core types shared across chunking, embedding,
//! and storage: the normalized document path and the persisted chunk record.

mod chunk;
mod types;

pub use chunk::ChunkRecord;
pub use types::DocumentPath;
