//! Service layer orchestrating the indexing pipeline.
//!
//! Services own no algorithmic logic of their own; they sequence the
//! chunker, embedder, and store into complete operations and report the
//! outcome.

mod index_service;

pub use index_service::{IndexError, IndexOutcome, IndexService};
