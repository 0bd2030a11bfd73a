//! Semantic document indexing pipeline.
//!
//! Mnemo turns a directory of text documents into a queryable store of
//! embedded chunks:
//!
//! - [`chunking`] splits document text into fixed-size character windows
//! - [`providers`] supplies documents and turns chunk text into embedding
//!   vectors via a remote API
//! - [`storage`] persists chunks and their embeddings in SQLite
//! - [`services`] wires the stages into complete indexing runs
//!
//! Collaborators are injected everywhere, so any stage can be swapped for
//! an in-memory fake in tests.

pub mod chunking;
pub mod config;
pub mod domain;
pub mod providers;
pub mod services;
pub mod storage;
