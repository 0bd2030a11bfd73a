//! External collaborator implementations.
//!
//! This module contains provider traits and implementations for services
//! outside the core pipeline:
//!
//! - [`embedding`] - Remote embedding providers (Voyage AI)
//! - [`documents`] - Document sources (local filesystem)

pub mod documents;
pub mod embedding;
