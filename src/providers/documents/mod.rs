//! Document source implementations.
//!
//! A [`DocumentSource`] resolves identifiers to readable content and
//! enumerates indexable documents. [`FilesystemSource`] treats a local
//! directory tree as the corpus; tests substitute in-memory fakes.

mod filesystem;
mod traits;

pub use filesystem::FilesystemSource;
pub use traits::{DocumentHandle, DocumentSource, SourceError, SourceResult};
