//! Filesystem-backed document source.
//!
//! Treats a directory tree as the corpus: every file with the configured
//! extension is an indexable document, keyed by its path relative to the
//! root.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use walkdir::WalkDir;

use super::traits::{DocumentHandle, DocumentSource, SourceError, SourceResult};
use crate::domain::DocumentPath;

/// Default file extension considered indexable.
const DEFAULT_EXTENSION: &str = "md";

/// Document source rooted at a local directory.
#[derive(Debug, Clone)]
pub struct FilesystemSource {
    root: PathBuf,
    extension: String,
}

impl FilesystemSource {
    /// Creates a source over the given root directory, indexing `.md` files.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    /// Overrides the file extension considered indexable.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Returns the root directory of this source.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn absolute(&self, path: &DocumentPath) -> PathBuf {
        self.root.join(path.as_str())
    }
}

#[async_trait]
impl DocumentSource for FilesystemSource {
    async fn resolve(&self, path: &DocumentPath) -> SourceResult<Option<DocumentHandle>> {
        let absolute = self.absolute(path);

        match tokio::fs::metadata(&absolute).await {
            Ok(meta) if meta.is_file() => Ok(Some(DocumentHandle::new(path.clone()))),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn read(&self, handle: &DocumentHandle) -> SourceResult<String> {
        let absolute = self.absolute(handle.path());
        Ok(tokio::fs::read_to_string(absolute).await?)
    }

    async fn list(&self) -> SourceResult<Vec<DocumentHandle>> {
        let root = self.root.clone();
        let extension = self.extension.clone();

        let handles = tokio::task::spawn_blocking(move || {
            let mut handles = Vec::new();

            for entry in WalkDir::new(&root).follow_links(false) {
                let entry = entry.map_err(|e| {
                    SourceError::Unavailable(format!("walk failed under {}: {e}", root.display()))
                })?;

                if !entry.file_type().is_file() {
                    continue;
                }
                if entry.path().extension().and_then(|e| e.to_str()) != Some(extension.as_str()) {
                    continue;
                }

                let relative = entry
                    .path()
                    .strip_prefix(&root)
                    .unwrap_or(entry.path())
                    .to_string_lossy();
                handles.push(DocumentHandle::new(DocumentPath::new(relative)));
            }

            // Stable enumeration order keeps indexing runs reproducible.
            handles.sort_by(|a, b| a.path().as_str().cmp(b.path().as_str()));
            Ok::<_, SourceError>(handles)
        })
        .await
        .map_err(|e| SourceError::Unavailable(e.to_string()))??;

        Ok(handles)
    }
}
