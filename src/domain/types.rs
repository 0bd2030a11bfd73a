//! Core identifier types for the indexing domain.
//!
//! `DocumentPath` is the stable key under which a document's chunks are
//! stored. Normalization happens at construction so that equivalent paths
//! from different callers collide to the same key.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized identifier of a source document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentPath(String);

impl DocumentPath {
    /// Creates a document path, normalizing the raw input.
    ///
    /// Normalization rules:
    /// - surrounding whitespace is trimmed
    /// - backslashes become forward slashes
    /// - runs of slashes collapse to one
    /// - leading and trailing `/` are stripped
    /// - `.` and `..` segments are dropped, so a normalized path can never
    ///   point above the root a source anchors it to
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(normalize(raw.as_ref()))
    }

    /// Returns the normalized path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the path, yielding the normalized string.
    pub fn into_string(self) -> String {
        self.0
    }
}

fn normalize(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .map(|ch| if ch == '\\' { '/' } else { ch })
        .collect();

    let segments: Vec<&str> = cleaned
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != "." && *segment != "..")
        .collect();

    segments.join("/")
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for DocumentPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for DocumentPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_path_is_unchanged() {
        let path = DocumentPath::new("notes/daily/2025-01-01.md");
        assert_eq!(path.as_str(), "notes/daily/2025-01-01.md");
    }

    #[test]
    fn backslashes_become_slashes() {
        let path = DocumentPath::new(r"notes\daily\today.md");
        assert_eq!(path.as_str(), "notes/daily/today.md");
    }

    #[test]
    fn duplicate_slashes_collapse() {
        let path = DocumentPath::new("notes//daily///today.md");
        assert_eq!(path.as_str(), "notes/daily/today.md");
    }

    #[test]
    fn leading_dot_slash_is_stripped() {
        let path = DocumentPath::new("./notes/today.md");
        assert_eq!(path.as_str(), "notes/today.md");
    }

    #[test]
    fn parent_dir_segments_are_stripped() {
        assert_eq!(DocumentPath::new("../outside.md").as_str(), "outside.md");
        assert_eq!(DocumentPath::new("a/../../b.md").as_str(), "a/b.md");
        assert_eq!(DocumentPath::new(r"..\..\secret.md").as_str(), "secret.md");
    }

    #[test]
    fn equivalent_spellings_collide() {
        let a = DocumentPath::new("a/b.md");
        let b = DocumentPath::new(r".\a\\b.md");
        let c = DocumentPath::new("/a/b.md/");
        assert_eq!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn display_matches_as_str() {
        let path = DocumentPath::new("x/y.md");
        assert_eq!(path.to_string(), path.as_str());
    }
}
