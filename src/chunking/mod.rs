//! Document chunking.
//!
//! Splits document text into bounded-size pieces ahead of embedding. The
//! chunker is a pure function of its input: no I/O, no state beyond
//! configuration, and identical output for identical input.

/// Splits text into an ordered sequence of chunks.
pub trait Chunker: Send + Sync {
    /// Partitions `text` into consecutive chunks, in document order.
    ///
    /// Concatenating the returned chunks reproduces `text` exactly.
    fn chunk(&self, text: &str) -> Vec<String>;
}

/// Default window size in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 500;

/// Fixed-width windowing chunker.
///
/// Partitions text into consecutive non-overlapping windows of at most
/// `chunk_size` characters, with the final window holding the remainder.
/// Windows never split a UTF-8 scalar value. There is no semantic boundary
/// awareness; splitting is purely character-count driven.
///
/// Empty input yields exactly one empty chunk, so an empty document is
/// still represented in the store (distinct from a missing document).
#[derive(Debug, Clone)]
pub struct FixedSizeChunker {
    chunk_size: usize,
}

impl FixedSizeChunker {
    /// Creates a chunker with the given window size in characters.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    pub fn new(chunk_size: usize) -> Self {
        assert!(chunk_size > 0, "chunk_size must be at least 1");
        Self { chunk_size }
    }

    /// Returns the configured window size.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }
}

impl Default for FixedSizeChunker {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE)
    }
}

impl Chunker for FixedSizeChunker {
    fn chunk(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return vec![String::new()];
        }

        let mut chunks = Vec::with_capacity(text.len() / self.chunk_size + 1);
        let mut current = String::with_capacity(self.chunk_size);
        let mut count = 0;

        for ch in text.chars() {
            current.push(ch);
            count += 1;
            if count == self.chunk_size {
                chunks.push(std::mem::take(&mut current));
                count = 0;
            }
        }

        if !current.is_empty() {
            chunks.push(current);
        }

        chunks
    }
}
