//! Fixed-size sliding window chunking.

use super::{validate, Chunk, Chunker};
use crate::error::Result;

/// Sliding-window chunker.
///
/// Window `i` starts at `i * (size - overlap)`. Every window but the last is
/// exactly `size` characters and neighbours share exactly `overlap`.
#[derive(Debug, Clone)]
pub struct WindowChunker {
    size: usize,
    overlap: usize,
}

impl WindowChunker {
    /// Create a window chunker. Fails if `overlap >= size`.
    pub fn new(size: usize, overlap: usize) -> Result<Self> {
        validate(size, overlap)?;
        Ok(Self { size, overlap })
    }
}

impl Chunker for WindowChunker {
    fn chunk(&self, text: &str) -> Result<Vec<Chunk>> {
        let chars: Vec<char> = text.chars().collect();
        let step = self.size - self.overlap;
        let mut chunks = Vec::new();
        let mut start = 0;

        while start < chars.len() {
            let end = (start + self.size).min(chars.len());
            let content: String = chars[start..end].iter().collect();
            chunks.push(Chunk::new(chunks.len(), content, start));

            if end == chars.len() {
                break;
            }
            start += step;
        }

        Ok(chunks)
    }
}
