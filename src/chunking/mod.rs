//! Transcript chunking strategies.
//!
//! Splits the concatenated transcript text into overlapping windows that are
//! embedded and retrieved individually. All lengths and offsets count
//! `char`s, never bytes.

mod recursive;
mod window;

pub use recursive::RecursiveChunker;
pub use window::WindowChunker;

use crate::error::{Result, TubetalkError};
use crate::transcript::{format_timestamp, Transcript};
use serde::{Deserialize, Serialize};

/// A bounded-length piece of a transcript used as a retrieval unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Position of this chunk in the transcript.
    pub index: usize,
    /// Text content.
    pub content: String,
    /// Offset of the first character in the transcript text.
    pub start_char: usize,
    /// Start time of the segment the chunk begins in, once annotated.
    pub start_seconds: Option<f64>,
}

impl Chunk {
    /// Create a new chunk without timing information.
    pub fn new(index: usize, content: impl Into<String>, start_char: usize) -> Self {
        Self {
            index,
            content: content.into(),
            start_char,
            start_seconds: None,
        }
    }

    /// Length in characters.
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }

    /// Timestamp for display, if the chunk has been annotated.
    pub fn format_timestamp(&self) -> Option<String> {
        self.start_seconds.map(format_timestamp)
    }
}

/// Chunking strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChunkingStrategy {
    /// Fixed-size sliding window.
    #[default]
    Window,
    /// Boundary-preferring split on paragraphs, lines, then words.
    Recursive,
}

impl std::str::FromStr for ChunkingStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "window" | "fixed" => Ok(ChunkingStrategy::Window),
            "recursive" => Ok(ChunkingStrategy::Recursive),
            _ => Err(format!("Unknown chunking strategy: {}", s)),
        }
    }
}

impl std::fmt::Display for ChunkingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChunkingStrategy::Window => write!(f, "window"),
            ChunkingStrategy::Recursive => write!(f, "recursive"),
        }
    }
}

/// Trait for chunking implementations.
pub trait Chunker: Send + Sync {
    /// Split text into ordered chunks.
    fn chunk(&self, text: &str) -> Result<Vec<Chunk>>;
}

/// Reject window parameters that cannot make progress.
pub fn validate(size: usize, overlap: usize) -> Result<()> {
    if size == 0 {
        return Err(TubetalkError::Config("chunk size must be greater than zero".to_string()));
    }
    if overlap >= size {
        return Err(TubetalkError::Config(format!(
            "chunk overlap ({}) must be smaller than chunk size ({})",
            overlap, size
        )));
    }
    Ok(())
}

/// Create a chunker for the strategy, validating its parameters.
pub fn create_chunker(strategy: ChunkingStrategy, size: usize, overlap: usize) -> Result<Box<dyn Chunker>> {
    match strategy {
        ChunkingStrategy::Window => Ok(Box::new(WindowChunker::new(size, overlap)?)),
        ChunkingStrategy::Recursive => Ok(Box::new(RecursiveChunker::new(size, overlap)?)),
    }
}

/// Split text into fixed-size windows sharing `overlap` characters.
pub fn chunk(text: &str, size: usize, overlap: usize) -> Result<Vec<Chunk>> {
    WindowChunker::new(size, overlap)?.chunk(text)
}

/// Attach segment start times to chunks cut from `transcript.full_text()`.
pub fn annotate_timestamps(chunks: &mut [Chunk], transcript: &Transcript) {
    for chunk in chunks {
        chunk.start_seconds = transcript.start_seconds_at(chunk.start_char);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::{Language, TranscriptSegment};

    #[test]
    fn test_validate() {
        assert!(validate(1000, 200).is_ok());
        assert!(matches!(validate(200, 200), Err(TubetalkError::Config(_))));
        assert!(matches!(validate(100, 200), Err(TubetalkError::Config(_))));
        assert!(matches!(validate(0, 0), Err(TubetalkError::Config(_))));
    }

    #[test]
    fn test_create_chunker_validates() {
        assert!(create_chunker(ChunkingStrategy::Window, 10, 10).is_err());
        assert!(create_chunker(ChunkingStrategy::Recursive, 10, 12).is_err());
        assert!(create_chunker(ChunkingStrategy::Recursive, 10, 2).is_ok());
    }

    #[test]
    fn test_strategy_parse() {
        assert_eq!("window".parse::<ChunkingStrategy>().unwrap(), ChunkingStrategy::Window);
        assert_eq!("Recursive".parse::<ChunkingStrategy>().unwrap(), ChunkingStrategy::Recursive);
        assert!("semantic".parse::<ChunkingStrategy>().is_err());
    }

    #[test]
    fn test_annotate_timestamps() {
        let transcript = Transcript::new(
            "vid",
            Language::English,
            vec![
                TranscriptSegment::new("aaaa", 0.0, 3.0),
                TranscriptSegment::new("bbbb", 3.0, 3.0),
                TranscriptSegment::new("cccc", 65.0, 3.0),
            ],
        );
        // "aaaa bbbb cccc"
        let mut chunks = chunk(&transcript.full_text(), 6, 1).unwrap();
        annotate_timestamps(&mut chunks, &transcript);

        let starts: Vec<Option<f64>> = chunks.iter().map(|c| c.start_seconds).collect();
        assert_eq!(starts, vec![Some(0.0), Some(3.0), Some(65.0)]);
        assert_eq!(chunks[2].format_timestamp().as_deref(), Some("01:05"));
    }
}
