//! Boundary-preferring recursive chunking.
//!
//! Splits on the coarsest separator present (paragraphs, then lines, then
//! words, then single characters) and greedily merges the pieces back into
//! chunks of at most `size` characters, carrying up to `overlap` characters
//! of trailing pieces into the next chunk.

use super::{validate, Chunk, Chunker};
use crate::error::Result;
use std::collections::VecDeque;

const SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

/// Recursive character chunker.
#[derive(Debug, Clone)]
pub struct RecursiveChunker {
    size: usize,
    overlap: usize,
}

impl RecursiveChunker {
    /// Create a recursive chunker. Fails if `overlap >= size`.
    pub fn new(size: usize, overlap: usize) -> Result<Self> {
        validate(size, overlap)?;
        Ok(Self { size, overlap })
    }

    fn split(&self, text: &str, separators: &[&str]) -> Vec<String> {
        let (separator, remaining) = match separators
            .iter()
            .position(|s| s.is_empty() || text.contains(s))
        {
            Some(i) => (separators[i], &separators[i + 1..]),
            None => ("", &[][..]),
        };

        let pieces: Vec<String> = if separator.is_empty() {
            text.chars().map(String::from).collect()
        } else {
            text.split(separator)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        };

        let mut output = Vec::new();
        let mut fitting: Vec<String> = Vec::new();

        for piece in pieces {
            if char_len(&piece) < self.size {
                fitting.push(piece);
                continue;
            }

            if !fitting.is_empty() {
                output.extend(self.merge(&fitting, separator));
                fitting.clear();
            }

            if remaining.is_empty() {
                output.push(piece);
            } else {
                output.extend(self.split(&piece, remaining));
            }
        }

        if !fitting.is_empty() {
            output.extend(self.merge(&fitting, separator));
        }

        output
    }

    fn merge(&self, pieces: &[String], separator: &str) -> Vec<String> {
        let separator_len = char_len(separator);
        let mut docs = Vec::new();
        let mut current: VecDeque<&str> = VecDeque::new();
        let mut total = 0;

        for piece in pieces {
            let len = char_len(piece);
            let joiner = |current: &VecDeque<&str>| if current.is_empty() { 0 } else { separator_len };

            if total + len + joiner(&current) > self.size && !current.is_empty() {
                push_joined(&mut docs, &current, separator);

                // Drop leading pieces until the carried-over tail fits the overlap
                // and the next piece fits the window.
                while total > self.overlap
                    || (total + len + joiner(&current) > self.size && total > 0)
                {
                    let Some(first) = current.pop_front() else {
                        break;
                    };
                    total -= char_len(first) + if current.is_empty() { 0 } else { separator_len };
                }
            }

            total += len + joiner(&current);
            current.push_back(piece);
        }

        push_joined(&mut docs, &current, separator);
        docs
    }
}

impl Chunker for RecursiveChunker {
    fn chunk(&self, text: &str) -> Result<Vec<Chunk>> {
        let pieces = self.split(text, &SEPARATORS);

        let mut chunks = Vec::with_capacity(pieces.len());
        let mut search_from = 0;

        for content in pieces {
            let start_char = match text[search_from..].find(&content) {
                Some(found) => {
                    let byte_start = search_from + found;
                    search_from = byte_start + content.chars().next().map_or(1, char::len_utf8);
                    text[..byte_start].chars().count()
                }
                None => chunks.last().map_or(0, |c: &Chunk| c.start_char),
            };
            chunks.push(Chunk::new(chunks.len(), content, start_char));
        }

        Ok(chunks)
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn push_joined(docs: &mut Vec<String>, pieces: &VecDeque<&str>, separator: &str) {
    let joined = pieces.iter().copied().collect::<Vec<_>>().join(separator);
    let trimmed = joined.trim();
    if !trimmed.is_empty() {
        docs.push(trimmed.to_string());
    }
}
