//! Context formatting for prompts and for display.

use super::ScoredChunk;
use crate::transcript::VideoReference;

/// A retrieved chunk prepared for display, with a link into the video.
#[derive(Debug, Clone)]
pub struct SourceRef {
    /// Formatted timestamp (e.g., "02:34"), if known.
    pub timestamp: Option<String>,
    /// Text content.
    pub content: String,
    /// Similarity score.
    pub score: f32,
    /// URL with timestamp, if the chunk start time is known.
    pub url: Option<String>,
}

impl SourceRef {
    pub fn new(scored: &ScoredChunk, video: &VideoReference) -> Self {
        Self {
            timestamp: scored.chunk.format_timestamp(),
            content: scored.chunk.content.clone(),
            score: scored.score,
            url: scored.chunk.start_seconds.map(|s| video.url_at(s)),
        }
    }
}

/// Join chunk contents in retrieved order, separated by a blank line.
pub fn format_context_for_prompt(chunks: &[ScoredChunk]) -> String {
    chunks
        .iter()
        .map(|c| c.chunk.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Format retrieved chunks as a numbered source list.
pub fn format_context_for_display(chunks: &[ScoredChunk], video: &VideoReference) -> String {
    chunks
        .iter()
        .enumerate()
        .map(|(i, scored)| {
            let source = SourceRef::new(scored, video);
            let url_part = source
                .url
                .as_ref()
                .map(|u| format!("\n  Link: {}", u))
                .unwrap_or_default();

            format!(
                "[{}] @ {} (score: {:.2}){}\n  {}",
                i + 1,
                source.timestamp.as_deref().unwrap_or("--:--"),
                source.score,
                url_part,
                excerpt(&source.content, 160)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// First `max_chars` characters of `text`, with an ellipsis if cut.
fn excerpt(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", head.trim_end())
    } else {
        head
    }
}
