//! Transcript acquisition for YouTube videos.
//!
//! Resolves a video URL to its identifier and fetches the timed caption
//! segments in the requested language.

mod format;
mod models;
mod youtube;

pub use format::{format_transcript, OutputFormat, SegmentExport, TranscriptExport};
pub use models::{format_timestamp, Language, Transcript, TranscriptSegment, VideoReference};
pub use youtube::{extract_video_id, YoutubeTranscriptFetcher};

use crate::error::Result;
use async_trait::async_trait;

/// Trait for transcript providers.
#[async_trait]
pub trait TranscriptFetcher: Send + Sync {
    /// Fetch the transcript of a video in the given language.
    ///
    /// Every provider-side failure is reported as `TranscriptUnavailable`.
    async fn fetch(&self, video: &VideoReference, language: Language) -> Result<Transcript>;

    /// Resolve a URL and fetch its transcript.
    async fn fetch_url(&self, url: &str, language: Language) -> Result<Transcript> {
        let video = VideoReference::parse(url)?;
        self.fetch(&video, language).await
    }
}
