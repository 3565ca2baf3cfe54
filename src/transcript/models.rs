//! Data models for video transcripts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Transcript language offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Language {
    #[default]
    #[serde(rename = "en", alias = "english", alias = "English")]
    English,
    #[serde(rename = "hi", alias = "hindi", alias = "Hindi")]
    Hindi,
}

impl Language {
    /// Language code understood by the transcript provider.
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi => "hi",
        }
    }

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "Hindi",
        }
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Language::English),
            "hi" | "hindi" => Ok(Language::Hindi),
            _ => Err(format!("Unsupported language: {}. Use en or hi.", s)),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A video URL together with the identifier extracted from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoReference {
    /// URL as submitted by the user.
    pub url: String,
    /// Opaque YouTube video identifier.
    pub video_id: String,
}

impl VideoReference {
    /// Parse a URL into a video reference.
    pub fn parse(url: &str) -> crate::error::Result<Self> {
        let video_id = super::extract_video_id(url)?;
        Ok(Self {
            url: url.trim().to_string(),
            video_id,
        })
    }

    /// Watch URL jumping to a given second.
    pub fn url_at(&self, seconds: f64) -> String {
        format!(
            "https://youtube.com/watch?v={}&t={}s",
            self.video_id, seconds as u32
        )
    }
}

/// A single timed utterance of a transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Spoken text.
    pub text: String,
    /// Start time in seconds.
    pub start: f64,
    /// Duration in seconds.
    pub duration: f64,
}

impl TranscriptSegment {
    /// Create a new transcript segment.
    pub fn new(text: impl Into<String>, start: f64, duration: f64) -> Self {
        Self {
            text: text.into(),
            start,
            duration,
        }
    }

    /// End time in seconds.
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// A complete transcript in chronological order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    /// Video ID this transcript belongs to.
    pub video_id: String,
    /// Language the transcript was fetched in.
    pub language: Language,
    /// Timed segments.
    pub segments: Vec<TranscriptSegment>,
    /// When the transcript was fetched.
    pub fetched_at: DateTime<Utc>,
}

impl Transcript {
    /// Create a new transcript from segments.
    pub fn new(video_id: impl Into<String>, language: Language, segments: Vec<TranscriptSegment>) -> Self {
        Self {
            video_id: video_id.into(),
            language,
            segments,
            fetched_at: Utc::now(),
        }
    }

    /// Segment texts joined with single spaces, original order preserved.
    pub fn full_text(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Total duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.segments.last().map(|s| s.end()).unwrap_or(0.0)
    }

    /// Start time of the segment containing a character offset of [`Self::full_text`].
    ///
    /// Offsets count `char`s. An offset on a joining space belongs to the
    /// following segment. Returns `None` past the end of the text.
    pub fn start_seconds_at(&self, char_offset: usize) -> Option<f64> {
        let mut segment_start = 0;
        for segment in &self.segments {
            let segment_end = segment_start + segment.text.chars().count();
            if char_offset < segment_end {
                return Some(segment.start);
            }
            segment_start = segment_end + 1;
        }
        None
    }
}

/// Format seconds as MM:SS or HH:MM:SS.
pub fn format_timestamp(seconds: f64) -> String {
    let total_seconds = seconds as u32;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}
