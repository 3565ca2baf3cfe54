//! Error types for Tubetalk.

use thiserror::Error;

/// Why a transcript could not be supplied for a video.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UnavailableReason {
    #[error("video is unavailable: {0}")]
    VideoUnavailable(String),

    #[error("transcripts are disabled for this video")]
    TranscriptsDisabled,

    #[error("no transcript in '{requested}' (available: {})", format_available(.available))]
    LanguageUnavailable {
        requested: String,
        available: Vec<String>,
    },

    #[error("the transcript provider blocked the request")]
    RequestBlocked,

    #[error("network error: {0}")]
    Network(String),

    #[error("malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("the transcript is empty")]
    Empty,
}

fn format_available(available: &[String]) -> String {
    if available.is_empty() {
        "none".to_string()
    } else {
        available.join(", ")
    }
}

/// Library-level error type for Tubetalk operations.
#[derive(Error, Debug)]
pub enum TubetalkError {
    #[error("Invalid YouTube URL: {0}")]
    InvalidUrl(String),

    #[error("Transcript unavailable for video {video_id}: {reason}")]
    TranscriptUnavailable {
        video_id: String,
        reason: UnavailableReason,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Answer generation failed: {0}")]
    Generation(String),

    #[error("No video loaded yet. Submit a URL first.")]
    NotReady,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl TubetalkError {
    pub(crate) fn unavailable(video_id: &str, reason: UnavailableReason) -> Self {
        TubetalkError::TranscriptUnavailable {
            video_id: video_id.to_string(),
            reason,
        }
    }
}

/// Result type alias for Tubetalk operations.
pub type Result<T> = std::result::Result<T, TubetalkError>;
