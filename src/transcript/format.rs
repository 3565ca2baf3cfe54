//! Transcript output formatting (text, JSON, SRT, VTT).

use super::{Language, Transcript};
use serde::Serialize;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Text,
    Json,
    Srt,
    Vtt,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "srt" => Ok(OutputFormat::Srt),
            "vtt" | "webvtt" => Ok(OutputFormat::Vtt),
            _ => Err(format!("Unknown format: {}. Use text, json, srt, or vtt.", s)),
        }
    }
}

/// JSON-serializable transcript for export.
#[derive(Debug, Serialize)]
pub struct TranscriptExport {
    pub video_id: String,
    pub language: Language,
    pub duration_seconds: f64,
    pub segments: Vec<SegmentExport>,
}

#[derive(Debug, Serialize)]
pub struct SegmentExport {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

impl From<&Transcript> for TranscriptExport {
    fn from(transcript: &Transcript) -> Self {
        Self {
            video_id: transcript.video_id.clone(),
            language: transcript.language,
            duration_seconds: transcript.duration_seconds(),
            segments: transcript
                .segments
                .iter()
                .map(|s| SegmentExport {
                    text: s.text.clone(),
                    start: s.start,
                    duration: s.duration,
                })
                .collect(),
        }
    }
}

/// Format a transcript for output.
pub fn format_transcript(transcript: &Transcript, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => transcript.full_text(),
        OutputFormat::Json => format_json(transcript),
        OutputFormat::Srt => format_cues(transcript, false),
        OutputFormat::Vtt => format_cues(transcript, true),
    }
}

fn format_json(transcript: &Transcript) -> String {
    let export = TranscriptExport::from(transcript);
    serde_json::to_string_pretty(&export).unwrap_or_else(|_| "{}".to_string())
}

/// SRT and WebVTT differ only in the header and the millisecond separator.
fn format_cues(transcript: &Transcript, vtt: bool) -> String {
    let mut output = if vtt {
        String::from("WEBVTT\n\n")
    } else {
        String::new()
    };
    let separator = if vtt { '.' } else { ',' };

    for (i, segment) in transcript.segments.iter().enumerate() {
        output.push_str(&format!("{}\n", i + 1));
        output.push_str(&format!(
            "{} --> {}\n",
            cue_timestamp(segment.start, separator),
            cue_timestamp(segment.end(), separator)
        ));
        output.push_str(&segment.text);
        output.push_str("\n\n");
    }

    output
}

/// Format a cue timestamp (00:00:00,000 or 00:00:00.000).
fn cue_timestamp(seconds: f64, separator: char) -> String {
    let total_ms = (seconds * 1000.0).round() as u64;
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let secs = (total_ms % 60_000) / 1000;
    let ms = total_ms % 1000;

    format!("{:02}:{:02}:{:02}{}{:03}", hours, minutes, secs, separator, ms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::TranscriptSegment;

    fn sample_transcript() -> Transcript {
        Transcript::new(
            "test123",
            Language::English,
            vec![
                TranscriptSegment::new("Hello world.", 0.0, 2.5),
                TranscriptSegment::new("This is a test.", 2.5, 2.5),
            ],
        )
    }

    #[test]
    fn test_format_text() {
        let text = format_transcript(&sample_transcript(), OutputFormat::Text);
        assert_eq!(text, "Hello world. This is a test.");
    }

    #[test]
    fn test_format_json() {
        let json = format_transcript(&sample_transcript(), OutputFormat::Json);
        assert!(json.contains("\"video_id\": \"test123\""));
        assert!(json.contains("\"language\": \"en\""));
        assert!(json.contains("Hello world."));
    }

    #[test]
    fn test_format_srt() {
        let srt = format_transcript(&sample_transcript(), OutputFormat::Srt);
        assert!(srt.starts_with("1\n00:00:00,000 --> 00:00:02,500\nHello world."));
        assert!(srt.contains("2\n00:00:02,500 --> 00:00:05,000"));
    }

    #[test]
    fn test_format_vtt() {
        let vtt = format_transcript(&sample_transcript(), OutputFormat::Vtt);
        assert!(vtt.starts_with("WEBVTT"));
        assert!(vtt.contains("00:00:00.000 --> 00:00:02.500"));
    }

    #[test]
    fn test_parse_format() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("webvtt".parse::<OutputFormat>().unwrap(), OutputFormat::Vtt);
        assert!("pdf".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_cue_timestamp() {
        assert_eq!(cue_timestamp(0.0, ','), "00:00:00,000");
        assert_eq!(cue_timestamp(61.5, ','), "00:01:01,500");
        assert_eq!(cue_timestamp(3661.123, '.'), "01:01:01.123");
    }
}
