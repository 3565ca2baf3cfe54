//! YouTube transcript provider.
//!
//! Captions are discovered through the innertube player endpoint and
//! downloaded in the `json3` timed-text format.

use super::{Language, Transcript, TranscriptFetcher, TranscriptSegment, VideoReference};
use crate::config::TranscriptSettings;
use crate::error::{Result, TubetalkError, UnavailableReason};
use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

const INNERTUBE_CLIENT_NAME: &str = "ANDROID";
const INNERTUBE_CLIENT_VERSION: &str = "20.10.38";

/// Extract the video id from a YouTube URL.
///
/// Standard links carry the id in the `v` query parameter
/// (`https://www.youtube.com/watch?v=ID`), short links carry it as the path
/// (`https://youtu.be/ID`). Anything else is rejected.
pub fn extract_video_id(url: &str) -> Result<String> {
    let parsed = Url::parse(url.trim())
        .map_err(|e| TubetalkError::InvalidUrl(format!("{} ({})", url, e)))?;
    let host = parsed.host_str().unwrap_or_default();

    let video_id = if host.contains("youtube") {
        parsed
            .query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.trim().to_string())
    } else if host.contains("youtu.be") {
        parsed
            .path_segments()
            .and_then(|mut segments| segments.next())
            .map(|segment| segment.trim().to_string())
    } else {
        return Err(TubetalkError::InvalidUrl(format!(
            "{} (expected a youtube.com or youtu.be link)",
            url
        )));
    };

    match video_id {
        Some(id) if !id.is_empty() => Ok(id),
        _ => Err(TubetalkError::InvalidUrl(format!(
            "{} (could not find a video id)",
            url
        ))),
    }
}

/// Transcript fetcher backed by YouTube's caption tracks.
pub struct YoutubeTranscriptFetcher {
    client: reqwest::Client,
    base_url: String,
    api_key_regex: Regex,
    whitespace_regex: Regex,
}

impl YoutubeTranscriptFetcher {
    /// Create a fetcher against youtube.com with default settings.
    pub fn new() -> Result<Self> {
        Self::from_settings(&TranscriptSettings::default())
    }

    /// Create a fetcher from transcript settings.
    pub fn from_settings(settings: &TranscriptSettings) -> Result<Self> {
        Self::with_config(
            &settings.base_url,
            Duration::from_secs(settings.timeout_seconds),
        )
    }

    /// Create a fetcher with a custom base URL and request timeout.
    pub fn with_config(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TubetalkError::Config(format!("Failed to create HTTP client: {}", e)))?;

        let api_key_regex = Regex::new(r#""INNERTUBE_API_KEY":\s*"([a-zA-Z0-9_-]+)""#)
            .map_err(|e| TubetalkError::Config(e.to_string()))?;
        let whitespace_regex =
            Regex::new(r"\s+").map_err(|e| TubetalkError::Config(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key_regex,
            whitespace_regex,
        })
    }

    /// Scrape the innertube API key from the watch page.
    async fn fetch_api_key(&self, video_id: &str) -> Result<String> {
        let url = format!("{}/watch", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("v", video_id)])
            .header("Accept-Language", "en-US")
            .send()
            .await
            .map_err(|e| network_error(video_id, e))?;

        check_status(video_id, response.status())?;

        let html = response.text().await.map_err(|e| network_error(video_id, e))?;

        if let Some(caps) = self.api_key_regex.captures(&html) {
            return Ok(caps[1].to_string());
        }

        if html.contains("class=\"g-recaptcha\"") {
            return Err(TubetalkError::unavailable(video_id, UnavailableReason::RequestBlocked));
        }

        Err(TubetalkError::unavailable(
            video_id,
            UnavailableReason::MalformedResponse("watch page has no innertube API key".to_string()),
        ))
    }

    /// Ask the player endpoint for the video's caption tracks.
    async fn fetch_caption_tracks(&self, video_id: &str, api_key: &str) -> Result<Vec<CaptionTrack>> {
        let url = format!("{}/youtubei/v1/player", self.base_url);
        let body = serde_json::json!({
            "context": {
                "client": {
                    "clientName": INNERTUBE_CLIENT_NAME,
                    "clientVersion": INNERTUBE_CLIENT_VERSION,
                }
            },
            "videoId": video_id,
        });

        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await
            .map_err(|e| network_error(video_id, e))?;

        check_status(video_id, response.status())?;

        let player: PlayerResponse = response.json().await.map_err(|e| {
            TubetalkError::unavailable(
                video_id,
                UnavailableReason::MalformedResponse(format!("player response: {}", e)),
            )
        })?;

        caption_tracks(video_id, player)
    }

    /// Download and parse one caption track.
    async fn fetch_segments(&self, video_id: &str, track: &CaptionTrack) -> Result<Vec<TranscriptSegment>> {
        let mut url = Url::parse(&track.base_url).map_err(|e| {
            TubetalkError::unavailable(
                video_id,
                UnavailableReason::MalformedResponse(format!("caption URL: {}", e)),
            )
        })?;

        // The track URL may already pin a format; replace it with json3.
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| key != "fmt")
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        url.query_pairs_mut()
            .clear()
            .extend_pairs(pairs)
            .append_pair("fmt", "json3");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| network_error(video_id, e))?;

        check_status(video_id, response.status())?;

        let body = response.text().await.map_err(|e| network_error(video_id, e))?;
        self.parse_json3(video_id, &body)
    }

    /// Parse a `json3` timed-text document into segments.
    fn parse_json3(&self, video_id: &str, body: &str) -> Result<Vec<TranscriptSegment>> {
        let document: TimedText = serde_json::from_str(body).map_err(|e| {
            TubetalkError::unavailable(
                video_id,
                UnavailableReason::MalformedResponse(format!("timed text: {}", e)),
            )
        })?;

        let segments = document
            .events
            .into_iter()
            .filter_map(|event| {
                let raw: String = event.segs.iter().map(|s| s.utf8.as_str()).collect();
                let text = self.whitespace_regex.replace_all(&raw, " ").trim().to_string();
                if text.is_empty() {
                    return None;
                }
                Some(TranscriptSegment::new(
                    text,
                    event.t_start_ms as f64 / 1000.0,
                    event.d_duration_ms as f64 / 1000.0,
                ))
            })
            .collect();

        Ok(segments)
    }
}

#[async_trait]
impl TranscriptFetcher for YoutubeTranscriptFetcher {
    #[instrument(skip(self, video, language), fields(video_id = %video.video_id, language = %language))]
    async fn fetch(&self, video: &VideoReference, language: Language) -> Result<Transcript> {
        let video_id = video.video_id.as_str();

        info!("Fetching transcript for {}", video_id);
        let api_key = self.fetch_api_key(video_id).await?;
        let tracks = self.fetch_caption_tracks(video_id, &api_key).await?;
        debug!("Found {} caption tracks", tracks.len());

        let track = select_track(video_id, &tracks, language)?;
        debug!(
            "Using {} track for '{}'",
            if track.is_generated() { "generated" } else { "manual" },
            track.language_code
        );

        let segments = self.fetch_segments(video_id, track).await?;
        if segments.is_empty() {
            return Err(TubetalkError::unavailable(video_id, UnavailableReason::Empty));
        }

        info!("Fetched {} transcript segments", segments.len());
        Ok(Transcript::new(video_id, language, segments))
    }
}

fn network_error(video_id: &str, e: reqwest::Error) -> TubetalkError {
    TubetalkError::unavailable(video_id, UnavailableReason::Network(e.to_string()))
}

fn check_status(video_id: &str, status: reqwest::StatusCode) -> Result<()> {
    if status.is_success() {
        return Ok(());
    }
    let reason = match status.as_u16() {
        429 => UnavailableReason::RequestBlocked,
        404 => UnavailableReason::VideoUnavailable("not found".to_string()),
        _ => UnavailableReason::Network(format!("HTTP {}", status)),
    };
    Err(TubetalkError::unavailable(video_id, reason))
}

/// Turn a player response into its caption tracks, mapping playability errors.
fn caption_tracks(video_id: &str, player: PlayerResponse) -> Result<Vec<CaptionTrack>> {
    if let Some(playability) = player.playability_status {
        if playability.status != "OK" {
            let reason = playability.reason.unwrap_or_else(|| playability.status.clone());
            if playability.status == "LOGIN_REQUIRED" && reason.contains("bot") {
                return Err(TubetalkError::unavailable(video_id, UnavailableReason::RequestBlocked));
            }
            return Err(TubetalkError::unavailable(
                video_id,
                UnavailableReason::VideoUnavailable(reason),
            ));
        }
    }

    let tracks = player
        .captions
        .and_then(|c| c.player_captions_tracklist_renderer)
        .map(|r| r.caption_tracks)
        .unwrap_or_default();

    if tracks.is_empty() {
        return Err(TubetalkError::unavailable(video_id, UnavailableReason::TranscriptsDisabled));
    }

    Ok(tracks)
}

/// Pick the track for a language, preferring manual captions over generated ones.
fn select_track<'a>(
    video_id: &str,
    tracks: &'a [CaptionTrack],
    language: Language,
) -> Result<&'a CaptionTrack> {
    let code = language.code();
    let matching = || tracks.iter().filter(move |t| t.language_code == code);

    if let Some(track) = matching()
        .find(|t| !t.is_generated())
        .or_else(|| matching().next())
    {
        return Ok(track);
    }

    let mut available: Vec<String> = Vec::new();
    for track in tracks {
        if !available.contains(&track.language_code) {
            available.push(track.language_code.clone());
        }
    }

    Err(TubetalkError::unavailable(
        video_id,
        UnavailableReason::LanguageUnavailable {
            requested: code.to_string(),
            available,
        },
    ))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerResponse {
    playability_status: Option<PlayabilityStatus>,
    captions: Option<Captions>,
}

#[derive(Debug, Deserialize)]
struct PlayabilityStatus {
    status: String,
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Captions {
    player_captions_tracklist_renderer: Option<TracklistRenderer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TracklistRenderer {
    #[serde(default)]
    caption_tracks: Vec<CaptionTrack>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptionTrack {
    base_url: String,
    language_code: String,
    kind: Option<String>,
}

impl CaptionTrack {
    fn is_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }
}

#[derive(Debug, Deserialize)]
struct TimedText {
    #[serde(default)]
    events: Vec<TimedTextEvent>,
}

#[derive(Debug, Deserialize)]
struct TimedTextEvent {
    #[serde(rename = "tStartMs", default)]
    t_start_ms: u64,
    #[serde(rename = "dDurationMs", default)]
    d_duration_ms: u64,
    #[serde(default)]
    segs: Vec<TimedTextSeg>,
}

#[derive(Debug, Deserialize)]
struct TimedTextSeg {
    #[serde(default)]
    utf8: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(code: &str, kind: Option<&str>) -> CaptionTrack {
        CaptionTrack {
            base_url: format!("https://example.test/{}", code),
            language_code: code.to_string(),
            kind: kind.map(str::to_string),
        }
    }

    #[test]
    fn test_extract_video_id() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=abc123").unwrap(),
            "abc123"
        );
        assert_eq!(extract_video_id("https://youtu.be/abc123").unwrap(), "abc123");
        assert_eq!(
            extract_video_id("https://youtube.com/watch?feature=share&v=dQw4w9WgXcQ&t=42").unwrap(),
            "dQw4w9WgXcQ"
        );
        assert_eq!(
            extract_video_id("https://m.youtube.com/watch?v=dQw4w9WgXcQ").unwrap(),
            "dQw4w9WgXcQ"
        );
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ?si=tracking").unwrap(),
            "dQw4w9WgXcQ"
        );
    }

    #[test]
    fn test_extract_video_id_rejects_other_shapes() {
        for url in [
            "https://example.com/abc123",
            "https://vimeo.com/12345",
            "not a url",
            "youtube.com/watch?v=abc123",
            "https://www.youtube.com/watch",
            "https://www.youtube.com/watch?v=",
            "https://youtu.be/",
            "",
        ] {
            assert!(
                matches!(extract_video_id(url), Err(TubetalkError::InvalidUrl(_))),
                "expected InvalidUrl for {:?}",
                url
            );
        }
    }

    #[test]
    fn test_select_track_prefers_manual() {
        let tracks = vec![track("en", Some("asr")), track("hi", None), track("en", None)];
        let chosen = select_track("vid", &tracks, Language::English).unwrap();
        assert!(!chosen.is_generated());
        assert_eq!(chosen.base_url, "https://example.test/en");
    }

    #[test]
    fn test_select_track_falls_back_to_generated() {
        let tracks = vec![track("hi", Some("asr"))];
        let chosen = select_track("vid", &tracks, Language::Hindi).unwrap();
        assert!(chosen.is_generated());
    }

    #[test]
    fn test_select_track_reports_available_languages() {
        let tracks = vec![track("de", None), track("fr", Some("asr")), track("de", Some("asr"))];
        match select_track("vid", &tracks, Language::Hindi) {
            Err(TubetalkError::TranscriptUnavailable { video_id, reason }) => {
                assert_eq!(video_id, "vid");
                assert_eq!(
                    reason,
                    UnavailableReason::LanguageUnavailable {
                        requested: "hi".to_string(),
                        available: vec!["de".to_string(), "fr".to_string()],
                    }
                );
            }
            other => panic!("unexpected result: {:?}", other.map(|t| t.language_code.clone())),
        }
    }

    #[test]
    fn test_caption_tracks_maps_playability() {
        let player: PlayerResponse = serde_json::from_str(
            r#"{"playabilityStatus": {"status": "ERROR", "reason": "Video unavailable"}}"#,
        )
        .unwrap();
        match caption_tracks("vid", player) {
            Err(TubetalkError::TranscriptUnavailable { reason, .. }) => {
                assert_eq!(reason, UnavailableReason::VideoUnavailable("Video unavailable".to_string()));
            }
            _ => panic!("expected VideoUnavailable"),
        }

        let player: PlayerResponse =
            serde_json::from_str(r#"{"playabilityStatus": {"status": "OK"}}"#).unwrap();
        match caption_tracks("vid", player) {
            Err(TubetalkError::TranscriptUnavailable { reason, .. }) => {
                assert_eq!(reason, UnavailableReason::TranscriptsDisabled);
            }
            _ => panic!("expected TranscriptsDisabled"),
        }
    }

    #[test]
    fn test_parse_json3() {
        let fetcher = YoutubeTranscriptFetcher::new().unwrap();
        let body = r#"{
            "events": [
                {"tStartMs": 0, "dDurationMs": 1500, "segs": [{"utf8": "Hello"}, {"utf8": " world"}]},
                {"tStartMs": 1500, "dDurationMs": 10},
                {"tStartMs": 1600, "dDurationMs": 10, "segs": [{"utf8": "\n"}]},
                {"tStartMs": 2000, "dDurationMs": 2500, "segs": [{"utf8": "second\nline  here"}]}
            ]
        }"#;

        let segments = fetcher.parse_json3("vid", body).unwrap();
        assert_eq!(
            segments,
            vec![
                TranscriptSegment::new("Hello world", 0.0, 1.5),
                TranscriptSegment::new("second line here", 2.0, 2.5),
            ]
        );
    }

    #[test]
    fn test_parse_json3_rejects_garbage() {
        let fetcher = YoutubeTranscriptFetcher::new().unwrap();
        assert!(matches!(
            fetcher.parse_json3("vid", "<transcript/>"),
            Err(TubetalkError::TranscriptUnavailable {
                reason: UnavailableReason::MalformedResponse(_),
                ..
            })
        ));
    }
}
