//! Transcript command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::transcript::{
    format_transcript, Language, OutputFormat, TranscriptFetcher, VideoReference,
    YoutubeTranscriptFetcher,
};
use anyhow::Result;

/// Run the transcript command: fetch and print or export a transcript.
pub async fn run_transcript(
    url: &str,
    language: Option<Language>,
    format: OutputFormat,
    output: Option<String>,
    settings: Settings,
) -> Result<()> {
    let language = language.unwrap_or(settings.transcript.language);
    let video = VideoReference::parse(url)?;
    let fetcher = YoutubeTranscriptFetcher::from_settings(&settings.transcript)?;

    let spinner = Output::spinner(&format!("Fetching {} transcript...", language.name()));
    let result = fetcher.fetch(&video, language).await;
    spinner.finish_and_clear();
    let transcript = result?;

    let output_str = format_transcript(&transcript, format);

    match output {
        Some(path) if path != "-" => {
            std::fs::write(&path, &output_str)?;
            Output::success(&format!(
                "Exported transcript of {} to {} ({} segments)",
                video.video_id,
                path,
                transcript.segments.len()
            ));
        }
        _ => {
            println!("{}", output_str);
        }
    }

    Ok(())
}
