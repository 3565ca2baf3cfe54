//! CLI command implementations.

mod ask;
mod chat;
mod config;
mod doctor;
mod transcript;

pub use ask::run_ask;
pub use chat::run_chat;
pub use config::run_config;
pub use doctor::run_doctor;
pub use transcript::run_transcript;

use crate::cli::Output;
use crate::session::{Session, SubmitOutcome};
use crate::transcript::Language;

/// Load a video into the session behind a spinner, reporting the outcome.
pub(crate) async fn load_video(
    session: &mut Session,
    url: &str,
    language: Language,
) -> crate::error::Result<()> {
    let spinner = Output::spinner(&format!("Fetching {} transcript...", language.name()));
    let result = session.submit_url(url, language).await;
    spinner.finish_and_clear();

    match result? {
        SubmitOutcome::Cached => Output::info("Video already loaded."),
        SubmitOutcome::Indexed { chunks, segments } => {
            Output::success("Transcript indexed.");
            if let (Some(video), Some(transcript)) = (session.video(), session.transcript()) {
                Output::video_info(
                    &video.video_id,
                    language.name(),
                    segments,
                    chunks,
                    transcript.duration_seconds(),
                );
            }
        }
    }
    Ok(())
}
