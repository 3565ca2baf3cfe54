//! Ask command implementation.

use super::load_video;
use crate::cli::preflight;
use crate::cli::Output;
use crate::config::Settings;
use crate::session::Session;
use crate::transcript::Language;
use anyhow::Result;

/// Run the ask command: load one video and answer one question.
pub async fn run_ask(
    url: &str,
    question: &str,
    language: Option<Language>,
    k: Option<usize>,
    show_sources: bool,
    settings: Settings,
) -> Result<()> {
    // Answering needs the key; loading the video does not.
    if let Err(e) = preflight::check(&settings) {
        Output::warning(&format!("{}", e));
        Output::info("Run 'tubetalk doctor' for detailed diagnostics.");
    }

    let language = language.unwrap_or(settings.transcript.language);
    let mut session = Session::from_settings(&settings)?;
    if let Some(k) = k {
        session.set_k(k);
    }

    load_video(&mut session, url, language).await?;

    let spinner = Output::spinner("Thinking...");
    let result = session.ask(question).await;
    spinner.finish_and_clear();

    let answer = result?;
    if let Some(video) = session.video() {
        Output::answer(&answer, video, show_sources);
    }

    Ok(())
}
