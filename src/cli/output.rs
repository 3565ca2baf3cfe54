//! CLI output formatting utilities.

use crate::rag::{Answer, SourceRef};
use crate::transcript::VideoReference;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        eprintln!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        eprintln!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print loaded video info.
    pub fn video_info(video_id: &str, language: &str, segments: usize, chunks: usize, duration: f64) {
        eprintln!(
            "  {} {} ({}, {} segments, {} chunks, {})",
            style("*").cyan(),
            style(video_id).bold(),
            language,
            segments,
            chunks,
            format_duration(duration)
        );
    }

    /// Print an answer and, optionally, the sources it was grounded on.
    pub fn answer(answer: &Answer, video: &VideoReference, show_sources: bool) {
        println!("\n{}\n", answer.text.trim());

        if show_sources && !answer.context.is_empty() {
            Output::header("Sources");
            for scored in &answer.context {
                Output::source(&SourceRef::new(scored, video));
            }
            println!();
        }
    }

    /// Print a retrieved source.
    pub fn source(source: &SourceRef) {
        println!(
            "\n{} {} (score: {:.2})",
            style(">>").green(),
            style(source.timestamp.as_deref().unwrap_or("--:--")).cyan(),
            source.score
        );
        println!("   {}", content_preview(&source.content, 200));
        if let Some(u) = &source.url {
            println!("   {}", style(u).dim());
        }
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(spinner_style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}

/// Format duration in seconds to a human-readable string.
fn format_duration(seconds: f64) -> String {
    let total_seconds = seconds as u32;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}

/// Truncate content with ellipsis, on a character boundary.
fn content_preview(content: &str, max_chars: usize) -> String {
    let content = content.replace('\n', " ");
    if content.chars().count() <= max_chars {
        content
    } else {
        let head: String = content.chars().take(max_chars).collect();
        format!("{}...", head)
    }
}
