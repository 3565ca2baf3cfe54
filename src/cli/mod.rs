//! CLI module for Tubetalk.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use crate::transcript::{Language, OutputFormat};
use clap::{Parser, Subcommand};

/// Tubetalk - Ask questions about YouTube videos
///
/// Fetches a video's transcript, indexes it, and answers questions strictly
/// from what was said in the video.
#[derive(Parser, Debug)]
#[command(name = "tubetalk")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "TUBETALK_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ask a single question about a video
    Ask {
        /// YouTube URL (youtube.com/watch?v=... or youtu.be/...)
        url: String,

        /// The question to ask
        question: String,

        /// Transcript language (en, hi)
        #[arg(short, long)]
        language: Option<Language>,

        /// Number of transcript chunks to use as context
        #[arg(short, long)]
        k: Option<usize>,

        /// Hide the source list
        #[arg(long)]
        no_sources: bool,
    },

    /// Start an interactive question-answering session
    Chat {
        /// YouTube URL to load at start
        url: Option<String>,

        /// Transcript language (en, hi)
        #[arg(short, long)]
        language: Option<Language>,

        /// Number of transcript chunks to use as context
        #[arg(short, long)]
        k: Option<usize>,
    },

    /// Fetch and print a video's transcript
    Transcript {
        /// YouTube URL
        url: String,

        /// Transcript language (en, hi)
        #[arg(short, long)]
        language: Option<Language>,

        /// Output format (text, json, srt, vtt)
        #[arg(long, default_value = "text")]
        format: OutputFormat,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Check configuration and credentials
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}
