//! Tubetalk - Ask questions about YouTube videos
//!
//! Fetches a video's transcript, indexes it in memory, and answers questions
//! strictly from the transcript with retrieval-augmented generation.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management and prompt templates
//! - `transcript` - Video URL parsing and transcript fetching
//! - `chunking` - Transcript chunking strategies
//! - `embedding` - Embedding generation
//! - `vector_store` - In-memory vector index
//! - `llm` - Answer generation backends
//! - `rag` - Retrieval and answer composition
//! - `session` - Session state machine tying the pipeline together
//!
//! # Example
//!
//! ```rust,no_run
//! use tubetalk::config::Settings;
//! use tubetalk::session::Session;
//! use tubetalk::transcript::Language;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let mut session = Session::from_settings(&settings)?;
//!
//!     session
//!         .submit_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ", Language::English)
//!         .await?;
//!     let answer = session.ask("What is the song about?").await?;
//!     println!("{}", answer.text);
//!
//!     Ok(())
//! }
//! ```

pub mod chunking;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod llm;
pub mod openai;
pub mod rag;
pub mod session;
pub mod transcript;
pub mod vector_store;

pub use error::{Result, TubetalkError};
