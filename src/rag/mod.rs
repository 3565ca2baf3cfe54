//! RAG (Retrieval-Augmented Generation) over a single video transcript.
//!
//! Retrieves the chunks most similar to a question and asks the generator to
//! answer from them alone.

pub mod context;
mod response;
mod retriever;

pub use context::{format_context_for_display, format_context_for_prompt, SourceRef};
pub use response::{Answer, AnswerComposer};
pub use retriever::retrieve;

pub use crate::vector_store::ScoredChunk;
