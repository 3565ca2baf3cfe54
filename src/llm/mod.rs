//! Text generation for answer composition.

mod chat_completions;

pub use chat_completions::ChatCompletionsGenerator;

use crate::error::Result;
use async_trait::async_trait;

/// Trait for language model backends.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate a completion for a single user prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Model identifier, recorded on answers.
    fn model(&self) -> &str;
}
