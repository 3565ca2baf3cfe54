//! Answer composition from retrieved context.

use super::context::{format_context_for_display, format_context_for_prompt};
use super::ScoredChunk;
use crate::config::Prompts;
use crate::error::Result;
use crate::llm::Generator;
use crate::transcript::VideoReference;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Builds the grounded prompt and asks the generator for an answer.
pub struct AnswerComposer {
    generator: Arc<dyn Generator>,
    prompts: Prompts,
}

impl AnswerComposer {
    /// Create a composer with the default prompt.
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self {
            generator,
            prompts: Prompts::default(),
        }
    }

    /// Set custom prompts (with user-defined variables).
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Render the prompt for a question and its context chunks.
    pub fn build_prompt(&self, chunks: &[ScoredChunk], question: &str) -> String {
        let mut vars = HashMap::new();
        vars.insert("question".to_string(), question.to_string());
        vars.insert("context".to_string(), format_context_for_prompt(chunks));

        self.prompts.render_with_custom(&self.prompts.rag.template, &vars)
    }

    /// Answer a question from the given chunks. The generator is called once.
    #[instrument(skip(self, chunks), fields(question = %question, chunks = chunks.len()))]
    pub async fn answer(&self, chunks: Vec<ScoredChunk>, question: &str) -> Result<Answer> {
        info!("Composing answer");

        let prompt = self.build_prompt(&chunks, question);
        let text = self.generator.generate(&prompt).await?;

        debug!("Generated answer with {} sources", chunks.len());

        Ok(Answer {
            question: question.to_string(),
            text,
            context: chunks,
            model: self.generator.model().to_string(),
            answered_at: Utc::now(),
        })
    }
}

/// A generated answer with the context it was grounded on.
#[derive(Debug, Clone)]
pub struct Answer {
    /// The question asked.
    pub question: String,
    /// The generated answer.
    pub text: String,
    /// Chunks given to the generator, best first.
    pub context: Vec<ScoredChunk>,
    /// Model that produced the answer.
    pub model: String,
    pub answered_at: DateTime<Utc>,
}

impl Answer {
    /// Format the answer for display, optionally followed by its sources.
    pub fn format_for_display(&self, video: Option<&VideoReference>) -> String {
        let mut output = self.text.trim().to_string();

        if let Some(video) = video {
            if !self.context.is_empty() {
                output.push_str("\n\n--- Sources ---\n\n");
                output.push_str(&format_context_for_display(&self.context, video));
            }
        }

        output
    }
}
