//! Pre-flight checks before expensive operations.
//!
//! Missing credentials are reported up front as warnings. The request that
//! needs a key is what fails, so a transcript can still be fetched and
//! indexed without one.

use crate::config::{EmbeddingProvider, Settings};
use crate::error::{Result, TubetalkError};

/// Check the credentials needed to answer questions with these settings.
///
/// Returns Ok(()) if all keys are present, or an error describing the first missing one.
pub fn check(settings: &Settings) -> Result<()> {
    check_env_key(&settings.llm.api_key_env)?;
    if settings.embedding.provider == EmbeddingProvider::OpenAI {
        check_env_key("OPENAI_API_KEY")?;
    }
    Ok(())
}

/// Check that an API key environment variable is set and non-empty.
pub fn check_env_key(name: &str) -> Result<()> {
    match std::env::var(name) {
        Ok(key) if !key.trim().is_empty() => Ok(()),
        Ok(_) => Err(TubetalkError::Config(format!(
            "{} is empty. Set it with: export {}='...' or add it to .env",
            name, name
        ))),
        Err(_) => Err(TubetalkError::Config(format!(
            "{} not set. Set it with: export {}='...' or add it to .env",
            name, name
        ))),
    }
}
