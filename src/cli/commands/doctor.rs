//! Doctor command - verify configuration and credentials.

use crate::chunking::validate;
use crate::cli::Output;
use crate::config::{EmbeddingProvider, Prompts, Settings};
use crate::embedding::create_embedder;
use console::style;
use std::path::Path;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings, config_path: &Path) -> anyhow::Result<()> {
    Output::header("Tubetalk Doctor");
    println!();
    println!("Checking configuration and credentials...\n");

    let mut checks = Vec::new();

    println!("{}", style("Configuration").bold());
    let section = vec![
        check_config_file(config_path),
        check_chunking(settings),
        check_prompts(settings),
    ];
    for check in &section {
        check.print();
    }
    checks.extend(section);

    println!();

    println!("{}", style("Answer Generation").bold());
    let api_check = check_api_key(&settings.llm.api_key_env);
    api_check.print();
    checks.push(api_check);
    Output::kv("endpoint", &settings.llm.base_url);
    Output::kv("model", &settings.llm.model);

    println!();

    println!("{}", style("Embeddings").bold());
    let mut section = vec![check_embedder(settings)];
    if settings.embedding.provider == EmbeddingProvider::OpenAI {
        section.push(check_api_key("OPENAI_API_KEY"));
    }
    for check in &section {
        check.print();
    }
    checks.extend(section);

    println!();

    // Summary
    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using Tubetalk.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Tubetalk is ready to use.");
    }

    Ok(())
}

/// Check that an API key environment variable is configured.
fn check_api_key(name: &str) -> CheckResult {
    let hint = format!("Set with: export {}='...' or add it to a .env file", name);
    match std::env::var(name) {
        Ok(key) if key.trim().is_empty() => CheckResult::error(name, "empty", &hint),
        Ok(key) => CheckResult::ok(name, &format!("configured ({})", mask_key(&key))),
        Err(_) => CheckResult::error(name, "not set", &hint),
    }
}

/// Show only the start and end of a key.
fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 12 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

/// Check if config file exists.
fn check_config_file(config_path: &Path) -> CheckResult {
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: tubetalk config edit",
        )
    }
}

fn check_chunking(settings: &Settings) -> CheckResult {
    let chunking = &settings.chunking;
    match validate(chunking.chunk_size, chunking.chunk_overlap) {
        Ok(()) => CheckResult::ok(
            "Chunking",
            &format!(
                "{} ({} chars, {} overlap)",
                chunking.strategy, chunking.chunk_size, chunking.chunk_overlap
            ),
        ),
        Err(e) => CheckResult::error(
            "Chunking",
            &e.to_string(),
            "chunk_overlap must be smaller than chunk_size",
        ),
    }
}

fn check_prompts(settings: &Settings) -> CheckResult {
    let Some(dir) = settings.prompts.custom_dir.as_deref() else {
        return CheckResult::ok("Prompts", "built-in");
    };
    match Prompts::load(Some(dir), Some(&settings.prompts.variables)) {
        Ok(prompts) if prompts.rag.template.contains("{{question}}") => {
            CheckResult::ok("Prompts", &format!("loaded from {}", Settings::expand_path(dir).display()))
        }
        Ok(_) => CheckResult::warning(
            "Prompts",
            "custom template has no {{question}} placeholder",
            "Add {{context}} and {{question}} to rag.toml",
        ),
        Err(e) => CheckResult::error("Prompts", &e.to_string(), "Fix or remove rag.toml"),
    }
}

fn check_embedder(settings: &Settings) -> CheckResult {
    match create_embedder(&settings.embedding) {
        Ok(embedder) => CheckResult::ok(
            "Embedder",
            &format!("{} ({} dimensions)", embedder.name(), embedder.dimensions()),
        ),
        Err(e) => CheckResult::error("Embedder", &e.to_string(), "Check the [embedding] section"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_result_ok() {
        let result = CheckResult::ok("test", "passed");
        assert_eq!(result.status, CheckStatus::Ok);
        assert!(result.hint.is_none());
    }

    #[test]
    fn test_check_result_error() {
        let result = CheckResult::error("test", "failed", "fix it");
        assert_eq!(result.status, CheckStatus::Error);
        assert_eq!(result.hint, Some("fix it".to_string()));
    }

    #[test]
    fn test_mask_key() {
        assert_eq!(mask_key("short"), "*****");
        assert_eq!(mask_key("gsk_abcdefghijklmnop"), "gsk_...mnop");
    }

    #[test]
    fn test_check_chunking() {
        let mut settings = Settings::default();
        assert_eq!(check_chunking(&settings).status, CheckStatus::Ok);

        settings.chunking.chunk_overlap = settings.chunking.chunk_size;
        assert_eq!(check_chunking(&settings).status, CheckStatus::Error);
    }

    #[test]
    fn test_default_embedder_needs_no_key() {
        assert_eq!(check_embedder(&Settings::default()).status, CheckStatus::Ok);
    }
}
