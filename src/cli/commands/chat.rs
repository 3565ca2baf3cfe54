//! Interactive chat command.
//!
//! Every line is a question about the loaded video, except for the
//! `:`-prefixed commands and `exit`/`quit`.

use super::load_video;
use crate::cli::preflight;
use crate::cli::Output;
use crate::config::Settings;
use crate::session::Session;
use crate::transcript::Language;
use anyhow::Result;
use console::style;
use std::io::{self, BufRead, Write};

/// A parsed line of chat input.
#[derive(Debug, PartialEq)]
enum ChatInput<'a> {
    Exit,
    Help,
    ToggleSources,
    LoadUrl(&'a str),
    SetLanguage(&'a str),
    Unknown(&'a str),
    Question(&'a str),
    Empty,
}

fn parse_input(line: &str) -> ChatInput<'_> {
    let line = line.trim();
    if line.is_empty() {
        return ChatInput::Empty;
    }
    if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
        return ChatInput::Exit;
    }

    let Some(command) = line.strip_prefix(':') else {
        return ChatInput::Question(line);
    };

    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };

    match name {
        "help" | "h" => ChatInput::Help,
        "sources" => ChatInput::ToggleSources,
        "url" => ChatInput::LoadUrl(arg),
        "lang" | "language" => ChatInput::SetLanguage(arg),
        "q" | "quit" | "exit" => ChatInput::Exit,
        _ => ChatInput::Unknown(name),
    }
}

fn print_help() {
    println!();
    println!("  {}  load a video", style(":url <URL>").cyan());
    println!("  {}  switch transcript language (en, hi)", style(":lang <code>").cyan());
    println!("  {}  show or hide sources", style(":sources").cyan());
    println!("  {}  leave", style("exit").cyan());
    println!("  Anything else is a question about the loaded video.\n");
}

/// Run the interactive chat command.
pub async fn run_chat(
    url: Option<String>,
    language: Option<Language>,
    k: Option<usize>,
    settings: Settings,
) -> Result<()> {
    // Answering needs the key; loading the video does not.
    if let Err(e) = preflight::check(&settings) {
        Output::warning(&format!("{}", e));
        Output::info("Run 'tubetalk doctor' for detailed diagnostics.");
    }

    let mut language = language.unwrap_or(settings.transcript.language);
    let mut session = Session::from_settings(&settings)?;
    if let Some(k) = k {
        session.set_k(k);
    }
    let mut show_sources = true;

    println!("\n{}", style("Tubetalk Chat").bold().cyan());
    println!(
        "{}\n",
        style("Load a video with ':url <URL>', then ask questions. ':help' for commands, 'exit' to quit.").dim()
    );

    if let Some(url) = url {
        if let Err(e) = load_video(&mut session, &url, language).await {
            Output::error(&e.to_string());
        }
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", style("You:").green().bold());
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        match parse_input(&line) {
            ChatInput::Empty => continue,
            ChatInput::Exit => {
                Output::info("Goodbye!");
                break;
            }
            ChatInput::Help => print_help(),
            ChatInput::ToggleSources => {
                show_sources = !show_sources;
                Output::info(if show_sources { "Sources on." } else { "Sources off." });
            }
            ChatInput::Unknown(name) => {
                Output::warning(&format!("Unknown command ':{}'. Type ':help'.", name));
            }
            ChatInput::LoadUrl("") => Output::warning("Usage: :url <YouTube URL>"),
            ChatInput::LoadUrl(url) => {
                if let Err(e) = load_video(&mut session, url, language).await {
                    Output::error(&e.to_string());
                }
            }
            ChatInput::SetLanguage(code) => match code.parse::<Language>() {
                Ok(new_language) => {
                    language = new_language;
                    Output::info(&format!("Language set to {}.", language.name()));
                    let current = session.video().map(|v| v.url.clone());
                    if let Some(url) = current {
                        if let Err(e) = load_video(&mut session, &url, language).await {
                            Output::error(&e.to_string());
                        }
                    }
                }
                Err(e) => Output::warning(&e),
            },
            ChatInput::Question(question) => {
                let spinner = Output::spinner("Thinking...");
                let result = session.ask(question).await;
                spinner.finish_and_clear();

                match result {
                    Ok(answer) => {
                        if let Some(video) = session.video() {
                            Output::answer(&answer, video, show_sources);
                        }
                    }
                    Err(e) => Output::error(&e.to_string()),
                }
            }
        }
    }

    Ok(())
}
