//! Slash commands for interactive mode.
//!
//! A line starting with `/` is a command, anything else is a question.
//!
//! # Example
//!
//! ```rust
//! use starchat::app::commands::{parse_command, CommandResult, SlashCommand};
//!
//! assert_eq!(parse_command("/quit"), CommandResult::Command(SlashCommand::Quit));
//! assert_eq!(parse_command("When will I travel?"), CommandResult::NotACommand);
//! ```

use clap::ValueEnum;

use crate::types::Language;

/// A recognized command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlashCommand {
    /// Leave interactive mode (`/quit`, `/exit`).
    Quit,
    /// Print the command list.
    Help,
    /// Switch the response language for later questions.
    Language(Language),
    /// Reprint the transcript so far.
    History,
    /// Forget the transcript.
    Clear,
}

/// Result of parsing one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// A command to execute.
    Command(SlashCommand),

    /// The input was not a slash command (doesn't start with `/`).
    NotACommand,

    /// The command was not recognized.
    UnknownCommand(String),

    /// The command was recognized but its arguments were not.
    Error(String),
}

/// Text printed by `/help`.
pub const HELP_TEXT: &str = r"Available Commands:

  /language <name>  - Answer in another language (english, hindi, tamil, ...)
  /history          - Show the conversation so far
  /clear            - Forget the conversation so far
  /help             - Show this list
  /quit             - Leave (also /exit)

Anything else is sent as a question.";

/// Parses one input line.
#[must_use]
pub fn parse_command(input: &str) -> CommandResult {
    let Some(without_slash) = input.trim().strip_prefix('/') else {
        return CommandResult::NotACommand;
    };

    let mut parts = without_slash.split_whitespace();
    let Some(name) = parts.next() else {
        return CommandResult::Error("Empty command".to_string());
    };
    let args: Vec<&str> = parts.collect();

    match name {
        "quit" | "exit" => CommandResult::Command(SlashCommand::Quit),
        "help" => CommandResult::Command(SlashCommand::Help),
        "history" => CommandResult::Command(SlashCommand::History),
        "clear" => CommandResult::Command(SlashCommand::Clear),
        "language" => parse_language(&args),
        _ => CommandResult::UnknownCommand(name.to_string()),
    }
}

fn parse_language(args: &[&str]) -> CommandResult {
    match args {
        [name] => match Language::from_str(name, true) {
            Ok(language) => CommandResult::Command(SlashCommand::Language(language)),
            Err(_) => CommandResult::Error(format!("Unknown language '{name}'")),
        },
        [] => CommandResult::Error("Usage: /language <name>".to_string()),
        _ => CommandResult::Error("/language takes exactly one argument".to_string()),
    }
}
