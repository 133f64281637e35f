//! Application core
//!
//! One-shot mode asks the configured question and exits. Interactive mode
//! reads questions from stdin, one per line, until `/quit` or end of input.

pub mod commands;
pub mod driver;
pub mod state;
pub mod ticker;

use std::io::{self, IsTerminal, Write};

use anyhow::{Context, Result};
use crossterm::cursor::MoveToColumn;
use crossterm::queue;
use crossterm::style::{Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::api::AnswerClient;
use crate::tui::{self, theme::StarchatTheme};
use crate::types::config::OutputMode;
use crate::types::{AnswerRequest, Language, Message};
use commands::{parse_command, CommandResult, SlashCommand, HELP_TEXT};

pub use crate::types::Config;
pub use driver::{Phase, PipelineDriver, PipelineEvent};
pub use state::ChatState;

/// Runs the client. Returns true if every asked question was answered.
///
/// # Errors
///
/// Returns an error for an invalid birth profile or a terminal I/O failure.
/// Failed turns are reported in the transcript, not as errors.
pub async fn run(config: Config) -> Result<bool> {
    config
        .profile
        .validate()
        .context("Invalid birth profile")?;

    let driver = PipelineDriver::new(AnswerClient::new(&config), config.loading.clone());
    let mut session = Session {
        driver,
        language: config.language,
        output: config.output,
        profile_name: config.profile.name.clone(),
        state: ChatState::new(),
        config,
    };

    match session.config.question.clone() {
        Some(question) => session.turn(&question).await,
        None => session.interactive().await,
    }
}

struct Session {
    config: Config,
    driver: PipelineDriver,
    language: Language,
    output: OutputMode,
    profile_name: String,
    state: ChatState,
}

impl Session {
    async fn interactive(&mut self) -> Result<bool> {
        let prompt = io::stdin().is_terminal();
        if prompt {
            eprintln!(
                "Asking as {}. Type a question, /help for commands, /quit to leave.",
                self.profile_name
            );
        }
        info!(language = %self.language, "Interactive mode started");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut all_answered = true;
        loop {
            if prompt {
                show_prompt()?;
            }
            let Some(line) = lines.next_line().await.context("Failed to read stdin")? else {
                break;
            };
            let input = line.trim();
            if input.is_empty() {
                continue;
            }

            match parse_command(input) {
                CommandResult::NotACommand => {
                    all_answered &= self.turn(input).await?;
                }
                CommandResult::Command(SlashCommand::Quit) => break,
                CommandResult::Command(SlashCommand::Help) => eprintln!("{HELP_TEXT}"),
                CommandResult::Command(SlashCommand::Language(language)) => {
                    self.language = language;
                    eprintln!("Answers will be in {language}.");
                }
                CommandResult::Command(SlashCommand::History) => self.print_history()?,
                CommandResult::Command(SlashCommand::Clear) => {
                    self.state = ChatState::new();
                    eprintln!("Conversation cleared.");
                }
                CommandResult::UnknownCommand(name) => {
                    eprintln!("Unknown command /{name}. Type /help for the list.");
                }
                CommandResult::Error(message) => eprintln!("{message}"),
            }
        }

        debug!(messages = self.state.messages().len(), "Interactive mode finished");
        Ok(all_answered)
    }

    /// Asks one question and prints the resulting transcript entry.
    async fn turn(&mut self, question: &str) -> Result<bool> {
        let request = match AnswerRequest::new(self.config.profile.clone(), question, self.language) {
            Ok(request) => request,
            Err(err) => {
                eprintln!("{err}");
                return Ok(false);
            }
        };
        self.state.push_question(request.question.clone());

        let (tx, mut rx) = mpsc::unbounded_channel();
        let driver = &self.driver;
        let ask = async move { driver.ask(&request, &tx).await };

        let state = &mut self.state;
        let mut progress = Progress::new(self.output == OutputMode::Styled && io::stderr().is_terminal());
        let drain = async {
            while let Some(event) = rx.recv().await {
                progress.show(&event)?;
                state.apply(event);
            }
            progress.clear()
        };

        let (outcome, drained) = tokio::join!(ask, drain);
        drained.context("Failed to write progress")?;

        if let Some(message) = self.state.last_message() {
            print_message(message, self.output)?;
        }
        Ok(outcome.is_ok())
    }

    fn print_history(&self) -> Result<()> {
        for message in self.state.messages() {
            print_message(message, self.output)?;
        }
        Ok(())
    }
}

fn show_prompt() -> Result<()> {
    let mut err = io::stderr();
    queue!(
        err,
        SetForegroundColor(tui::term_color(StarchatTheme::GOLD)),
        Print("› "),
        ResetColor
    )?;
    err.flush()?;
    Ok(())
}

fn print_message(message: &Message, output: OutputMode) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match output {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut out, message).context("Failed to encode answer")?;
            writeln!(out)?;
        }
        OutputMode::Styled => {
            let lines = tui::render_message(message);
            if io::stdout().is_terminal() {
                tui::print_lines(&mut out, &lines)?;
            } else {
                out.write_all(tui::plain_text(&lines).as_bytes())?;
            }
        }
    }
    out.flush()?;
    Ok(())
}

/// Single status line on stderr, redrawn in place.
struct Progress {
    enabled: bool,
    visible: bool,
}

impl Progress {
    fn new(enabled: bool) -> Self {
        Self {
            enabled,
            visible: false,
        }
    }

    fn show(&mut self, event: &PipelineEvent) -> io::Result<()> {
        match event {
            PipelineEvent::Status(text) => self.draw(text, StarchatTheme::MUTED),
            PipelineEvent::Partial(text) => {
                let chars = text.chars().count();
                self.draw(&format!("Receiving answer… ({chars} chars)"), StarchatTheme::MUTED)
            }
            PipelineEvent::Retrying(notice) => {
                debug!(attempt = notice.attempt, reason = %notice.reason, "Retry announced");
                Ok(())
            }
            PipelineEvent::Phase(Phase::Segmenting) => self.clear(),
            PipelineEvent::Phase(_) | PipelineEvent::Finished(_) | PipelineEvent::Failed(_) => {
                Ok(())
            }
        }
    }

    fn draw(&mut self, text: &str, color: ratatui::style::Color) -> io::Result<()> {
        if !self.enabled {
            return Ok(());
        }
        let mut err = io::stderr();
        queue!(
            err,
            MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            SetForegroundColor(tui::term_color(color)),
            Print(text),
            ResetColor
        )?;
        self.visible = true;
        err.flush()
    }

    fn clear(&mut self) -> io::Result<()> {
        if !self.visible {
            return Ok(());
        }
        let mut err = io::stderr();
        queue!(err, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
        self.visible = false;
        err.flush()
    }
}
