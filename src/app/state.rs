//! Transcript state for the chat view.

use super::driver::{Phase, PipelineEvent};
use crate::types::{Message, MessageBody};

/// The conversation transcript plus the in-flight turn.
///
/// At most one of `placeholder` and `partial` is shown at a time. Once
/// answer text has arrived, loading messages no longer overwrite it.
#[derive(Debug, Default)]
pub struct ChatState {
    messages: Vec<Message>,
    placeholder: Option<String>,
    partial: Option<String>,
    phase: Phase,
}

impl ChatState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a question and clears any leftover in-flight view.
    pub fn push_question(&mut self, question: impl Into<String>) {
        self.messages.push(Message::question(question));
        self.placeholder = None;
        self.partial = None;
        self.phase = Phase::Idle;
    }

    /// Folds one pipeline event into the transcript.
    pub fn apply(&mut self, event: PipelineEvent) {
        match event {
            PipelineEvent::Phase(phase) => self.phase = phase,
            PipelineEvent::Status(text) => {
                if self.partial.is_none() {
                    self.placeholder = Some(text);
                }
            }
            PipelineEvent::Retrying(_) => {}
            PipelineEvent::Partial(text) => {
                self.placeholder = None;
                self.partial = Some(text);
            }
            PipelineEvent::Finished(blocks) => {
                self.clear_in_flight();
                self.messages.push(Message::answer(blocks));
            }
            PipelineEvent::Failed(kind) => {
                self.clear_in_flight();
                self.messages.push(Message::notice(kind));
            }
        }
    }

    fn clear_in_flight(&mut self) {
        self.placeholder = None;
        self.partial = None;
    }

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    #[must_use]
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    #[must_use]
    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    #[must_use]
    pub fn partial(&self) -> Option<&str> {
        self.partial.as_deref()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True while a turn is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        !matches!(self.phase, Phase::Idle) && !self.phase.is_terminal()
    }

    /// Number of failure notices in the transcript.
    #[must_use]
    pub fn notice_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| matches!(m.body, MessageBody::Notice(_)))
            .count()
    }
}
