//! One chat turn: request, decode, segment.
//!
//! [`PipelineDriver::ask`] runs the stages in order and publishes every
//! observable change as a [`PipelineEvent`]. The caller owns the
//! transcript and folds events into it (see [`super::state::ChatState`]).

use std::fmt;

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use super::ticker::LoadingTicker;
use crate::api::{AnswerClient, ChunkDecoder, RetryNotice};
use crate::error::{ChatError, ChatResult, FailureKind};
use crate::markup::segment;
use crate::types::config::LoadingSettings;
use crate::types::{AnswerRequest, ContentBlock};

/// Stage of a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Sending,
    Retrying,
    Streaming,
    Segmenting,
    Done,
    Aborted,
}

impl Phase {
    /// Returns true if `next` may follow `self`.
    ///
    /// `Retrying` may repeat: the client does not report the start of the
    /// attempt that follows a backoff.
    #[must_use]
    pub fn can_transition_to(self, next: Phase) -> bool {
        use Phase::{Aborted, Done, Idle, Retrying, Segmenting, Sending, Streaming};
        matches!(
            (self, next),
            (Idle, Sending)
                | (Sending, Retrying | Streaming | Aborted)
                | (Retrying, Retrying | Streaming | Aborted)
                | (Streaming, Segmenting | Aborted)
                | (Segmenting, Done | Aborted)
        )
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Done | Phase::Aborted)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Sending => "sending",
            Phase::Retrying => "retrying",
            Phase::Streaming => "streaming",
            Phase::Segmenting => "segmenting",
            Phase::Done => "done",
            Phase::Aborted => "aborted",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Something the caller should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    /// The turn moved to a new stage.
    Phase(Phase),
    /// Loading or retry status line.
    Status(String),
    /// A retry is about to be made.
    Retrying(RetryNotice),
    /// Accumulated answer text so far.
    Partial(String),
    /// The segmented answer.
    Finished(Vec<ContentBlock>),
    /// The turn failed; shown as one notice.
    Failed(FailureKind),
}

/// Tracks the phase of one turn and publishes transitions.
struct PhaseTracker<'a> {
    phase: Phase,
    events: &'a UnboundedSender<PipelineEvent>,
}

impl<'a> PhaseTracker<'a> {
    fn new(events: &'a UnboundedSender<PipelineEvent>) -> Self {
        Self {
            phase: Phase::Idle,
            events,
        }
    }

    fn advance(&mut self, next: Phase) {
        if !self.phase.can_transition_to(next) {
            warn!(from = %self.phase, to = %next, "Unexpected phase transition");
        }
        debug!(phase = %next, from = %self.phase, "Phase transition");
        self.phase = next;
        self.events.send(PipelineEvent::Phase(next)).ok();
    }
}

/// Runs chat turns against one [`AnswerClient`].
#[derive(Debug, Clone)]
pub struct PipelineDriver {
    client: AnswerClient,
    loading: LoadingSettings,
}

impl PipelineDriver {
    #[must_use]
    pub fn new(client: AnswerClient, loading: LoadingSettings) -> Self {
        Self { client, loading }
    }

    #[must_use]
    pub fn client(&self) -> &AnswerClient {
        &self.client
    }

    /// Asks one question and returns the segmented answer.
    ///
    /// Events are published on `events` as the turn progresses. A closed
    /// receiver is not an error. The loading ticker is released on every
    /// exit path.
    ///
    /// # Errors
    ///
    /// Returns the request or stream failure. A `Failed` event carrying the
    /// failure kind has already been published when this returns `Err`.
    pub async fn ask(
        &self,
        request: &AnswerRequest,
        events: &UnboundedSender<PipelineEvent>,
    ) -> ChatResult<Vec<ContentBlock>> {
        let mut phases = PhaseTracker::new(events);
        phases.advance(Phase::Sending);
        let mut ticker = LoadingTicker::start(events.clone(), &self.loading);

        let fetched = self
            .client
            .fetch_body(request, |notice| {
                phases.advance(Phase::Retrying);
                events.send(PipelineEvent::Retrying(notice.clone())).ok();
                ticker.announce(notice.status_message());
            })
            .await;
        let body = match fetched {
            Ok(body) => body,
            Err(err) => return Err(fail(&mut phases, &mut ticker, err)),
        };

        phases.advance(Phase::Streaming);
        let decoded = ChunkDecoder::decode_body(&body, |acc| {
            ticker.stop();
            events
                .send(PipelineEvent::Partial(acc.text().to_string()))
                .ok();
        });
        let text = match decoded {
            Ok(text) => text,
            Err(err) => return Err(fail(&mut phases, &mut ticker, err)),
        };

        phases.advance(Phase::Segmenting);
        ticker.stop();
        let blocks = segment(&text);
        if blocks.is_empty() {
            return Err(fail(&mut phases, &mut ticker, ChatError::EmptyResponse));
        }

        phases.advance(Phase::Done);
        info!(blocks = blocks.len(), chars = text.len(), "Answer ready");
        events.send(PipelineEvent::Finished(blocks.clone())).ok();
        Ok(blocks)
    }
}

fn fail(phases: &mut PhaseTracker<'_>, ticker: &mut LoadingTicker, err: ChatError) -> ChatError {
    ticker.stop();
    phases.advance(Phase::Aborted);
    let kind = err.failure_kind();
    warn!(stage = err.stage(), kind = ?kind, error = %err, "Chat turn failed");
    phases.events.send(PipelineEvent::Failed(kind)).ok();
    err
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        let path = [
            Phase::Idle,
            Phase::Sending,
            Phase::Retrying,
            Phase::Retrying,
            Phase::Streaming,
            Phase::Segmenting,
            Phase::Done,
        ];
        for pair in path.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]), "{} -> {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_terminal_phases_are_final() {
        for next in [Phase::Idle, Phase::Sending, Phase::Done, Phase::Aborted] {
            assert!(!Phase::Done.can_transition_to(next));
            assert!(!Phase::Aborted.can_transition_to(next));
        }
        assert!(Phase::Done.is_terminal());
        assert!(!Phase::Streaming.is_terminal());
    }

    #[test]
    fn test_cannot_skip_stages() {
        assert!(!Phase::Idle.can_transition_to(Phase::Streaming));
        assert!(!Phase::Sending.can_transition_to(Phase::Done));
        assert!(!Phase::Streaming.can_transition_to(Phase::Retrying));
        assert!(Phase::Sending.can_transition_to(Phase::Aborted));
    }
}
