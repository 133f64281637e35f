//! Rotating loading status while a request is outstanding.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::debug;

use super::driver::PipelineEvent;
use crate::types::config::LoadingSettings;

const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Background task publishing `PipelineEvent::Status` messages.
///
/// The first message is published immediately, then one per interval,
/// cycling through the configured list. The task is aborted by
/// [`stop`](Self::stop) or on drop, whichever comes first.
#[derive(Debug)]
pub struct LoadingTicker {
    events: UnboundedSender<PipelineEvent>,
    handle: Option<JoinHandle<()>>,
}

impl LoadingTicker {
    /// Spawns the ticker task. Must be called inside a Tokio runtime.
    #[must_use]
    pub fn start(events: UnboundedSender<PipelineEvent>, settings: &LoadingSettings) -> Self {
        if settings.messages.is_empty() {
            return Self {
                events,
                handle: None,
            };
        }

        let messages = settings.messages.clone();
        let period = settings.interval().max(MIN_INTERVAL);
        let tx = events.clone();
        let handle = tokio::spawn(async move {
            let mut ticks = interval(period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            for message in messages.iter().cycle() {
                ticks.tick().await;
                if tx.send(PipelineEvent::Status(message.clone())).is_err() {
                    break;
                }
            }
        });
        debug!(interval_ms = u64::try_from(period.as_millis()).unwrap_or(u64::MAX), "Loading ticker started");

        Self {
            events,
            handle: Some(handle),
        }
    }

    /// Returns true until the ticker has been stopped.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Publishes `message` as the current status, out of rotation.
    ///
    /// Ignored once the ticker has stopped.
    pub fn announce(&self, message: impl Into<String>) {
        if self.is_running() {
            self.events.send(PipelineEvent::Status(message.into())).ok();
        }
    }

    /// Aborts the task. Returns true only for the call that stopped it.
    pub fn stop(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) => {
                handle.abort();
                debug!("Loading ticker stopped");
                true
            }
            None => false,
        }
    }
}

impl Drop for LoadingTicker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn settings(messages: &[&str], interval_ms: u64) -> LoadingSettings {
        LoadingSettings {
            interval_ms,
            messages: messages.iter().map(|m| (*m).to_string()).collect(),
        }
    }

    fn status(text: &str) -> PipelineEvent {
        PipelineEvent::Status(text.to_string())
    }

    #[tokio::test(start_paused = true)]
    async fn test_rotates_from_first_message() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _ticker = LoadingTicker::start(tx, &settings(&["a", "b"], 3000));

        assert_eq!(rx.recv().await, Some(status("a")));
        assert_eq!(rx.recv().await, Some(status("b")));
        assert_eq!(rx.recv().await, Some(status("a")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_message_is_immediate() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let start = tokio::time::Instant::now();
        let _ticker = LoadingTicker::start(tx, &settings(&["a", "b"], 3000));

        rx.recv().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
        rx.recv().await;
        assert_eq!(start.elapsed(), Duration::from_millis(3000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_is_idempotent_and_silences() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut ticker = LoadingTicker::start(tx, &settings(&["a"], 100));
        assert_eq!(rx.recv().await, Some(status("a")));

        assert!(ticker.stop());
        assert!(!ticker.stop());
        assert!(!ticker.is_running());

        ticker.announce("ignored");
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_closes_channel() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let ticker = LoadingTicker::start(tx, &settings(&["a"], 100));
        assert_eq!(rx.recv().await, Some(status("a")));

        drop(ticker);
        while let Some(event) = rx.recv().await {
            assert_eq!(event, status("a"));
        }
    }

    #[tokio::test]
    async fn test_announce_while_running() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let ticker = LoadingTicker::start(tx, &settings(&["a"], 60_000));
        assert_eq!(rx.recv().await, Some(status("a")));

        ticker.announce("busy");
        assert_eq!(rx.recv().await, Some(status("busy")));
    }

    #[tokio::test]
    async fn test_no_messages_never_spawns() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut ticker = LoadingTicker::start(tx, &settings(&[], 100));
        assert!(!ticker.is_running());
        assert!(!ticker.stop());
        drop(ticker);
        assert_eq!(rx.recv().await, None);
    }
}
