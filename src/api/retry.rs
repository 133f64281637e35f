//! Retry policy for transient answer-service failures.
//!
//! Classification is by substring on the failure text, matching the
//! service's historical behaviour: a failure is retryable if its message
//! mentions `502`, `503`, `504`, `upstream`, `Network` or `fetch`. This is
//! weaker than checking structured status codes, so the client only feeds
//! it messages it composed itself (`HTTP <code>: ...` and
//! `Network error: ...`).

use std::time::Duration;

use crate::types::config::RetrySettings;

/// Statuses treated as failures even though the transport succeeded.
pub const TRANSIENT_STATUSES: [u16; 3] = [502, 503, 504];

/// Substrings that mark a failure message as retryable.
pub const RETRYABLE_MARKERS: &[&str] = &["502", "503", "504", "upstream", "Network", "fetch"];

/// Returns true for 502, 503 and 504.
#[must_use]
pub fn is_transient_status(status: u16) -> bool {
    TRANSIENT_STATUSES.contains(&status)
}

/// Returns true if `message` contains any retryable marker.
#[must_use]
pub fn is_retryable_message(message: &str) -> bool {
    RETRYABLE_MARKERS.iter().any(|m| message.contains(m))
}

/// Attempt ceiling and exponential backoff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Delay after the first failure.
    pub base_delay: Duration,
    /// Upper bound for any single delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetrySettings::default())
    }
}

impl From<&RetrySettings> for RetryPolicy {
    fn from(settings: &RetrySettings) -> Self {
        Self {
            max_attempts: settings.max_attempts.max(1),
            base_delay: Duration::from_millis(settings.base_delay_ms),
            max_delay: Duration::from_millis(settings.max_delay_ms),
        }
    }
}

impl RetryPolicy {
    /// Delay after failed attempt `attempt` (1-based): `min(base * 2^(attempt-1), max)`.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// Returns true if another attempt is allowed after `attempt` failed.
    #[must_use]
    pub fn has_attempts_left(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}

/// Published before each retry so the caller can update its status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryNotice {
    /// The attempt that just failed (1-based).
    pub attempt: u32,
    /// Attempt ceiling.
    pub max_attempts: u32,
    /// Wait before the next attempt.
    pub delay: Duration,
    /// Failure text of the attempt.
    pub reason: String,
}

impl RetryNotice {
    /// Status line shown while waiting.
    #[must_use]
    pub fn status_message(&self) -> String {
        format!(
            "Server is busy, retrying in {}… (attempt {}/{})",
            humantime::format_duration(self.delay),
            self.attempt + 1,
            self.max_attempts
        )
    }
}
