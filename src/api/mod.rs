//! Answer service client.
//!
//! The service answers a question with an SSE-like body of `data: {json}`
//! lines. [`AnswerClient`] fetches that body with retry and backoff, and
//! [`decoder::ChunkDecoder`] folds it into the answer text.

pub mod accumulator;
pub mod decoder;
pub mod retry;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::error::{ChatError, ChatResult};
use crate::types::config::{join_url, Config, DEFAULT_ENDPOINT_PATH};
use crate::types::AnswerRequest;

pub use accumulator::ContentAccumulator;
pub use decoder::{ChunkDecoder, Flow, Step};
pub use retry::{is_retryable_message, RetryNotice, RetryPolicy};

/// Header carrying the per-question request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const BODY_EXCERPT_CHARS: usize = 200;

/// Outcome of one failed attempt.
enum AttemptError {
    /// Classified by message: retried if it looks transient.
    Failed(String),
    /// Surfaced as-is.
    Fatal(ChatError),
}

/// HTTP client for the streaming answer endpoint.
#[derive(Clone)]
pub struct AnswerClient {
    client: reqwest::Client,
    endpoint_url: String,
    api_key: Option<SecretString>,
    retry: RetryPolicy,
}

impl std::fmt::Debug for AnswerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnswerClient")
            .field("endpoint_url", &self.endpoint_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("retry", &self.retry)
            .finish()
    }
}

impl AnswerClient {
    /// Builds a client from resolved configuration.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint_url: config.endpoint_url.clone(),
            api_key: config.api_key.clone(),
            retry: RetryPolicy::from(&config.retry),
        }
    }

    /// Builds a client for `base_url` with the default endpoint path and
    /// retry policy.
    #[must_use]
    pub fn new_with_base_url(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint_url: join_url(base_url, DEFAULT_ENDPOINT_PATH),
            api_key: None,
            retry: RetryPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn with_api_key(mut self, api_key: SecretString) -> Self {
        self.api_key = Some(api_key);
        self
    }

    #[must_use]
    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }

    #[must_use]
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Fetches the raw answer body, retrying transient failures.
    ///
    /// The request is serialized once; every attempt sends the same bytes
    /// and the same `x-request-id`. `on_retry` runs before each backoff
    /// sleep.
    ///
    /// # Errors
    ///
    /// - `UpstreamFatal` for a non-2xx status other than 502/503/504
    /// - `Network` for a failure that does not look transient
    /// - `TransientNetwork` once every attempt has failed transiently
    pub async fn fetch_body<F>(&self, request: &AnswerRequest, mut on_retry: F) -> ChatResult<String>
    where
        F: FnMut(&RetryNotice),
    {
        let payload = serde_json::to_vec(request)
            .map_err(|e| ChatError::invalid_request(format!("cannot encode request: {e}")))?;
        let request_id = Uuid::new_v4().to_string();
        let max_attempts = self.retry.max_attempts;

        let mut attempt = 1;
        loop {
            debug!(attempt, max_attempts, request_id = %request_id, bytes = payload.len(), "Sending answer request");

            let reason = match self.attempt(&payload, &request_id).await {
                Ok(body) => {
                    debug!(attempt, bytes = body.len(), "Answer body received");
                    return Ok(body);
                }
                Err(AttemptError::Fatal(err)) => {
                    error!(attempt, error = %err, "Answer request rejected");
                    return Err(err);
                }
                Err(AttemptError::Failed(reason)) => reason,
            };

            if !is_retryable_message(&reason) {
                error!(attempt, reason = %reason, "Answer request failed");
                return Err(ChatError::network(reason));
            }
            if !self.retry.has_attempts_left(attempt) {
                error!(attempts = attempt, reason = %reason, "Answer request failed after retries");
                return Err(ChatError::transient_network(reason, attempt));
            }

            let delay = self.retry.delay_for(attempt);
            warn!(
                attempt,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                reason = %reason,
                "Retrying answer request"
            );
            on_retry(&RetryNotice {
                attempt,
                max_attempts,
                delay,
                reason,
            });
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    async fn attempt(&self, payload: &[u8], request_id: &str) -> Result<String, AttemptError> {
        let mut builder = self
            .client
            .post(&self.endpoint_url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "text/event-stream")
            .header(REQUEST_ID_HEADER, request_id)
            .body(payload.to_vec());
        if let Some(key) = &self.api_key {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", key.expose_secret()));
        }

        let response = builder.send().await.map_err(network_failure)?;
        let status = response.status();
        let body = response.text().await.map_err(network_failure)?;

        if status.is_success() {
            return Ok(body);
        }
        let code = status.as_u16();
        if retry::is_transient_status(code) {
            return Err(AttemptError::Failed(format!("HTTP {code}: {}", excerpt(&body))));
        }
        Err(AttemptError::Fatal(ChatError::upstream_fatal(code, excerpt(&body))))
    }
}

fn network_failure(err: reqwest::Error) -> AttemptError {
    AttemptError::Failed(format!("Network error: {}", err.without_url()))
}

fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(BODY_EXCERPT_CHARS) {
        Some((idx, _)) => format!("{}…", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}
