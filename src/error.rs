//! Centralized error types for Starchat.
//!
//! A single error type (`ChatError`) covers every request-level and
//! stream-level failure of a chat turn. Per-line decode problems never
//! reach this type: the chunk decoder recovers them locally.
//!
//! Callers map a `ChatError` onto one of three user-facing categories via
//! [`ChatError::failure_kind`].
//!
//! # Example
//!
//! ```
//! use starchat::error::{ChatError, FailureKind};
//!
//! let err = ChatError::transient_network("HTTP 503: upstream unavailable", 3);
//! assert!(err.is_retryable());
//! assert_eq!(err.failure_kind(), FailureKind::ServerBusy);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Result type alias using `ChatError`.
pub type ChatResult<T> = Result<T, ChatError>;

/// Centralized error type for a chat turn.
#[derive(Debug)]
pub enum ChatError {
    // ============== Transport Errors ==============
    /// A transient failure (502/503/504 or network class) that survived
    /// every retry attempt.
    TransientNetwork {
        /// Text of the last failed attempt.
        message: String,
        /// Number of attempts made.
        attempts: u32,
    },

    /// A non-2xx status outside the transient set. Never retried.
    UpstreamFatal {
        /// HTTP status code.
        status: u16,
        /// Excerpt of the response body.
        body: String,
    },

    /// A transport failure that did not classify as retryable.
    Network {
        /// Description of the failure.
        message: String,
    },

    // ============== Stream Errors ==============
    /// The server sent an explicit `error` event.
    StreamAborted {
        /// Error text carried by the event.
        message: String,
    },

    /// The stream finished without any usable content.
    EmptyResponse,

    // ============== Input Errors ==============
    /// The request could not be built from the given input.
    InvalidRequest {
        /// Description of the problem.
        message: String,
    },

    /// Configuration could not be loaded.
    Config {
        /// Description of the problem.
        message: String,
    },

    // ============== Wrapped Errors ==============
    /// Error from anyhow or other sources.
    Other {
        /// The wrapped error message.
        message: String,
        /// The original error, if available.
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// User-facing failure category shown in place of a failed answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The service is overloaded or a gateway failed.
    ServerBusy,
    /// The device could not reach the service.
    Connection,
    /// Anything else.
    Generic,
}

impl FailureKind {
    /// Returns the message shown to the user.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::ServerBusy => {
                "The astrology server is busy right now. Please try again in a moment."
            }
            Self::Connection => "Could not reach the server. Please check your connection.",
            Self::Generic => "Something went wrong while preparing your answer. Please try again.",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

// ============== Constructor Methods ==============

impl ChatError {
    /// Creates a transient network error after `attempts` tries.
    #[must_use]
    pub fn transient_network(message: impl Into<String>, attempts: u32) -> Self {
        Self::TransientNetwork {
            message: message.into(),
            attempts,
        }
    }

    /// Creates a fatal upstream status error.
    #[must_use]
    pub fn upstream_fatal(status: u16, body: impl Into<String>) -> Self {
        Self::UpstreamFatal {
            status,
            body: body.into(),
        }
    }

    /// Creates a non-retryable network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates a server-aborted stream error.
    #[must_use]
    pub fn stream_aborted(message: impl Into<String>) -> Self {
        Self::StreamAborted {
            message: message.into(),
        }
    }

    /// Creates an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

// ============== Category Methods ==============

impl ChatError {
    /// Returns `true` if this error belongs to the transient class.
    ///
    /// A `TransientNetwork` error has already exhausted its retries; the
    /// flag tells the caller that asking again later may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::TransientNetwork { .. } => true,
            Self::UpstreamFatal { status, .. } => matches!(status, 502..=504),
            _ => false,
        }
    }

    /// Maps the error onto the category shown to the user.
    #[must_use]
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Self::TransientNetwork { message, .. } => {
                if message.contains("Network") || message.contains("fetch") {
                    FailureKind::Connection
                } else {
                    FailureKind::ServerBusy
                }
            }
            Self::UpstreamFatal { status, .. } if (500..600).contains(status) => {
                FailureKind::ServerBusy
            }
            Self::Network { .. } => FailureKind::Connection,
            _ => FailureKind::Generic,
        }
    }

    /// Returns the stage of the pipeline where this error originated.
    #[must_use]
    pub fn stage(&self) -> &'static str {
        match self {
            Self::TransientNetwork { .. } | Self::UpstreamFatal { .. } | Self::Network { .. } => {
                "request"
            }
            Self::StreamAborted { .. } | Self::EmptyResponse => "stream",
            Self::InvalidRequest { .. } | Self::Config { .. } => "input",
            Self::Other { .. } => "unknown",
        }
    }
}

// ============== Display Implementation ==============

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TransientNetwork { message, attempts } => {
                write!(
                    f,
                    "request: transient failure after {} attempts: {}",
                    attempts, message
                )
            }
            Self::UpstreamFatal { status, body } => {
                write!(f, "request: server returned HTTP {}: {}", status, body)
            }
            Self::Network { message } => write!(f, "request: {}", message),
            Self::StreamAborted { message } => {
                write!(f, "stream: aborted by server: {}", message)
            }
            Self::EmptyResponse => write!(f, "stream: no content received"),
            Self::InvalidRequest { message } => write!(f, "input: invalid request: {}", message),
            Self::Config { message } => write!(f, "input: configuration error: {}", message),
            Self::Other { message, .. } => write!(f, "error: {}", message),
        }
    }
}

// ============== Error Implementation ==============

impl std::error::Error for ChatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Other {
                source: Some(src), ..
            } => Some(src.as_ref()),
            _ => None,
        }
    }
}

// ============== Conversion Implementations ==============

impl From<anyhow::Error> for ChatError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other {
            message: format!("{:#}", err),
            source: None,
        }
    }
}

impl From<crate::types::config::ConfigError> for ChatError {
    fn from(err: crate::types::config::ConfigError) -> Self {
        Self::config(err.to_string())
    }
}
