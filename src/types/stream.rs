//! Wire-level event types for the answer stream.
//!
//! The answer service frames its body as newline-delimited `data: ` records,
//! mimicking Server-Sent Events without a persistent connection:
//!
//! ```text
//! data: {"status":"chunk","response":"Hello ","chunk_index":0,"total_chunks":2}
//!
//! data: {"status":"chunk","response":"World","chunk_index":1,"total_chunks":2}
//!
//! data: {"status":"complete"}
//!
//! data: [DONE]
//! ```
//!
//! Each record is loosely typed: fields are optional and `status` may be
//! missing or unknown. [`WireRecord`] captures that shape verbatim, and
//! [`RawEvent::from`] validates it into a discriminated union so that the
//! decoder matches exhaustively instead of probing optional fields.

use serde::{Deserialize, Serialize};

/// A record exactly as it appears on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WireRecord {
    /// `"chunk"`, `"complete"` or `"error"`; anything else is tolerated.
    #[serde(default)]
    pub status: Option<String>,
    /// Text fragment (chunk) or full answer (complete).
    #[serde(default)]
    pub response: Option<String>,
    /// Alternate incremental text field.
    #[serde(default)]
    pub content: Option<String>,
    /// Position of this chunk, chunk records only.
    #[serde(default)]
    pub chunk_index: Option<u64>,
    /// Announced number of chunks, chunk records only.
    #[serde(default)]
    pub total_chunks: Option<u64>,
    /// Error text, error records only.
    #[serde(default)]
    pub error: Option<String>,
}

/// A validated stream event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawEvent {
    /// Incremental fragment to append.
    Chunk {
        /// The fragment text, if any was sent.
        response: Option<String>,
        /// Position of this chunk.
        chunk_index: Option<u64>,
        /// Announced number of chunks.
        total_chunks: Option<u64>,
    },

    /// Terminal event; a present `response` replaces everything accumulated.
    Complete {
        /// Full final answer, if sent. Empty strings are normalized to `None`.
        response: Option<String>,
    },

    /// Server-side failure; the stream must be abandoned.
    Error {
        /// Error text, if sent.
        error: Option<String>,
    },

    /// Record without a known status that still carries `content`.
    Content(String),

    /// Record with nothing usable.
    Ignored,
}

impl From<WireRecord> for RawEvent {
    fn from(record: WireRecord) -> Self {
        match record.status.as_deref() {
            Some("chunk") => RawEvent::Chunk {
                response: record.response.or(record.content),
                chunk_index: record.chunk_index,
                total_chunks: record.total_chunks,
            },
            Some("complete") => RawEvent::Complete {
                response: record.response.filter(|r| !r.is_empty()),
            },
            Some("error") => RawEvent::Error {
                error: record.error,
            },
            _ => match record.content {
                Some(content) => RawEvent::Content(content),
                None => RawEvent::Ignored,
            },
        }
    }
}

impl RawEvent {
    /// Returns true if this event ends the stream.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, RawEvent::Complete { .. } | RawEvent::Error { .. })
    }

    /// Returns the status label used in logs.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            RawEvent::Chunk { .. } => "chunk",
            RawEvent::Complete { .. } => "complete",
            RawEvent::Error { .. } => "error",
            RawEvent::Content(_) => "content",
            RawEvent::Ignored => "ignored",
        }
    }
}
