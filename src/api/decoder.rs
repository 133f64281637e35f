//! Decoder for the SSE-like answer stream.
//!
//! The body is walked line by line. Each `data: ` payload goes through a
//! three-tier decode so that one bad line never aborts the stream:
//!
//! 1. parse as JSON (one or more concatenated objects)
//! 2. decode HTML entities, then parse again
//! 3. salvage a `"content": "..."` value with a regex
//!
//! A line that survives none of the tiers is dropped.
//!
//! # Example
//!
//! ```
//! use starchat::api::decoder::ChunkDecoder;
//!
//! let body = "data: {\"status\":\"chunk\",\"response\":\"Hello \"}\n\n\
//!             data: {\"status\":\"chunk\",\"response\":\"World\"}\n\n\
//!             data: [DONE]\n";
//! let text = ChunkDecoder::decode_body(body, |_| {}).unwrap();
//! assert_eq!(text, "Hello World");
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, trace};

use super::accumulator::ContentAccumulator;
use crate::error::{ChatError, ChatResult};
use crate::markup::entities::{decode_entities, has_entity_markers};
use crate::types::stream::{RawEvent, WireRecord};

/// Prefix of every content line.
pub const DATA_PREFIX: &str = "data: ";

/// Payload that ends the stream.
pub const DONE_SENTINEL: &str = "[DONE]";

const DEFAULT_SERVER_ERROR: &str = "The answer service reported an error";

static CONTENT_SALVAGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)"content"\s*:\s*"((?:[^"\\]|\\.)*)""#).expect("content salvage regex")
});

/// Whether the decoder wants more lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// Result of feeding one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub flow: Flow,
    /// The accumulated text changed.
    pub updated: bool,
}

impl Step {
    const SKIP: Step = Step {
        flow: Flow::Continue,
        updated: false,
    };
    const STOP: Step = Step {
        flow: Flow::Stop,
        updated: false,
    };
}

/// Folds stream lines into a [`ContentAccumulator`].
#[derive(Debug, Default)]
pub struct ChunkDecoder {
    acc: ContentAccumulator,
    stopped: bool,
    events: usize,
    dropped: usize,
}

impl ChunkDecoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current accumulated content.
    #[must_use]
    pub fn accumulator(&self) -> &ContentAccumulator {
        &self.acc
    }

    /// Number of lines dropped as undecodable.
    #[must_use]
    pub fn dropped_lines(&self) -> usize {
        self.dropped
    }

    /// Feeds one line of the body.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::StreamAborted` on an `error` event.
    pub fn feed_line(&mut self, line: &str) -> ChatResult<Step> {
        if self.stopped {
            return Ok(Step::STOP);
        }

        let Some(payload) = line.trim().strip_prefix(DATA_PREFIX) else {
            return Ok(Step::SKIP);
        };
        let payload = payload.trim();
        if payload == DONE_SENTINEL {
            self.stopped = true;
            return Ok(Step::STOP);
        }
        if payload.is_empty() {
            return Ok(Step::SKIP);
        }

        let Some(events) = decode_payload(payload) else {
            self.dropped += 1;
            debug!(bytes = payload.len(), "Dropping undecodable stream line");
            return Ok(Step::SKIP);
        };

        let mut updated = false;
        for event in events {
            let step = self.apply(event)?;
            updated |= step.updated;
            if step.flow == Flow::Stop {
                self.stopped = true;
                return Ok(Step {
                    flow: Flow::Stop,
                    updated,
                });
            }
        }
        Ok(Step {
            flow: Flow::Continue,
            updated,
        })
    }

    fn apply(&mut self, event: RawEvent) -> ChatResult<Step> {
        self.events += 1;
        trace!(kind = event.label(), terminal = event.is_terminal(), "Stream event");
        match event {
            RawEvent::Chunk {
                response: Some(fragment),
                chunk_index,
                total_chunks,
            } => {
                trace!(?chunk_index, ?total_chunks, "Chunk received");
                self.acc.append(&decode_entities(&fragment));
                Ok(Step {
                    flow: Flow::Continue,
                    updated: true,
                })
            }
            RawEvent::Chunk { response: None, .. } | RawEvent::Ignored => Ok(Step::SKIP),
            RawEvent::Complete {
                response: Some(full),
            } => {
                self.acc.replace(decode_entities(&full).into_owned());
                Ok(Step {
                    flow: Flow::Stop,
                    updated: true,
                })
            }
            RawEvent::Complete { response: None } => {
                debug!(
                    chars = self.acc.text().len(),
                    "Complete without response, keeping accumulated text"
                );
                Ok(Step::STOP)
            }
            RawEvent::Error { error } => {
                let message = error
                    .filter(|e| !e.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_SERVER_ERROR.to_string());
                Err(ChatError::stream_aborted(message))
            }
            RawEvent::Content(fragment) => {
                self.acc.append(&decode_entities(&fragment));
                Ok(Step {
                    flow: Flow::Continue,
                    updated: true,
                })
            }
        }
    }

    /// Finalizes the stream.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::EmptyResponse` if no usable content arrived.
    pub fn finish(self) -> ChatResult<String> {
        debug!(
            events = self.events,
            dropped = self.dropped,
            chars = self.acc.text().len(),
            "Stream decoded"
        );
        if self.acc.is_empty_answer() {
            return Err(ChatError::EmptyResponse);
        }
        Ok(self.acc.into_text())
    }

    /// Decodes a whole body, calling `on_update` after every change.
    ///
    /// # Errors
    ///
    /// Returns `StreamAborted` on an `error` event, or `EmptyResponse` if
    /// nothing usable arrived.
    pub fn decode_body<F>(body: &str, mut on_update: F) -> ChatResult<String>
    where
        F: FnMut(&ContentAccumulator),
    {
        let mut decoder = Self::new();
        for line in body.lines() {
            let step = decoder.feed_line(line)?;
            if step.updated {
                on_update(decoder.accumulator());
            }
            if step.flow == Flow::Stop {
                break;
            }
        }
        decoder.finish()
    }
}

/// Runs the three decode tiers over one payload.
fn decode_payload(payload: &str) -> Option<Vec<RawEvent>> {
    if let Some(events) = parse_records(payload) {
        return Some(events);
    }

    let decoded = decode_entities(payload);
    if has_entity_markers(payload) {
        if let Some(events) = parse_records(&decoded) {
            trace!("Recovered line after entity decode");
            return Some(events);
        }
    }

    let caps = CONTENT_SALVAGE.captures(&decoded)?;
    trace!("Salvaged content field from malformed line");
    Some(vec![RawEvent::Content(unescape_json_string(&caps[1]))])
}

/// Parses one or more concatenated JSON objects. All must parse.
fn parse_records(payload: &str) -> Option<Vec<RawEvent>> {
    let mut events = Vec::new();
    for record in serde_json::Deserializer::from_str(payload).into_iter::<WireRecord>() {
        events.push(RawEvent::from(record.ok()?));
    }
    (!events.is_empty()).then_some(events)
}

/// Undoes JSON string escapes in a salvaged fragment. Unknown escapes are kept.
fn unescape_json_string(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('/') => out.push('/'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(ch) => out.push(ch),
                    None => {
                        out.push_str("\\u");
                        out.push_str(&hex);
                    }
                }
            }
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
