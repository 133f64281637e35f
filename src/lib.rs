//! Starchat - terminal client for a streaming astrology answer service
//!
//! A question plus a birth profile goes to the service. The SSE-like answer
//! stream is decoded, segmented into typed content blocks and rendered.
//!
//! This library exposes the pipeline for testing and embedding:
//!
//! - [`api`]: HTTP client with retry, stream decoder
//! - [`markup`]: answer text to [`ContentBlock`]s
//! - [`app`]: turn driver, loading ticker, transcript state
//! - [`tui`]: block rendering for the terminal

pub mod api;
pub mod app;
pub mod error;
pub mod markup;
pub mod tui;
pub mod types;

// Re-export core types for convenient access
pub use error::{ChatError, ChatResult, FailureKind};
pub use types::{AnswerRequest, BirthProfile, Config, ContentBlock, Language, Message, Role};
