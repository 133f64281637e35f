//! Core type definitions for Starchat.
//!
//! This module contains the fundamental data types used throughout the application,
//! organized into submodules by domain:
//!
//! - [`config`] - File settings and runtime configuration
//! - [`content`] - Rendered content blocks and styled runs
//! - [`message`] - Transcript entries
//! - [`request`] - Request body sent to the answer service
//! - [`stream`] - Wire-level stream events
//!
//! # Re-exports
//!
//! Common types are re-exported at the module level for convenience:
//!
//! ```
//! use starchat::types::{AnswerRequest, ContentBlock, RawEvent, StyledRun};
//! ```

pub mod config;
pub mod content;
pub mod message;
pub mod request;
pub mod stream;

// Re-export common types for convenience
pub use config::{Config, Settings};
pub use content::{ContentBlock, HeaderIcon, StyledRun};
pub use message::{Message, MessageBody, Role};
pub use request::{AnswerRequest, BirthProfile, Language, ResponseStyle};
pub use stream::{RawEvent, WireRecord};
