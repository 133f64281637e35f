//! Transcript entries for the chat view.
//!
//! The transcript is owned by the caller. The pipeline never holds a
//! reference to it; it only emits events that the caller folds in.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::content::ContentBlock;
use crate::error::FailureKind;

/// Represents a participant role in a conversation.
///
/// # Examples
///
/// ```
/// use starchat::types::message::Role;
///
/// let role = Role::User;
/// assert_eq!(format!("{}", role), "user");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Person asking questions
    User,
    /// Answer service
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// Body of a transcript entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum MessageBody {
    /// Raw text, used for questions.
    Text(String),
    /// A segmented answer.
    Answer(Vec<ContentBlock>),
    /// The single terminal message left by a failed turn.
    Notice(FailureKind),
}

/// A transcript entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub body: MessageBody,
}

impl Message {
    /// Creates a user question entry.
    #[must_use]
    pub fn question(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            body: MessageBody::Text(text.into()),
        }
    }

    /// Creates an assistant answer entry.
    #[must_use]
    pub fn answer(blocks: Vec<ContentBlock>) -> Self {
        Self {
            role: Role::Assistant,
            body: MessageBody::Answer(blocks),
        }
    }

    /// Creates an assistant failure notice.
    #[must_use]
    pub fn notice(kind: FailureKind) -> Self {
        Self {
            role: Role::Assistant,
            body: MessageBody::Notice(kind),
        }
    }

    /// Returns the answer blocks, if this entry is an answer.
    #[must_use]
    pub fn blocks(&self) -> Option<&[ContentBlock]> {
        match &self.body {
            MessageBody::Answer(blocks) => Some(blocks),
            _ => None,
        }
    }
}
