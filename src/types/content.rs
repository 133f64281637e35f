//! Content block types produced by segmenting a finished answer.
//!
//! A finished answer is a flat, ordered list of [`ContentBlock`]s. Text-bearing
//! blocks carry [`StyledRun`]s so the renderer never has to re-parse markup.
//!
//! # Example
//!
//! ```rust
//! use starchat::types::content::{ContentBlock, StyledRun};
//!
//! let block = ContentBlock::QuickAnswer {
//!     runs: vec![StyledRun::bold("Yes"), StyledRun::plain(", within a year.")],
//! };
//!
//! assert!(block.is_card());
//! assert_eq!(block.plain_text(), "Yes, within a year.");
//! ```

use serde::{Deserialize, Serialize};

/// A contiguous run of text sharing one style.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StyledRun {
    /// The run text.
    pub text: String,
    /// Whether the run is bold.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub bold: bool,
    /// Whether the run is italic.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub italic: bool,
}

impl StyledRun {
    /// Creates an unstyled run.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Creates a bold run.
    #[must_use]
    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
            italic: false,
        }
    }

    /// Creates an italic run.
    #[must_use]
    pub fn italic(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: true,
        }
    }
}

/// Icon token attached to a section header.
///
/// Chosen by keyword classification of the header title; the renderer maps
/// each token to a glyph.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum HeaderIcon {
    LifeStage,
    Analysis,
    Career,
    Nakshatra,
    Classical,
    TimingGuidance,
    Timing,
    Guidance,
    FinalThoughts,
    Relationship,
    Health,
    Finance,
    Spirituality,
    Remedy,
    Prediction,
    Transit,
    #[default]
    Default,
}

impl HeaderIcon {
    /// Returns the wire token for this icon.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LifeStage => "life-stage",
            Self::Analysis => "analysis",
            Self::Career => "career",
            Self::Nakshatra => "nakshatra",
            Self::Classical => "classical",
            Self::TimingGuidance => "timing-guidance",
            Self::Timing => "timing",
            Self::Guidance => "guidance",
            Self::FinalThoughts => "final-thoughts",
            Self::Relationship => "relationship",
            Self::Health => "health",
            Self::Finance => "finance",
            Self::Spirituality => "spirituality",
            Self::Remedy => "remedy",
            Self::Prediction => "prediction",
            Self::Transit => "transit",
            Self::Default => "default",
        }
    }
}

/// A renderable block of a finished answer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Ordinary prose line.
    PlainText {
        /// Styled runs of the line.
        runs: Vec<StyledRun>,
    },

    /// Section header.
    Header {
        /// Icon classified from the title.
        icon: HeaderIcon,
        /// Header title text.
        title: String,
    },

    /// Bulleted or numbered item; `ordinal` restarts after every header.
    ListItem {
        /// 1-based position within the current section.
        ordinal: u32,
        /// Styled runs of the item.
        runs: Vec<StyledRun>,
    },

    /// Highlighted direct answer.
    QuickAnswer {
        /// Styled runs of the card body.
        runs: Vec<StyledRun>,
    },

    /// Highlighted closing summary.
    FinalThoughts {
        /// Styled runs of the card body.
        runs: Vec<StyledRun>,
    },

    /// Suggested next questions.
    FollowUp {
        /// The questions, in display order.
        questions: Vec<String>,
    },
}

impl ContentBlock {
    /// Creates a plain text block.
    #[must_use]
    pub fn plain(runs: Vec<StyledRun>) -> Self {
        Self::PlainText { runs }
    }

    /// Creates a header block.
    #[must_use]
    pub fn header(icon: HeaderIcon, title: impl Into<String>) -> Self {
        Self::Header {
            icon,
            title: title.into(),
        }
    }

    /// Creates a list item block.
    #[must_use]
    pub fn list_item(ordinal: u32, runs: Vec<StyledRun>) -> Self {
        Self::ListItem { ordinal, runs }
    }

    /// Returns true for the highlighted card variants and follow-ups.
    #[must_use]
    pub fn is_card(&self) -> bool {
        matches!(
            self,
            Self::QuickAnswer { .. } | Self::FinalThoughts { .. } | Self::FollowUp { .. }
        )
    }

    /// Returns the styled runs of text-bearing blocks.
    #[must_use]
    pub fn runs(&self) -> Option<&[StyledRun]> {
        match self {
            Self::PlainText { runs }
            | Self::ListItem { runs, .. }
            | Self::QuickAnswer { runs }
            | Self::FinalThoughts { runs } => Some(runs),
            Self::Header { .. } | Self::FollowUp { .. } => None,
        }
    }

    /// Returns the block's text with all styling removed.
    #[must_use]
    pub fn plain_text(&self) -> String {
        match self {
            Self::Header { title, .. } => title.clone(),
            Self::FollowUp { questions } => questions.join("\n"),
            _ => self
                .runs()
                .map(|runs| runs.iter().map(|r| r.text.as_str()).collect())
                .unwrap_or_default(),
        }
    }
}
