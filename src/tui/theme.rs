//! Starchat color theme: night sky and gold leaf
//!
//! - Indigo surfaces
//! - Lavender for answer text
//! - Gold for headers and card labels
//!
//! # Usage
//!
//! ```rust,ignore
//! use starchat::tui::theme::StarchatTheme;
//! use ratatui::style::Style;
//!
//! let style = Style::default().fg(StarchatTheme::GOLD);
//! ```

use ratatui::style::{Color, Modifier, Style};

/// Starchat color constants and pre-built styles.
pub struct StarchatTheme;

impl StarchatTheme {
    // =========================================================================
    // Background Colors
    // =========================================================================

    /// Deep indigo: card gutters.
    /// Hex: `#1a1833`
    pub const BG_CARD: Color = Color::Rgb(26, 24, 51);

    // =========================================================================
    // Lavender for answer text
    // =========================================================================

    /// Bright lavender: emphasis.
    /// Hex: `#d8ccff`
    pub const LAVENDER_BRIGHT: Color = Color::Rgb(216, 204, 255);

    /// Standard lavender: body text.
    /// Hex: `#b8a9e6`
    pub const LAVENDER: Color = Color::Rgb(184, 169, 230);

    /// Muted lavender: list ordinals, hints.
    /// Hex: `#7d72a8`
    pub const LAVENDER_MUTED: Color = Color::Rgb(125, 114, 168);

    // =========================================================================
    // Gold for headers and labels
    // =========================================================================

    /// Bright gold: headers.
    /// Hex: `#f2c66d`
    pub const GOLD: Color = Color::Rgb(242, 198, 109);

    /// Muted gold: card gutters and labels.
    /// Hex: `#b8934a`
    pub const GOLD_MUTED: Color = Color::Rgb(184, 147, 74);

    // =========================================================================
    // Semantic Colors
    // =========================================================================

    /// Warning: soft amber, used for retry status.
    /// Hex: `#e6b464`
    pub const WARNING: Color = Color::Rgb(230, 180, 100);

    /// Error: muted rose.
    /// Hex: `#d0787f`
    pub const ERROR: Color = Color::Rgb(208, 120, 127);

    /// Muted text.
    /// Hex: `#6e6a80`
    pub const MUTED: Color = Color::Rgb(110, 106, 128);

    // =========================================================================
    // Role-based Colors
    // =========================================================================

    /// Question text color.
    pub const USER_TEXT: Color = Self::GOLD;

    /// Answer text color.
    pub const ASSISTANT_TEXT: Color = Self::LAVENDER;

    /// Follow-up chip color.
    pub const FOLLOW_UP: Color = Self::LAVENDER_BRIGHT;

    // =========================================================================
    // Pre-built Styles
    // =========================================================================

    /// Style for the user's question.
    #[must_use]
    pub fn user_message() -> Style {
        Style::default()
            .fg(Self::USER_TEXT)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for answer body text.
    #[must_use]
    pub fn assistant_message() -> Style {
        Style::default().fg(Self::ASSISTANT_TEXT)
    }

    /// Style for section headers.
    #[must_use]
    pub fn header() -> Style {
        Style::default().fg(Self::GOLD).add_modifier(Modifier::BOLD)
    }

    /// Style for list ordinals.
    #[must_use]
    pub fn ordinal() -> Style {
        Style::default().fg(Self::LAVENDER_MUTED)
    }

    /// Style for the card gutter bar.
    #[must_use]
    pub fn card_gutter() -> Style {
        Style::default().fg(Self::GOLD_MUTED).bg(Self::BG_CARD)
    }

    /// Style for card labels ("Quick Answer").
    #[must_use]
    pub fn card_label() -> Style {
        Style::default()
            .fg(Self::GOLD_MUTED)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for follow-up question chips.
    #[must_use]
    pub fn follow_up() -> Style {
        Style::default()
            .fg(Self::FOLLOW_UP)
            .add_modifier(Modifier::ITALIC)
    }

    /// Style for loading and retry status.
    #[must_use]
    pub fn status() -> Style {
        Style::default().fg(Self::MUTED)
    }

    #[must_use]
    pub fn warning() -> Style {
        Style::default().fg(Self::WARNING)
    }

    #[must_use]
    pub fn error() -> Style {
        Style::default().fg(Self::ERROR)
    }
}
