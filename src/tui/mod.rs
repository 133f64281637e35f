//! Terminal rendering of answers.
//!
//! Blocks become ratatui [`Line`]s, which [`print_lines`] writes to any
//! [`io::Write`] with crossterm styling. The same lines can be flattened
//! to plain text when stdout is not a terminal.

pub mod theme;

use std::io;

use crossterm::queue;
use crossterm::style::{
    Attribute, Color as TermColor, Print, ResetColor, SetAttribute, SetBackgroundColor,
    SetForegroundColor,
};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::types::{ContentBlock, HeaderIcon, Message, MessageBody, StyledRun};
use theme::StarchatTheme;

const GUTTER: &str = "▍ ";
const FOLLOW_UP_LABEL: &str = "You could also ask";

/// Glyph shown before a header title.
#[must_use]
pub fn icon_glyph(icon: HeaderIcon) -> &'static str {
    match icon {
        HeaderIcon::LifeStage => "🌱",
        HeaderIcon::Analysis => "🔍",
        HeaderIcon::Career => "💼",
        HeaderIcon::Nakshatra => "✨",
        HeaderIcon::Classical => "📜",
        HeaderIcon::TimingGuidance => "🧭",
        HeaderIcon::Timing => "⏳",
        HeaderIcon::Guidance => "💡",
        HeaderIcon::FinalThoughts => "🌙",
        HeaderIcon::Relationship => "💞",
        HeaderIcon::Health => "🌿",
        HeaderIcon::Finance => "💰",
        HeaderIcon::Spirituality => "🕉",
        HeaderIcon::Remedy => "💎",
        HeaderIcon::Prediction => "🔮",
        HeaderIcon::Transit => "🪐",
        HeaderIcon::Default => "⭐",
    }
}

fn run_span(run: &StyledRun, base: Style) -> Span<'static> {
    let mut style = base;
    if run.bold {
        style = style.add_modifier(Modifier::BOLD);
    }
    if run.italic {
        style = style.add_modifier(Modifier::ITALIC);
    }
    Span::styled(run.text.clone(), style)
}

fn run_spans(runs: &[StyledRun], base: Style) -> impl Iterator<Item = Span<'static>> + '_ {
    runs.iter().map(move |run| run_span(run, base))
}

fn card_lines(label: &str, runs: &[StyledRun]) -> Vec<Line<'static>> {
    let body = std::iter::once(Span::styled(GUTTER, StarchatTheme::card_gutter()))
        .chain(run_spans(runs, StarchatTheme::assistant_message()))
        .collect::<Vec<_>>();
    vec![
        Line::from(vec![
            Span::styled(GUTTER, StarchatTheme::card_gutter()),
            Span::styled(label.to_string(), StarchatTheme::card_label()),
        ]),
        Line::from(body),
    ]
}

/// Renders answer blocks as styled lines.
///
/// Headers and cards are separated from what precedes them by a blank line.
#[must_use]
pub fn render_blocks(blocks: &[ContentBlock]) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for block in blocks {
        let spaced = matches!(
            block,
            ContentBlock::Header { .. }
                | ContentBlock::QuickAnswer { .. }
                | ContentBlock::FinalThoughts { .. }
                | ContentBlock::FollowUp { .. }
        );
        if spaced && !lines.is_empty() {
            lines.push(Line::default());
        }

        match block {
            ContentBlock::PlainText { runs } => {
                lines.push(Line::from(
                    run_spans(runs, StarchatTheme::assistant_message()).collect::<Vec<_>>(),
                ));
            }
            ContentBlock::Header { icon, title } => {
                lines.push(Line::from(vec![
                    Span::raw(format!("{} ", icon_glyph(*icon))),
                    Span::styled(title.clone(), StarchatTheme::header()),
                ]));
            }
            ContentBlock::ListItem { ordinal, runs } => {
                let mut spans = vec![Span::styled(format!("  {ordinal}. "), StarchatTheme::ordinal())];
                spans.extend(run_spans(runs, StarchatTheme::assistant_message()));
                lines.push(Line::from(spans));
            }
            ContentBlock::QuickAnswer { runs } => lines.extend(card_lines("Quick Answer", runs)),
            ContentBlock::FinalThoughts { runs } => {
                lines.extend(card_lines("Final Thoughts", runs));
            }
            ContentBlock::FollowUp { questions } => {
                lines.push(Line::from(Span::styled(
                    FOLLOW_UP_LABEL,
                    StarchatTheme::card_label(),
                )));
                for question in questions {
                    lines.push(Line::from(vec![
                        Span::styled("  › ", StarchatTheme::ordinal()),
                        Span::styled(question.clone(), StarchatTheme::follow_up()),
                    ]));
                }
            }
        }
    }

    lines
}

/// Renders one transcript entry.
#[must_use]
pub fn render_message(message: &Message) -> Vec<Line<'static>> {
    match &message.body {
        MessageBody::Text(text) => vec![Line::from(vec![
            Span::styled("› ", StarchatTheme::ordinal()),
            Span::styled(text.clone(), StarchatTheme::user_message()),
        ])],
        MessageBody::Answer(blocks) => render_blocks(blocks),
        MessageBody::Notice(kind) => vec![Line::from(Span::styled(
            kind.message(),
            StarchatTheme::error(),
        ))],
    }
}

/// Flattens lines to unstyled text, one line per `\n`.
#[must_use]
pub fn plain_text(lines: &[Line<'_>]) -> String {
    let mut out = String::new();
    for line in lines {
        for span in &line.spans {
            out.push_str(&span.content);
        }
        out.push('\n');
    }
    out
}

/// Maps a theme color to a crossterm color.
#[must_use]
pub fn term_color(color: Color) -> TermColor {
    match color {
        Color::Rgb(r, g, b) => TermColor::Rgb { r, g, b },
        Color::Indexed(i) => TermColor::AnsiValue(i),
        Color::Black => TermColor::Black,
        Color::Red => TermColor::DarkRed,
        Color::Green => TermColor::DarkGreen,
        Color::Yellow => TermColor::DarkYellow,
        Color::Blue => TermColor::DarkBlue,
        Color::Magenta => TermColor::DarkMagenta,
        Color::Cyan => TermColor::DarkCyan,
        Color::Gray => TermColor::Grey,
        Color::DarkGray => TermColor::DarkGrey,
        Color::White => TermColor::White,
        _ => TermColor::Reset,
    }
}

fn queue_span<W: io::Write>(out: &mut W, span: &Span<'_>) -> io::Result<()> {
    let style = span.style;
    if let Some(fg) = style.fg.map(term_color) {
        queue!(out, SetForegroundColor(fg))?;
    }
    if let Some(bg) = style.bg.map(term_color) {
        queue!(out, SetBackgroundColor(bg))?;
    }
    if style.add_modifier.contains(Modifier::BOLD) {
        queue!(out, SetAttribute(Attribute::Bold))?;
    }
    if style.add_modifier.contains(Modifier::ITALIC) {
        queue!(out, SetAttribute(Attribute::Italic))?;
    }
    queue!(
        out,
        Print(span.content.as_ref()),
        SetAttribute(Attribute::Reset),
        ResetColor
    )
}

/// Writes lines with terminal styling and flushes.
///
/// # Errors
///
/// Returns any I/O error from the writer.
pub fn print_lines<W: io::Write>(out: &mut W, lines: &[Line<'_>]) -> io::Result<()> {
    for line in lines {
        for span in &line.spans {
            queue_span(out, span)?;
        }
        queue!(out, Print("\n"))?;
    }
    out.flush()
}
