//! Inline formatting: headers, list items and bold/italic runs.
//!
//! Input is a span of plain answer text (no card containers). Output is an
//! ordered list of [`ContentBlock::Header`], [`ContentBlock::ListItem`] and
//! [`ContentBlock::PlainText`] blocks.
//!
//! ```
//! use starchat::markup::inline::format_span;
//! use starchat::types::{ContentBlock, HeaderIcon, StyledRun};
//!
//! let blocks = format_span("### Career\n• First\n• Second");
//! assert_eq!(blocks[0], ContentBlock::header(HeaderIcon::Career, "Career"));
//! assert_eq!(blocks[2], ContentBlock::list_item(2, vec![StyledRun::plain("Second")]));
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

use super::entities::decode_entities;
use super::tags::{strip_tags, StripMode};
use crate::types::content::{ContentBlock, HeaderIcon, StyledRun};

/// Header tag, `##`/`###` line, or paragraph break.
static SPLIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?mi)<h[1-6](?:\s[^>]*)?>(?P<tag>.*?)</h[1-6]\s*>|^[ \t]*#{2,3}[ \t]*(?P<md>[^#\n][^\n]*)$|\n{2,}",
    )
    .expect("header split regex")
});

static LIST_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:•|-\s|\d+\.)\s*").expect("list marker regex"));

static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(?s:.+?)\*\*").expect("bold regex"));

static ITALIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*[^*]+?\*").expect("italic regex"));

/// Keyword rule for header icons. `also`, when non-empty, must match too.
struct IconRule {
    icon: HeaderIcon,
    any: &'static [&'static str],
    also: &'static [&'static str],
}

impl IconRule {
    fn matches(&self, lower: &str) -> bool {
        self.any.iter().any(|k| lower.contains(k))
            && (self.also.is_empty() || self.also.iter().any(|k| lower.contains(k)))
    }
}

/// Ordered; first match wins.
const ICON_RULES: &[IconRule] = &[
    IconRule {
        icon: HeaderIcon::LifeStage,
        any: &["life stage", "life-stage", "current phase", "context", "background"],
        also: &[],
    },
    IconRule {
        icon: HeaderIcon::Analysis,
        any: &["analysis", "analyse", "analyze", "insight"],
        also: &[],
    },
    IconRule {
        icon: HeaderIcon::Career,
        any: &["career", "profession", "job", "business"],
        also: &[],
    },
    IconRule {
        icon: HeaderIcon::Nakshatra,
        any: &["nakshatra", "star"],
        also: &[],
    },
    IconRule {
        icon: HeaderIcon::Classical,
        any: &["classical", "shastra", "parashara", "scripture", "ancient text"],
        also: &[],
    },
    IconRule {
        icon: HeaderIcon::TimingGuidance,
        any: &["timing", "when"],
        also: &["guidance", "advice"],
    },
    IconRule {
        icon: HeaderIcon::Timing,
        any: &["timing", "when", "period", "dasha"],
        also: &[],
    },
    IconRule {
        icon: HeaderIcon::Guidance,
        any: &["guidance", "advice", "recommendation"],
        also: &[],
    },
    IconRule {
        icon: HeaderIcon::FinalThoughts,
        any: &["final thoughts", "conclusion", "summary"],
        also: &[],
    },
    IconRule {
        icon: HeaderIcon::Relationship,
        any: &["relationship", "marriage", "love", "partner"],
        also: &[],
    },
    IconRule {
        icon: HeaderIcon::Health,
        any: &["health", "wellness", "wellbeing"],
        also: &[],
    },
    IconRule {
        icon: HeaderIcon::Finance,
        any: &["finance", "financial", "money", "wealth"],
        also: &[],
    },
    IconRule {
        icon: HeaderIcon::Spirituality,
        any: &["spiritual", "dharma", "karma"],
        also: &[],
    },
    IconRule {
        icon: HeaderIcon::Remedy,
        any: &["remed", "upaya", "mantra"],
        also: &[],
    },
    IconRule {
        icon: HeaderIcon::Prediction,
        any: &["prediction", "forecast", "outlook"],
        also: &[],
    },
    IconRule {
        icon: HeaderIcon::Transit,
        any: &["transit", "gochar"],
        also: &[],
    },
];

/// Picks the icon for a header title.
#[must_use]
pub fn classify_header(title: &str) -> HeaderIcon {
    let lower = title.to_lowercase();
    ICON_RULES
        .iter()
        .find(|rule| rule.matches(&lower))
        .map_or(HeaderIcon::Default, |rule| rule.icon)
}

/// Splits text into bold, italic and plain runs. Empty runs are dropped.
#[must_use]
pub fn parse_emphasis(text: &str) -> Vec<StyledRun> {
    let mut runs = Vec::new();
    let mut cursor = 0;
    for m in BOLD.find_iter(text) {
        push_italics(&mut runs, &text[cursor..m.start()]);
        push_run(&mut runs, StyledRun::bold(&text[m.start() + 2..m.end() - 2]));
        cursor = m.end();
    }
    push_italics(&mut runs, &text[cursor..]);
    runs
}

fn push_italics(runs: &mut Vec<StyledRun>, text: &str) {
    let mut cursor = 0;
    for m in ITALIC.find_iter(text) {
        push_run(runs, StyledRun::plain(&text[cursor..m.start()]));
        push_run(runs, StyledRun::italic(&text[m.start() + 1..m.end() - 1]));
        cursor = m.end();
    }
    push_run(runs, StyledRun::plain(&text[cursor..]));
}

fn push_run(runs: &mut Vec<StyledRun>, run: StyledRun) {
    if !run.text.is_empty() {
        runs.push(run);
    }
}

/// Formats a span of answer text into blocks.
#[must_use]
pub fn format_span(text: &str) -> Vec<ContentBlock> {
    let mut formatter = InlineFormatter::new();
    formatter.push_span(text);
    formatter.finish()
}

/// Accumulates blocks for one span; owns the section-scoped list ordinal.
#[derive(Debug, Default)]
pub struct InlineFormatter {
    blocks: Vec<ContentBlock>,
    ordinal: u32,
}

impl InlineFormatter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Formats `text` and appends the resulting blocks.
    pub fn push_span(&mut self, text: &str) {
        let mut cursor = 0;
        for caps in SPLIT.captures_iter(text) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            self.push_lines(&text[cursor..whole.start()]);
            if let Some(title) = caps.name("tag").or_else(|| caps.name("md")) {
                self.push_header(title.as_str());
            }
            cursor = whole.end();
        }
        self.push_lines(&text[cursor..]);
    }

    fn push_header(&mut self, raw: &str) {
        let stripped = strip_tags(raw, StripMode::Remove);
        let decoded = decode_entities(&stripped);
        let title = decoded.trim().trim_matches('*').trim();
        if title.is_empty() {
            return;
        }
        self.blocks
            .push(ContentBlock::header(classify_header(title), title));
        self.ordinal = 0;
    }

    fn push_lines(&mut self, part: &str) {
        for line in part.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(marker) = LIST_MARKER.find(line) {
                let item = &line[marker.end()..];
                let runs = styled_runs(item);
                if runs.is_empty() {
                    continue;
                }
                self.ordinal += 1;
                self.blocks.push(ContentBlock::list_item(self.ordinal, runs));
            } else {
                let runs = styled_runs(line);
                if !runs.is_empty() {
                    self.blocks.push(ContentBlock::plain(runs));
                }
            }
        }
    }

    /// Returns the accumulated blocks.
    #[must_use]
    pub fn finish(self) -> Vec<ContentBlock> {
        self.blocks
    }
}

/// Entity decode, tag strip, then emphasis parsing.
fn styled_runs(text: &str) -> Vec<StyledRun> {
    let decoded = decode_entities(text);
    let stripped = strip_tags(&decoded, StripMode::Remove);
    parse_emphasis(stripped.trim())
}
