//! Section segmentation: pulls highlighted regions out of a finished answer.
//!
//! Three region families are recognized:
//!
//! | Family | Marker |
//! |--------|--------|
//! | follow-up | element with class `follow-up-questions` |
//! | final-thoughts | `## Final Thoughts` line or `<h3>Final Thoughts</h3>` tag, up to the next heading |
//! | quick-answer | element with class `quick-answer-card` |
//! | final-thoughts | element with class `final-thoughts-card` |
//!
//! Everything between regions goes through [`format_span`].

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

use super::entities::decode_entities;
use super::inline::{format_span, parse_emphasis};
use super::tags::{strip_tags, tags, StripMode, Tag};
use crate::types::content::{ContentBlock, StyledRun};

/// A closed `<hN>…</hN>` heading ends at its closing tag; an unclosed one
/// or a markdown heading takes the rest of its line.
static FINAL_THOUGHTS_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?mi)<h[1-6](?:\s[^>]*)?>(?:[^<\n]|<[^/\n]|</[^hH\n])*?final thoughts",
        r"(?:[^<\n]|<[^/\n]|</[^hH\n])*?</h[1-6]\s*>",
        r"|^[ \t]*(?:#{1,3}[ \t]*|<h[1-6][^>]*>)[^\n]*final thoughts[^\n]*$",
    ))
    .expect("final thoughts heading regex")
});

static ANY_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?mi)^[ \t]*#{1,6}[ \t]|<h[1-6][\s>]").expect("heading regex")
});

static QUICK_ANSWER_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\*{0,2}[ \t]*quick answer[ \t]*:?[ \t]*\*{0,2}").expect("quick answer label")
});

static FINAL_THOUGHTS_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\*{0,2}[ \t]*final thoughts[ \t]*:?[ \t]*\*{0,2}")
        .expect("final thoughts label")
});

const FOLLOW_UP_CLASS: &str = "follow-up-questions";
const QUICK_ANSWER_CLASS: &str = "quick-answer-card";
const FINAL_THOUGHTS_CLASS: &str = "final-thoughts-card";

/// Emoji that introduce individual follow-up questions.
const FOLLOW_UP_EMOJI: &[&str] = &["🔮", "✨", "🌟", "💫", "⭐", "🌙", "🪐", "❓", "👉", "💡"];

/// Phrases that begin a new question when several run together on one line.
const QUESTION_STARTERS: &[&str] = &["When will", "What remedies", "How to", "What should"];

const MIN_QUESTION_CHARS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RegionKind {
    FollowUp,
    QuickAnswer,
    FinalThoughts,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Region {
    kind: RegionKind,
    /// Whole region, markers included.
    span: Range<usize>,
    /// Inner text handed to the body parser.
    body: Range<usize>,
}

/// Segments a finished answer into content blocks.
#[must_use]
pub fn segment(text: &str) -> Vec<ContentBlock> {
    let normalized;
    let text = if text.contains("\r\n") {
        normalized = text.replace("\r\n", "\n");
        normalized.as_str()
    } else {
        text
    };

    let regions = find_regions(text);
    if regions.is_empty() {
        return format_span(text);
    }

    let mut blocks = Vec::new();
    let mut cursor = 0;
    for region in regions {
        if region.span.start < cursor {
            tracing::debug!(start = region.span.start, "Skipping overlapping region");
            continue;
        }
        blocks.extend(format_span(&text[cursor..region.span.start]));

        let body = &text[region.body.clone()];
        match region.kind {
            RegionKind::QuickAnswer => {
                let runs = card_runs(body, &QUICK_ANSWER_LABEL);
                if !runs.is_empty() {
                    blocks.push(ContentBlock::QuickAnswer { runs });
                }
            }
            RegionKind::FinalThoughts => {
                let runs = card_runs(body, &FINAL_THOUGHTS_LABEL);
                if !runs.is_empty() {
                    blocks.push(ContentBlock::FinalThoughts { runs });
                }
            }
            RegionKind::FollowUp => {
                let questions = follow_up_questions(body);
                if !questions.is_empty() {
                    blocks.push(ContentBlock::FollowUp { questions });
                }
            }
        }
        cursor = region.span.end;
    }
    blocks.extend(format_span(&text[cursor..]));
    blocks
}

/// Collects every region, sorted by start. Ties keep discovery order:
/// follow-up, final-thoughts heading, quick-answer card, final-thoughts card.
fn find_regions(text: &str) -> Vec<Region> {
    let mut follow_ups = Vec::new();
    let mut quick_answers = Vec::new();
    let mut final_cards = Vec::new();

    let all_tags: Vec<Tag<'_>> = tags(text).collect();
    for (index, tag) in all_tags.iter().enumerate() {
        if tag.closing || tag.self_closing {
            continue;
        }
        let bucket = if tag.has_class(FOLLOW_UP_CLASS) {
            (&mut follow_ups, RegionKind::FollowUp)
        } else if tag.has_class(QUICK_ANSWER_CLASS) {
            (&mut quick_answers, RegionKind::QuickAnswer)
        } else if tag.has_class(FINAL_THOUGHTS_CLASS) {
            (&mut final_cards, RegionKind::FinalThoughts)
        } else {
            continue;
        };
        let (list, kind) = bucket;
        list.push(container_region(text, &all_tags, index, kind));
    }

    let container_starts: Vec<usize> = follow_ups
        .iter()
        .chain(&quick_answers)
        .chain(&final_cards)
        .map(|r| r.span.start)
        .collect();
    let inside_container = |pos: usize| {
        follow_ups
            .iter()
            .chain(&quick_answers)
            .chain(&final_cards)
            .any(|r| r.span.contains(&pos))
    };

    let mut headings = Vec::new();
    for heading in FINAL_THOUGHTS_HEADING.find_iter(text) {
        if inside_container(heading.start()) {
            continue;
        }
        let after = heading.end();
        let next_heading = ANY_HEADING
            .find_at(text, after)
            .map_or(text.len(), |m| m.start());
        let next_container = container_starts
            .iter()
            .copied()
            .filter(|&start| start >= after)
            .min()
            .unwrap_or(text.len());
        let end = next_heading.min(next_container);
        headings.push(Region {
            kind: RegionKind::FinalThoughts,
            span: heading.start()..end,
            body: after..end,
        });
    }

    let mut regions: Vec<Region> = follow_ups
        .into_iter()
        .chain(headings)
        .chain(quick_answers)
        .chain(final_cards)
        .collect();
    regions.sort_by_key(|r| r.span.start);
    regions
}

/// Finds the balanced close of the container opened at `all_tags[open]`.
/// Unterminated containers run to the end of the text.
fn container_region(text: &str, all_tags: &[Tag<'_>], open: usize, kind: RegionKind) -> Region {
    let opener = &all_tags[open];
    let mut depth = 0usize;
    for tag in &all_tags[open + 1..] {
        if !tag.name.eq_ignore_ascii_case(opener.name) || tag.self_closing {
            continue;
        }
        if !tag.closing {
            depth += 1;
        } else if depth == 0 {
            return Region {
                kind,
                span: opener.start..tag.end,
                body: opener.end..tag.start,
            };
        } else {
            depth -= 1;
        }
    }
    Region {
        kind,
        span: opener.start..text.len(),
        body: opener.end..text.len(),
    }
}

/// Card body: strip markup, decode, drop the label, parse emphasis.
fn card_runs(body: &str, label: &Regex) -> Vec<StyledRun> {
    let stripped = strip_tags(body, StripMode::Remove);
    let decoded = decode_entities(&stripped);
    let unlabeled = label.replace(&decoded, "");
    let trimmed = unlabeled
        .trim_start_matches(|c: char| c == ':' || c.is_whitespace())
        .trim_end();
    parse_emphasis(trimmed)
}

/// Splits a follow-up region into individual questions.
fn follow_up_questions(body: &str) -> Vec<String> {
    let stripped = strip_tags(body, StripMode::LineBreaks);
    let decoded = decode_entities(&stripped);
    let text = decoded.trim();

    let candidates: Vec<&str> = if FOLLOW_UP_EMOJI.iter().any(|e| text.contains(e)) {
        split_before_emoji(text)
    } else if text.contains('\n') {
        text.lines()
            .filter(|line| line.contains('?') && line.trim().chars().count() > 3)
            .collect()
    } else if text.contains('?') && text.chars().count() > 10 {
        split_before_starters(text)
    } else {
        Vec::new()
    };

    candidates
        .into_iter()
        .filter_map(|candidate| {
            let cleaned = candidate.trim_start_matches(is_leading_noise);
            let decoded = decode_entities(cleaned);
            let question = decoded.trim();
            (question.chars().count() >= MIN_QUESTION_CHARS).then(|| question.to_string())
        })
        .collect()
}

/// Splits immediately before every follow-up emoji.
fn split_before_emoji(text: &str) -> Vec<&str> {
    let cuts: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .filter(|&i| FOLLOW_UP_EMOJI.iter().any(|e| text[i..].starts_with(e)))
        .collect();
    split_at_offsets(text, &cuts)
}

fn split_before_starters(text: &str) -> Vec<&str> {
    let mut cuts: Vec<usize> = QUESTION_STARTERS
        .iter()
        .flat_map(|starter| text.match_indices(starter).map(|(i, _)| i))
        .filter(|&i| i > 0)
        .collect();
    cuts.sort_unstable();
    cuts.dedup();
    split_at_offsets(text, &cuts)
}

/// Splits `text` at ascending byte offsets, dropping empty pieces.
fn split_at_offsets<'a>(text: &'a str, cuts: &[usize]) -> Vec<&'a str> {
    let mut pieces = Vec::with_capacity(cuts.len() + 1);
    let mut start = 0;
    for &cut in cuts {
        if cut > start {
            pieces.push(&text[start..cut]);
        }
        start = cut;
    }
    if start < text.len() {
        pieces.push(&text[start..]);
    }
    pieces
}

fn is_leading_noise(c: char) -> bool {
    c.is_whitespace() || c == '•' || c == '-' || is_emoji(c)
}

fn is_emoji(c: char) -> bool {
    matches!(
        c,
        '\u{1F300}'..='\u{1FAFF}'
            | '\u{2600}'..='\u{27BF}'
            | '\u{2B00}'..='\u{2BFF}'
            | '\u{FE0F}'
            | '\u{200D}'
    )
}
