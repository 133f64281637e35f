//! A small markup lexer.
//!
//! The answer service mixes prose with loose HTML. This lexer recognizes
//! just enough of it to strip tags and to locate container elements:
//!
//! - a tag starts at `<` followed by an ASCII letter, `/` + letter, or `!`
//! - it ends at the next `>`; an unterminated `<` is literal text
//! - the tag name is the run of alphanumerics and `-` after the `<` or `</`
//!
//! Anything else (`3 < 5`, `<3`) is left alone.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

static CLASS_ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\bclass\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("class attribute regex")
});

/// Elements whose boundaries become line breaks in [`StripMode::LineBreaks`].
const BLOCK_ELEMENTS: &[&str] = &[
    "br", "p", "div", "li", "ul", "ol", "h1", "h2", "h3", "h4", "h5", "h6",
];

/// A single tag found by [`tags`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag<'a> {
    /// Byte offset of `<`.
    pub start: usize,
    /// Byte offset just past `>`.
    pub end: usize,
    /// Element name as written (`div`, `H3`, `!` for comments).
    pub name: &'a str,
    /// `</name>`.
    pub closing: bool,
    /// `<name/>`.
    pub self_closing: bool,
    attrs: &'a str,
}

impl<'a> Tag<'a> {
    /// Returns true if the `class` attribute has `class_name` as one of its tokens.
    #[must_use]
    pub fn has_class(&self, class_name: &str) -> bool {
        CLASS_ATTR.captures(self.attrs).is_some_and(|caps| {
            caps.get(1)
                .or_else(|| caps.get(2))
                .is_some_and(|value| value.as_str().split_whitespace().any(|c| c == class_name))
        })
    }

    /// Returns true if this element name matches `name`, ignoring case.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Returns true for block-level elements.
    #[must_use]
    pub fn is_block(&self) -> bool {
        BLOCK_ELEMENTS.iter().any(|b| self.is(b))
    }

    /// Returns true for `<h1>`..`<h6>`.
    #[must_use]
    pub fn is_heading(&self) -> bool {
        let bytes = self.name.as_bytes();
        bytes.len() == 2
            && bytes[0].eq_ignore_ascii_case(&b'h')
            && (b'1'..=b'6').contains(&bytes[1])
    }
}

/// Iterator over the tags of a text.
#[derive(Debug, Clone)]
pub struct Tags<'a> {
    text: &'a str,
    pos: usize,
}

/// Returns an iterator over every tag in `text`, in order.
#[must_use]
pub fn tags(text: &str) -> Tags<'_> {
    Tags { text, pos: 0 }
}

impl<'a> Iterator for Tags<'a> {
    type Item = Tag<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let text = self.text;
        while let Some(offset) = text[self.pos..].find('<') {
            let start = self.pos + offset;
            let after = &text[start + 1..];
            let bytes = after.as_bytes();

            let (closing, name_start) = match bytes.first() {
                Some(b'/') if bytes.get(1).is_some_and(u8::is_ascii_alphabetic) => (true, 1),
                Some(b) if b.is_ascii_alphabetic() || *b == b'!' => (false, 0),
                _ => {
                    self.pos = start + 1;
                    continue;
                }
            };

            // Unterminated: no later tag can close either.
            let close = after.find('>')?;
            let inner = &after[name_start..close];
            let name_len = if inner.starts_with('!') {
                1
            } else {
                inner
                    .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-'))
                    .unwrap_or(inner.len())
            };

            let end = start + 1 + close + 1;
            self.pos = end;
            return Some(Tag {
                start,
                end,
                name: &inner[..name_len],
                closing,
                self_closing: inner.ends_with('/'),
                attrs: &inner[name_len..],
            });
        }
        self.pos = text.len();
        None
    }
}

/// What to leave behind where a tag was removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StripMode {
    /// Remove every tag without a trace.
    #[default]
    Remove,
    /// Replace block-level tags with `\n`, remove the rest.
    LineBreaks,
}

/// Removes all tags from `text`. Borrows when there are none.
#[must_use]
pub fn strip_tags(text: &str, mode: StripMode) -> Cow<'_, str> {
    let mut found = tags(text).peekable();
    if found.peek().is_none() {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for tag in found {
        out.push_str(&text[cursor..tag.start]);
        if mode == StripMode::LineBreaks && tag.is_block() {
            out.push('\n');
        }
        cursor = tag.end;
    }
    out.push_str(&text[cursor..]);
    Cow::Owned(out)
}
