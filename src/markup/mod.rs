//! Turning a finished answer into content blocks.
//!
//! Two passes over loose markup, then structure:
//!
//! 1. [`tags`] lexes and strips HTML-ish tags.
//! 2. [`entities`] decodes the fixed entity set.
//! 3. [`sections`] finds highlighted regions (quick answer, final thoughts,
//!    follow-ups) and hands the rest to [`inline`].
//! 4. [`inline`] produces headers, list items and styled runs.
//!
//! All functions here are pure; nothing is published from inside them.

pub mod entities;
pub mod inline;
pub mod sections;
pub mod tags;

pub use entities::decode_entities;
pub use inline::{classify_header, format_span, parse_emphasis};
pub use sections::segment;
pub use tags::{strip_tags, StripMode};
