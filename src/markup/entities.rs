//! Decoder for the fixed set of HTML entities the answer service emits.
//!
//! Only `&quot; &amp; &lt; &gt; &#39; &nbsp;` are recognized. Decoding is a
//! single left-to-right pass, so `&amp;lt;` becomes `&lt;` rather than `<`.

use std::borrow::Cow;

const ENTITIES: &[(&str, char)] = &[
    ("&quot;", '"'),
    ("&amp;", '&'),
    ("&lt;", '<'),
    ("&gt;", '>'),
    ("&#39;", '\''),
    ("&nbsp;", ' '),
];

/// Returns true if `text` contains anything that looks like an entity.
#[must_use]
pub fn has_entity_markers(text: &str) -> bool {
    text.contains('&') && text.contains(';')
}

/// Decodes the fixed entity set. Borrows when nothing needs decoding.
#[must_use]
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    if !has_entity_markers(text) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        match ENTITIES
            .iter()
            .find(|(entity, _)| tail.starts_with(entity))
        {
            Some((entity, ch)) => {
                out.push(*ch);
                rest = &tail[entity.len()..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}
