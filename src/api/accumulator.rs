//! Accumulated answer text for one chat turn.

/// Growing answer text plus a flag recording whether any real content arrived.
///
/// `text` only grows by [`append`](Self::append) or is wholesale replaced by
/// [`replace`](Self::replace); it never shrinks otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentAccumulator {
    text: String,
    has_received_content: bool,
}

impl ContentAccumulator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a fragment from a chunk event.
    pub fn append(&mut self, fragment: &str) {
        self.text.push_str(fragment);
        self.has_received_content = true;
    }

    /// Replaces everything with the full answer from a complete event.
    pub fn replace(&mut self, full: String) {
        self.text = full;
        self.has_received_content = true;
    }

    /// Current text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn has_received_content(&self) -> bool {
        self.has_received_content
    }

    /// True when nothing usable arrived: no content events, or only whitespace.
    #[must_use]
    pub fn is_empty_answer(&self) -> bool {
        !self.has_received_content || self.text.trim().is_empty()
    }

    /// Consumes the accumulator, returning the text.
    #[must_use]
    pub fn into_text(self) -> String {
        self.text
    }
}
