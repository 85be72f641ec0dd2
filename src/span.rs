//! Annotated spans: the output currency shared by matching and formatting.
//!
//! A span owns its text and remembers the byte range it was derived from.
//! For `check` that range is in the input being matched; for `format` it is
//! in the pattern source (literal spans) or in the parameter's original value
//! (parameter spans).

use std::ops::Range;

/// A run of text with its provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedSpan {
    pub text: String,
    /// Byte offset of the text this span was derived from.
    pub source_offset: usize,
    /// Byte length of the text this span was derived from.
    pub source_len: usize,
    pub is_param: bool,
    /// Parameter name; `None` for literals and anonymous parameters.
    pub name: Option<String>,
    /// Set once the text stops mapping one-to-one onto its source range.
    pub rewritten: bool,
}

impl AnnotatedSpan {
    /// A non-parameter span.
    pub fn literal(text: impl Into<String>, source_offset: usize, source_len: usize) -> Self {
        Self {
            text: text.into(),
            source_offset,
            source_len,
            is_param: false,
            name: None,
            rewritten: false,
        }
    }

    /// A parameter span whose source is exactly `text`, starting at `source_offset`.
    pub fn parameter(name: &str, text: impl Into<String>, source_offset: usize) -> Self {
        let text = text.into();
        Self {
            source_len: text.len(),
            text,
            source_offset,
            is_param: true,
            name: (!name.is_empty()).then(|| name.to_string()),
            rewritten: false,
        }
    }

    pub fn source_range(&self) -> Range<usize> {
        self.source_offset..self.source_offset + self.source_len
    }

    /// Keep only `range` (byte offsets into the current text).
    ///
    /// An unrewritten span moves its source range along with the text, so
    /// callers can recover the text that was sliced away.
    pub fn narrow(&mut self, range: Range<usize>) {
        if !self.rewritten {
            self.source_offset += range.start;
            self.source_len = range.len();
        }
        self.text = self.text[range].to_string();
    }

    /// Replace the text, keeping the source range. Replacing it with
    /// identical text is not a rewrite.
    pub fn rewrite(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text != self.text {
            self.text = text;
            self.rewritten = true;
        }
    }
}

/// Concatenate the text of every span, in order.
pub fn render(spans: &[AnnotatedSpan]) -> String {
    spans.iter().map(|span| span.text.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_parameter_has_no_name() {
        let span = AnnotatedSpan::parameter("", "abc", 4);
        assert!(span.is_param);
        assert_eq!(span.name, None);
        assert_eq!(span.source_range(), 4..7);
    }

    #[test]
    fn narrow_moves_source_range() {
        let mut span = AnnotatedSpan::parameter("nick", "[op]bob", 10);
        span.narrow(4..7);
        assert_eq!(span.text, "bob");
        assert_eq!(span.source_range(), 14..17);
    }

    #[test]
    fn narrow_after_rewrite_keeps_source_range() {
        let mut span = AnnotatedSpan::parameter("nick", "bob", 0);
        span.rewrite("<bob>");
        span.narrow(1..4);
        assert_eq!(span.text, "bob");
        assert_eq!(span.source_range(), 0..3);
    }

    #[test]
    fn narrow_after_same_length_rewrite_keeps_source_range() {
        let mut span = AnnotatedSpan::parameter("v", "ab", 0);
        span.rewrite("bz");
        span.narrow(1..2);
        assert_eq!(span.text, "z");
        assert!(span.rewritten);
        assert_eq!(span.source_range(), 0..2);
    }

    #[test]
    fn identical_rewrite_still_narrows_source() {
        let mut span = AnnotatedSpan::parameter("v", " x ", 3);
        span.rewrite(" x ");
        assert!(!span.rewritten);
        span.narrow(1..2);
        assert_eq!(span.source_range(), 4..5);
    }

    #[test]
    fn render_concatenates() {
        let spans = vec![
            AnnotatedSpan::literal("<", 0, 1),
            AnnotatedSpan::parameter("nick", "bob", 1),
            AnnotatedSpan::literal(">", 4, 1),
        ];
        assert_eq!(render(&spans), "<bob>");
    }
}
