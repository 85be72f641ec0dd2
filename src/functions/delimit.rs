//! Bounded extraction: find an element and widen it to the nearest delimiters.

use std::ops::Range;

use bitflags::bitflags;

use crate::pattern::char_class::{find, prefix_len, set_contains, suffix_start, text_eq};
use crate::span::AnnotatedSpan;
use crate::value::ValueGroup;

use super::EvalContext;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct DelimitFlags: u8 {
        /// The whole value must be the element.
        const EQUALS = 1 << 0;
        /// The element may occur anywhere (the default search).
        const CONTAINS = 1 << 1;
        /// Return the element itself, ignoring delimiters.
        const ONLY = 1 << 2;
        const STARTS = 1 << 3;
        const ENDS = 1 << 4;
        const NOCASE = 1 << 5;
    }
}

impl DelimitFlags {
    /// Parse flag words separated by anything that is not a letter.
    /// Unknown words are ignored.
    pub fn parse(text: &str) -> DelimitFlags {
        text.split(|c: char| !c.is_ascii_alphabetic())
            .filter_map(|word| match word.to_ascii_lowercase().as_str() {
                "equals" => Some(DelimitFlags::EQUALS),
                "contains" => Some(DelimitFlags::CONTAINS),
                "only" => Some(DelimitFlags::ONLY),
                "starts" => Some(DelimitFlags::STARTS),
                "ends" => Some(DelimitFlags::ENDS),
                "nocase" => Some(DelimitFlags::NOCASE),
                _ => None,
            })
            .collect()
    }
}

/// Locate `element` in `text` and return the byte range to keep.
pub fn extract(
    text: &str,
    element: &str,
    flags: DelimitFlags,
    left: &str,
    right: &str,
    nocase: bool,
) -> Option<Range<usize>> {
    let nocase = nocase || flags.contains(DelimitFlags::NOCASE);
    let (start, end) = if flags.contains(DelimitFlags::EQUALS) {
        text_eq(text, element, nocase).then_some((0, text.len()))?
    } else if flags.contains(DelimitFlags::STARTS) {
        (0, prefix_len(text, element, nocase)?)
    } else if flags.contains(DelimitFlags::ENDS) {
        (suffix_start(text, element, nocase)?, text.len())
    } else {
        find(text, element, 0, nocase)?
    };

    if flags.contains(DelimitFlags::ONLY) || (left.is_empty() && right.is_empty()) {
        return Some(start..end);
    }
    let from = text[..start]
        .char_indices()
        .rev()
        .find(|&(_, c)| set_contains(left, c, nocase))
        .map_or(0, |(i, c)| i + c.len_utf8());
    let to = text[end..]
        .char_indices()
        .find(|&(_, c)| set_contains(right, c, nocase))
        .map_or(text.len(), |(i, _)| end + i);
    Some(from..to)
}

pub fn delimit(span: &mut AnnotatedSpan, group: &ValueGroup, _: &mut EvalContext<'_>) -> bool {
    let flags = DelimitFlags::parse(group.text(1));
    let range = extract(
        &span.text,
        group.text(0),
        flags,
        group.text(2),
        group.text(3),
        group.nocase(0),
    );
    match range {
        Some(range) => {
            span.narrow(range);
            true
        }
        None => false,
    }
}

pub fn delimit_example(sample: &mut String, group: &ValueGroup) {
    let element = group.text(0);
    let flags = DelimitFlags::parse(group.text(1));
    if extract(sample, element, flags, "", "", group.nocase(0)).is_none() {
        *sample = element.to_string();
    }
}
