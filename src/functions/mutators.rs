//! Functions that rewrite the current value.
//!
//! Shrinking rewrites go through [`AnnotatedSpan::narrow`] so the span keeps
//! pointing at the exact source text it still covers.

use crate::pattern::char_class::{advance, char_len, replace_all, set_contains};
use crate::span::AnnotatedSpan;
use crate::value::ValueGroup;

use super::EvalContext;

pub fn append(span: &mut AnnotatedSpan, group: &ValueGroup, _: &mut EvalContext<'_>) -> bool {
    let text = format!("{}{}{}", group.text(1), span.text, group.text(0));
    span.rewrite(text);
    true
}

/// Store the current value under another name.
pub fn copy(span: &mut AnnotatedSpan, group: &ValueGroup, ctx: &mut EvalContext<'_>) -> bool {
    let name = group.text(0);
    if !name.is_empty() {
        ctx.params.insert(name, span.text.clone());
    }
    true
}

pub fn delete(span: &mut AnnotatedSpan, group: &ValueGroup, _: &mut EvalContext<'_>) -> bool {
    let text = replace_all(&span.text, group.text(0), "", group.nocase(0));
    span.rewrite(text);
    true
}

pub fn replace(span: &mut AnnotatedSpan, group: &ValueGroup, _: &mut EvalContext<'_>) -> bool {
    let text = replace_all(&span.text, group.text(0), group.text(1), group.nocase(0));
    span.rewrite(text);
    true
}

/// Insert at a character position; negative positions count from the end.
pub fn insert(span: &mut AnnotatedSpan, group: &ValueGroup, _: &mut EvalContext<'_>) -> bool {
    let len = char_len(&span.text);
    let position = group.int32(0).unwrap_or(0);
    let index = if position < 0 {
        len.saturating_sub(position.unsigned_abs() as usize)
    } else {
        len.min(position as usize)
    };
    let Some(at) = advance(&span.text, 0, index) else {
        return false;
    };
    let mut text = span.text.clone();
    text.insert_str(at, group.text(1));
    span.rewrite(text);
    true
}

/// Truncate or pad to `|len|` characters; at the end for positive lengths,
/// at the start for negative ones.
pub fn resize(span: &mut AnnotatedSpan, group: &ValueGroup, _: &mut EvalContext<'_>) -> bool {
    let Some(len) = group.int32(0) else {
        return false;
    };
    let target = len.unsigned_abs() as usize;
    let at_end = len >= 0;
    let current = char_len(&span.text);

    if target < current {
        let skip = current - target;
        let range = if at_end {
            0..advance(&span.text, 0, target).unwrap_or(span.text.len())
        } else {
            advance(&span.text, 0, skip).unwrap_or(0)..span.text.len()
        };
        span.narrow(range);
        return true;
    }

    let pad = match group.text(1) {
        "" => " ",
        pad => pad,
    };
    let padding: String = pad.chars().cycle().take(target - current).collect();
    let text = if at_end {
        format!("{}{padding}", span.text)
    } else {
        format!("{padding}{}", span.text)
    };
    span.rewrite(text);
    true
}

/// Trim characters from both ends; whitespace when no set is given.
pub fn strip(span: &mut AnnotatedSpan, group: &ValueGroup, _: &mut EvalContext<'_>) -> bool {
    let set = group.text(0);
    let nocase = group.nocase(0);
    let strip = |c: char| {
        if set.is_empty() {
            c.is_whitespace()
        } else {
            set_contains(set, c, nocase)
        }
    };
    let trimmed_start = span.text.trim_start_matches(strip);
    let start = span.text.len() - trimmed_start.len();
    let end = start + trimmed_start.trim_end_matches(strip).len();
    span.narrow(start..end);
    true
}

/// Example behavior for functions that do not constrain their input.
pub fn unchanged(_: &mut String, _: &ValueGroup) {}
