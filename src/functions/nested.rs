//! Functions that evaluate nested patterns.
//!
//! Inside a nested pattern the anonymous parameter (`%[]`) is bound to the
//! value the tag is operating on. Recursion depth is bounded by the
//! interpreters themselves.

use crate::pattern::ast::CompiledPattern;
use crate::pattern::char_class::text_eq;
use crate::pattern::{FormatOptions, check_parts, example, format_parts};
use crate::span::{AnnotatedSpan, render};
use crate::value::ValueGroup;

use super::EvalContext;

/// Format `pattern` with the anonymous parameter bound to `value`.
fn render_nested(pattern: &CompiledPattern, value: &str, ctx: &mut EvalContext<'_>) -> Option<String> {
    let previous = ctx.params.remove("");
    ctx.params.insert("", value);
    let options = FormatOptions {
        remove_consumed: false,
        ..ctx.options
    };
    let spans = format_parts(pattern, ctx.params, options, ctx.depth + 1);
    ctx.params.remove("");
    if let Some(previous) = previous {
        ctx.params.insert("", previous);
    }
    spans.map(|spans| render(&spans))
}

/// Match `value` against `pattern`; captures are merged into the context on success.
fn matches_nested(pattern: &CompiledPattern, value: &str, ctx: &mut EvalContext<'_>) -> bool {
    check_parts(pattern, value, ctx.params, ctx.depth + 1).is_some()
}

/// The parameter named by the first argument equals the rendered second argument.
pub fn validate(span: &mut AnnotatedSpan, group: &ValueGroup, ctx: &mut EvalContext<'_>) -> bool {
    let Some(expected) = group.nested(1) else {
        return false;
    };
    let Some(actual) = ctx.params.get(group.text(0)) else {
        return false;
    };
    render_nested(expected, &span.text, ctx)
        .is_some_and(|expected| text_eq(&actual, &expected, group.nocase(1)))
}

pub fn pattern(span: &mut AnnotatedSpan, group: &ValueGroup, ctx: &mut EvalContext<'_>) -> bool {
    group
        .nested(0)
        .is_some_and(|nested| matches_nested(nested, &span.text, ctx))
}

pub fn pattern_example(sample: &mut String, group: &ValueGroup) {
    if let Some(nested) = group.nested(0) {
        *sample = example(nested);
    }
}

/// Render the second argument if the value matches the first, else the third.
pub fn ifelse(span: &mut AnnotatedSpan, group: &ValueGroup, ctx: &mut EvalContext<'_>) -> bool {
    let Some(condition) = group.nested(0) else {
        return false;
    };
    let branch = if matches_nested(condition, &span.text, ctx) {
        group.nested(1)
    } else {
        group.nested(2)
    };
    let Some(branch) = branch else {
        return true;
    };
    match render_nested(branch, &span.text, ctx) {
        Some(text) => {
            span.rewrite(text);
            true
        }
        None => false,
    }
}

pub fn format(span: &mut AnnotatedSpan, group: &ValueGroup, ctx: &mut EvalContext<'_>) -> bool {
    let Some(nested) = group.nested(0) else {
        return false;
    };
    match render_nested(nested, &span.text, ctx) {
        Some(text) => {
            span.rewrite(text);
            true
        }
        None => false,
    }
}

/// Split on a separator, format each piece, and join the results.
pub fn split(span: &mut AnnotatedSpan, group: &ValueGroup, ctx: &mut EvalContext<'_>) -> bool {
    let separator = group.text(0);
    let Some(each) = group.nested(1) else {
        return false;
    };
    let joiner = if group.is_present(2) {
        group.text(2)
    } else {
        separator
    };
    let pieces: Vec<&str> = if separator.is_empty() {
        vec![span.text.as_str()]
    } else {
        span.text.split(separator).collect()
    };
    let rendered = pieces
        .into_iter()
        .map(|piece| render_nested(each, piece, ctx))
        .collect::<Option<Vec<String>>>();
    match rendered {
        Some(rendered) => {
            span.rewrite(rendered.join(joiner));
            true
        }
        None => false,
    }
}
