//! Formatter: render a [`CompiledPattern`] with values from a [`ParamMap`].
//!
//! Literal spans point into the pattern source. Parameter spans point into
//! the value they were rendered from.

use crate::functions::{EvalContext, Mode};
use crate::params::ParamMap;
use crate::span::{AnnotatedSpan, render};

use super::ast::{CompiledPattern, Parameter, Part};

/// How the formatter treats parameters it cannot render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatOptions {
    /// Render a parameter with no value as empty text instead of failing.
    pub ignore_missing: bool,
    /// Render a parameter whose tag fails as empty text instead of failing.
    pub ignore_tag_failure: bool,
    /// Remove each named parameter from the map once it has been rendered.
    pub remove_consumed: bool,
}

impl FormatOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ignore_missing(mut self, yes: bool) -> Self {
        self.ignore_missing = yes;
        self
    }

    pub fn ignore_tag_failure(mut self, yes: bool) -> Self {
        self.ignore_tag_failure = yes;
        self
    }

    pub fn remove_consumed(mut self, yes: bool) -> Self {
        self.remove_consumed = yes;
        self
    }
}

impl CompiledPattern {
    /// Render this pattern, or `None` if a parameter cannot be rendered.
    pub fn format(&self, params: &mut ParamMap, options: FormatOptions) -> Option<Vec<AnnotatedSpan>> {
        let spans = format_parts(self, params, options, 0);
        tracing::debug!(
            pattern = %self.source,
            rendered = spans.is_some(),
            "formatted pattern"
        );
        spans
    }

    /// [`CompiledPattern::format`] flattened to a string.
    pub fn format_string(&self, params: &mut ParamMap, options: FormatOptions) -> Option<String> {
        self.format(params, options).map(|spans| render(&spans))
    }
}

/// Render a pattern nested `depth` levels deep.
pub(crate) fn format_parts(
    pattern: &CompiledPattern,
    params: &mut ParamMap,
    options: FormatOptions,
    depth: usize,
) -> Option<Vec<AnnotatedSpan>> {
    if depth > pattern.options.max_depth {
        tracing::trace!(depth, "pattern nesting too deep to format");
        return None;
    }
    pattern
        .parts
        .iter()
        .map(|part| match part {
            Part::Literal(literal) => Some(AnnotatedSpan::literal(
                literal.text.as_str(),
                literal.source.start,
                literal.source.len(),
            )),
            Part::Parameter(param) => render_parameter(param, params, options, depth),
        })
        .collect()
}

/// Look up a parameter's value. The anonymous parameter is never missing.
fn lookup(param: &Parameter, params: &mut ParamMap, options: FormatOptions) -> Option<String> {
    if param.is_anonymous() {
        return Some(params.get("").unwrap_or_default());
    }
    let value = if options.remove_consumed {
        params.take(&param.name)
    } else {
        params.get(&param.name)
    };
    match value {
        Some(value) => Some(value),
        None if options.ignore_missing => Some(String::new()),
        None => {
            tracing::trace!(param = %param.name, "missing parameter");
            None
        }
    }
}

fn render_parameter(
    param: &Parameter,
    params: &mut ParamMap,
    options: FormatOptions,
    depth: usize,
) -> Option<AnnotatedSpan> {
    let value = lookup(param, params, options)?;
    let mut span = AnnotatedSpan::parameter(&param.name, value, 0);
    let mut ctx = EvalContext {
        params,
        mode: Mode::Format,
        depth,
        options,
    };
    for tag in &param.tags {
        if tag.evaluate(&mut span, &mut ctx) {
            continue;
        }
        if !options.ignore_tag_failure {
            tracing::trace!(param = %param.name, tag = %tag.name, "tag rejected value");
            return None;
        }
        span.rewrite(String::new());
        break;
    }
    Some(span)
}
