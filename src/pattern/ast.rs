//! Compiled representation of a pattern.

use std::ops::Range;

use itertools::Itertools;

use crate::diagnostics::Diagnostics;

use super::tag::Tag;

/// Default bound on pattern nesting, for both compilation and evaluation.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Pattern-wide compilation settings. Nested patterns inherit them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    /// Default case mode for literals and tag arguments.
    pub case_sensitive: bool,
    pub max_depth: usize,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            case_sensitive: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl CompileOptions {
    pub fn ignore_case(mut self) -> Self {
        self.case_sensitive = false;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// A pattern compiled into parts.
///
/// Immutable once built; [`crate::Pattern`] swaps whole instances on
/// recompilation.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pub source: String,
    pub parts: Vec<Part>,
    pub diagnostics: Diagnostics,
    pub options: CompileOptions,
}

impl CompiledPattern {
    /// A pattern consisting of `text` verbatim.
    pub fn literal(text: &str, options: CompileOptions) -> Self {
        let parts = if text.is_empty() {
            Vec::new()
        } else {
            vec![Part::Literal(Literal {
                text: text.to_string(),
                case_sensitive: options.case_sensitive,
                source: 0..text.len(),
            })]
        };
        Self {
            source: text.to_string(),
            parts,
            diagnostics: Diagnostics::new(),
            options,
        }
    }

    pub fn has_parameters(&self) -> bool {
        self.parts.iter().any(|part| part.as_parameter().is_some())
    }

    /// Names of the named parameters, in order of first use.
    pub fn parameter_names(&self) -> Vec<&str> {
        self.parts
            .iter()
            .filter_map(Part::as_parameter)
            .map(|param| param.name.as_str())
            .filter(|name| !name.is_empty())
            .unique()
            .collect()
    }

    /// Concatenated text of the literal parts, escapes resolved.
    pub fn literal_text(&self) -> String {
        self.parts
            .iter()
            .filter_map(Part::as_literal)
            .map(|literal| literal.text.as_str())
            .collect()
    }
}

/// One compiled fragment of a pattern.
#[derive(Debug, Clone)]
pub enum Part {
    Literal(Literal),
    Parameter(Parameter),
}

impl Part {
    /// Byte range of the pattern source this part was compiled from.
    pub fn source(&self) -> &Range<usize> {
        match self {
            Part::Literal(literal) => &literal.source,
            Part::Parameter(param) => &param.source,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Part::Literal(literal) => Some(literal),
            Part::Parameter(_) => None,
        }
    }

    pub fn as_parameter(&self) -> Option<&Parameter> {
        match self {
            Part::Parameter(param) => Some(param),
            Part::Literal(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Literal {
    pub text: String,
    pub case_sensitive: bool,
    pub source: Range<usize>,
}

/// A `%[name{tag}...]` clause.
#[derive(Debug, Clone)]
pub struct Parameter {
    /// Empty for anonymous parameters.
    pub name: String,
    pub tags: Vec<Tag>,
    /// Exact length in characters (`paramlengthfixed`).
    pub length_fixed: Option<usize>,
    /// Minimum length in characters (`paramlengthmin`).
    pub length_min: Option<usize>,
    pub source: Range<usize>,
}

impl Parameter {
    /// Fewest characters this parameter can capture.
    pub fn min_len(&self) -> usize {
        self.length_fixed.or(self.length_min).unwrap_or(0)
    }

    pub fn is_anonymous(&self) -> bool {
        self.name.is_empty()
    }
}
