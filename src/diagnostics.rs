//! Compile-time diagnostics.
//!
//! The compiler never fails. Every recoverable malformation it works around
//! is recorded here as a plain-text warning.

use std::fmt;

use itertools::Itertools;

/// A recoverable problem found while compiling a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    UnterminatedParameter { offset: usize },
    UnterminatedTag { offset: usize },
    StrayText { offset: usize, text: String },
    UnknownFunction(String),
    UnknownModifier { function: String, modifier: String },
    LegacyAlias { alias: String, canonical: &'static str },
    VersionMismatch { found: String, supported: u32 },
    InvalidDirectiveValue { directive: &'static str, value: String },
    TrailingText { directive: &'static str, text: String },
    InvalidNumber { function: &'static str, text: String },
    TooManyArguments { function: &'static str, max: usize },
    MissingArguments { function: &'static str, min: usize },
    NestingTooDeep { max_depth: usize },
}

impl Diagnostic {
    /// The same diagnostic, for a pattern embedded at byte `base` of another.
    pub fn rebased(self, base: usize) -> Self {
        match self {
            Self::UnterminatedParameter { offset } => Self::UnterminatedParameter {
                offset: base + offset,
            },
            Self::UnterminatedTag { offset } => Self::UnterminatedTag {
                offset: base + offset,
            },
            Self::StrayText { offset, text } => Self::StrayText {
                offset: base + offset,
                text,
            },
            other => other,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnterminatedParameter { offset } => {
                write!(f, "Unterminated '%[' at offset {offset}; treated as text")
            }
            Self::UnterminatedTag { offset } => {
                write!(f, "Unterminated '{{' at offset {offset}; rest of parameter ignored")
            }
            Self::StrayText { offset, text } => {
                write!(f, "Unexpected text {text:?} at offset {offset} ignored")
            }
            Self::UnknownFunction(name) => write!(f, "Function '{name}' is not supported"),
            Self::UnknownModifier { function, modifier } => {
                write!(f, "Modifier '{modifier}' of '{function}' is not supported")
            }
            Self::LegacyAlias { alias, canonical } => {
                write!(f, "'{alias}' is deprecated legacy syntax; use '{canonical}'")
            }
            Self::VersionMismatch { found, supported } => write!(
                f,
                "Pattern was written for version {found}; this engine supports version {supported}"
            ),
            Self::InvalidDirectiveValue { directive, value } => {
                write!(f, "Invalid value {value:?} for '{directive}'; ignored")
            }
            Self::TrailingText { directive, text } => {
                write!(f, "Unused trailing text {text:?} after '{directive}'")
            }
            Self::InvalidNumber { function, text } => {
                write!(f, "Expected a number for '{function}', found {text:?}")
            }
            Self::TooManyArguments { function, max } => {
                write!(f, "'{function}' takes at most {max} arguments; extras ignored")
            }
            Self::MissingArguments { function, min } => {
                write!(f, "'{function}' needs at least {min} arguments")
            }
            Self::NestingTooDeep { max_depth } => {
                write!(f, "Patterns nested {max_depth} levels deep are kept as text")
            }
        }
    }
}

/// Ordered, deduplicated list of diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic unless an identical one is already present.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        if self.entries.contains(&diagnostic) {
            return;
        }
        tracing::debug!(%diagnostic, "pattern diagnostic");
        self.entries.push(diagnostic);
    }

    pub fn extend(&mut self, other: &Diagnostics) {
        for diagnostic in &other.entries {
            self.push(diagnostic.clone());
        }
    }

    /// Merge the diagnostics of a pattern embedded at byte `base`.
    pub fn extend_rebased(&mut self, other: &Diagnostics, base: usize) {
        for diagnostic in &other.entries {
            self.push(diagnostic.clone().rebased(base));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    /// The human-readable text of every diagnostic.
    pub fn messages(&self) -> Vec<String> {
        self.entries.iter().map(ToString::to_string).collect()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.entries.iter().join("\n"))
    }
}
