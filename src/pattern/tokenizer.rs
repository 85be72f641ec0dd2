//! Splits tag arguments into typed value groups.
//!
//! Also home to the escape-aware bracket scanners the compiler uses to find
//! structure in pattern text.

use std::str::FromStr;

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::escape::unescape;
use crate::functions::Function;
use crate::value::{Component, Slot, SlotType, Value, ValueGroup};

use super::ast::{CompileOptions, CompiledPattern};
use super::parser::compile_nested;

/// Find the closer matching an already-consumed opener, starting at byte
/// `from`. Escaped characters and balanced `[...]`/`{...}` pairs in between
/// are skipped. A closer pops back to its own opener, so an unclosed `{`
/// does not hide the `]` after it; other stray closers are ignored.
pub(crate) fn find_closing(text: &str, from: usize, closer: char) -> Option<usize> {
    let mut open: Vec<char> = Vec::new();
    let mut chars = text.get(from..)?.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '[' => open.push(']'),
            '{' => open.push('}'),
            ']' | '}' => {
                if let Some(at) = open.iter().rposition(|&expected| expected == c) {
                    open.truncate(at);
                } else if c == closer {
                    return Some(from + i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Find the first unescaped occurrence of any of `targets` at or after `from`.
pub(crate) fn find_unescaped(text: &str, from: usize, targets: &[char]) -> Option<usize> {
    let mut chars = text.get(from..)?.char_indices();
    while let Some((i, c)) = chars.next() {
        if c == '\\' {
            chars.next();
        } else if targets.contains(&c) {
            return Some(from + i);
        }
    }
    None
}

/// Split on `separator` where it is unescaped and outside any brackets.
/// Pieces keep their escapes and come with their byte offset in `text`.
pub(crate) fn split_unescaped(text: &str, separator: char) -> Vec<(usize, &str)> {
    let mut pieces = Vec::new();
    let mut open: Vec<char> = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '[' => open.push(']'),
            '{' => open.push('}'),
            ']' | '}' => {
                if let Some(at) = open.iter().rposition(|&expected| expected == c) {
                    open.truncate(at);
                }
            }
            c if c == separator && open.is_empty() => {
                pieces.push((start, &text[start..i]));
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    pieces.push((start, &text[start..]));
    pieces
}

/// Converts argument text to values typed by one function's signature.
pub(crate) struct Tokenizer<'d> {
    pub function: &'static Function,
    /// Case mode the tag resolved to.
    pub nocase: bool,
    pub options: CompileOptions,
    /// Depth of the pattern the tag belongs to.
    pub depth: usize,
    /// Where the argument text starts in that pattern's source.
    pub offset: usize,
    pub diagnostics: &'d mut Diagnostics,
}

impl Tokenizer<'_> {
    pub fn tokenize(&mut self, args: &str) -> Vec<ValueGroup> {
        split_unescaped(args, ';')
            .into_iter()
            .map(|(at, group)| self.group(group, self.offset + at))
            .collect()
    }

    fn group(&mut self, text: &str, offset: usize) -> ValueGroup {
        let raw = if text.is_empty() {
            Vec::new()
        } else {
            split_unescaped(text, ',')
        };
        let signature = self.function.signature;
        if raw.len() > signature.len() {
            self.diagnostics.push(Diagnostic::TooManyArguments {
                function: self.function.name,
                max: signature.len(),
            });
        }
        if raw.len() < self.function.min_args {
            self.diagnostics.push(Diagnostic::MissingArguments {
                function: self.function.name,
                min: self.function.min_args,
            });
        }
        let components = raw
            .iter()
            .zip(signature)
            .map(|(&(at, raw), slot)| self.component(raw, *slot, offset + at))
            .collect();
        ValueGroup::new(components)
    }

    fn component(&mut self, raw: &str, slot: Slot, offset: usize) -> Option<Component> {
        let value = match slot.kind {
            SlotType::Int32 => Value::Int32(self.number(raw)?),
            SlotType::Int64 => Value::Int64(self.number(raw)?),
            SlotType::Text => Value::Text(unescape(raw)),
            SlotType::Nested => Value::Nested(Box::new(self.nested(raw, offset))),
        };
        Some(Component {
            value,
            nocase: self.nocase && !slot.preserve_case,
        })
    }

    /// A blank number is absent; a malformed one is absent and reported.
    fn number<T: FromStr>(&mut self, raw: &str) -> Option<T> {
        let text = unescape(raw);
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        match text.parse() {
            Ok(number) => Some(number),
            Err(_) => {
                self.diagnostics.push(Diagnostic::InvalidNumber {
                    function: self.function.name,
                    text: text.to_string(),
                });
                None
            }
        }
    }

    /// Nested diagnostics are reported at offsets in the enclosing pattern.
    fn nested(&mut self, raw: &str, offset: usize) -> CompiledPattern {
        let depth = self.depth + 1;
        if depth >= self.options.max_depth {
            self.diagnostics.push(Diagnostic::NestingTooDeep {
                max_depth: self.options.max_depth,
            });
            return CompiledPattern::literal(&unescape(raw), self.options);
        }
        let nested = compile_nested(raw, self.options, depth);
        self.diagnostics.extend_rebased(&nested.diagnostics, offset);
        nested
    }
}
