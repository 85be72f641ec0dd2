//! Compiler for sdex pattern text.
//!
//! ```text
//! pattern   := (literal | parameter)*
//! parameter := '%[' name? tag* ']'
//! tag       := '{' head (('=' | ':') group (';' group)*)? '}'
//! head      := ('(' modifiers ')')? function ('(' modifiers ')')?
//! group     := component (',' component)*
//! ```
//!
//! A backslash escapes the next character anywhere. Compilation never fails:
//! malformed regions are kept as literal text or dropped, and each one is
//! recorded as a [`Diagnostic`].

use std::ops::Range;

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::escape::unescape;
use crate::functions;

use super::ast::{CompileOptions, CompiledPattern, Literal, Parameter, Part};
use super::tag::{Operators, Tag};
use super::tokenizer::{Tokenizer, find_closing, find_unescaped};

/// Version of the pattern language this engine implements.
pub const ENGINE_VERSION: u32 = 2;

/// Compile `source` into a [`CompiledPattern`].
pub fn compile(source: &str, options: CompileOptions) -> CompiledPattern {
    let pattern = compile_nested(source, options, 0);
    tracing::debug!(
        source,
        parts = pattern.parts.len(),
        diagnostics = pattern.diagnostics.len(),
        "compiled pattern"
    );
    pattern
}

/// Compile a pattern found `depth` levels inside another one.
pub(crate) fn compile_nested(source: &str, options: CompileOptions, depth: usize) -> CompiledPattern {
    let mut compiler = Compiler {
        source,
        options,
        depth,
        parts: Vec::new(),
        diagnostics: Diagnostics::new(),
    };
    compiler.compile_parts();
    if depth > 0 {
        tracing::trace!(source, depth, "compiled nested pattern");
    }
    CompiledPattern {
        source: source.to_string(),
        parts: compiler.parts,
        diagnostics: compiler.diagnostics,
        options,
    }
}

struct Compiler<'a> {
    source: &'a str,
    options: CompileOptions,
    depth: usize,
    parts: Vec<Part>,
    diagnostics: Diagnostics,
}

impl Compiler<'_> {
    fn compile_parts(&mut self) {
        let source = self.source;
        let mut literal = String::new();
        let mut literal_start = 0;
        let mut pos = 0;

        while let Some(c) = source[pos..].chars().next() {
            if source[pos..].starts_with("%[") {
                if let Some(close) = find_closing(source, pos + 2, ']') {
                    self.push_literal(&mut literal, literal_start..pos);
                    let param = self.compile_parameter(pos..close + 1, pos + 2..close);
                    self.parts.push(Part::Parameter(param));
                    pos = close + 1;
                    literal_start = pos;
                    continue;
                }
                self.diagnostics
                    .push(Diagnostic::UnterminatedParameter { offset: pos });
                literal.push_str("%[");
                pos += 2;
                continue;
            }

            pos += c.len_utf8();
            if c == '\\'
                && let Some(escaped) = source[pos..].chars().next()
            {
                literal.push(escaped);
                pos += escaped.len_utf8();
            } else {
                literal.push(c);
            }
        }
        self.push_literal(&mut literal, literal_start..pos);
    }

    fn push_literal(&mut self, text: &mut String, source: Range<usize>) {
        if source.is_empty() {
            return;
        }
        self.parts.push(Part::Literal(Literal {
            text: std::mem::take(text),
            case_sensitive: self.options.case_sensitive,
            source,
        }));
    }

    /// `source` spans the whole `%[...]`; `body` excludes the brackets.
    fn compile_parameter(&mut self, source: Range<usize>, body: Range<usize>) -> Parameter {
        let text = &self.source[body.clone()];
        let name_end = find_unescaped(text, 0, &['{']).unwrap_or(text.len());
        let mut param = Parameter {
            name: unescape(&text[..name_end]),
            tags: Vec::new(),
            length_fixed: None,
            length_min: None,
            source,
        };

        let mut pos = name_end;
        while pos < text.len() {
            let Some(open) = find_unescaped(text, pos, &['{']) else {
                self.stray_text(body.start + pos, &text[pos..]);
                break;
            };
            self.stray_text(body.start + pos, &text[pos..open]);
            let Some(close) = find_closing(text, open + 1, '}') else {
                self.diagnostics.push(Diagnostic::UnterminatedTag {
                    offset: body.start + open,
                });
                break;
            };
            self.compile_tag(&mut param, &text[open + 1..close], body.start + open + 1);
            pos = close + 1;
        }
        param
    }

    fn stray_text(&mut self, offset: usize, text: &str) {
        if !text.trim().is_empty() {
            self.diagnostics.push(Diagnostic::StrayText {
                offset,
                text: text.to_string(),
            });
        }
    }

    /// `offset` is where `body` starts in the pattern source.
    fn compile_tag(&mut self, param: &mut Parameter, body: &str, offset: usize) {
        let (head, args, args_offset) = match find_unescaped(body, 0, &['=', ':']) {
            Some(at) => (&body[..at], &body[at + 1..], offset + at + 1),
            None => (body, "", offset + body.len()),
        };
        let (name, modifiers) = split_head(head);
        let name = name.to_lowercase();

        match name.as_str() {
            "sdexversion" => self.version_directive(args),
            "paramlengthfixed" | "plf" => {
                if let Some(len) = self.length_directive("paramlengthfixed", args) {
                    param.length_fixed = Some(len);
                }
            }
            "paramlengthmin" | "plm" => {
                if let Some(len) = self.length_directive("paramlengthmin", args) {
                    param.length_min = Some(len);
                }
            }
            _ => {
                let tag = self.compile_function_tag(name, modifiers, args, args_offset);
                param.tags.push(tag);
            }
        }
    }

    /// Only the major version is compared; a mismatch is a warning.
    fn version_directive(&mut self, value: &str) {
        let value = value.trim();
        let major = value.split('.').next().unwrap_or_default();
        match major.parse::<u32>() {
            Ok(ENGINE_VERSION) => {}
            Ok(_) => self.diagnostics.push(Diagnostic::VersionMismatch {
                found: value.to_string(),
                supported: ENGINE_VERSION,
            }),
            Err(_) => self.diagnostics.push(Diagnostic::InvalidDirectiveValue {
                directive: "sdexversion",
                value: value.to_string(),
            }),
        }
    }

    /// Leading digits give the length; anything after them is reported and ignored.
    fn length_directive(&mut self, directive: &'static str, value: &str) -> Option<usize> {
        let value = value.trim();
        let digits = value
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(value.len());
        let Ok(len) = value[..digits].parse::<usize>() else {
            self.diagnostics.push(Diagnostic::InvalidDirectiveValue {
                directive,
                value: value.to_string(),
            });
            return None;
        };
        let trailing = value[digits..].trim();
        if !trailing.is_empty() {
            self.diagnostics.push(Diagnostic::TrailingText {
                directive,
                text: trailing.to_string(),
            });
        }
        Some(len)
    }

    fn compile_function_tag(
        &mut self,
        name: String,
        modifiers: Option<&str>,
        args: &str,
        args_offset: usize,
    ) -> Tag {
        let mut ops = Operators::empty();
        let function = match functions::resolve(&name, self.options.case_sensitive) {
            Some(resolution) => {
                if let Some(legacy) = resolution.legacy {
                    self.diagnostics.push(Diagnostic::LegacyAlias {
                        alias: name.clone(),
                        canonical: resolution.function.name,
                    });
                    ops.apply(legacy);
                }
                Some(resolution.function)
            }
            None => {
                self.diagnostics
                    .push(Diagnostic::UnknownFunction(name.clone()));
                None
            }
        };

        let words = modifiers
            .into_iter()
            .flat_map(|text| text.split(|c: char| c == ',' || c == '|' || c.is_whitespace()))
            .filter(|word| !word.is_empty());
        for word in words {
            match Operators::from_modifier(word) {
                Some(op) => ops.apply(op),
                None => self.diagnostics.push(Diagnostic::UnknownModifier {
                    function: name.clone(),
                    modifier: word.to_string(),
                }),
            }
        }

        let groups = match function {
            Some(function) => Tokenizer {
                function,
                nocase: ops.nocase(self.options.case_sensitive),
                options: self.options,
                depth: self.depth,
                offset: args_offset,
                diagnostics: &mut self.diagnostics,
            }
            .tokenize(args),
            None => Vec::new(),
        };
        Tag {
            name,
            function,
            ops,
            groups,
        }
    }
}

/// Split `name(mods)` or `(mods)name` into the name and the modifier text.
fn split_head(head: &str) -> (&str, Option<&str>) {
    let head = head.trim();
    if let Some(rest) = head.strip_prefix('(')
        && let Some(close) = rest.find(')')
    {
        return (rest[close + 1..].trim(), Some(&rest[..close]));
    }
    if let Some(open) = head.find('(') {
        let mods = &head[open + 1..];
        return (head[..open].trim(), Some(mods.strip_suffix(')').unwrap_or(mods)));
    }
    (head, None)
}
