//! The built-in function library.
//!
//! Every tag names one [`Function`]. A function declares a fixed argument
//! signature and two behaviors with the same dispatch shape: `eval`, run by
//! the matcher and the formatter, and `example`, which bends a sample value
//! until `eval` would accept it.

mod delimit;
mod mutators;
mod nested;
mod predicates;

use phf::{Map, phf_map};

use crate::params::ParamMap;
use crate::pattern::FormatOptions;
use crate::pattern::tag::Operators;
use crate::span::AnnotatedSpan;
use crate::value::{Slot, ValueGroup};

pub use delimit::DelimitFlags;

/// Which interpreter is evaluating a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Check,
    Format,
}

/// State threaded through tag evaluation.
pub struct EvalContext<'p> {
    pub params: &'p mut ParamMap,
    pub mode: Mode,
    /// Nesting depth of the pattern being evaluated.
    pub depth: usize,
    /// Options for nested formatting.
    pub options: FormatOptions,
}

pub type EvalFn = fn(&mut AnnotatedSpan, &ValueGroup, &mut EvalContext<'_>) -> bool;
pub type ExampleFn = fn(&mut String, &ValueGroup);

#[derive(Debug)]
pub struct Function {
    pub name: &'static str,
    /// Legacy short name.
    pub alias: &'static str,
    pub signature: &'static [Slot],
    /// Arguments that must be written in every group.
    pub min_args: usize,
    pub eval: EvalFn,
    pub example: ExampleFn,
}

/// Map of canonical function names to their definitions.
/// Please keep names sorted alphabetically.
static FUNCTIONS: Map<&'static str, Function> = phf_map! {
    "append" => Function {
        name: "append",
        alias: "ap",
        signature: &[Slot::TEXT_PRESERVED, Slot::TEXT_PRESERVED],
        min_args: 1,
        eval: mutators::append,
        example: mutators::unchanged,
    },
    "charset" => Function {
        name: "charset",
        alias: "cs",
        signature: &[Slot::TEXT],
        min_args: 1,
        eval: predicates::charset,
        example: predicates::charset_example,
    },
    "contains" => Function {
        name: "contains",
        alias: "c",
        signature: &[Slot::TEXT],
        min_args: 1,
        eval: predicates::contains,
        example: predicates::contains_example,
    },
    "copy" => Function {
        name: "copy",
        alias: "cp",
        signature: &[Slot::TEXT_PRESERVED],
        min_args: 1,
        eval: mutators::copy,
        example: mutators::unchanged,
    },
    "delete" => Function {
        name: "delete",
        alias: "x",
        signature: &[Slot::TEXT],
        min_args: 1,
        eval: mutators::delete,
        example: mutators::unchanged,
    },
    "delimit" => Function {
        name: "delimit",
        alias: "d",
        signature: &[Slot::TEXT, Slot::TEXT, Slot::TEXT_PRESERVED, Slot::TEXT_PRESERVED],
        min_args: 1,
        eval: delimit::delimit,
        example: delimit::delimit_example,
    },
    "ends" => Function {
        name: "ends",
        alias: "t",
        signature: &[Slot::TEXT],
        min_args: 1,
        eval: predicates::ends,
        example: predicates::ends_example,
    },
    "equals" => Function {
        name: "equals",
        alias: "eq",
        signature: &[Slot::TEXT],
        min_args: 1,
        eval: predicates::equals,
        example: predicates::equals_example,
    },
    "format" => Function {
        name: "format",
        alias: "f",
        signature: &[Slot::NESTED],
        min_args: 1,
        eval: nested::format,
        example: mutators::unchanged,
    },
    "ifelse" => Function {
        name: "ifelse",
        alias: "if",
        signature: &[Slot::NESTED, Slot::NESTED, Slot::NESTED],
        min_args: 2,
        eval: nested::ifelse,
        example: mutators::unchanged,
    },
    "insert" => Function {
        name: "insert",
        alias: "i",
        signature: &[Slot::INT32, Slot::TEXT_PRESERVED],
        min_args: 2,
        eval: mutators::insert,
        example: mutators::unchanged,
    },
    "length" => Function {
        name: "length",
        alias: "l",
        signature: &[Slot::INT32, Slot::INT32],
        min_args: 1,
        eval: predicates::length,
        example: predicates::length_example,
    },
    "number32" => Function {
        name: "number32",
        alias: "n",
        signature: &[Slot::INT32, Slot::INT32],
        min_args: 1,
        eval: predicates::number32,
        example: predicates::number32_example,
    },
    "number64" => Function {
        name: "number64",
        alias: "nl",
        signature: &[Slot::INT64, Slot::INT64],
        min_args: 1,
        eval: predicates::number64,
        example: predicates::number64_example,
    },
    "pattern" => Function {
        name: "pattern",
        alias: "pt",
        signature: &[Slot::NESTED],
        min_args: 1,
        eval: nested::pattern,
        example: nested::pattern_example,
    },
    "replace" => Function {
        name: "replace",
        alias: "r",
        signature: &[Slot::TEXT, Slot::TEXT_PRESERVED],
        min_args: 1,
        eval: mutators::replace,
        example: mutators::unchanged,
    },
    "resize" => Function {
        name: "resize",
        alias: "rs",
        signature: &[Slot::INT32, Slot::TEXT_PRESERVED],
        min_args: 1,
        eval: mutators::resize,
        example: mutators::unchanged,
    },
    "split" => Function {
        name: "split",
        alias: "sl",
        signature: &[Slot::TEXT_PRESERVED, Slot::NESTED, Slot::TEXT_PRESERVED],
        min_args: 2,
        eval: nested::split,
        example: mutators::unchanged,
    },
    "starts" => Function {
        name: "starts",
        alias: "s",
        signature: &[Slot::TEXT],
        min_args: 1,
        eval: predicates::starts,
        example: predicates::starts_example,
    },
    "strip" => Function {
        name: "strip",
        alias: "sp",
        signature: &[Slot::TEXT_PRESERVED],
        min_args: 0,
        eval: mutators::strip,
        example: mutators::unchanged,
    },
    "validate" => Function {
        name: "validate",
        alias: "v",
        signature: &[Slot::TEXT_PRESERVED, Slot::NESTED],
        min_args: 2,
        eval: nested::validate,
        example: mutators::unchanged,
    },
};

/// Map of legacy short names to canonical names.
static ALIASES: Map<&'static str, &'static str> = phf_map! {
    "ap" => "append",
    "c" => "contains",
    "cp" => "copy",
    "cs" => "charset",
    "d" => "delimit",
    "eq" => "equals",
    "f" => "format",
    "i" => "insert",
    "if" => "ifelse",
    "l" => "length",
    "n" => "number32",
    "nl" => "number64",
    "pt" => "pattern",
    "r" => "replace",
    "rs" => "resize",
    "s" => "starts",
    "sl" => "split",
    "sp" => "strip",
    "t" => "ends",
    "v" => "validate",
    "x" => "delete",
};

/// A function name resolved to its definition.
#[derive(Debug, Clone, Copy)]
pub struct Resolution {
    pub function: &'static Function,
    /// Set when the name used legacy syntax; holds the operators its suffix implied.
    pub legacy: Option<Operators>,
}

/// Look up a function by canonical name.
pub fn lookup(name: &str) -> Option<&'static Function> {
    FUNCTIONS.get(name)
}

/// Every function, in no particular order.
pub fn all() -> impl Iterator<Item = &'static Function> {
    FUNCTIONS.values()
}

fn by_alias(alias: &str) -> Option<&'static Function> {
    ALIASES.get(alias).and_then(|name| lookup(name))
}

/// Resolve a canonical name, a legacy alias, or a legacy alias followed by
/// operator suffixes (`a`/`all` = AND, `n` = NOT, `c` = case override).
///
/// `case_sensitive` is the pattern default the `c` suffix overrides.
pub fn resolve(name: &str, case_sensitive: bool) -> Option<Resolution> {
    if let Some(function) = lookup(name) {
        return Some(Resolution {
            function,
            legacy: None,
        });
    }
    if let Some(function) = by_alias(name) {
        return Some(Resolution {
            function,
            legacy: Some(Operators::empty()),
        });
    }
    // Longest alias first, so "nl" + "a" wins over "n" + "la".
    (1..name.len())
        .rev()
        .filter(|&split| name.is_char_boundary(split))
        .find_map(|split| {
            let function = by_alias(&name[..split])?;
            let ops = legacy_suffix(&name[split..], case_sensitive)?;
            Some(Resolution {
                function,
                legacy: Some(ops),
            })
        })
}

fn legacy_suffix(mut suffix: &str, case_sensitive: bool) -> Option<Operators> {
    let case_override = if case_sensitive {
        Operators::NOCASE
    } else {
        Operators::FORCECASE
    };
    let mut ops = Operators::empty();
    while !suffix.is_empty() {
        let (op, rest) = if let Some(rest) = suffix.strip_prefix("all") {
            (Operators::AND, rest)
        } else if let Some(rest) = suffix.strip_prefix('a') {
            (Operators::AND, rest)
        } else if let Some(rest) = suffix.strip_prefix('n') {
            (Operators::NOT, rest)
        } else if let Some(rest) = suffix.strip_prefix('c') {
            (case_override, rest)
        } else {
            return None;
        };
        ops.apply(op);
        suffix = rest;
    }
    Some(ops)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_alias_resolves() {
        for (alias, name) in ALIASES.entries() {
            let function = lookup(name).expect("alias target exists");
            assert_eq!(function.alias, *alias);
        }
        for function in all() {
            assert_eq!(ALIASES.get(function.alias), Some(&function.name));
            assert!(function.signature.len() <= crate::value::MAX_COMPONENTS);
            assert!(function.min_args <= function.signature.len());
        }
    }

    #[test]
    fn canonical_is_not_legacy() {
        let resolution = resolve("length", true).unwrap();
        assert_eq!(resolution.function.name, "length");
        assert!(resolution.legacy.is_none());
    }

    #[test]
    fn bare_alias_is_legacy() {
        let resolution = resolve("l", true).unwrap();
        assert_eq!(resolution.function.name, "length");
        assert_eq!(resolution.legacy, Some(Operators::empty()));
    }

    #[test]
    fn legacy_suffixes() {
        let resolution = resolve("lall", true).unwrap();
        assert_eq!(resolution.function.name, "length");
        assert_eq!(resolution.legacy, Some(Operators::AND));

        let resolution = resolve("can", true).unwrap();
        assert_eq!(resolution.function.name, "contains");
        assert_eq!(resolution.legacy, Some(Operators::AND | Operators::NOT));

        let resolution = resolve("eqc", true).unwrap();
        assert_eq!(resolution.function.name, "equals");
        assert_eq!(resolution.legacy, Some(Operators::NOCASE));

        let resolution = resolve("eqc", false).unwrap();
        assert_eq!(resolution.legacy, Some(Operators::FORCECASE));
    }

    #[test]
    fn longest_alias_wins() {
        let resolution = resolve("nla", true).unwrap();
        assert_eq!(resolution.function.name, "number64");
        assert_eq!(resolution.legacy, Some(Operators::AND));
    }

    #[test]
    fn unknown_names() {
        assert!(resolve("unknownfn", true).is_none());
        assert!(resolve("lz", true).is_none());
        assert!(resolve("", true).is_none());
    }
}
