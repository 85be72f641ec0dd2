//! sdex pattern engine.
//!
//! A pattern is literal text interleaved with `%[...]` parameters. The same
//! compiled pattern can `check` input (capturing parameter values) or
//! `format` output (substituting them).
//!
//! # Pattern syntax
//!
//! | Token                      | Meaning                                          |
//! |----------------------------|--------------------------------------------------|
//! | `text`                     | Literal text                                     |
//! | `\c`                       | Literal `c` (escapes `%`, `[`, `{`, `\` ...)     |
//! | `%[name]`                  | Named parameter                                  |
//! | `%[]`                      | Anonymous parameter                              |
//! | `%[name{f=a,b}]`           | Parameter with a tag calling function `f`        |
//! | `{f=a;b}`                  | Several value groups, combined by an operator    |
//! | `{f(not,all)=...}`         | Modifiers: `and or xor xnor not nand nor nxor nxnor nocase forcecase` |
//! | `{f:...}`                  | `:` may replace `=`                              |
//! | `{paramlengthfixed=n}`     | Parameter is exactly `n` characters (`plf`)      |
//! | `{paramlengthmin=n}`       | Parameter is at least `n` characters (`plm`)     |
//! | `{sdexversion=n}`          | Pattern language version check                   |
//!
//! Tag arguments of nested-pattern functions (`format`, `ifelse`, `split`,
//! `pattern`, `validate`) are themselves patterns, in which `%[]` stands for
//! the value being processed.

pub mod ast;
pub mod char_class;
pub mod example;
mod formatter;
mod handle;
mod matcher;
pub mod parser;
pub mod tag;
mod tokenizer;


pub use ast::{CompileOptions, CompiledPattern, DEFAULT_MAX_DEPTH, Literal, Parameter, Part};
pub use example::example;
pub use formatter::FormatOptions;
pub use handle::Pattern;
pub use parser::{ENGINE_VERSION, compile};
pub use tag::{Combinator, Operators, Tag};

pub(crate) use formatter::format_parts;
pub(crate) use matcher::check_parts;
