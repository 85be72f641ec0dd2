//! A structured pattern matching and template substitution engine.
//!
//! One compiled pattern both parses text into named parameters and renders
//! parameters back into text.
//!
//! # Example
//!
//! ```rust
//! use sdex::{FormatOptions, ParamMap, Pattern};
//!
//! let pattern = Pattern::new("<%[nick]> %[msg{strip}]");
//!
//! // Parse a line into parameters
//! let mut params = ParamMap::new();
//! assert!(pattern.check("<bob>  hi there ", &mut params).is_some());
//! assert_eq!(params.get("nick").as_deref(), Some("bob"));
//! assert_eq!(params.get("msg").as_deref(), Some("hi there"));
//!
//! // Render it back with a different nick
//! params.insert("nick", "alice");
//! let line = pattern.format_string(&mut params, FormatOptions::default());
//! assert_eq!(line.as_deref(), Some("<alice> hi there"));
//! ```

pub mod diagnostics;
pub mod escape;
pub mod functions;
mod params;
pub mod pattern;
mod span;
pub mod value;

pub use diagnostics::{Diagnostic, Diagnostics};
pub use escape::{escape, escape_hex, unescape, unescape_hex};
pub use params::{ParamMap, ParamValue};
pub use pattern::{CompileOptions, CompiledPattern, FormatOptions, Pattern, compile};
pub use span::{AnnotatedSpan, render};
