//! Tags: `{function(modifiers)=group;group}` clauses attached to a parameter.

use std::slice;

use bitflags::bitflags;

use crate::functions::{EvalContext, Function, Mode};
use crate::span::AnnotatedSpan;
use crate::value::ValueGroup;

bitflags! {
    /// How a tag combines the results of its value groups.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Operators: u8 {
        const AND = 1 << 0;
        const OR = 1 << 1;
        const XOR = 1 << 2;
        const XNOR = 1 << 3;
        const NOT = 1 << 4;
        const NOCASE = 1 << 5;
        const FORCECASE = 1 << 6;

        const NAND = Self::AND.bits() | Self::NOT.bits();
        const NOR = Self::OR.bits() | Self::NOT.bits();
        const NXOR = Self::XOR.bits() | Self::NOT.bits();
        const NXNOR = Self::XNOR.bits() | Self::NOT.bits();
    }
}

impl Operators {
    const COMBINATORS: Operators = Operators::AND
        .union(Operators::OR)
        .union(Operators::XOR)
        .union(Operators::XNOR);
    const CASE: Operators = Operators::NOCASE.union(Operators::FORCECASE);

    /// Parse one modifier word.
    pub fn from_modifier(word: &str) -> Option<Operators> {
        let ops = match word.to_ascii_lowercase().as_str() {
            "and" | "all" => Operators::AND,
            "or" | "any" => Operators::OR,
            "xor" | "one" => Operators::XOR,
            "xnor" | "same" => Operators::XNOR,
            "not" => Operators::NOT,
            "nand" => Operators::NAND,
            "nor" => Operators::NOR,
            "nxor" => Operators::NXOR,
            "nxnor" => Operators::NXNOR,
            "nocase" | "icase" => Operators::NOCASE,
            "case" | "forcecase" => Operators::FORCECASE,
            _ => return None,
        };
        Some(ops)
    }

    /// Add `other`. A combinator replaces any earlier combinator and a case
    /// flag replaces the opposite one; `NOT` accumulates.
    pub fn apply(&mut self, other: Operators) {
        if other.intersects(Self::COMBINATORS) {
            self.remove(Self::COMBINATORS);
        }
        if other.intersects(Self::CASE) {
            self.remove(Self::CASE);
        }
        self.insert(other);
    }

    pub fn combinator(self) -> Combinator {
        if self.contains(Operators::AND) {
            Combinator::And
        } else if self.contains(Operators::XOR) {
            Combinator::Xor
        } else if self.contains(Operators::XNOR) {
            Combinator::Xnor
        } else {
            Combinator::Or
        }
    }

    /// Resolve the case mode against the pattern default.
    pub fn nocase(self, case_sensitive: bool) -> bool {
        if self.contains(Operators::NOCASE) {
            true
        } else if self.contains(Operators::FORCECASE) {
            false
        } else {
            !case_sensitive
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    And,
    Or,
    Xor,
    Xnor,
}

/// Result of the previous value group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Previous {
    Unset,
    True,
    False,
}

impl From<bool> for Previous {
    fn from(result: bool) -> Self {
        if result { Previous::True } else { Previous::False }
    }
}

/// Outcome of feeding one more group result to a combinator.
enum Step {
    Continue(Previous),
    Done(bool),
}

impl Combinator {
    fn step(self, previous: Previous, result: bool) -> Step {
        match (self, previous, result) {
            (Combinator::And, _, false) => Step::Done(false),
            (Combinator::And, _, true) => Step::Continue(Previous::True),
            (Combinator::Or, _, true) => Step::Done(true),
            (Combinator::Or, _, false) => Step::Continue(Previous::False),
            // A second true group breaks "exactly one".
            (Combinator::Xor, Previous::True, true) => Step::Done(false),
            (Combinator::Xor, Previous::True, false) => Step::Continue(Previous::True),
            (Combinator::Xor, Previous::Unset | Previous::False, result) => {
                Step::Continue(result.into())
            }
            (Combinator::Xnor, Previous::Unset, result) => Step::Continue(result.into()),
            (Combinator::Xnor, previous, result) if previous == Previous::from(result) => {
                Step::Continue(previous)
            }
            (Combinator::Xnor, _, _) => Step::Done(false),
        }
    }

    /// Verdict once every group has been seen.
    fn finish(self, previous: Previous) -> bool {
        match self {
            Combinator::And | Combinator::Xnor => true,
            Combinator::Or => false,
            Combinator::Xor => previous == Previous::True,
        }
    }
}

/// One compiled `{...}` clause.
#[derive(Debug, Clone)]
pub struct Tag {
    /// Function name as written.
    pub name: String,
    /// `None` when the name is unknown; the tag is then a no-op.
    pub function: Option<&'static Function>,
    pub ops: Operators,
    pub groups: Vec<ValueGroup>,
}

impl Tag {
    /// Evaluate against `span`, possibly rewriting it.
    ///
    /// Groups run in order against the span as left by the last group that
    /// succeeded; a failing group's rewrites are discarded.
    pub fn evaluate(&self, span: &mut AnnotatedSpan, ctx: &mut EvalContext<'_>) -> bool {
        let Some(function) = self.function else {
            return ctx.mode == Mode::Format;
        };
        let empty = ValueGroup::default();
        let groups = if self.groups.is_empty() {
            slice::from_ref(&empty)
        } else {
            self.groups.as_slice()
        };

        let combinator = self.ops.combinator();
        let mut previous = Previous::Unset;
        let mut verdict = None;
        for group in groups {
            let mut candidate = span.clone();
            let result = (function.eval)(&mut candidate, group, ctx);
            if result {
                *span = candidate;
            }
            match combinator.step(previous, result) {
                Step::Continue(next) => previous = next,
                Step::Done(done) => {
                    verdict = Some(done);
                    break;
                }
            }
        }
        let verdict = verdict.unwrap_or_else(|| combinator.finish(previous));
        let verdict = verdict != self.ops.contains(Operators::NOT);
        tracing::trace!(tag = %self.name, verdict, "evaluated tag");
        verdict
    }

    /// Adjust `sample` so this tag would accept it.
    pub fn example(&self, sample: &mut String) {
        if self.ops.contains(Operators::NOT) {
            return;
        }
        if let (Some(function), Some(group)) = (self.function, self.groups.first()) {
            (function.example)(sample, group);
        }
    }
}
