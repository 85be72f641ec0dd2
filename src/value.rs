//! Typed tag arguments.
//!
//! Every function declares the type of each argument slot up front; the
//! tokenizer converts argument text to that type once, at compile time.

use crate::pattern::ast::CompiledPattern;

/// Most components a single value group can carry.
pub const MAX_COMPONENTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotType {
    Int32,
    Int64,
    Text,
    Nested,
}

/// One argument slot in a function signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub kind: SlotType,
    /// Never compared case-insensitively, even under `nocase`.
    pub preserve_case: bool,
}

impl Slot {
    pub const INT32: Slot = Slot::new(SlotType::Int32);
    pub const INT64: Slot = Slot::new(SlotType::Int64);
    pub const TEXT: Slot = Slot::new(SlotType::Text);
    pub const NESTED: Slot = Slot::new(SlotType::Nested);
    pub const TEXT_PRESERVED: Slot = Slot {
        kind: SlotType::Text,
        preserve_case: true,
    };

    const fn new(kind: SlotType) -> Self {
        Self {
            kind,
            preserve_case: false,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Value {
    Int32(i32),
    Int64(i64),
    Text(String),
    Nested(Box<CompiledPattern>),
}

/// A value plus the case mode it is compared with.
#[derive(Debug, Clone)]
pub struct Component {
    pub value: Value,
    pub nocase: bool,
}

/// One alternative set of arguments for a tag.
///
/// Positions match the function signature. A blank numeric argument is
/// absent (`None`) so functions can apply their own default.
#[derive(Debug, Clone, Default)]
pub struct ValueGroup {
    components: Vec<Option<Component>>,
}

impl ValueGroup {
    pub fn new(components: Vec<Option<Component>>) -> Self {
        debug_assert!(components.len() <= MAX_COMPONENTS);
        Self { components }
    }

    /// Number of argument positions written in the pattern.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn component(&self, index: usize) -> Option<&Component> {
        self.components.get(index).and_then(Option::as_ref)
    }

    pub fn is_present(&self, index: usize) -> bool {
        self.component(index).is_some()
    }

    pub fn int32(&self, index: usize) -> Option<i32> {
        match self.component(index)?.value {
            Value::Int32(n) => Some(n),
            _ => None,
        }
    }

    pub fn int64(&self, index: usize) -> Option<i64> {
        match self.component(index)?.value {
            Value::Int64(n) => Some(n),
            _ => None,
        }
    }

    /// Text argument, or `""` when absent.
    pub fn text(&self, index: usize) -> &str {
        match self.component(index).map(|c| &c.value) {
            Some(Value::Text(text)) => text,
            _ => "",
        }
    }

    pub fn nested(&self, index: usize) -> Option<&CompiledPattern> {
        match &self.component(index)?.value {
            Value::Nested(pattern) => Some(pattern),
            _ => None,
        }
    }

    pub fn nocase(&self, index: usize) -> bool {
        self.component(index).is_some_and(|c| c.nocase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str, nocase: bool) -> Option<Component> {
        Some(Component {
            value: Value::Text(s.to_string()),
            nocase,
        })
    }

    #[test]
    fn accessors_respect_types() {
        let group = ValueGroup::new(vec![
            Some(Component {
                value: Value::Int32(5),
                nocase: false,
            }),
            None,
            text("abc", true),
        ]);
        assert_eq!(group.len(), 3);
        assert_eq!(group.int32(0), Some(5));
        assert_eq!(group.int64(0), None);
        assert_eq!(group.int32(1), None);
        assert!(!group.is_present(1));
        assert_eq!(group.text(2), "abc");
        assert!(group.nocase(2));
        assert_eq!(group.text(3), "");
        assert!(group.nested(2).is_none());
    }
}
