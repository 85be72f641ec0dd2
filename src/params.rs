//! Named parameter values threaded through matching and formatting.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A parameter value: literal text, or a producer evaluated on each lookup.
#[derive(Clone)]
pub enum ParamValue {
    Text(String),
    Lazy(Arc<dyn Fn() -> String + Send + Sync>),
}

impl ParamValue {
    pub fn lazy(producer: impl Fn() -> String + Send + Sync + 'static) -> Self {
        Self::Lazy(Arc::new(producer))
    }

    pub fn resolve(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Lazy(producer) => producer(),
        }
    }
}

impl fmt::Debug for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Lazy(_) => f.write_str("Lazy(..)"),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// Map of parameter name to value.
///
/// The empty name is the anonymous parameter. Nested patterns see the value
/// a tag is operating on through it.
#[derive(Debug, Clone, Default)]
pub struct ParamMap {
    values: HashMap<String, ParamValue>,
}

impl ParamMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.values.insert(name.into(), value.into());
    }

    /// Insert a value that is produced on demand.
    pub fn insert_lazy(
        &mut self,
        name: impl Into<String>,
        producer: impl Fn() -> String + Send + Sync + 'static,
    ) {
        self.values.insert(name.into(), ParamValue::lazy(producer));
    }

    /// Resolve a value by name.
    pub fn get(&self, name: &str) -> Option<String> {
        self.values.get(name).map(ParamValue::resolve)
    }

    /// Remove a value and resolve it.
    pub fn take(&mut self, name: &str) -> Option<String> {
        self.values.remove(name).map(|value| value.resolve())
    }

    pub fn remove(&mut self, name: &str) -> Option<ParamValue> {
        self.values.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Names of every stored parameter, sorted.
    pub fn sorted_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.values.keys().map(|s| s.as_str()).collect();
        names.sort();
        names
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for ParamMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (name, value) in iter {
            map.insert(name, value);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn lazy_value_is_evaluated_per_lookup() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut params = ParamMap::new();
        params.insert_lazy("time", move || {
            counter.fetch_add(1, Ordering::SeqCst);
            "12:00".to_string()
        });
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(params.get("time").as_deref(), Some("12:00"));
        assert_eq!(params.get("time").as_deref(), Some("12:00"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn take_removes() {
        let mut params: ParamMap = [("nick", "bob")].into_iter().collect();
        assert_eq!(params.take("nick").as_deref(), Some("bob"));
        assert!(!params.contains("nick"));
        assert!(params.is_empty());
    }

    #[test]
    fn sorted_names() {
        let params: ParamMap = [("b", "1"), ("a", "2")].into_iter().collect();
        assert_eq!(params.sorted_names(), vec!["a", "b"]);
    }
}
