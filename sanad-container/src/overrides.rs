//! Override scratch-space: caller-supplied constructor arguments by name.
//!
//! Overrides accumulate for the lifetime of a container. Every `get_with`
//! merges its arguments in (last write wins on a shared name) and nothing
//! is removed after use, so an override keeps applying to later
//! resolutions until it is replaced or the scratch-space is reset.

use std::collections::HashMap;

use crate::value::Value;

/// Parameter name → override value.
///
/// # Examples
/// ```
/// use sanad_container::overrides::Overrides;
///
/// let mut scratch = Overrides::new().with("path", "app.log");
/// scratch.merge(Overrides::new().with("path", "audit.log").with("level", 3));
///
/// assert_eq!(scratch.truthy("path").and_then(|v| v.as_str()), Some("audit.log"));
/// assert_eq!(scratch.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    values: HashMap<String, Value>,
}

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    /// Merges `other` in. Names present in both take `other`'s value.
    pub fn merge(&mut self, other: Overrides) {
        self.values.extend(other.values);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// The override for `name`, if present and truthy.
    ///
    /// A falsy override (`0`, `""`, `false`, ...) counts as absent.
    pub fn truthy(&self, name: &str) -> Option<&Value> {
        self.get(name).filter(|value| value.is_truthy())
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Names currently present, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.values.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Overrides {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut overrides = Overrides::new();
        for (name, value) in iter {
            overrides.set(name, value);
        }
        overrides
    }
}
