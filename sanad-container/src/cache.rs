//! Singleton cache: alias → the instance built on its first resolution.

use std::collections::HashMap;
use std::sync::Arc;

use crate::value::Instance;

/// Instances of `singleton`-block aliases.
///
/// Entries are write-once: [`get_or_insert`](Self::get_or_insert) keeps
/// whichever instance was stored first.
#[derive(Debug, Clone, Default)]
pub struct SingletonCache {
    instances: HashMap<String, Instance>,
}

impl SingletonCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, alias: &str) -> Option<Instance> {
        self.instances.get(alias).cloned()
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.instances.contains_key(alias)
    }

    /// Stores `instance` under `alias` unless an instance is already
    /// there, and returns the stored one.
    pub fn get_or_insert(&mut self, alias: impl Into<String>, instance: Instance) -> Instance {
        Arc::clone(self.instances.entry(alias.into()).or_insert(instance))
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Cached aliases, sorted.
    pub fn aliases(&self) -> Vec<&str> {
        let mut aliases: Vec<&str> = self.instances.keys().map(String::as_str).collect();
        aliases.sort_unstable();
        aliases
    }
}

impl<A: Into<String>> FromIterator<(A, Instance)> for SingletonCache {
    fn from_iter<I: IntoIterator<Item = (A, Instance)>>(iter: I) -> Self {
        Self {
            instances: iter.into_iter().map(|(alias, instance)| (alias.into(), instance)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_write_wins() {
        let mut cache = SingletonCache::new();
        let first: Instance = Arc::new(1u8);
        let second: Instance = Arc::new(2u8);

        let stored = cache.get_or_insert("db", Arc::clone(&first));
        assert!(Arc::ptr_eq(&stored, &first));

        let stored = cache.get_or_insert("db", second);
        assert!(Arc::ptr_eq(&stored, &first));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn get_returns_shared_handle() {
        let instance: Instance = Arc::new(String::from("pool"));
        let cache: SingletonCache = [("db", Arc::clone(&instance))].into_iter().collect();

        let cached = cache.get("db").unwrap();
        assert!(Arc::ptr_eq(&cached, &instance));
        assert!(cache.get("cache").is_none());
        assert_eq!(cache.aliases(), vec!["db"]);
    }
}
