//! The binding table: aliases mapped to classes, arguments and lifecycle.
//!
//! A [`BindingTable`] holds one [`BindingBlock`] per [`BlockKind`]. An alias
//! is expected to live in a single block; when it does not, lookups take
//! the first match in scan order (`singleton`, then `definition`, each in
//! insertion order) and [`BindingTable::ambiguous_aliases`] reports it.

use crate::block::BlockKind;
use crate::value::Value;

/// What to construct for an alias.
#[derive(Debug, Clone, PartialEq)]
pub struct BindingEntry {
    /// Name of the class to construct
    pub class: String,
    /// Positional arguments supplied at bind time
    pub arguments: Vec<Value>,
}

impl BindingEntry {
    pub fn new(class: impl Into<String>, arguments: Vec<Value>) -> Self {
        Self {
            class: class.into(),
            arguments,
        }
    }
}

/// Aliases of one block, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BindingBlock {
    entries: Vec<(String, BindingEntry)>,
}

impl BindingBlock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites `alias`. An overwritten alias keeps its position.
    pub fn insert(&mut self, alias: impl Into<String>, entry: BindingEntry) {
        let alias = alias.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == alias) {
            Some((_, slot)) => *slot = entry,
            None => self.entries.push((alias, entry)),
        }
    }

    pub fn get(&self, alias: &str) -> Option<&BindingEntry> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == alias)
            .map(|(_, entry)| entry)
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.get(alias).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BindingEntry)> {
        self.entries.iter().map(|(alias, entry)| (alias.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<A: Into<String>> FromIterator<(A, BindingEntry)> for BindingBlock {
    fn from_iter<I: IntoIterator<Item = (A, BindingEntry)>>(iter: I) -> Self {
        let mut block = BindingBlock::new();
        for (alias, entry) in iter {
            block.insert(alias, entry);
        }
        block
    }
}

/// Both binding blocks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BindingTable {
    singleton: BindingBlock,
    definition: BindingBlock,
}

impl BindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn block(&self, kind: BlockKind) -> &BindingBlock {
        match kind {
            BlockKind::Singleton => &self.singleton,
            BlockKind::Definition => &self.definition,
        }
    }

    pub fn block_mut(&mut self, kind: BlockKind) -> &mut BindingBlock {
        match kind {
            BlockKind::Singleton => &mut self.singleton,
            BlockKind::Definition => &mut self.definition,
        }
    }

    /// Inserts or overwrites `alias` in the given block.
    ///
    /// The other block is left alone, so the same alias may end up in both.
    pub fn bind(&mut self, block: BlockKind, alias: impl Into<String>, entry: BindingEntry) {
        self.block_mut(block).insert(alias, entry);
    }

    /// Builder-style [`bind`](Self::bind).
    pub fn with(mut self, block: BlockKind, alias: impl Into<String>, entry: BindingEntry) -> Self {
        self.bind(block, alias, entry);
        self
    }

    /// Every block with its kind, in scan order.
    pub fn iter(&self) -> impl Iterator<Item = (BlockKind, &BindingBlock)> {
        BlockKind::ALL.into_iter().map(|kind| (kind, self.block(kind)))
    }

    pub fn contains_alias(&self, alias: &str) -> bool {
        self.block_of(alias).is_some()
    }

    /// The first block, in scan order, that binds `alias`.
    pub fn block_of(&self, alias: &str) -> Option<BlockKind> {
        self.iter()
            .find(|(_, block)| block.contains(alias))
            .map(|(kind, _)| kind)
    }

    pub fn entry(&self, block: BlockKind, alias: &str) -> Option<&BindingEntry> {
        self.block(block).get(alias)
    }

    /// The first alias, in scan order, whose entry targets `class`.
    pub fn alias_for_class(&self, class: &str) -> Option<&str> {
        self.iter()
            .flat_map(|(_, block)| block.iter())
            .find(|(_, entry)| entry.class == class)
            .map(|(alias, _)| alias)
    }

    /// Aliases bound in both blocks. Lookups resolve them as singletons.
    pub fn ambiguous_aliases(&self) -> Vec<&str> {
        self.singleton
            .iter()
            .map(|(alias, _)| alias)
            .filter(|alias| self.definition.contains(alias))
            .collect()
    }

    /// Every alias across both blocks, in scan order.
    pub fn aliases(&self) -> Vec<&str> {
        self.iter()
            .flat_map(|(_, block)| block.iter().map(|(alias, _)| alias))
            .collect()
    }

    /// Total number of bindings across both blocks.
    pub fn len(&self) -> usize {
        self.singleton.len() + self.definition.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(class: &str) -> BindingEntry {
        BindingEntry::new(class, vec![])
    }

    #[test]
    fn bind_and_lookup() {
        let table = BindingTable::new()
            .with(BlockKind::Singleton, "db", entry("Database"))
            .with(BlockKind::Definition, "logger", entry("FileLogger"));

        assert_eq!(table.block_of("db"), Some(BlockKind::Singleton));
        assert_eq!(table.block_of("logger"), Some(BlockKind::Definition));
        assert_eq!(table.block_of("cache"), None);
        assert_eq!(
            table.entry(BlockKind::Definition, "logger").map(|e| e.class.as_str()),
            Some("FileLogger")
        );
        assert!(table.entry(BlockKind::Singleton, "logger").is_none());
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn overwrite_keeps_position() {
        let mut block = BindingBlock::new();
        block.insert("a", entry("A"));
        block.insert("b", entry("B"));
        block.insert("a", BindingEntry::new("A2", vec![Value::from(1)]));

        let order: Vec<_> = block.iter().map(|(alias, e)| (alias, e.class.as_str())).collect();
        assert_eq!(order, vec![("a", "A2"), ("b", "B")]);
    }

    #[test]
    fn singleton_block_wins_ambiguous_alias() {
        let table = BindingTable::new()
            .with(BlockKind::Definition, "cache", entry("MemoryCache"))
            .with(BlockKind::Singleton, "cache", entry("RedisCache"));

        assert_eq!(table.block_of("cache"), Some(BlockKind::Singleton));
        assert_eq!(table.ambiguous_aliases(), vec!["cache"]);
    }

    #[test]
    fn alias_for_class_first_match() {
        let table = BindingTable::new()
            .with(BlockKind::Definition, "primary", entry("Database"))
            .with(BlockKind::Definition, "replica", entry("Database"))
            .with(BlockKind::Singleton, "pool", entry("Database"));

        assert_eq!(table.alias_for_class("Database"), Some("pool"));
        assert_eq!(table.alias_for_class("Mailer"), None);
    }

    #[test]
    fn aliases_in_scan_order() {
        let table = BindingTable::new()
            .with(BlockKind::Definition, "z", entry("Z"))
            .with(BlockKind::Singleton, "y", entry("Y"))
            .with(BlockKind::Definition, "a", entry("A"));

        assert_eq!(table.aliases(), vec!["y", "z", "a"]);
    }

    #[test]
    fn collect_block() {
        let block: BindingBlock = vec![("x", entry("X")), ("x", entry("Y"))].into_iter().collect();
        assert_eq!(block.len(), 1);
        assert_eq!(block.get("x").map(|e| e.class.as_str()), Some("Y"));
    }
}
