//! Binding lifecycle blocks.
//!
//! Every binding lives in exactly one block, and the block decides how
//! long a resolved instance lives:
//! - [`BlockKind::Singleton`]: built once, then returned forever
//! - [`BlockKind::Definition`]: built anew on every resolution
//!
//! # Scan order
//! Full scans of a binding table visit `singleton` before `definition`.
//! [`BlockKind::ALL`] is that order.

use std::fmt;
use std::str::FromStr;

use crate::error::SanadError;

/// Names one of the two binding blocks.
///
/// # Examples
/// ```
/// use sanad_container::block::BlockKind;
///
/// let block: BlockKind = "singleton".parse().unwrap();
/// assert!(block.is_cached());
/// assert_eq!(BlockKind::Definition.as_str(), "definition");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlockKind {
    /// First resolution is cached under the alias and reused for the
    /// lifetime of the container.
    ///
    /// Later overrides do not reach a cached alias, and replacing the
    /// binding table leaves the cache alone; clear it with
    /// `Container::set_singletons`.
    Singleton,

    /// Transient lifecycle. Each resolution constructs a fresh instance.
    ///
    /// This is the block `bind` uses when none is given.
    #[default]
    Definition,
}

impl BlockKind {
    /// Both blocks, in scan order.
    pub const ALL: [BlockKind; 2] = [BlockKind::Singleton, BlockKind::Definition];

    /// Returns `true` if resolved instances are cached.
    #[inline]
    pub fn is_cached(&self) -> bool {
        matches!(self, BlockKind::Singleton)
    }

    /// The block's name as it appears in configuration files.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Singleton => "singleton",
            BlockKind::Definition => "definition",
        }
    }
}

impl FromStr for BlockKind {
    type Err = SanadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "singleton" => Ok(BlockKind::Singleton),
            "definition" => Ok(BlockKind::Definition),
            other => Err(SanadError::InvalidConfiguration {
                path: None,
                reason: format!(
                    "unknown binding block {other:?}, expected \"singleton\" or \"definition\""
                ),
            }),
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_order() {
        assert_eq!(BlockKind::ALL, [BlockKind::Singleton, BlockKind::Definition]);
    }

    #[test]
    fn default_is_definition() {
        assert_eq!(BlockKind::default(), BlockKind::Definition);
    }

    #[test]
    fn only_singleton_is_cached() {
        assert!(BlockKind::Singleton.is_cached());
        assert!(!BlockKind::Definition.is_cached());
    }

    #[test]
    fn parse_round_trips_display() {
        for block in BlockKind::ALL {
            assert_eq!(block.to_string().parse::<BlockKind>().unwrap(), block);
        }
    }

    #[test]
    fn parse_is_case_sensitive() {
        assert!("Singleton".parse::<BlockKind>().is_err());
        assert!("scoped".parse::<BlockKind>().is_err());
    }
}
