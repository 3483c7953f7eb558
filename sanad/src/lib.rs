//! # Sanad — configuration-driven dependency injection for Rust
//!
//! Resolve a class by alias or name and get it back fully constructed,
//! with every constructor parameter filled from caller overrides, other
//! classes, or declared defaults. Aliases, fixed arguments and lifecycles
//! come from a binding table, typically loaded from a TOML file.

pub use sanad_container::*;
pub use sanad_support::*;
