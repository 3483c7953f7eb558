//! Configuration providers — where a container's binding table comes from.
//!
//! The container asks its provider for a [`BindingTable`] once, the first
//! time a resolution needs one. [`StandardConfigurationProvider`] reads a
//! TOML file; implement [`ConfigurationProvider`] to build the table any
//! other way.
//!
//! # File format
//! ```toml
//! [singleton.db]
//! class = "Database"
//!
//! [definition.logger]
//! class = "FileLogger"
//! arguments = ["app.log"]
//! ```
//!
//! Tables are scanned in file order.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::binding::{BindingEntry, BindingTable};
use crate::block::BlockKind;
use crate::error::{Result, SanadError};
use crate::value::Value;

/// Produces the binding table for a container.
pub trait ConfigurationProvider: Send + Sync {
    /// Builds the binding table.
    ///
    /// # Errors
    /// - [`SanadError::ConfigurationNotFound`] — the path does not reference
    ///   readable configuration
    /// - [`SanadError::InvalidConfiguration`] — the configuration is malformed
    fn built_container(&self) -> Result<BindingTable>;

    fn configuration_path(&self) -> Option<&Path>;

    fn set_configuration_path(&mut self, path: Option<PathBuf>);

    /// Optional: human-readable name for logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Reads the binding table from a TOML file.
#[derive(Debug, Clone, Default)]
pub struct StandardConfigurationProvider {
    path: Option<PathBuf>,
}

impl StandardConfigurationProvider {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    /// Parses a binding document without touching the filesystem.
    ///
    /// ```
    /// use sanad_container::block::BlockKind;
    /// use sanad_container::provider::StandardConfigurationProvider;
    ///
    /// let table = StandardConfigurationProvider::from_toml_str(r#"
    ///     [singleton.db]
    ///     class = "Database"
    /// "#).unwrap();
    /// assert_eq!(table.block_of("db"), Some(BlockKind::Singleton));
    /// ```
    pub fn from_toml_str(source: &str) -> Result<BindingTable> {
        parse_table(source).map_err(|reason| SanadError::InvalidConfiguration { path: None, reason })
    }
}

impl ConfigurationProvider for StandardConfigurationProvider {
    #[instrument(skip(self), fields(path = ?self.path))]
    fn built_container(&self) -> Result<BindingTable> {
        let not_found = || SanadError::ConfigurationNotFound {
            path: self.path.clone(),
        };

        let path = self.path.as_deref().ok_or_else(not_found)?;
        let source = fs::read_to_string(path).map_err(|err| {
            if err.kind() != io::ErrorKind::NotFound {
                warn!(error = %err, "Configuration file is not readable");
            }
            not_found()
        })?;

        let table = parse_table(&source).map_err(|reason| SanadError::InvalidConfiguration {
            path: self.path.clone(),
            reason,
        })?;

        info!(bindings = table.len(), "Loaded binding table");
        Ok(table)
    }

    fn configuration_path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn set_configuration_path(&mut self, path: Option<PathBuf>) {
        self.path = path;
    }
}

/// One alias entry as written in the file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EntryDocument {
    #[serde(alias = "classname")]
    class: String,
    #[serde(default)]
    arguments: Vec<toml::Value>,
}

fn parse_table(source: &str) -> std::result::Result<BindingTable, String> {
    let document: toml::Table = toml::from_str(source).map_err(|err| err.to_string())?;
    let mut table = BindingTable::new();

    for (block_name, aliases) in document {
        let block: BlockKind = block_name.parse().map_err(|err: SanadError| match err {
            SanadError::InvalidConfiguration { reason, .. } => reason,
            other => other.to_string(),
        })?;

        let toml::Value::Table(aliases) = aliases else {
            return Err(format!("block {block_name:?} must be a table of aliases"));
        };

        for (alias, entry) in aliases {
            let entry: EntryDocument = entry
                .try_into()
                .map_err(|err: toml::de::Error| format!("{block_name}.{alias}: {}", err.message()))?;

            debug!(%block, %alias, class = %entry.class, "Parsed binding");
            table.bind(
                block,
                alias,
                BindingEntry::new(entry.class, entry.arguments.into_iter().map(Value::from).collect()),
            );
        }
    }

    for alias in table.ambiguous_aliases() {
        warn!(%alias, "Alias bound in both blocks, the singleton binding wins");
    }

    Ok(table)
}
