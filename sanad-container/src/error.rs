//! Error types for Sanad container operations.
//!
//! Every error terminates the current resolution and surfaces to the
//! caller of `get`. Messages name the class, alias or parameter involved
//! and, where it helps, suggest what was probably meant.

use std::fmt;
use std::path::PathBuf;

use sanad_support::rendering::render_chain;

/// Main error type for all Sanad operations.
#[derive(Debug, thiserror::Error)]
pub enum SanadError {
    /// Name is neither a bound alias nor a registered class.
    #[error("{}", .0)]
    ClassNotFound(ClassNotFoundError),

    /// Alias vanished from the binding table between lookup and use.
    #[error("Class with alias {alias:?} not found in container")]
    AliasNotFound { alias: String },

    /// A constructor parameter has no override, no class type and no default.
    #[error("`{class}` constructor needs a value for `{parameter}` argument, bind it first")]
    MissingConstructorArgument { class: String, parameter: String },

    /// The configuration path is unset or does not reference a readable file.
    #[error("Container configuration file does not exist at path {}", display_path(.path))]
    ConfigurationNotFound { path: Option<PathBuf> },

    /// The configuration file was read but could not be understood.
    #[error("Invalid container configuration at {}: {reason}", display_path(.path))]
    InvalidConfiguration { path: Option<PathBuf>, reason: String },

    /// A name was requested again while it was still being resolved.
    #[error("{}", .0)]
    DependencyCycle(DependencyCycleError),

    /// Resolution nested deeper than [`max_depth`](crate::ContainerBuilder::max_depth).
    #[error("Resolution nested deeper than {limit} levels:\n  {}", render_chain(.chain))]
    ResolutionTooDeep { limit: usize, chain: Vec<String> },

    /// A factory received too few arguments or one of the wrong kind.
    #[error("`{class}` constructor argument #{position}: expected {expected}")]
    InvalidArgument {
        class: String,
        position: usize,
        expected: String,
    },

    /// A factory returned its own error during construction.
    #[error("Failed to construct {class}: {source}")]
    ConstructionFailed {
        class: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The resolved instance is not of the requested Rust type.
    #[error("Resolved {name:?} is not a {expected}")]
    TypeMismatch { name: String, expected: &'static str },
}

impl SanadError {
    /// Wraps an arbitrary factory error as [`SanadError::ConstructionFailed`].
    pub fn construction(
        class: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        SanadError::ConstructionFailed {
            class: class.into(),
            source: source.into(),
        }
    }
}

fn display_path(path: &Option<PathBuf>) -> String {
    match path {
        Some(path) => path.display().to_string(),
        None => "<unset>".to_string(),
    }
}

/// Error when a name cannot be resolved at all.
#[derive(Debug)]
pub struct ClassNotFoundError {
    /// The alias or class name that was requested
    pub name: String,
    /// Registered classes and bound aliases with similar names
    pub suggestions: Vec<String>,
}

impl fmt::Display for ClassNotFoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Class {} does not exist", self.name)?;

        if !self.suggestions.is_empty() {
            write!(f, "\n  Did you mean one of:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n    - {suggestion}")?;
            }
        }

        Ok(())
    }
}

/// Error when a constructor dependency leads back to itself.
///
/// Holds the names being resolved, outermost first, ending with the
/// repeated name.
#[derive(Debug)]
pub struct DependencyCycleError {
    pub chain: Vec<String>,
}

impl fmt::Display for DependencyCycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Dependency cycle detected:\n  {}",
            render_chain(&self.chain)
        )
    }
}

/// Convenient Result type for Sanad operations.
pub type Result<T> = std::result::Result<T, SanadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_not_found_display() {
        let err = SanadError::ClassNotFound(ClassNotFoundError {
            name: "FileLoger".to_string(),
            suggestions: vec!["FileLogger".to_string()],
        });

        let msg = format!("{err}");
        assert!(msg.contains("FileLoger does not exist"));
        assert!(msg.contains("- FileLogger"));
    }

    #[test]
    fn missing_argument_names_class_and_parameter() {
        let err = SanadError::MissingConstructorArgument {
            class: "Mailer".to_string(),
            parameter: "host".to_string(),
        };

        let msg = format!("{err}");
        assert!(msg.contains("`Mailer`"));
        assert!(msg.contains("`host`"));
    }

    #[test]
    fn configuration_not_found_unset_path() {
        let err = SanadError::ConfigurationNotFound { path: None };
        assert!(format!("{err}").contains("<unset>"));

        let err = SanadError::ConfigurationNotFound {
            path: Some(PathBuf::from("/etc/app/container.toml")),
        };
        assert!(format!("{err}").contains("/etc/app/container.toml"));
    }

    #[test]
    fn dependency_cycle_display() {
        let err = SanadError::DependencyCycle(DependencyCycleError {
            chain: vec!["A".into(), "B".into(), "A".into()],
        });

        let msg = format!("{err}");
        assert!(msg.contains("cycle"));
        assert!(msg.contains("A → B → A"));
    }

    #[test]
    fn resolution_too_deep_display() {
        let err = SanadError::ResolutionTooDeep {
            limit: 2,
            chain: vec!["A".into(), "B".into(), "C".into()],
        };

        let msg = format!("{err}");
        assert!(msg.contains("deeper than 2 levels"));
        assert!(msg.contains("A → B → C"));
    }

    #[test]
    fn construction_keeps_source() {
        let err = SanadError::construction("Database", "connection refused");
        assert!(format!("{err}").contains("Failed to construct Database: connection refused"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
