//! Class registry: the set of classes the resolver can construct.
//!
//! A name "identifies a constructible class" exactly when it is registered
//! here. Lookups hand out cloned descriptors so callers never hold the
//! registry while a factory runs.

use std::collections::HashMap;

use tracing::debug;

use crate::class::ClassDescriptor;

/// Stores every registered [`ClassDescriptor`] by class name.
#[derive(Debug, Default, Clone)]
pub struct ClassRegistry {
    classes: HashMap<String, ClassDescriptor>,
}

impl ClassRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a class, replacing any class of the same name.
    pub fn register(&mut self, class: ClassDescriptor) {
        let replaced = self.classes.insert(class.name().to_string(), class);
        if let Some(previous) = replaced {
            debug!(class = previous.name(), "Replaced class registration");
        }
    }

    /// Registers every class a provider declares.
    pub fn add_provider(&mut self, provider: &dyn ClassProvider) {
        debug!(provider = provider.name(), "Registering class provider");
        provider.register(self);
    }

    pub fn get(&self, name: &str) -> Option<&ClassDescriptor> {
        self.classes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// Returns the number of registered classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Returns true if no classes are registered.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Registered class names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.classes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// A module of related class registrations.
///
/// Group classes by concern and add each module to the builder:
///
/// ```rust
/// use sanad_container::class::{ClassDescriptor, Parameter};
/// use sanad_container::registry::{ClassProvider, ClassRegistry};
///
/// struct Database { dsn: String }
///
/// struct StorageClasses;
///
/// impl ClassProvider for StorageClasses {
///     fn register(&self, registry: &mut ClassRegistry) {
///         registry.register(
///             ClassDescriptor::of::<Database, _>(|args| Ok(Database { dsn: args.string(0)? }))
///                 .param(Parameter::new("dsn").default_value("sqlite::memory:")),
///         );
///     }
/// }
///
/// let mut registry = ClassRegistry::new();
/// registry.add_provider(&StorageClasses);
/// assert!(registry.contains("Database"));
/// ```
pub trait ClassProvider: Send + Sync {
    /// Register classes into the registry.
    fn register(&self, registry: &mut ClassRegistry);

    /// Optional: human-readable name for logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}
