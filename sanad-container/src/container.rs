//! # The Container — heart of Sanad
//!
//! Resolves an alias or class name to a fully constructed instance,
//! recursively filling every constructor parameter from caller overrides,
//! other classes, or declared defaults.
//!
//! # Architecture
//! ```text
//! get(name, overrides)
//!   │  merge overrides into the scratch-space
//!   ├─ alias in binding table? ── resolve_by_alias ──┐
//!   ├─ registered class?  ─────── resolve_by_class ──┤ (first alias targeting it, if any)
//!   └─ ClassNotFound                                 ▼
//!                                 resolve_constructor_dependencies
//!                                   per parameter: override → class → default
//!                                   construct, cache if singleton
//! ```
//!
//! # Examples
//! ```rust
//! use sanad_container::prelude::*;
//!
//! struct FileLogger {
//!     path: String,
//! }
//!
//! let container = Container::builder()
//!     .class(
//!         ClassDescriptor::of::<FileLogger, _>(|args| Ok(FileLogger { path: args.string(0)? }))
//!             .param(Parameter::new("path")),
//!     )
//!     .build();
//!
//! container.bind("logger", "FileLogger", vec![Value::from("app.log")], BlockKind::Definition);
//!
//! let logger = container.get_as::<FileLogger>("logger").expect("Failed to resolve");
//! assert_eq!(logger.path, "app.log");
//! ```

use std::any::{Any, type_name};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use sanad_support::rendering::suggest_similar;
use tracing::{debug, instrument, trace, warn};

use crate::binding::{BindingEntry, BindingTable};
use crate::block::BlockKind;
use crate::class::{ClassDescriptor, Parameter};
use crate::cache::SingletonCache;
use crate::error::{ClassNotFoundError, DependencyCycleError, Result, SanadError};
use crate::overrides::Overrides;
use crate::provider::{ConfigurationProvider, StandardConfigurationProvider};
use crate::registry::{ClassProvider, ClassRegistry};
use crate::value::{Instance, Value};

const MAX_SUGGESTIONS: usize = 3;

// ============================================================
// ContainerBuilder
// ============================================================

/// Builds a [`Container`].
///
/// # Examples
/// ```rust,ignore
/// let container = Container::builder()
///     .configuration_path("config/container.toml")
///     .add_provider(&StorageClasses)
///     .class(ClassDescriptor::of::<Mailer, _>(|args| { ... }))
///     .max_depth(32)
///     .build();
/// ```
pub struct ContainerBuilder {
    registry: ClassRegistry,
    configuration_path: Option<PathBuf>,
    provider: Option<Box<dyn ConfigurationProvider>>,
    table: Option<BindingTable>,
    max_depth: Option<usize>,
}

impl ContainerBuilder {
    fn new() -> Self {
        Self {
            registry: ClassRegistry::new(),
            configuration_path: None,
            provider: None,
            table: None,
            max_depth: None,
        }
    }

    /// Where the binding table is loaded from on first use.
    pub fn configuration_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.configuration_path = Some(path.into());
        self
    }

    /// Replaces the TOML file provider.
    ///
    /// The container still pushes its configuration path into the
    /// provider before asking it for the table.
    pub fn configuration_provider(mut self, provider: impl ConfigurationProvider + 'static) -> Self {
        self.provider = Some(Box::new(provider));
        self
    }

    /// Starts with this binding table instead of loading one.
    pub fn binding_table(mut self, table: BindingTable) -> Self {
        self.table = Some(table);
        self
    }

    /// Registers a class.
    pub fn class(mut self, class: ClassDescriptor) -> Self {
        self.registry.register(class);
        self
    }

    /// Registers every class a [`ClassProvider`] declares.
    pub fn add_provider(mut self, provider: &dyn ClassProvider) -> Self {
        self.registry.add_provider(provider);
        self
    }

    /// Caps how deeply resolutions may nest. Deeper chains fail with
    /// [`SanadError::ResolutionTooDeep`].
    ///
    /// Unlimited by default; `0` removes a previously set cap. Cycles are
    /// reported as [`SanadError::DependencyCycle`] whether or not a cap is set.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = (depth > 0).then_some(depth);
        self
    }

    pub fn build(self) -> Container {
        debug!(
            classes = self.registry.len(),
            configuration_path = ?self.configuration_path,
            max_depth = ?self.max_depth,
            "Building container"
        );

        Container {
            classes: RwLock::new(self.registry),
            table: RwLock::new(self.table.map(Arc::new)),
            singletons: Mutex::new(SingletonCache::new()),
            overrides: Mutex::new(Overrides::new()),
            configuration_path: RwLock::new(self.configuration_path),
            provider: Mutex::new(self.provider),
            max_depth: self.max_depth,
        }
    }
}

// ═══════════════════════════════════════════
// Container
// ═══════════════════════════════════════════

/// Thread-safe dependency injection container.
///
/// All state is private to one container. No lock is held while a factory
/// runs or a nested dependency resolves.
pub struct Container {
    classes: RwLock<ClassRegistry>,
    table: RwLock<Option<Arc<BindingTable>>>,
    singletons: Mutex<SingletonCache>,
    overrides: Mutex<Overrides>,
    configuration_path: RwLock<Option<PathBuf>>,
    provider: Mutex<Option<Box<dyn ConfigurationProvider>>>,
    max_depth: Option<usize>,
}

impl Container {
    /// A container with no configuration path and no classes.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// A container that loads its binding table from `path` on first use.
    pub fn with_configuration(path: impl Into<PathBuf>) -> Self {
        Self::builder().configuration_path(path).build()
    }

    /// Create a new builder.
    pub fn builder() -> ContainerBuilder {
        ContainerBuilder::new()
    }

    // ── Resolution ──

    /// Resolves an alias or class name.
    pub fn get(&self, name: &str) -> Result<Instance> {
        self.get_with(name, Overrides::new())
    }

    /// Resolves an alias or class name after merging `arguments` into the
    /// override scratch-space.
    ///
    /// Overrides stay in the scratch-space afterwards and keep applying to
    /// later resolutions; see [`reset_overrides`](Self::reset_overrides).
    #[instrument(skip(self, arguments), fields(overrides = arguments.len()))]
    pub fn get_with(&self, name: &str, arguments: Overrides) -> Result<Instance> {
        self.merge_overrides(arguments);

        let mut resolution = Resolution {
            table: self.binding_table()?,
            chain: Vec::new(),
        };
        self.resolve(&mut resolution, name)
    }

    /// Resolves `name` and downcasts the instance to `T`.
    ///
    /// ```rust,ignore
    /// let db: Arc<Database> = container.get_as("db")?;
    /// ```
    pub fn get_as<T: Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>> {
        self.get_as_with(name, Overrides::new())
    }

    /// [`get_with`](Self::get_with), downcast to `T`.
    pub fn get_as_with<T: Any + Send + Sync>(&self, name: &str, arguments: Overrides) -> Result<Arc<T>> {
        self.get_with(name, arguments)?
            .downcast::<T>()
            .map_err(|_| SanadError::TypeMismatch {
                name: name.to_string(),
                expected: type_name::<T>(),
            })
    }

    // ── Bindings ──

    /// Binds `alias` to `class` in `block`, overwriting any previous
    /// binding of `alias` in that block.
    ///
    /// Neither the class nor alias uniqueness across blocks is checked.
    /// Binding before the table is first loaded starts an empty table, and
    /// the configuration file is then never read.
    pub fn bind(
        &self,
        alias: impl Into<String>,
        class: impl Into<String>,
        arguments: Vec<Value>,
        block: BlockKind,
    ) {
        let alias = alias.into();
        let entry = BindingEntry::new(class, arguments);
        debug!(%alias, class = %entry.class, %block, "Binding alias");

        let mut slot = self.table.write();
        let table = slot.get_or_insert_with(|| Arc::new(BindingTable::new()));
        Arc::make_mut(table).bind(block, alias, entry);
    }

    /// Binds a transient alias with no fixed arguments.
    pub fn bind_definition(&self, alias: impl Into<String>, class: impl Into<String>) {
        self.bind(alias, class, Vec::new(), BlockKind::Definition);
    }

    /// Binds a singleton alias with no fixed arguments.
    ///
    /// Construction is not serialized: threads that miss the cache at the
    /// same time each run the factory, the first instance stored is kept
    /// and every caller receives it. The other instances are dropped, so
    /// factories with side effects may run more than once.
    pub fn bind_singleton(&self, alias: impl Into<String>, class: impl Into<String>) {
        self.bind(alias, class, Vec::new(), BlockKind::Singleton);
    }

    // ── Classes ──

    /// Registers a class, replacing any class of the same name.
    pub fn register(&self, class: ClassDescriptor) {
        debug!(class = class.name(), "Registering class");
        self.classes.write().register(class);
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.classes.read().contains(name)
    }

    // ── State accessors ──

    /// The binding table, loading it through the configuration provider
    /// the first time.
    pub fn binding_table(&self) -> Result<Arc<BindingTable>> {
        if let Some(table) = self.table.read().as_ref() {
            return Ok(Arc::clone(table));
        }

        let loaded = Arc::new(self.load_binding_table()?);
        let mut slot = self.table.write();
        Ok(Arc::clone(slot.get_or_insert(loaded)))
    }

    /// Replaces the binding table wholesale.
    pub fn set_binding_table(&self, table: BindingTable) {
        debug!(bindings = table.len(), "Replacing binding table");
        *self.table.write() = Some(Arc::new(table));
    }

    /// A snapshot of the singleton cache.
    pub fn singletons(&self) -> SingletonCache {
        self.singletons.lock().clone()
    }

    /// Replaces the singleton cache wholesale.
    pub fn set_singletons(&self, singletons: SingletonCache) {
        *self.singletons.lock() = singletons;
    }

    /// A snapshot of the override scratch-space.
    pub fn overrides(&self) -> Overrides {
        self.overrides.lock().clone()
    }

    /// Merges into the override scratch-space, last write winning.
    pub fn merge_overrides(&self, overrides: Overrides) {
        if !overrides.is_empty() {
            trace!(names = ?overrides.names(), "Merging overrides");
            self.overrides.lock().merge(overrides);
        }
    }

    /// Replaces the override scratch-space wholesale.
    pub fn set_overrides(&self, overrides: Overrides) {
        *self.overrides.lock() = overrides;
    }

    /// Empties the override scratch-space.
    pub fn reset_overrides(&self) {
        self.overrides.lock().clear();
    }

    pub fn configuration_path(&self) -> Option<PathBuf> {
        self.configuration_path.read().clone()
    }

    /// Changes where the binding table is loaded from.
    ///
    /// Has no effect on a table that is already loaded.
    pub fn set_configuration_path(&self, path: Option<PathBuf>) {
        *self.configuration_path.write() = path;
    }

    /// Replaces the configuration provider.
    pub fn set_configuration_provider(&self, provider: impl ConfigurationProvider + 'static) {
        *self.provider.lock() = Some(Box::new(provider));
    }

    // ── Internal ──

    fn load_binding_table(&self) -> Result<BindingTable> {
        let path = self.configuration_path();
        let mut provider = self.provider.lock();

        match provider.as_mut() {
            Some(provider) => {
                debug!(provider = provider.name(), ?path, "Loading binding table");
                provider.set_configuration_path(path);
                provider.built_container()
            }
            None => StandardConfigurationProvider::new(path).built_container(),
        }
    }

    fn resolve(&self, resolution: &mut Resolution, name: &str) -> Result<Instance> {
        resolution.enter(name, self.max_depth)?;
        let result = self.resolve_name(resolution, name);
        resolution.leave();
        result
    }

    fn resolve_name(&self, resolution: &mut Resolution, name: &str) -> Result<Instance> {
        if resolution.table.contains_alias(name) {
            trace!(%name, "Resolving alias");
            self.resolve_by_alias(resolution, name)
        } else if self.has_class(name) {
            trace!(%name, "Resolving class");
            self.resolve_by_class_name(resolution, name)
        } else {
            Err(self.class_not_found(&resolution.table, name))
        }
    }

    fn resolve_by_alias(&self, resolution: &mut Resolution, alias: &str) -> Result<Instance> {
        let alias_not_found = || {
            warn!(%alias, "Alias disappeared from the binding table during resolution");
            SanadError::AliasNotFound {
                alias: alias.to_string(),
            }
        };

        let block = resolution.table.block_of(alias).ok_or_else(alias_not_found)?;

        if block.is_cached() {
            let cached = self.singletons.lock().get(alias);
            if let Some(instance) = cached {
                trace!(%alias, "Returning cached singleton");
                return Ok(instance);
            }
        }

        let entry = resolution
            .table
            .entry(block, alias)
            .cloned()
            .ok_or_else(alias_not_found)?;

        let instance = self.resolve_constructor_dependencies(resolution, &entry.class, entry.arguments)?;

        if block.is_cached() {
            debug!(%alias, class = %entry.class, "Caching singleton");
            let stored = self.singletons.lock().get_or_insert(alias, Arc::clone(&instance));
            if !Arc::ptr_eq(&stored, &instance) {
                debug!(%alias, "Singleton already cached by a concurrent resolution, dropping this instance");
            }
            return Ok(stored);
        }

        Ok(instance)
    }

    fn resolve_by_class_name(&self, resolution: &mut Resolution, class: &str) -> Result<Instance> {
        let alias = resolution.table.alias_for_class(class).map(str::to_string);

        match alias {
            Some(alias) => {
                trace!(%class, %alias, "Class is bound, resolving through its alias");
                self.resolve_by_alias(resolution, &alias)
            }
            None => self.resolve_constructor_dependencies(resolution, class, Vec::new()),
        }
    }

    fn resolve_constructor_dependencies(
        &self,
        resolution: &mut Resolution,
        class_name: &str,
        fixed_arguments: Vec<Value>,
    ) -> Result<Instance> {
        let class = self.classes.read().get(class_name).cloned();
        let Some(class) = class else {
            return Err(self.class_not_found(&resolution.table, class_name));
        };

        let Some(parameters) = class.parameters() else {
            trace!(class = class_name, "No constructor declared");
            return class.construct(Vec::new());
        };

        let mut arguments = fixed_arguments;

        // Parameters are only walked when nothing was fixed at bind time or
        // some override is pending; otherwise the fixed arguments go in as-is.
        let walk_parameters = arguments.is_empty() || !self.overrides.lock().is_empty();

        if walk_parameters {
            for parameter in parameters {
                let value = self.resolve_parameter(resolution, &class, parameter)?;
                arguments.push(value);
            }
        } else {
            trace!(class = class_name, fixed = arguments.len(), "Using fixed arguments only");
        }

        trace!(class = class_name, arguments = arguments.len(), "Constructing");
        class.construct(arguments)
    }

    fn resolve_parameter(
        &self,
        resolution: &mut Resolution,
        class: &ClassDescriptor,
        parameter: &Parameter,
    ) -> Result<Value> {
        let overridden = self.overrides.lock().truthy(parameter.name()).cloned();
        if let Some(value) = overridden {
            trace!(class = class.name(), parameter = parameter.name(), "Using override");
            return Ok(value);
        }

        if let Some(dependency) = parameter.class_name() {
            trace!(class = class.name(), parameter = parameter.name(), %dependency, "Resolving dependency");
            return self.resolve(resolution, dependency).map(Value::Instance);
        }

        if let Some(default) = parameter.default() {
            trace!(class = class.name(), parameter = parameter.name(), "Using default");
            return Ok(default.clone());
        }

        Err(SanadError::MissingConstructorArgument {
            class: class.name().to_string(),
            parameter: parameter.name().to_string(),
        })
    }

    fn class_not_found(&self, table: &BindingTable, name: &str) -> SanadError {
        let classes = self.classes.read();
        let mut candidates = classes.names();
        candidates.extend(table.aliases());

        let suggestions = suggest_similar(name, &candidates, MAX_SUGGESTIONS);
        debug!(%name, ?suggestions, "Class not found");

        SanadError::ClassNotFound(ClassNotFoundError {
            name: name.to_string(),
            suggestions,
        })
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("classes", &self.classes.read().len())
            .field("bindings", &self.table.read().as_ref().map(|table| table.len()))
            .field("singletons", &self.singletons.lock().len())
            .field("overrides", &self.overrides.lock().len())
            .field("configuration_path", &*self.configuration_path.read())
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

// ═══════════════════════════════════════════
// Resolution (per-call state)
// ═══════════════════════════════════════════

/// State of one top-level `get`: the table snapshot and the names being
/// resolved, outermost first.
///
/// Within one `get` the table and overrides do not change, and a singleton
/// is cached only after its parameters are built, so a name that comes up
/// again while still on the chain would recurse forever.
struct Resolution {
    table: Arc<BindingTable>,
    chain: Vec<String>,
}

impl Resolution {
    fn enter(&mut self, name: &str, max_depth: Option<usize>) -> Result<()> {
        if self.chain.iter().any(|active| active == name) {
            let chain = self.chain_through(name);
            warn!(%name, depth = self.chain.len(), "Dependency cycle detected");
            return Err(SanadError::DependencyCycle(DependencyCycleError { chain }));
        }

        if let Some(limit) = max_depth.filter(|limit| self.chain.len() >= *limit) {
            let chain = self.chain_through(name);
            warn!(limit, %name, "Resolution depth limit reached");
            return Err(SanadError::ResolutionTooDeep { limit, chain });
        }

        self.chain.push(name.to_string());
        Ok(())
    }

    fn chain_through(&self, name: &str) -> Vec<String> {
        let mut chain = self.chain.clone();
        chain.push(name.to_string());
        chain
    }

    fn leave(&mut self) {
        self.chain.pop();
    }
}

// ═══════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════

pub mod prelude {
    pub use super::{Container, ContainerBuilder};
    pub use crate::binding::{BindingBlock, BindingEntry, BindingTable};
    pub use crate::block::BlockKind;
    pub use crate::cache::SingletonCache;
    pub use crate::class::{Arguments, ClassDescriptor, Parameter};
    pub use crate::error::{Result, SanadError};
    pub use crate::overrides::Overrides;
    pub use crate::provider::{ConfigurationProvider, StandardConfigurationProvider};
    pub use crate::registry::{ClassProvider, ClassRegistry};
    pub use crate::value::{Instance, Value};
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════
