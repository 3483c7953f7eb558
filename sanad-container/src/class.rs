//! Class descriptors: what the resolver knows about a constructible type.
//!
//! Rust has no constructor reflection, so each class declares its
//! constructor up front. A [`ClassDescriptor`] carries the class name, the
//! ordered constructor [`Parameter`]s (or none at all) and a factory that
//! receives the final positional [`Arguments`].
//!
//! # Examples
//! ```
//! use sanad_container::class::{ClassDescriptor, Parameter};
//!
//! struct FileLogger {
//!     path: String,
//! }
//!
//! let class = ClassDescriptor::new("FileLogger", |args| {
//!     Ok(FileLogger { path: args.string(0)? })
//! })
//! .param(Parameter::new("path").default_value("app.log"));
//!
//! assert_eq!(class.name(), "FileLogger");
//! assert_eq!(class.parameters().map(<[_]>::len), Some(1));
//! ```

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

use sanad_support::rendering::short_class_name;

use crate::error::{Result, SanadError};
use crate::value::{Instance, Value};

/// Type-erased factory building an instance from positional arguments.
///
/// `Arc` so descriptors can be cloned out of the registry and invoked
/// without holding its lock.
pub type ConstructorFn = Arc<dyn Fn(&Arguments) -> Result<Instance> + Send + Sync>;

/// One declared constructor parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    name: String,
    class: Option<String>,
    default: Option<Value>,
}

impl Parameter {
    /// A parameter with no declared class type and no default.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            class: None,
            default: None,
        }
    }

    /// A parameter typed as another class, resolved recursively when no
    /// override supplies it.
    pub fn class(name: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            class: Some(class.into()),
            default: None,
        }
    }

    /// A parameter typed as the Rust type `T`, named the way
    /// [`ClassDescriptor::of`] names it.
    pub fn of<T: ?Sized + 'static>(name: impl Into<String>) -> Self {
        Self::class(name, short_class_name(type_name::<T>()))
    }

    /// Declares a default value used when nothing else applies.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn class_name(&self) -> Option<&str> {
        self.class.as_deref()
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

/// Everything needed to construct one class.
#[derive(Clone)]
pub struct ClassDescriptor {
    name: String,
    constructor: Option<Vec<Parameter>>,
    factory: ConstructorFn,
}

impl ClassDescriptor {
    /// Describes a class named `name` built by `factory`.
    ///
    /// The class starts without a declared constructor: it is built with
    /// an empty argument list and any fixed binding arguments are ignored.
    /// Add parameters with [`param`](Self::param) or
    /// [`constructor`](Self::constructor).
    pub fn new<T, F>(name: impl Into<String>, factory: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&Arguments) -> Result<T> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            constructor: None,
            factory: Arc::new(move |args: &Arguments| Ok(Arc::new(factory(args)?) as Instance)),
        }
    }

    /// Describes the Rust type `T`, named after its last path segment.
    ///
    /// ```
    /// use sanad_container::class::ClassDescriptor;
    ///
    /// struct Database;
    ///
    /// let class = ClassDescriptor::of::<Database, _>(|_| Ok(Database));
    /// assert_eq!(class.name(), "Database");
    /// ```
    pub fn of<T, F>(factory: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&Arguments) -> Result<T> + Send + Sync + 'static,
    {
        Self::new(short_class_name(type_name::<T>()), factory)
    }

    /// Describes a class whose factory already yields a type-erased instance.
    ///
    /// Useful for trait objects, where the factory decides the concrete type.
    pub fn from_fn(name: impl Into<String>, factory: ConstructorFn) -> Self {
        Self {
            name: name.into(),
            constructor: None,
            factory,
        }
    }

    /// Appends a constructor parameter, declaring the constructor if needed.
    pub fn param(mut self, parameter: Parameter) -> Self {
        self.constructor.get_or_insert_with(Vec::new).push(parameter);
        self
    }

    /// Declares the full constructor parameter list, replacing any previous one.
    ///
    /// An empty list still counts as a declared constructor.
    pub fn constructor(mut self, parameters: impl IntoIterator<Item = Parameter>) -> Self {
        self.constructor = Some(parameters.into_iter().collect());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared constructor parameters, or `None` if no constructor is declared.
    pub fn parameters(&self) -> Option<&[Parameter]> {
        self.constructor.as_deref()
    }

    /// Invokes the factory with the final positional arguments.
    pub fn construct(&self, values: Vec<Value>) -> Result<Instance> {
        let args = Arguments {
            class: self.name.clone(),
            values,
        };
        (self.factory)(&args)
    }
}

impl fmt::Debug for ClassDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassDescriptor")
            .field("name", &self.name)
            .field("constructor", &self.constructor)
            .finish()
    }
}

/// Positional arguments handed to a factory.
///
/// Accessors fail with [`SanadError::InvalidArgument`] when a position is
/// missing or holds the wrong kind of value.
#[derive(Debug, Clone)]
pub struct Arguments {
    class: String,
    values: Vec<Value>,
}

impl Arguments {
    /// The class being constructed.
    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// The raw value at `position`.
    pub fn value(&self, position: usize) -> Result<&Value> {
        self.values
            .get(position)
            .ok_or_else(|| self.invalid(position, "an argument, but none was passed"))
    }

    /// The value at `position`, or `None` if fewer arguments were passed.
    pub fn optional(&self, position: usize) -> Option<&Value> {
        self.values.get(position)
    }

    pub fn string(&self, position: usize) -> Result<String> {
        let value = self.value(position)?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| self.mistyped(position, "string", value))
    }

    pub fn int(&self, position: usize) -> Result<i64> {
        let value = self.value(position)?;
        value
            .as_int()
            .ok_or_else(|| self.mistyped(position, "int", value))
    }

    pub fn float(&self, position: usize) -> Result<f64> {
        let value = self.value(position)?;
        value
            .as_float()
            .ok_or_else(|| self.mistyped(position, "float", value))
    }

    pub fn bool(&self, position: usize) -> Result<bool> {
        let value = self.value(position)?;
        value
            .as_bool()
            .ok_or_else(|| self.mistyped(position, "bool", value))
    }

    /// The instance at `position`, downcast to `T`.
    pub fn instance<T: Any + Send + Sync>(&self, position: usize) -> Result<Arc<T>> {
        let value = self.value(position)?;
        value
            .downcast::<T>()
            .ok_or_else(|| self.mistyped(position, type_name::<T>(), value))
    }

    fn mistyped(&self, position: usize, expected: &str, found: &Value) -> SanadError {
        self.invalid(position, &format!("{expected}, found {}", found.kind()))
    }

    fn invalid(&self, position: usize, expected: &str) -> SanadError {
        SanadError::InvalidArgument {
            class: self.class.clone(),
            position,
            expected: expected.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FileLogger {
        path: String,
        verbose: bool,
    }

    fn file_logger() -> ClassDescriptor {
        ClassDescriptor::of::<FileLogger, _>(|args| {
            Ok(FileLogger {
                path: args.string(0)?,
                verbose: args.optional(1).and_then(Value::as_bool).unwrap_or(false),
            })
        })
        .param(Parameter::new("path"))
        .param(Parameter::new("verbose").default_value(false))
    }

    #[test]
    fn descriptor_named_after_type() {
        assert_eq!(file_logger().name(), "FileLogger");
        assert_eq!(Parameter::of::<FileLogger>("logger").class_name(), Some("FileLogger"));
    }

    #[test]
    fn no_constructor_by_default() {
        let class = ClassDescriptor::new("Clock", |_| Ok(()));
        assert!(class.parameters().is_none());

        let class = class.constructor([]);
        assert_eq!(class.parameters().map(<[_]>::len), Some(0));
    }

    #[test]
    fn construct_passes_positional_arguments() {
        let instance = file_logger()
            .construct(vec![Value::from("app.log"), Value::from(true)])
            .unwrap();

        let logger = instance.downcast::<FileLogger>().ok().unwrap();
        assert_eq!(logger.path, "app.log");
        assert!(logger.verbose);
    }

    #[test]
    fn missing_argument_is_invalid() {
        let err = file_logger().construct(vec![]).err().unwrap();
        match err {
            SanadError::InvalidArgument { class, position, .. } => {
                assert_eq!(class, "FileLogger");
                assert_eq!(position, 0);
            }
            other => panic!("Expected InvalidArgument, got: {other:?}"),
        }
    }

    #[test]
    fn mistyped_argument_reports_kind() {
        let err = file_logger().construct(vec![Value::from(7)]).err().unwrap();
        let msg = format!("{err}");
        assert!(msg.contains("expected string, found int"));
    }

    #[test]
    fn instance_argument_downcasts() {
        let args = Arguments {
            class: "Service".to_string(),
            values: vec![Value::instance(String::from("dep"))],
        };

        assert_eq!(args.instance::<String>(0).unwrap().as_str(), "dep");
        assert!(args.instance::<u8>(0).is_err());
    }

    #[test]
    fn parameter_accessors() {
        let param = Parameter::class("db", "Database").default_value("unused");
        assert_eq!(param.name(), "db");
        assert_eq!(param.class_name(), Some("Database"));
        assert_eq!(param.default(), Some(&Value::from("unused")));
    }
}
