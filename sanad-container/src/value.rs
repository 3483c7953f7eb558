//! Dynamically shaped values passed to constructors.
//!
//! A [`Value`] is what flows through fixed binding arguments, caller
//! overrides, parameter defaults and, finally, the positional argument list
//! handed to a class factory. Constructed objects travel as
//! [`Value::Instance`].

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A constructed object: shared, type-erased and thread-safe.
///
/// Two resolutions returned "the same instance" when their handles are
/// [`Arc::ptr_eq`].
pub type Instance = Arc<dyn Any + Send + Sync>;

/// A constructor argument.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
    Instance(Instance),
}

impl Value {
    /// Wraps any thread-safe object as an instance value.
    pub fn instance<T: Any + Send + Sync>(value: T) -> Self {
        Value::Instance(Arc::new(value))
    }

    /// Loose truthiness used when deciding whether an override applies.
    ///
    /// `Null`, `false`, `0`, `0.0`, `""`, `"0"`, an empty list and an empty
    /// map are falsy. Everything else is truthy, including every instance.
    ///
    /// ```
    /// use sanad_container::value::Value;
    ///
    /// assert!(!Value::from("0").is_truthy());
    /// assert!(Value::from("false").is_truthy());
    /// assert!(!Value::from(Vec::<Value>::new()).is_truthy());
    /// ```
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::Str(s) => !(s.is_empty() || s == "0"),
            Value::List(items) => !items.is_empty(),
            Value::Map(entries) => !entries.is_empty(),
            Value::Instance(_) => true,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Integers widen to floats.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Value::Instance(instance) => Some(instance),
            _ => None,
        }
    }

    /// Returns the wrapped instance as `Arc<T>` if it holds a `T`.
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.as_instance()
            .and_then(|instance| Arc::clone(instance).downcast::<T>().ok())
    }

    /// Short name of the variant, used in argument errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Instance(_) => "instance",
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Instance(a), Value::Instance(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Int(i) => write!(f, "Int({i})"),
            Value::Float(x) => write!(f, "Float({x})"),
            Value::Str(s) => write!(f, "Str({s:?})"),
            Value::List(items) => f.debug_tuple("List").field(items).finish(),
            Value::Map(entries) => f.debug_tuple("Map").field(entries).finish(),
            Value::Instance(instance) => write!(f, "Instance({:p})", Arc::as_ptr(instance)),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<Instance> for Value {
    fn from(instance: Instance) -> Self {
        Value::Instance(instance)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl From<toml::Value> for Value {
    fn from(value: toml::Value) -> Self {
        match value {
            toml::Value::String(s) => Value::Str(s),
            toml::Value::Integer(i) => Value::Int(i),
            toml::Value::Float(f) => Value::Float(f),
            toml::Value::Boolean(b) => Value::Bool(b),
            toml::Value::Datetime(dt) => Value::Str(dt.to_string()),
            toml::Value::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
            toml::Value::Table(table) => Value::Map(
                table
                    .into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falsy_values() {
        for value in [
            Value::Null,
            Value::Bool(false),
            Value::Int(0),
            Value::Float(0.0),
            Value::from(""),
            Value::from("0"),
            Value::List(vec![]),
            Value::Map(BTreeMap::new()),
        ] {
            assert!(!value.is_truthy(), "{value:?} should be falsy");
        }
    }

    #[test]
    fn truthy_values() {
        for value in [
            Value::Bool(true),
            Value::Int(-1),
            Value::Float(0.5),
            Value::from("00"),
            Value::from(" "),
            Value::from(vec![Value::Null]),
            Value::instance(()),
        ] {
            assert!(value.is_truthy(), "{value:?} should be truthy");
        }
    }

    #[test]
    fn instances_compare_by_identity() {
        let a = Value::instance(String::from("x"));
        let b = Value::instance(String::from("x"));
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn downcast_instance() {
        let value = Value::instance(42u8);
        assert_eq!(value.downcast::<u8>().as_deref(), Some(&42));
        assert!(value.downcast::<String>().is_none());
        assert!(Value::from(1).downcast::<u8>().is_none());
    }

    #[test]
    fn int_widens_to_float() {
        assert_eq!(Value::from(3).as_float(), Some(3.0));
        assert_eq!(Value::from("3").as_float(), None);
    }

    #[test]
    fn from_toml_nested() {
        let parsed: toml::Table = toml::from_str(
            r#"
            args = ["a", 1, 2.5, true, { level = "info" }]
            "#,
        )
        .unwrap();
        let value = Value::from(parsed["args"].clone());

        let items = value.as_list().unwrap();
        assert_eq!(items[0], Value::from("a"));
        assert_eq!(items[1], Value::Int(1));
        assert_eq!(items[2], Value::Float(2.5));
        assert_eq!(items[3], Value::Bool(true));
        match &items[4] {
            Value::Map(map) => assert_eq!(map.get("level"), Some(&Value::from("info"))),
            other => panic!("Expected Map, got: {other:?}"),
        }
    }

    #[test]
    fn option_maps_to_null() {
        assert!(Value::from(None::<i64>).is_null());
        assert_eq!(Value::from(Some("x")), Value::from("x"));
    }
}
