//! Dynamic value types
//!
//! A [`Value`] is the tree a [`Context`](crate::Context) wraps. Values can be
//! scalars (string, integer, float, bool, null), sequences (arrays), or
//! mappings (objects with string keys).

use indexmap::IndexMap;
use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::error::{Error, Result};

/// Key-to-value mapping used for map-shaped values
pub type Mapping = IndexMap<String, Value>;

/// A loosely-structured value addressed by dotted paths
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
#[derive(Default)]
pub enum Value {
    /// Null value
    #[default]
    Null,
    /// Boolean value
    Bool(bool),
    /// Signed integer value
    Integer(i64),
    /// Unsigned integer too large for `Integer`
    Unsigned(u64),
    /// Floating point value
    Float(f64),
    /// String value
    String(String),
    /// Sequence of values
    Sequence(Vec<Value>),
    /// Mapping of string keys to values
    Mapping(Mapping),
}

impl Value {
    /// Convert any serializable value into a `Value` tree.
    ///
    /// Struct fields become mapping keys, sequences and tuples become
    /// sequences, and integer or boolean map keys are stringified. Nested
    /// [`Context`](crate::Context) fields serialize as the data they wrap.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        serde_json::to_value(value)
            .map(Value::from)
            .map_err(|e| Error::serialization(e.to_string()))
    }

    /// Check if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if this value is a boolean
    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    /// Check if this value is an integer (signed or unsigned)
    pub fn is_integer(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Unsigned(_))
    }

    /// Check if this value is a float
    pub fn is_float(&self) -> bool {
        matches!(self, Value::Float(_))
    }

    /// Check if this value is a string
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Check if this value is a sequence
    pub fn is_sequence(&self) -> bool {
        matches!(self, Value::Sequence(_))
    }

    /// Check if this value is a mapping
    pub fn is_mapping(&self) -> bool {
        matches!(self, Value::Mapping(_))
    }

    /// Get as boolean if this is a Bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as i64 if this is an integer that fits
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            Value::Unsigned(u) => i64::try_from(*u).ok(),
            _ => None,
        }
    }

    /// Get as u64 if this is a non-negative integer
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Integer(i) => u64::try_from(*i).ok(),
            Value::Unsigned(u) => Some(*u),
            _ => None,
        }
    }

    /// Get as f64 if this is a Float or an integer
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            Value::Unsigned(u) => Some(*u as f64),
            _ => None,
        }
    }

    /// Get as str if this is a String
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as slice if this is a Sequence
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(s) => Some(s),
            _ => None,
        }
    }

    /// Get as mapping if this is a Mapping
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Value::Mapping(m) => Some(m),
            _ => None,
        }
    }

    /// Returns the type name of this value
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Integer(_) | Value::Unsigned(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Sequence(_) => "sequence",
            Value::Mapping(_) => "mapping",
        }
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a JSON or YAML value")
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> std::result::Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Value, E> {
        Ok(Value::Integer(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Value, E> {
        Ok(Value::Float(v))
    }

    fn visit_str<E: de::Error>(self, s: &str) -> std::result::Result<Value, E> {
        Ok(Value::String(s.to_string()))
    }

    fn visit_string<E: de::Error>(self, s: String) -> std::result::Result<Value, E> {
        Ok(Value::String(s))
    }

    fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::Sequence(items))
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries = Mapping::with_capacity(map.size_hint().unwrap_or(0));
        while let Some(key) = map.next_key::<Value>()? {
            let key = map_key(key).map_err(de::Error::custom)?;
            entries.insert(key, map.next_value()?);
        }
        Ok(Value::Mapping(entries))
    }
}

// Scalar keys (`80: http`, `true: x`) are stored in their string form.
fn map_key(key: Value) -> std::result::Result<String, String> {
    match key {
        Value::String(s) => Ok(s),
        Value::Bool(_) | Value::Integer(_) | Value::Unsigned(_) | Value::Float(_) => {
            Ok(key.to_string())
        }
        other => Err(format!("map keys must be scalars, got {}", other.type_name())),
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ValueVisitor)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Unsigned(u) => write!(f, "{}", u),
            Value::Float(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{}", s),
            Value::Sequence(seq) => {
                write!(f, "[")?;
                for (i, v) in seq.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "]")
            }
            Value::Mapping(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(i: $t) -> Self {
                Value::Integer(i as i64)
            }
        })*
    };
}

macro_rules! from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(u: $t) -> Self {
                let u = u as u64;
                match i64::try_from(u) {
                    Ok(i) => Value::Integer(i),
                    Err(_) => Value::Unsigned(u),
                }
            }
        })*
    };
}

from_signed!(i8, i16, i32, i64, isize);
from_unsigned!(u8, u16, u32, u64, usize);

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::Float(f as f64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Sequence(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Value {
    fn from(v: [T; N]) -> Self {
        Value::Sequence(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<IndexMap<String, T>> for Value {
    fn from(m: IndexMap<String, T>) -> Self {
        Value::Mapping(m.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl<T: Into<Value>> From<HashMap<String, T>> for Value {
    fn from(m: HashMap<String, T>) -> Self {
        Value::Mapping(m.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl<T: Into<Value>> From<BTreeMap<String, T>> for Value {
    fn from(m: BTreeMap<String, T>) -> Self {
        Value::Mapping(m.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Integer(i)
                } else if let Some(u) = n.as_u64() {
                    Value::Unsigned(u)
                } else {
                    Value::Float(n.as_f64().unwrap_or_default())
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(a) => Value::Sequence(a.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(o) => {
                Value::Mapping(o.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Serialize)]
    struct Author {
        name: String,
        email: Option<String>,
    }

    #[derive(Serialize)]
    struct Package {
        license: &'static str,
        author: Author,
        tags: Vec<&'static str>,
    }

    #[test]
    fn test_value_type_checks() {
        assert!(Value::Null.is_null());
        assert!(Value::Bool(true).is_bool());
        assert!(Value::Integer(42).is_integer());
        assert!(Value::Unsigned(u64::MAX).is_integer());
        assert!(Value::Float(2.5).is_float());
        assert!(Value::String("hello".into()).is_string());
        assert!(Value::Sequence(vec![]).is_sequence());
        assert!(Value::Mapping(Mapping::new()).is_mapping());
    }

    #[test]
    fn test_value_conversions() {
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::Integer(42).as_i64(), Some(42));
        assert_eq!(Value::Integer(-1).as_u64(), None);
        assert_eq!(Value::Float(2.5).as_f64(), Some(2.5));
        assert_eq!(Value::Integer(42).as_f64(), Some(42.0));
        assert_eq!(Value::String("hello".into()).as_str(), Some("hello"));
    }

    #[test]
    fn test_from_unsigned_prefers_integer() {
        assert_eq!(Value::from(7u64), Value::Integer(7));
        assert_eq!(Value::from(u64::MAX), Value::Unsigned(u64::MAX));
    }

    #[test]
    fn test_from_collections() {
        let seq = Value::from(["a", "b"]);
        assert_eq!(
            seq,
            Value::Sequence(vec![Value::String("a".into()), Value::String("b".into())])
        );

        let mut m = HashMap::new();
        m.insert("k1".to_string(), "v1");
        let map = Value::from(m);
        assert_eq!(map.as_mapping().unwrap().get("k1"), Some(&Value::from("v1")));

        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some(3)), Value::Integer(3));
    }

    #[test]
    fn test_from_serialize_struct() {
        let pkg = Package {
            license: "MIT",
            author: Author {
                name: "Dong".into(),
                email: None,
            },
            tags: vec!["json", "path"],
        };

        let value = Value::from_serialize(&pkg).unwrap();
        let map = value.as_mapping().unwrap();
        assert_eq!(map.get("license"), Some(&Value::from("MIT")));

        let author = map.get("author").unwrap().as_mapping().unwrap();
        assert_eq!(author.get("name"), Some(&Value::from("Dong")));
        assert_eq!(author.get("email"), Some(&Value::Null));
        assert_eq!(map.get("tags").unwrap().as_sequence().unwrap().len(), 2);
    }

    #[test]
    fn test_from_serialize_integer_keys() {
        let mut m = BTreeMap::new();
        m.insert(1, "one");
        m.insert(2, "two");

        let value = Value::from_serialize(&m).unwrap();
        let map = value.as_mapping().unwrap();
        assert_eq!(map.get("1"), Some(&Value::from("one")));
        assert_eq!(map.get("2"), Some(&Value::from("two")));
    }

    #[test]
    fn test_from_serialize_rejects_composite_keys() {
        let mut m = BTreeMap::new();
        m.insert(vec![1, 2], "pair");

        assert!(Value::from_serialize(&m).is_err());
    }

    #[test]
    fn test_deserialize_json() {
        let value: Value =
            serde_json::from_str(r#"{"a": 1, "b": 2.5, "c": [true, null], "d": 18446744073709551615}"#)
                .unwrap();
        let map = value.as_mapping().unwrap();

        assert_eq!(map.get("a"), Some(&Value::Integer(1)));
        assert_eq!(map.get("b"), Some(&Value::Float(2.5)));
        assert_eq!(
            map.get("c"),
            Some(&Value::Sequence(vec![Value::Bool(true), Value::Null]))
        );
        assert_eq!(map.get("d"), Some(&Value::Unsigned(u64::MAX)));
    }

    #[test]
    fn test_deserialize_yaml() {
        let yaml = r#"
database:
  host: localhost
  port: 5432
"#;
        let value: Value = serde_yaml::from_str(yaml).unwrap();
        let db = value.as_mapping().unwrap().get("database").unwrap();

        assert_eq!(db.as_mapping().unwrap().get("port"), Some(&Value::Integer(5432)));
    }

    #[test]
    fn test_deserialize_yaml_scalar_keys() {
        let value: Value = serde_yaml::from_str("ports:\n  80: http\n  443: https\n").unwrap();
        let ports = value.as_mapping().unwrap().get("ports").unwrap();
        let ports = ports.as_mapping().unwrap();

        assert_eq!(ports.get("80"), Some(&Value::from("http")));
        assert_eq!(ports.keys().collect::<Vec<_>>(), vec!["80", "443"]);

        let value: Value = serde_yaml::from_str("true: x\n1.5: y\n").unwrap();
        let map = value.as_mapping().unwrap();
        assert_eq!(map.get("true"), Some(&Value::from("x")));
        assert_eq!(map.get("1.5"), Some(&Value::from("y")));
    }

    #[test]
    fn test_deserialize_yaml_rejects_composite_keys() {
        let err = serde_yaml::from_str::<Value>("? [1, 2]\n: pair\n").unwrap_err();
        assert!(err.to_string().contains("map keys must be scalars"));
    }

    #[test]
    fn test_display() {
        let value = Value::from(vec![Value::from(1), Value::from("x")]);
        assert_eq!(value.to_string(), "[1, x]");
        assert_eq!(Value::Null.to_string(), "null");
    }
}
