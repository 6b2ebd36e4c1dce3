//! The Context type
//!
//! A [`Context`] wraps one [`Value`] and gives path-based access to it:
//! resolving, writing, existence and emptiness checks, extraction of
//! sub-contexts, best-effort typed accessors, template rendering and JSON
//! (de)serialization.

use std::borrow::Cow;

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::cast;
use crate::error::{Error, Result};
use crate::path::{self, AsPath};
use crate::shape::{classify, View};
use crate::template;
use crate::value::Value;

/// Path-addressable wrapper around a loosely-structured value
///
/// # Example
///
/// ```rust
/// use fractal_core::Context;
///
/// let mut ctx = Context::default();
/// ctx.set("a.b.c", 99);
/// assert_eq!(ctx.as_i64("a.b.c"), 99);
/// assert!(ctx.exists("a.b"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    data: Value,
}

impl Context {
    /// Wrap a value. A `Context` passed here is unwrapped to its data.
    pub fn new(data: impl Into<Value>) -> Self {
        Self { data: data.into() }
    }

    /// Wrap any serializable record, map or sequence
    pub fn from_serialize<T: Serialize + ?Sized>(data: &T) -> Result<Self> {
        Value::from_serialize(data).map(Self::new)
    }

    /// Decode JSON bytes, wrapping null if they are malformed
    pub fn from_json(json: impl AsRef<[u8]>) -> Self {
        Self::try_from_json(json).unwrap_or_else(|e| {
            log::warn!("Ignoring malformed JSON input: {}", e.cause.as_deref().unwrap_or(""));
            Self::default()
        })
    }

    /// Decode JSON bytes into a new Context
    pub fn try_from_json(json: impl AsRef<[u8]>) -> Result<Self> {
        let mut ctx = Self::default();
        ctx.load_json(json)?;
        Ok(ctx)
    }

    /// Decode JSON bytes and replace the wrapped data with the result.
    ///
    /// On failure the existing data is left untouched.
    pub fn load_json(&mut self, json: impl AsRef<[u8]>) -> Result<()> {
        self.data = serde_json::from_slice(json.as_ref())
            .map_err(|e| Error::deserialization(e.to_string()))?;
        Ok(())
    }

    /// Encode the wrapped data as JSON
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(&self.data).map_err(|e| Error::serialization(e.to_string()))
    }

    /// Encode the wrapped data as indented JSON
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.data).map_err(|e| Error::serialization(e.to_string()))
    }

    /// Decode the wrapped data into a typed record
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        let json =
            serde_json::to_value(&self.data).map_err(|e| Error::serialization(e.to_string()))?;
        serde_json::from_value(json).map_err(|e| Error::deserialization(e.to_string()))
    }

    /// The wrapped data
    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Consume the context, returning the wrapped data
    pub fn into_inner(self) -> Value {
        self.data
    }

    /// Resolve a path, borrowing from the wrapped data where possible
    pub fn resolve(&self, path: impl AsPath) -> Result<Cow<'_, Value>> {
        path::resolve(&self.data, &path.as_path())
    }

    /// Resolve a path to an owned value
    pub fn try_get(&self, path: impl AsPath) -> Result<Value> {
        self.resolve(path).map(Cow::into_owned)
    }

    /// Resolve a path to an owned value, or null if it does not resolve
    pub fn get(&self, path: impl AsPath) -> Value {
        self.try_get(path).unwrap_or_default()
    }

    /// Write a value at a path, creating intermediate maps as needed.
    ///
    /// Any non-map value on the way (lists included) is replaced by a map.
    /// An empty path replaces the wrapped data.
    pub fn set(&mut self, path: impl AsPath, value: impl Into<Value>) {
        let root = std::mem::take(&mut self.data);
        self.data = path::mutate(root, &path.as_path(), value.into());
    }

    /// Check whether a path resolves
    pub fn exists(&self, path: impl AsPath) -> bool {
        self.resolve(path).is_ok()
    }

    /// Check whether the value at a path is empty.
    ///
    /// Missing paths are empty. Maps and lists are empty when they have no
    /// entries; scalars when they hold their zero value (null, `false`,
    /// `""`, or numeric zero).
    pub fn is_empty(&self, path: impl AsPath) -> bool {
        let Ok(value) = self.resolve(path) else {
            return true;
        };

        match classify(&value) {
            View::Scalar(scalar) => is_zero(scalar),
            view => view.count() == Some(0),
        }
    }

    /// Keys of the map at a path; `None` when it is not a map
    pub fn keys(&self, path: impl AsPath) -> Option<Vec<String>> {
        let value = self.resolve(path).ok()?;
        classify(&value).as_map().map(|m| m.keys().cloned().collect())
    }

    /// Entry or element count at a path; 0 for scalars and missing paths
    pub fn length(&self, path: impl AsPath) -> usize {
        self.resolve(path)
            .ok()
            .and_then(|v| classify(&v).count())
            .unwrap_or(0)
    }

    pub fn try_get_context(&self, path: impl AsPath) -> Result<Context> {
        self.try_get(path).map(Context::new)
    }

    /// Context for the value at a path, wrapping null if it does not resolve
    pub fn get_context(&self, path: impl AsPath) -> Context {
        Context::new(self.get(path))
    }

    /// One context per entry of the map at a path
    pub fn try_get_map_context(&self, path: impl AsPath) -> Result<IndexMap<String, Context>> {
        let path = path.as_path();
        let value = self.resolve(&*path)?;

        match classify(&value) {
            View::Map(m) => Ok(m
                .iter()
                .map(|(k, v)| (k.clone(), Context::new(v.clone())))
                .collect()),
            _ => Err(Error::not_a_map(&*path, value.type_name())),
        }
    }

    pub fn get_map_context(&self, path: impl AsPath) -> IndexMap<String, Context> {
        self.try_get_map_context(path).unwrap_or_default()
    }

    /// One context per element of the list at a path
    pub fn try_get_list_context(&self, path: impl AsPath) -> Result<Vec<Context>> {
        let path = path.as_path();
        let value = self.resolve(&*path)?;

        match classify(&value) {
            View::List(l) => Ok(l.iter().cloned().map(Context::new).collect()),
            _ => Err(Error::not_a_list(&*path, value.type_name())),
        }
    }

    pub fn get_list_context(&self, path: impl AsPath) -> Vec<Context> {
        self.try_get_list_context(path).unwrap_or_default()
    }

    /// Replace every `${path}` placeholder in `template`.
    ///
    /// Unresolvable placeholders become empty strings.
    pub fn render(&self, template: &str) -> String {
        template::interpolate(template, self)
    }

    /// Like [`render`](Self::render) but fails on the first placeholder
    /// that does not resolve
    pub fn try_render(&self, template: &str) -> Result<String> {
        template::try_interpolate(template, self)
    }

    fn cast_at<T>(&self, path: impl AsPath, cast: fn(&Value) -> T) -> T {
        match self.resolve(path) {
            Ok(value) => cast(&value),
            Err(_) => cast(&Value::Null),
        }
    }
}

macro_rules! typed_accessors {
    ($($name:ident -> $t:ty => $cast:path),* $(,)?) => {
        impl Context {
            $(
                #[doc = concat!("Best-effort `", stringify!($t), "` at a path")]
                pub fn $name(&self, path: impl AsPath) -> $t {
                    self.cast_at(path, $cast)
                }
            )*
        }
    };
}

typed_accessors! {
    as_bool -> bool => cast::to_bool,
    as_i8 -> i8 => cast::to_i8,
    as_i16 -> i16 => cast::to_i16,
    as_i32 -> i32 => cast::to_i32,
    as_i64 -> i64 => cast::to_i64,
    as_isize -> isize => cast::to_isize,
    as_u8 -> u8 => cast::to_u8,
    as_u16 -> u16 => cast::to_u16,
    as_u32 -> u32 => cast::to_u32,
    as_u64 -> u64 => cast::to_u64,
    as_usize -> usize => cast::to_usize,
    as_f32 -> f32 => cast::to_f32,
    as_f64 -> f64 => cast::to_f64,
    as_string -> String => cast::to_string,
}

fn is_zero(scalar: &Value) -> bool {
    match scalar {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Integer(i) => *i == 0,
        Value::Unsigned(u) => *u == 0,
        Value::Float(f) => *f == 0.0,
        Value::String(s) => s.is_empty(),
        // not a scalar kind; treated as empty
        Value::Sequence(_) | Value::Mapping(_) => true,
    }
}

impl From<Context> for Value {
    fn from(ctx: Context) -> Self {
        ctx.data
    }
}

impl From<&Context> for Value {
    fn from(ctx: &Context) -> Self {
        ctx.data.clone()
    }
}

impl Serialize for Context {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.data.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Context {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Context::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn sample() -> Context {
        Context::from_json(
            r#"{
                "author": {"name": "Dong", "email": "test@example.com"},
                "license": "MIT",
                "items": [1, 2, 3],
                "count": "42",
                "flags": {"on": true, "off": false}
            }"#,
        )
    }

    #[derive(Serialize, Deserialize)]
    struct Envelope {
        id: u32,
        payload: Context,
    }

    #[derive(Serialize)]
    struct Settings {
        key1: String,
        key2: Nested,
    }

    #[derive(Serialize)]
    struct Nested {
        key3: String,
    }

    #[test]
    fn test_set_and_get() {
        let mut ctx = Context::default();
        ctx.set("a.b.c.d", 99);
        assert_eq!(ctx.as_i64("a.b.c.d"), 99);

        let mut m = HashMap::new();
        m.insert("k1".to_string(), "v1");
        m.insert("k2".to_string(), "v2");
        ctx.set("a1.b.c.d", m);
        assert_eq!(ctx.as_string("a1.b.c.d.k1"), "v1");
    }

    #[test]
    fn test_from_json() {
        let ctx = Context::from_json(r#"{"key": "value"}"#);
        assert_eq!(ctx.as_string("key"), "value");
    }

    #[test]
    fn test_from_json_malformed_wraps_null() {
        let ctx = Context::from_json("{oops");
        assert_eq!(ctx.data(), &Value::Null);

        let err = Context::try_from_json("{oops").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Deserialization);
    }

    #[test]
    fn test_load_json_keeps_data_on_failure() {
        let mut ctx = sample();
        assert!(ctx.load_json("[1,").is_err());
        assert_eq!(ctx.as_string("license"), "MIT");

        ctx.load_json("[1, 2]").unwrap();
        assert_eq!(ctx.length(""), 2);
    }

    #[test]
    fn test_from_struct() {
        let settings = Settings {
            key1: "Value1".into(),
            key2: Nested {
                key3: "Value3".into(),
            },
        };
        let ctx = Context::from_serialize(&settings).unwrap();
        assert_eq!(ctx.as_string("key2.key3"), "Value3");
        assert_eq!(ctx.as_string("key1"), "Value1");
    }

    #[test]
    fn test_list_and_length() {
        let ctx = Context::from_json(r#"{"key": ["a", "b"]}"#);
        assert_eq!(ctx.as_string("key.1"), "b");
        assert_eq!(ctx.as_i64("key.length()"), 2);
        assert_eq!(ctx.length("key"), 2);
    }

    #[test]
    fn test_joined_fragments() {
        let ctx = sample();
        assert_eq!(ctx.as_string(["author", "name"]), "Dong");
        assert_eq!(ctx.get(["items", "2"]), Value::Integer(3));
    }

    #[test]
    fn test_get_missing_is_null() {
        let ctx = sample();
        assert_eq!(ctx.get("author.phone"), Value::Null);
        assert_eq!(
            ctx.try_get("author.phone").unwrap_err().kind,
            ErrorKind::PathNotFound
        );
        assert_eq!(ctx.as_i64("nope"), 0);
        assert_eq!(ctx.as_string("nope"), "");
    }

    #[test]
    fn test_typed_accessors() {
        let ctx = sample();
        assert_eq!(ctx.as_i32("count"), 42);
        assert_eq!(ctx.as_u8("count"), 42);
        assert_eq!(ctx.as_f64("count"), 42.0);
        assert_eq!(ctx.as_string("items.0"), "1");
        assert!(ctx.as_bool("flags.on"));
        assert!(!ctx.as_bool("flags.off"));
        assert_eq!(ctx.as_usize("items.length()"), 3);
    }

    #[test]
    fn test_keys() {
        let ctx = Context::from_json(r#"{"key1": "value1", "key2": "value2"}"#);
        let mut keys = ctx.keys("").unwrap();
        keys.sort();
        assert_eq!(keys, vec!["key1", "key2"]);

        assert_eq!(sample().keys("items"), None);
        assert_eq!(sample().keys("missing"), None);
    }

    #[test]
    fn test_exists() {
        let ctx = sample();
        assert!(ctx.exists("author.name"));
        assert!(ctx.exists(""));
        assert!(!ctx.exists("author.name.first"));
        assert!(!ctx.exists("items.9"));
    }

    #[test]
    fn test_is_empty() {
        let mut ctx = Context::default();
        ctx.set("null", Value::Null);
        ctx.set("zero", 0);
        ctx.set("zero_float", 0.0);
        ctx.set("false", false);
        ctx.set("empty_string", "");
        ctx.set("empty_list", Vec::<i32>::new());
        ctx.set("empty_map", IndexMap::<String, Value>::new());
        ctx.set("one", 1);
        ctx.set("text", "test");
        ctx.set("true", true);
        ctx.set("list", vec![1]);
        ctx.set("map.k", "v");

        for path in [
            "null",
            "zero",
            "zero_float",
            "false",
            "empty_string",
            "empty_list",
            "empty_map",
            "missing",
        ] {
            assert!(ctx.is_empty(path), "{} should be empty", path);
        }

        for path in ["one", "text", "true", "list", "map"] {
            assert!(!ctx.is_empty(path), "{} should not be empty", path);
        }
    }

    #[test]
    fn test_is_empty_large_unsigned() {
        let ctx = Context::new(Value::Unsigned(u64::MAX));
        assert!(!ctx.is_empty(""));
    }

    #[test]
    fn test_get_context() {
        let ctx = sample();
        let author = ctx.get_context("author");
        assert_eq!(author.as_string("name"), "Dong");

        let missing = ctx.get_context("nope");
        assert_eq!(missing.data(), &Value::Null);
        assert!(ctx.try_get_context("nope").is_err());
    }

    #[test]
    fn test_get_map_context() {
        let ctx = sample();
        let flags = ctx.try_get_map_context("flags").unwrap();
        assert_eq!(flags.len(), 2);
        assert!(flags["on"].as_bool(""));

        let err = ctx.try_get_map_context("items").unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotAMap);
        assert!(ctx.get_map_context("license").is_empty());
    }

    #[test]
    fn test_get_list_context() {
        let ctx = sample();
        let items = ctx.try_get_list_context("items").unwrap();
        let values: Vec<i64> = items.iter().map(|c| c.as_i64("")).collect();
        assert_eq!(values, vec![1, 2, 3]);

        let err = ctx.try_get_list_context("author").unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotAList);
        assert_eq!(err.path, Some("author".into()));

        let err = ctx.try_get_list_context("missing").unwrap_err();
        assert_eq!(err.kind, ErrorKind::PathNotFound);
    }

    #[test]
    fn test_set_context_is_unwrapped() {
        let inner = Context::from_json(r#"{"name": "Dong"}"#);
        let mut ctx = Context::default();
        ctx.set("author", &inner);
        ctx.set("copy", inner);

        assert_eq!(ctx.as_string("author.name"), "Dong");
        assert!(ctx.resolve("copy").unwrap().is_mapping());
    }

    #[test]
    fn test_nested_context_root() {
        let inner = sample();
        let outer = Context::new(Context::new(inner.clone()));
        assert_eq!(outer.resolve("").unwrap().as_ref(), inner.data());
    }

    #[test]
    fn test_set_root_replaces() {
        let mut ctx = sample();
        ctx.set("", vec!["x"]);
        assert_eq!(ctx.length("."), 1);
        ctx.set(".", "scalar");
        assert_eq!(ctx.as_string(""), "scalar");
    }

    #[test]
    fn test_set_through_list_replaces_it() {
        let mut ctx = Context::from_json(r#"{"a": [1, 2, 3]}"#);
        ctx.set("a.x", 9);
        assert_eq!(ctx, Context::from_json(r#"{"a": {"x": 9}}"#));
    }

    #[test]
    fn test_independent_writes() {
        let mut ctx = Context::default();
        ctx.set("left.value", "v");
        ctx.set("right.value", "w");
        assert_eq!(ctx.as_string("left.value"), "v");
        assert_eq!(ctx.as_string("right.value"), "w");
    }

    #[test]
    fn test_json_round_trip() {
        let ctx = sample();
        let bytes = ctx.to_json().unwrap();
        let back = Context::try_from_json(&bytes).unwrap();
        assert_eq!(back, ctx);
    }

    #[test]
    fn test_embedded_context_field() {
        let env: Envelope = serde_json::from_str(r#"{"id": 1, "payload": {"a": [1, 2]}}"#).unwrap();
        assert_eq!(env.id, 1);
        assert_eq!(env.payload.as_i64("a.1"), 2);

        let json = serde_json::to_string(&env).unwrap();
        assert_eq!(json, r#"{"id":1,"payload":{"a":[1,2]}}"#);

        let ctx = Context::from_serialize(&env).unwrap();
        assert_eq!(ctx.as_i64("payload.a.length()"), 2);
    }

    #[test]
    fn test_deserialize_yaml_with_scalar_keys() {
        let ctx: Context = serde_yaml::from_str("true: x\n7: seven\n").unwrap();
        assert_eq!(ctx.as_string("true"), "x");
        assert_eq!(ctx.keys("").unwrap(), vec!["true", "7"]);
    }

    #[test]
    fn test_decode_into_record() {
        #[derive(Deserialize, Debug, PartialEq)]
        struct Author {
            name: String,
            email: String,
        }

        let ctx = sample();
        let author: Author = ctx.get_context("author").decode().unwrap();
        assert_eq!(
            author,
            Author {
                name: "Dong".into(),
                email: "test@example.com".into()
            }
        );

        let err = ctx.get_context("license").decode::<Author>().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Deserialization);
    }

    #[test]
    fn test_render() {
        let ctx = sample();
        assert_eq!(ctx.render("${author.name} (${license})"), "Dong (MIT)");
        assert!(ctx.try_render("${author.phone}").is_err());
    }
}
