//! Dotted path resolution and mutation
//!
//! A path is a string of `.`-separated segments such as `author.name` or
//! `items.0`. Empty segments are skipped, so `""`, `"."` and `".."` all
//! address the root. A segment is a map key, a list index, or the
//! reserved `length()` accessor which yields the size of a map or list.

use std::borrow::Cow;

use crate::error::{Error, Result};
use crate::shape::{self, classify, View};
use crate::value::{Mapping, Value};

/// Reserved segment returning the entry count of a map or list
pub const LENGTH_SEGMENT: &str = "length()";

/// Anything that can be turned into a dotted path.
///
/// Implemented for string types (used as-is) and for slices and arrays of
/// fragments, which are joined with `.`.
pub trait AsPath {
    fn as_path(&self) -> Cow<'_, str>;
}

impl AsPath for str {
    fn as_path(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl AsPath for String {
    fn as_path(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_str())
    }
}

impl<T: AsPath + ?Sized> AsPath for &T {
    fn as_path(&self) -> Cow<'_, str> {
        (**self).as_path()
    }
}

impl AsPath for [&str] {
    fn as_path(&self) -> Cow<'_, str> {
        Cow::Owned(self.join("."))
    }
}

impl<const N: usize> AsPath for [&str; N] {
    fn as_path(&self) -> Cow<'_, str> {
        Cow::Owned(self.join("."))
    }
}

impl AsPath for [String] {
    fn as_path(&self) -> Cow<'_, str> {
        Cow::Owned(self.join("."))
    }
}

impl AsPath for Vec<&str> {
    fn as_path(&self) -> Cow<'_, str> {
        self.as_slice().as_path()
    }
}

impl AsPath for Vec<String> {
    fn as_path(&self) -> Cow<'_, str> {
        self.as_slice().as_path()
    }
}

/// Split a path into its non-empty segments
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('.').filter(|s| !s.is_empty())
}

/// Check whether a path addresses the root (has no non-empty segment)
pub fn is_root(path: &str) -> bool {
    segments(path).next().is_none()
}

/// Resolve `path` against `root` without modifying it.
///
/// The result borrows from `root` unless it was produced by `length()`.
pub fn resolve<'a>(root: &'a Value, path: &str) -> Result<Cow<'a, Value>> {
    let mut current = Cow::Borrowed(root);

    for segment in segments(path) {
        current = match current {
            Cow::Borrowed(value) => step(value, segment, path)?,
            // Only `length()` produces owned values, and those are scalars.
            Cow::Owned(value) => Cow::Owned(step(&value, segment, path)?.into_owned()),
        };
    }

    Ok(current)
}

fn step<'a>(current: &'a Value, segment: &str, path: &str) -> Result<Cow<'a, Value>> {
    let result = match classify(current) {
        View::Map(map) => {
            if segment == LENGTH_SEGMENT {
                Ok(Cow::Owned(Value::from(map.len())))
            } else {
                map.get(segment)
                    .map(Cow::Borrowed)
                    .ok_or_else(|| Error::path_not_found(path, segment))
            }
        }
        View::List(list) => {
            if segment == LENGTH_SEGMENT {
                Ok(Cow::Owned(Value::from(list.len())))
            } else {
                index(list, segment, path).map(Cow::Borrowed)
            }
        }
        View::Scalar(_) => Err(Error::path_not_found(path, segment)),
    };

    if let Err(err) = &result {
        log::trace!("Failed to resolve '{}' at segment '{}': {}", path, segment, err.kind);
    }

    result
}

fn index<'a>(list: &'a [Value], segment: &str, path: &str) -> Result<&'a Value> {
    let idx: i64 = segment
        .parse()
        .map_err(|_| Error::invalid_index(path, segment))?;

    usize::try_from(idx)
        .ok()
        .and_then(|i| list.get(i))
        .ok_or_else(|| Error::index_out_of_range(path, idx, list.len()))
}

/// Install `value` at `path` and return the new root.
///
/// Intermediate containers are always maps: any non-map value met along
/// the way, lists included, is replaced by an empty map. A path with no
/// segments replaces the whole root. This never fails.
pub fn mutate(root: Value, path: &str, value: Value) -> Value {
    let parts: Vec<&str> = segments(path).collect();
    if parts.is_empty() {
        return value;
    }

    set_recursive(root, &parts, value)
}

fn set_recursive(current: Value, parts: &[&str], value: Value) -> Value {
    let mut map = into_mapping(current);

    match parts {
        [] => {}
        [last] => {
            map.insert((*last).to_string(), value);
        }
        [head, rest @ ..] => {
            let child = map.get_mut(*head).map(std::mem::take).unwrap_or_else(|| {
                log::trace!("Creating map for missing segment '{}'", head);
                Value::Mapping(Mapping::new())
            });
            map.insert((*head).to_string(), set_recursive(child, rest, value));
        }
    }

    Value::Mapping(map)
}

fn into_mapping(value: Value) -> Mapping {
    shape::into_map(value).unwrap_or_else(|other| {
        if !other.is_null() {
            log::debug!("Replacing {} with a map to write through it", other.type_name());
        }
        Mapping::new()
    })
}
