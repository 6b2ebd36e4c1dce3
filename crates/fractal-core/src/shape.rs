//! Shape classification
//!
//! Every value is seen as one of three shapes: a map (string keys to
//! values), a list (ordered, 0-indexed) or a scalar (everything else,
//! including null). Resolution, mutation and the emptiness checks all
//! work on the [`View`] produced here instead of matching on [`Value`]
//! variants themselves.

use crate::value::{Mapping, Value};

/// Tag for the shape of a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SimpleType {
    /// Shape has not been determined
    #[default]
    Unknown,
    /// Key-to-value mapping
    Map,
    /// Ordered sequence
    List,
    /// Anything else
    Scalar,
}

/// Normalized, borrowed view of a value according to its shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum View<'a> {
    Map(&'a Mapping),
    List(&'a [Value]),
    Scalar(&'a Value),
}

impl<'a> View<'a> {
    /// The shape tag of this view
    pub fn simple_type(&self) -> SimpleType {
        match self {
            View::Map(_) => SimpleType::Map,
            View::List(_) => SimpleType::List,
            View::Scalar(_) => SimpleType::Scalar,
        }
    }

    /// Entry count for maps, element count for lists, `None` for scalars
    pub fn count(&self) -> Option<usize> {
        match self {
            View::Map(m) => Some(m.len()),
            View::List(l) => Some(l.len()),
            View::Scalar(_) => None,
        }
    }

    pub fn as_map(&self) -> Option<&'a Mapping> {
        match *self {
            View::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&'a [Value]> {
        match *self {
            View::List(l) => Some(l),
            _ => None,
        }
    }
}

/// Classify a value by shape.
///
/// Total over all values. Contexts never reach this point: they are
/// unwrapped into their data when converted into a [`Value`].
pub fn classify(value: &Value) -> View<'_> {
    match value {
        Value::Mapping(m) => View::Map(m),
        Value::Sequence(l) => View::List(l),
        scalar => View::Scalar(scalar),
    }
}

/// Take the mapping out of a map-shaped value; any other shape is handed back
pub fn into_map(value: Value) -> Result<Mapping, Value> {
    match value {
        Value::Mapping(m) => Ok(m),
        other => Err(other),
    }
}

/// Shorthand for `classify(value).simple_type()`
pub fn simple_type(value: &Value) -> SimpleType {
    classify(value).simple_type()
}
