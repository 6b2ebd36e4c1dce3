//! fractal-core: path-addressable access to loosely-structured data
//!
//! A [`Context`] wraps a JSON-like value tree and lets callers read and
//! write nested fields with dotted paths instead of matching on every
//! level by hand.
//!
//! # Example
//!
//! ```rust
//! use fractal_core::Context;
//!
//! let ctx = Context::from_json(r#"{
//!     "author": {"name": "Dong"},
//!     "license": "MIT",
//!     "items": [1, 2, 3]
//! }"#);
//!
//! assert_eq!(ctx.as_string("author.name"), "Dong");
//! assert_eq!(ctx.as_i64("items.length()"), 3);
//! assert_eq!(
//!     ctx.render("${license}: ${items.1}"),
//!     "MIT: 2"
//! );
//! ```

pub mod cast;
pub mod error;
pub mod path;
pub mod shape;
pub mod template;
pub mod value;

mod context;

pub use context::Context;
pub use error::{Error, ErrorKind, Result};
pub use path::AsPath;
pub use shape::{classify, SimpleType, View};
pub use value::{Mapping, Value};
