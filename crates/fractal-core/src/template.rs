//! Template interpolation
//!
//! Replaces `${path}` placeholders in a string with the string form of the
//! value found at `path`:
//! - `${author.name}` - nested map keys
//! - `${items.0}` - list index
//! - `${items.length()}` - size of a map or list
//!
//! A path may contain letters, digits, `.`, `_` and the `length()`
//! accessor. Anything else between `${` and `}` is left as literal text.
//! Replacement happens in a single left-to-right pass; inserted text is
//! never scanned again.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::cast;
use crate::context::Context;
use crate::error::Result;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{((?:[a-zA-Z0-9._]|length\(\))+)\}").expect("placeholder pattern is valid")
});

/// Render `template` against `ctx`, substituting `""` for unresolvable paths
pub fn interpolate(template: &str, ctx: &Context) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| ctx.as_string(&caps[1]))
        .into_owned()
}

/// Render `template` against `ctx`, failing on the first unresolvable path
pub fn try_interpolate(template: &str, ctx: &Context) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut last = 0;

    for caps in PLACEHOLDER.captures_iter(template) {
        let whole = caps.get(0).map_or(0..0, |m| m.range());
        let value = ctx.resolve(&caps[1])?;

        out.push_str(&template[last..whole.start]);
        out.push_str(&cast::to_string(&value));
        last = whole.end;
    }

    out.push_str(&template[last..]);
    Ok(out)
}

/// Paths referenced by `template`, in order of appearance
pub fn placeholders(template: &str) -> Vec<&str> {
    PLACEHOLDER
        .captures_iter(template)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect()
}
