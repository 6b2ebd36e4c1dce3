//! Best-effort casts from a resolved value to primitive types
//!
//! These never fail: anything that cannot be converted yields the zero
//! value of the target type. Numeric strings are parsed, booleans map to
//! 1/0, and narrowing integer casts wrap like `as`.

use crate::value::Value;

/// Cast to bool.
///
/// Numbers are true when non-zero; strings accept `1/t/T/TRUE/true/True`
/// and `0/f/F/FALSE/false/False`.
pub fn to_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Integer(i) => *i != 0,
        Value::Unsigned(u) => *u != 0,
        Value::Float(f) => *f != 0.0,
        Value::String(s) => parse_bool(s).unwrap_or(false),
        _ => false,
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Cast to i64. Floats truncate toward zero.
pub fn to_i64(value: &Value) -> i64 {
    match value {
        Value::Bool(b) => *b as i64,
        Value::Integer(i) => *i,
        Value::Unsigned(u) => *u as i64,
        Value::Float(f) => *f as i64,
        Value::String(s) => parse_i64(s).unwrap_or(0),
        _ => 0,
    }
}

/// Cast to u64. Negative inputs yield 0.
pub fn to_u64(value: &Value) -> u64 {
    match value {
        Value::Bool(b) => *b as u64,
        Value::Integer(i) => u64::try_from(*i).unwrap_or(0),
        Value::Unsigned(u) => *u,
        Value::Float(f) if *f >= 0.0 => *f as u64,
        Value::String(s) => {
            let s = trim_zero_decimal(s.trim());
            s.parse::<u64>().unwrap_or(0)
        }
        _ => 0,
    }
}

/// Cast to f64
pub fn to_f64(value: &Value) -> f64 {
    match value {
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::Integer(i) => *i as f64,
        Value::Unsigned(u) => *u as f64,
        Value::Float(f) => *f,
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Cast to a string. Null, sequences and mappings yield `""`.
pub fn to_string(value: &Value) -> String {
    match value {
        Value::Bool(b) => b.to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Unsigned(u) => u.to_string(),
        Value::Float(f) => f.to_string(),
        Value::String(s) => s.clone(),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => String::new(),
    }
}

fn parse_i64(s: &str) -> Option<i64> {
    trim_zero_decimal(s.trim()).parse().ok()
}

// "12.000" parses as an integer; "12.5" does not.
fn trim_zero_decimal(s: &str) -> &str {
    match s.split_once('.') {
        Some((int, frac)) if !int.is_empty() && frac.bytes().all(|b| b == b'0') => int,
        _ => s,
    }
}

macro_rules! narrow {
    ($($name:ident => $t:ty; $wide:ident),* $(,)?) => {
        $(
            #[doc = concat!("Cast to ", stringify!($t), ", wrapping on overflow")]
            pub fn $name(value: &Value) -> $t {
                $wide(value) as $t
            }
        )*
    };
}

narrow! {
    to_i8 => i8; to_i64,
    to_i16 => i16; to_i64,
    to_i32 => i32; to_i64,
    to_isize => isize; to_i64,
    to_u8 => u8; to_u64,
    to_u16 => u16; to_u64,
    to_u32 => u32; to_u64,
    to_usize => usize; to_u64,
    to_f32 => f32; to_f64,
}
