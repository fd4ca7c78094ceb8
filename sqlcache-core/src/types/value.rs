//! Bound parameter values and their stable textual rendering.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::NULL_LITERAL;

/// A single value bound to a statement placeholder.
///
/// The [`fmt::Display`] rendering is part of the cache key, so it must stay
/// stable across releases: changing it silently invalidates every cached entry.
///
/// Numeric variants share one rendering: `Int(42)`, `UInt(42)` and
/// `Float(42.0)` all render `42` and therefore address the same entry. Only
/// `Text` and `Bytes` are marked to keep them apart from numbers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// SQL `NULL`
    Null,
    /// Boolean
    Bool(bool),
    /// Signed integer
    Int(i64),
    /// Unsigned integer
    UInt(u64),
    /// Floating point
    Float(f64),
    /// Text, rendered quoted so `"42"` and `42` stay distinct
    Text(String),
    /// Raw bytes, rendered as `0x`-prefixed hex
    Bytes(Vec<u8>),
    /// UTC timestamp, rendered as RFC 3339
    Timestamp(DateTime<Utc>),
}

impl Value {
    /// Returns true for `NULL`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str(NULL_LITERAL),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::UInt(u) => write!(f, "{}", u),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => write!(f, "{:?}", s),
            Value::Bytes(b) => write!(f, "0x{}", hex::encode(b)),
            Value::Timestamp(t) => f.write_str(&t.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        }
    }
}

/// Renders an ordered parameter list as `[a b c]`.
///
/// The empty list renders as `[]`.
pub fn render_params(params: &[Value]) -> String {
    let rendered: Vec<String> = params.iter().map(ToString::to_string).collect();
    format!("[{}]", rendered.join(" "))
}

// ═══════════════════════════════════════════════════════════════════════════════
// CONVERSIONS
// ═══════════════════════════════════════════════════════════════════════════════

macro_rules! impl_from {
    ($variant:ident, $target:ty, $($source:ty),+) => {
        $(
            impl From<$source> for Value {
                fn from(v: $source) -> Self {
                    Value::$variant(<$target>::from(v))
                }
            }
        )+
    };
}

impl_from!(Int, i64, i8, i16, i32, i64);
impl_from!(UInt, u64, u8, u16, u32, u64);
impl_from!(Float, f64, f32, f64);
impl_from!(Text, String, String, &str);
impl_from!(Bool, bool, bool);
impl_from!(Bytes, Vec<u8>, Vec<u8>, &[u8]);

impl From<DateTime<Utc>> for Value {
    fn from(t: DateTime<Utc>) -> Self {
        Value::Timestamp(t)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}
