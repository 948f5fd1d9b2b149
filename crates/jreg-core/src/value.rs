//! # Closed JSON Value Variant
//!
//! Defines [`Value`], the tagged variant set that stands between a host
//! program's dynamic JSON representation and the canonical serializer. A
//! real language binding maps its own dynamic objects into this enum; in a
//! pure-Rust setting, the conversion from [`serde_json::Value`] below plays
//! the same role.
//!
//! ## Why not just use `serde_json::Value`?
//!
//! `serde_json::Value::from(f64)` silently collapses `NaN` and the
//! infinities into `Value::Null` — there is no way to recover that the
//! original number was non-finite once it has passed through that
//! conversion. The registry's contract requires a hard `BadValue` error
//! for non-finite floats (spec §4.1, §4.2 of the original design note),
//! so this crate keeps its own `Float(f64)` variant and checks
//! finite-ness at the one place values are turned into bytes
//! ([`crate::canonical::canonicalise`]), rather than trusting a
//! conversion that has already thrown the information away.

use std::collections::BTreeMap;

use crate::error::BadValue;

/// A JSON value restricted to the variant set this registry understands.
///
/// Object keys are stored in a `BTreeMap`, which both resolves duplicate
/// keys with last-wins semantics (matching a host mapping's own insertion
/// behaviour) and sorts them by byte order for free — `BTreeMap<String, _>`
/// orders keys by `str`'s `Ord` impl, which compares the underlying UTF-8
/// bytes, exactly the ordering the canonical form requires.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    Object(BTreeMap<String, Value>),
}

impl Value {
    /// Convenience constructor for an object from an iterator of pairs.
    /// Later entries win over earlier ones for a repeated key.
    pub fn object<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        Value::Object(entries.into_iter().collect())
    }
}

impl TryFrom<serde_json::Value> for Value {
    type Error = BadValue;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        Ok(match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                let converted: Result<Vec<Value>, BadValue> =
                    items.into_iter().map(Value::try_from).collect();
                Value::Array(converted?)
            }
            serde_json::Value::Object(map) => {
                let mut out = BTreeMap::new();
                for (k, v) in map {
                    out.insert(k, Value::try_from(v)?);
                }
                Value::Object(out)
            }
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Integer(i)
                } else if let Some(u) = n.as_u64() {
                    i64::try_from(u)
                        .map(Value::Integer)
                        .map_err(|_| BadValue::IntegerOutOfRange)?
                } else {
                    // serde_json can only reach this arm for a finite f64;
                    // it has no representation for NaN/Infinity at all.
                    Value::Float(n.as_f64().ok_or(BadValue::IntegerOutOfRange)?)
                }
            }
        })
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}
