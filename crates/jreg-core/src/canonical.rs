//! # Canonical Serialization — the Sole Dedup Key
//!
//! Defines [`canonicalise`], the deterministic byte-exact normal form used
//! as the registry's dedup key. This is the ONLY function in the workspace
//! that is allowed to produce a `Cval`; every upsert, cache probe, and
//! batch dedup pass flows through it.
//!
//! ## Normal form rules
//!
//! - No insignificant whitespace.
//! - Object keys emitted in ascending byte order of their UTF-8 encoding
//!   (free, because [`crate::value::Value::Object`] is a `BTreeMap`).
//! - Array element order preserved.
//! - Strings escape only what RFC 8259 requires (`"`, `\`, and the C0
//!   controls); non-ASCII code points pass through as raw UTF-8.
//! - Integers: shortest decimal, no leading zeros, `-` only when negative.
//! - Floats: shortest round-trippable decimal with an explicit fractional
//!   part (`3.0`, never `3`), produced by the same `ryu` algorithm
//!   `serde_json` itself vendors for float formatting. `NaN` and the
//!   infinities are rejected before they ever reach `ryu`.
//!
//! ## Determinism property
//!
//! For all values `v1, v2` that denote the same JSON abstract value,
//! `canonicalise(v1) == canonicalise(v2)` byte-for-byte. This holds
//! because every branch below is a total function of the `Value` tree —
//! there is no hashmap iteration order or locale-sensitive comparison
//! anywhere in the pipeline.

use crate::error::BadValue;
use crate::value::Value;

/// Produce the canonical byte representation of `value`.
///
/// # Errors
///
/// Returns [`BadValue::NonFiniteFloat`] if the value (at any depth)
/// contains a `NaN` or infinite float.
pub fn canonicalise(value: &Value) -> Result<Vec<u8>, BadValue> {
    let mut out = String::new();
    write_value(value, &mut out)?;
    Ok(out.into_bytes())
}

fn write_value(value: &Value, out: &mut String) -> Result<(), BadValue> {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Integer(i) => {
            // `i64`'s `Display` already yields the shortest decimal, no
            // leading zeros, and a bare `-` for negatives — nothing here
            // needs custom formatting.
            use std::fmt::Write as _;
            let _ = write!(out, "{i}");
        }
        Value::Float(f) => {
            if !f.is_finite() {
                return Err(BadValue::NonFiniteFloat(*f));
            }
            let mut buf = ryu::Buffer::new();
            out.push_str(buf.format_finite(*f));
        }
        Value::String(s) => write_escaped_string(s, out),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(item, out)?;
            }
            out.push(']');
        }
        Value::Object(map) => {
            out.push('{');
            for (i, (key, val)) in map.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_escaped_string(key, out);
                out.push(':');
                write_value(val, out)?;
            }
            out.push('}');
        }
    }
    Ok(())
}

/// Write `s` as a JSON string literal with the minimum escaping RFC 8259
/// requires. Non-ASCII code points are pushed through as their own UTF-8
/// bytes rather than `\uXXXX` — `out.push(c)` appends `c`'s native
/// encoding, so this falls out of the `char` loop for free.
fn write_escaped_string(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                use std::fmt::Write as _;
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}
