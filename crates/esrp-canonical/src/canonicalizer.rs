//! Deterministic serialization of [`CanonicalValue`] trees.
//!
//! The byte form is the load-bearing invariant of the protocol: two
//! independent implementations must agree on it bit-for-bit, or hash-based
//! integrity silently breaks. The rules:
//!
//! - object keys in byte-wise ascending UTF-8 order, `:` and `,` separators,
//!   no whitespace anywhere
//! - arrays preserve source order
//! - strings re-escaped with the minimal set (`"`, `\\`, control characters;
//!   `\n`/`\r`/`\t` get their short forms, other controls `\u00XX`)
//! - integers in minimal decimal form, booleans as `true`/`false`, `null`

use std::fmt::Write as FmtWrite;

use serde_json::Value;

use crate::error::CanonicalError;
use crate::value::CanonicalValue;

/// Produces the canonical byte form of a JSON text.
///
/// Logically equal inputs (any key order, any whitespace) yield byte-identical
/// output, and the output re-canonicalizes to itself.
///
/// # Errors
///
/// [`CanonicalError::InvalidJson`] on a syntax error, or a canonicalization
/// error when the input contains a float or an out-of-range integer.
///
/// # Example
///
/// ```rust
/// let bytes = esrp_canonical::canonicalize("{\"z\": 1,  \"a\": 2}")?;
/// assert_eq!(bytes, b"{\"a\":2,\"z\":1}");
/// # Ok::<(), esrp_canonical::CanonicalError>(())
/// ```
pub fn canonicalize(text: &str) -> Result<Vec<u8>, CanonicalError> {
    let value = CanonicalValue::from_text(text)?;
    Ok(canonical_bytes(&value))
}

/// Canonicalizes an already-parsed `serde_json` tree.
///
/// Used by callers that assemble a value programmatically (the payload-hash
/// deriver) rather than holding source text.
pub fn canonicalize_value(value: &Value) -> Result<Vec<u8>, CanonicalError> {
    let value = CanonicalValue::from_value(value)?;
    Ok(canonical_bytes(&value))
}

/// Serializes a canonical tree. Infallible: disallowed shapes were already
/// rejected during conversion.
pub fn canonical_bytes(value: &CanonicalValue) -> Vec<u8> {
    let mut output = Vec::new();
    write_value(&mut output, value);
    output
}

fn write_value(output: &mut Vec<u8>, value: &CanonicalValue) {
    match value {
        CanonicalValue::Null => output.extend_from_slice(b"null"),
        CanonicalValue::Bool(true) => output.extend_from_slice(b"true"),
        CanonicalValue::Bool(false) => output.extend_from_slice(b"false"),
        // i64 Display is already the minimal decimal form: no leading zeros,
        // no "+", single "-" for negatives, "0" for zero.
        CanonicalValue::Integer(i) => output.extend_from_slice(i.to_string().as_bytes()),
        CanonicalValue::String(s) => write_string(output, s),
        CanonicalValue::Array(items) => {
            output.push(b'[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    output.push(b',');
                }
                write_value(output, item);
            }
            output.push(b']');
        }
        CanonicalValue::Object(map) => {
            // BTreeMap iteration is byte-wise ascending by key.
            output.push(b'{');
            for (i, (key, child)) in map.iter().enumerate() {
                if i > 0 {
                    output.push(b',');
                }
                write_string(output, key);
                output.push(b':');
                write_value(output, child);
            }
            output.push(b'}');
        }
    }
}

fn write_string(output: &mut Vec<u8>, s: &str) {
    output.push(b'"');
    for c in s.chars() {
        match c {
            '"' => output.extend_from_slice(b"\\\""),
            '\\' => output.extend_from_slice(b"\\\\"),
            '\n' => output.extend_from_slice(b"\\n"),
            '\r' => output.extend_from_slice(b"\\r"),
            '\t' => output.extend_from_slice(b"\\t"),
            c if c.is_control() => {
                let mut escaped = String::new();
                write!(escaped, "\\u{:04x}", c as u32).expect("write to String");
                output.extend_from_slice(escaped.as_bytes());
            }
            c => {
                let mut buf = [0u8; 4];
                output.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
        }
    }
    output.push(b'"');
}
