//! The typed value model behind canonical serialization.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use crate::error::CanonicalError;

/// Helper for building JSON paths while walking a parsed tree.
#[derive(Debug, Clone)]
pub(crate) struct JsonPath {
    segments: Vec<String>,
}

impl JsonPath {
    pub(crate) fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    pub(crate) fn push_field(&self, field: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(field.to_string());
        Self { segments }
    }

    pub(crate) fn push_index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(format!("[{}]", index));
        Self { segments }
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            write!(f, "root")
        } else {
            write!(f, "{}", self.segments.join("."))
        }
    }
}

/// In-memory form of a parsed ESRP JSON document, restricted to the shapes
/// the canonical profile allows.
///
/// The tree never contains a floating-point node: conversion fails instead of
/// coercing. Object keys live in a `BTreeMap`, so canonical (byte-wise
/// ascending) key order is a structural property rather than a serialization
/// step. Values are built fresh per call and discarded after use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanonicalValue {
    /// JSON `null`.
    Null,
    /// JSON `true` / `false`.
    Bool(bool),
    /// Whole number within the 64-bit signed range.
    Integer(i64),
    /// UTF-8 string.
    String(String),
    /// Ordered sequence; element order is significant and preserved.
    Array(Vec<CanonicalValue>),
    /// String-keyed mapping; source insertion order is not significant.
    Object(BTreeMap<String, CanonicalValue>),
}

impl CanonicalValue {
    /// Parses JSON text into a canonical tree.
    ///
    /// # Errors
    ///
    /// [`CanonicalError::InvalidJson`] on a syntax error;
    /// [`CanonicalError::FloatNotAllowed`] or
    /// [`CanonicalError::IntegerOutOfRange`] when a numeric literal falls
    /// outside the profile.
    pub fn from_text(text: &str) -> Result<Self, CanonicalError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| CanonicalError::InvalidJson(e.to_string()))?;
        Self::from_value(&value)
    }

    /// Converts an already-parsed `serde_json` tree.
    pub fn from_value(value: &Value) -> Result<Self, CanonicalError> {
        convert(value, JsonPath::root())
    }
}

fn convert(value: &Value, path: JsonPath) -> Result<CanonicalValue, CanonicalError> {
    match value {
        Value::Null => Ok(CanonicalValue::Null),
        Value::Bool(b) => Ok(CanonicalValue::Bool(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Ok(CanonicalValue::Integer(i)),
            // u64 beyond i64::MAX parsed without a fraction: a whole number,
            // but outside the interop range this profile commits to.
            None if n.is_u64() => Err(CanonicalError::IntegerOutOfRange {
                path: path.to_string(),
                value: n.to_string(),
            }),
            None => Err(CanonicalError::FloatNotAllowed {
                path: path.to_string(),
            }),
        },
        Value::String(s) => Ok(CanonicalValue::String(s.clone())),
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for (idx, item) in items.iter().enumerate() {
                out.push(convert(item, path.push_index(idx))?);
            }
            Ok(CanonicalValue::Array(out))
        }
        Value::Object(map) => {
            let mut out = BTreeMap::new();
            for (key, child) in map {
                out.insert(key.clone(), convert(child, path.push_field(key))?);
            }
            Ok(CanonicalValue::Object(out))
        }
    }
}
