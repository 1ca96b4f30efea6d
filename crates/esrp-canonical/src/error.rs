use thiserror::Error;

/// Errors raised while turning JSON text into canonical bytes.
///
/// `InvalidJson` is a syntax failure; the other variants mean the input
/// parsed but contains a value the canonical profile forbids.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CanonicalError {
    /// Input was not syntactically valid JSON.
    #[error("invalid JSON: {0}")]
    InvalidJson(String),
    /// A numeric literal with a fractional or exponent part was found.
    #[error("floating point not allowed at {path}")]
    FloatNotAllowed {
        /// JSON path of the offending literal.
        path: String,
    },
    /// An integer outside the 64-bit signed range was found.
    #[error("integer out of range at {path}: {value}")]
    IntegerOutOfRange {
        /// JSON path of the offending literal.
        path: String,
        /// The literal as written in the input.
        value: String,
    },
}
