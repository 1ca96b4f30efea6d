use thiserror::Error;

use crate::validation::ValidationError;
use esrp_canonical::CanonicalError;

/// Failure modes of envelope-level operations.
///
/// Syntax failures (`InvalidJson`) are distinct from rule violations
/// (`Validation`): callers can tell "not JSON" apart from "JSON that breaks
/// an envelope rule" without inspecting the message text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnvelopeError {
    /// Input was not syntactically valid JSON.
    #[error("invalid JSON: {0}")]
    InvalidJson(String),
    /// Input parsed but violates an envelope rule.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
    /// Payload hashing hit a value the canonical profile forbids.
    #[error("canonicalization error: {0}")]
    Canonical(#[from] CanonicalError),
}
