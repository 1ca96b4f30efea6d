//! Request/response envelope model, validation, and payload hashing for ESRP.
//!
//! This crate owns the structural rules of the protocol: what a well-formed
//! request or response envelope looks like, which protocol versions are
//! wire-compatible, and how a request's content-identity hash is derived
//! from its canonical bytes.
//!
//! Core invariants:
//! - Validation is all-or-nothing and reports the first violated rule with
//!   its field path.
//! - Syntax errors, rule violations, and canonicalization failures are
//!   distinct error kinds.
//! - The payload hash covers exactly the fields named by
//!   [`payload::PAYLOAD_FIELDS`]; volatile identifiers never influence it.
//! - Everything here is pure and synchronous; envelopes live for one call.
//!
#![deny(missing_docs)]

/// Typed envelope structs.
pub mod envelope;
/// Envelope-level error kinds.
pub mod errors;
/// Payload hash derivation and verification.
pub mod payload;
/// Structural validation of requests and responses.
pub mod validation;
/// Protocol version parsing and the compatibility rule.
pub mod version;

pub use envelope::{
    Artifact, Caller, Encoding, ErrorInfo, Input, Job, JobState, RequestEnvelope,
    ResponseEnvelope, Status, Target,
};
pub use errors::EnvelopeError;
pub use payload::{
    derive_payload_hash, verify_payload_hash, INPUT_FIELDS, PAYLOAD_FIELDS, TARGET_FIELDS,
};
pub use validation::{validate_request, validate_response, ValidationError, Validator};
pub use version::{
    current_version, is_version_compatible, ProtocolVersion, VersionError, PROTOCOL_VERSION,
};
