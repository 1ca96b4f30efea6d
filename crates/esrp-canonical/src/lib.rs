//! Canonical JSON bytes and content hashing for ESRP messages.
//!
//! Every ESRP envelope is reduced to a unique canonical byte form before
//! hashing, so independent producers and consumers agree bit-for-bit on what
//! a message is without sharing transport state. This crate owns that byte
//! form: the restricted value model, the deterministic serializer, and the
//! SHA-256 digest helpers over it.
//!
//! All operations are pure and synchronous; each call owns its own tree and
//! nothing is shared between calls.
//!
#![deny(missing_docs)]

/// Deterministic serialization of canonical trees.
pub mod canonicalizer;
/// Error types for canonicalization and hashing.
pub mod error;
/// SHA-256 digest helpers over canonical bytes.
pub mod hash;
/// The restricted JSON value model (floats rejected at the boundary).
pub mod value;

pub use canonicalizer::{canonical_bytes, canonicalize, canonicalize_value};
pub use error::CanonicalError;
pub use hash::{hash_bytes, hash_json, is_hex_digest, verify_bytes, verify_json};
pub use value::CanonicalValue;
