//! SHA-256 digests over canonical bytes.

use sha2::{Digest, Sha256};

use crate::canonicalizer::canonicalize;
use crate::error::CanonicalError;

/// Computes the SHA-256 digest of raw bytes as 64 lowercase hex characters.
///
/// # Example
///
/// ```rust
/// let digest = esrp_canonical::hash_bytes(b"");
/// assert_eq!(
///     digest,
///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
/// );
/// ```
pub fn hash_bytes(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Canonicalizes JSON text and hashes the canonical bytes.
///
/// Logically equal texts (any key order or whitespace) hash identically.
///
/// # Errors
///
/// Canonicalization errors propagate unchanged.
pub fn hash_json(text: &str) -> Result<String, CanonicalError> {
    Ok(hash_bytes(&canonicalize(text)?))
}

/// Whether `candidate` has the shape of a SHA-256 hex digest (64 hex chars,
/// either case).
pub fn is_hex_digest(candidate: &str) -> bool {
    candidate.len() == 64 && candidate.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Recomputes the digest of `data` and compares against `candidate`,
/// ignoring ASCII case.
///
/// Verification is a predicate, not a validator of its second argument: a
/// candidate that is not 64 hex characters is a non-match (`false`), never
/// an error.
pub fn verify_bytes(data: &[u8], candidate: &str) -> bool {
    if !is_hex_digest(candidate) {
        return false;
    }
    hash_bytes(data).eq_ignore_ascii_case(candidate)
}

/// Canonicalizes JSON text and verifies `candidate` against the digest of
/// the canonical bytes.
///
/// # Errors
///
/// Only canonicalization failures error; a well-formed-but-wrong candidate
/// is `Ok(false)`.
pub fn verify_json(text: &str, candidate: &str) -> Result<bool, CanonicalError> {
    let canonical = canonicalize(text)?;
    Ok(verify_bytes(&canonical, candidate))
}
