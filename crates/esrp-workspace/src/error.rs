use thiserror::Error;

/// Errors raised while parsing a workspace URI.
///
/// Every variant means the locator is rejected outright; there is no partial
/// parse. The `Traversal` variant exists separately because accepting such a
/// URI has a different class of consequence than a merely malformed one.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UriError {
    /// Wrong scheme, or namespace/path structure missing.
    #[error("invalid workspace URI: {0}")]
    InvalidUri(String),
    /// Namespace is empty, too long, or uses a disallowed character.
    #[error("invalid workspace URI: namespace '{namespace}': {reason}")]
    InvalidNamespace {
        /// The rejected namespace.
        namespace: String,
        /// Why it was rejected.
        reason: String,
    },
    /// Path is empty, too long, absolute, or contains a NUL byte.
    #[error("invalid workspace URI: path '{path}': {reason}")]
    InvalidPath {
        /// The rejected path.
        path: String,
        /// Why it was rejected.
        reason: String,
    },
    /// A `/`-delimited path segment equals the parent-directory marker.
    #[error("invalid workspace URI: path '{0}' contains a traversal segment")]
    Traversal(String),
}
