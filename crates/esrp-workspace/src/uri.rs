//! Workspace URI parsing.
//!
//! Workspace URIs locate artifacts inside a service workspace:
//!
//! ```text
//! workspace://<namespace>/<path>
//! ```
//!
//! A parsed [`WorkspaceUri`] is a locator only; it never owns underlying
//! storage. Traversal is rejected lexically, per `/`-delimited segment, so a
//! `..` is refused regardless of position and regardless of what the
//! surrounding layer would later resolve it against.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::UriError;

/// The only scheme prefix this resolver recognizes.
pub const WORKSPACE_URI_PREFIX: &str = "workspace://";

/// Maximum namespace length in bytes.
pub const MAX_NAMESPACE_LENGTH: usize = 64;

/// Maximum path length in bytes.
pub const MAX_PATH_LENGTH: usize = 1024;

/// Namespaces reserved for the surrounding runtime.
pub const RESERVED_NAMESPACES: &[&str] = &["system", "tmp", "cache"];

/// Allowed namespace characters.
const NAMESPACE_PATTERN: &str = r"^[A-Za-z0-9._-]+$";

/// A parsed workspace URI: namespace plus slash-joined relative path.
///
/// # Examples
///
/// ```rust
/// use esrp_workspace::WorkspaceUri;
///
/// let uri = WorkspaceUri::parse("workspace://artifacts/output.wav")?;
/// assert_eq!(uri.namespace, "artifacts");
/// assert_eq!(uri.path, "output.wav");
///
/// assert!(WorkspaceUri::parse("file://path/to/file").is_err());
/// assert!(WorkspaceUri::parse("workspace://artifacts/../secret").is_err());
/// # Ok::<(), esrp_workspace::UriError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkspaceUri {
    /// First path segment after the scheme prefix (e.g. `artifacts`, `temp`).
    pub namespace: String,
    /// Remainder after the namespace, slash-joined, always relative.
    pub path: String,
}

impl WorkspaceUri {
    /// Builds a URI from parts, applying the same rules as [`parse`].
    ///
    /// [`parse`]: WorkspaceUri::parse
    ///
    /// # Errors
    ///
    /// Returns [`UriError`] when the namespace or path is invalid.
    pub fn new(namespace: impl Into<String>, path: impl Into<String>) -> Result<Self, UriError> {
        let namespace = namespace.into();
        let path = path.into();
        validate_namespace(&namespace)?;
        validate_path(&path)?;
        Ok(Self { namespace, path })
    }

    /// Parses a `workspace://<namespace>/<path>` string.
    ///
    /// # Errors
    ///
    /// Returns [`UriError`] when the scheme is not `workspace://`, the
    /// namespace or path is missing or malformed, or any path segment is the
    /// parent-directory marker.
    pub fn parse(uri: &str) -> Result<Self, UriError> {
        let rest = uri
            .strip_prefix(WORKSPACE_URI_PREFIX)
            .ok_or_else(|| UriError::InvalidUri(format!("expected '{WORKSPACE_URI_PREFIX}' scheme, got: {uri}")))?;

        if rest.is_empty() {
            return Err(UriError::InvalidUri(
                "missing namespace and path".to_string(),
            ));
        }

        let Some((namespace, path)) = rest.split_once('/') else {
            return Err(UriError::InvalidUri(
                "URI must contain both namespace and path".to_string(),
            ));
        };

        Self::new(namespace, path)
    }

    /// Whether the namespace is reserved for the surrounding runtime.
    pub fn is_reserved_namespace(&self) -> bool {
        RESERVED_NAMESPACES.contains(&self.namespace.as_str())
    }
}

impl Display for WorkspaceUri {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}/{}", WORKSPACE_URI_PREFIX, self.namespace, self.path)
    }
}

impl FromStr for WorkspaceUri {
    type Err = UriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Parses a workspace URI into its `(namespace, path)` parts.
///
/// Convenience wrapper over [`WorkspaceUri::parse`] for callers that only
/// need the raw strings.
///
/// # Errors
///
/// Same as [`WorkspaceUri::parse`].
pub fn parse_workspace_uri(uri: &str) -> Result<(String, String), UriError> {
    let parsed = WorkspaceUri::parse(uri)?;
    Ok((parsed.namespace, parsed.path))
}

fn validate_namespace(namespace: &str) -> Result<(), UriError> {
    if namespace.is_empty() {
        return Err(UriError::InvalidNamespace {
            namespace: namespace.to_string(),
            reason: "namespace must not be empty".to_string(),
        });
    }
    if namespace.len() > MAX_NAMESPACE_LENGTH {
        return Err(UriError::InvalidNamespace {
            namespace: namespace.to_string(),
            reason: format!("longer than {MAX_NAMESPACE_LENGTH} bytes"),
        });
    }
    let re = Regex::new(NAMESPACE_PATTERN).expect("invalid regex");
    if !re.is_match(namespace) {
        return Err(UriError::InvalidNamespace {
            namespace: namespace.to_string(),
            reason: "allowed characters are a-z, A-Z, 0-9, '.', '_', '-'".to_string(),
        });
    }
    Ok(())
}

fn validate_path(path: &str) -> Result<(), UriError> {
    if path.is_empty() {
        return Err(UriError::InvalidPath {
            path: path.to_string(),
            reason: "path must not be empty".to_string(),
        });
    }
    if path.len() > MAX_PATH_LENGTH {
        return Err(UriError::InvalidPath {
            path: path.to_string(),
            reason: format!("longer than {MAX_PATH_LENGTH} bytes"),
        });
    }
    if path.starts_with('/') {
        return Err(UriError::InvalidPath {
            path: path.to_string(),
            reason: "path must be relative".to_string(),
        });
    }
    if path.contains('\0') {
        return Err(UriError::InvalidPath {
            path: path.to_string(),
            reason: "path must not contain NUL bytes".to_string(),
        });
    }
    // Lexical traversal check, per segment: rejects ".." anywhere in the
    // path while still allowing names that merely contain dots.
    if path.split('/').any(|segment| segment == "..") {
        return Err(UriError::Traversal(path.to_string()));
    }
    Ok(())
}
