//! Workspace URI resolution for ESRP artifact locators.
//!
//! A workspace URI names a location inside a service workspace without
//! touching storage. Parsing bugs here have the same class of consequence as
//! canonicalization bugs elsewhere in the protocol (accepting malformed or
//! unsafe input), so the resolver lives in the integrity core: one scheme,
//! a constrained namespace, and lexical rejection of traversal.
//!
#![deny(missing_docs)]

/// Error types for URI parsing.
pub mod error;
/// The `workspace://` URI format and resolver.
pub mod uri;

pub use error::UriError;
pub use uri::{
    parse_workspace_uri, WorkspaceUri, MAX_NAMESPACE_LENGTH, MAX_PATH_LENGTH,
    RESERVED_NAMESPACES, WORKSPACE_URI_PREFIX,
};
