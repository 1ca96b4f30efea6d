//! Protocol version parsing and compatibility.
//!
//! ESRP versions are `major.minor` strings. Peers are wire-compatible iff
//! their major components match; the minor component is an additive-change
//! counter and is never compared. The current version is a process-wide
//! immutable constant.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use thiserror::Error;

/// Current protocol major version.
pub const PROTOCOL_MAJOR_VERSION: u32 = 1;

/// Current protocol minor version.
pub const PROTOCOL_MINOR_VERSION: u32 = 0;

/// Current protocol version string.
pub const PROTOCOL_VERSION: &str = "1.0";

/// Errors raised while parsing a version string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VersionError {
    /// Empty input.
    #[error("invalid version: empty string")]
    Empty,
    /// Not exactly two dot-separated components.
    #[error("invalid version '{0}': expected 'major.minor'")]
    InvalidFormat(String),
    /// A component is not a non-negative decimal integer.
    #[error("invalid version '{got}': {component} component must be a non-negative integer")]
    InvalidComponent {
        /// The full input string.
        got: String,
        /// Which component was rejected (`major` or `minor`).
        component: &'static str,
    },
}

/// A parsed `major.minor` protocol version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProtocolVersion {
    /// Breaking-change counter; must match between peers.
    pub major: u32,
    /// Additive-change counter; never compared.
    pub minor: u32,
}

impl ProtocolVersion {
    /// Builds a version from components.
    pub fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// The version this build speaks.
    pub fn current() -> Self {
        Self::new(PROTOCOL_MAJOR_VERSION, PROTOCOL_MINOR_VERSION)
    }

    /// Parses a `"<major>.<minor>"` string.
    ///
    /// # Errors
    ///
    /// Returns [`VersionError`] for anything that is not exactly two
    /// dot-separated non-negative integers.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use esrp_envelope::ProtocolVersion;
    ///
    /// let v = ProtocolVersion::parse("1.5")?;
    /// assert_eq!((v.major, v.minor), (1, 5));
    /// assert!(ProtocolVersion::parse("invalid").is_err());
    /// # Ok::<(), esrp_envelope::VersionError>(())
    /// ```
    pub fn parse(text: &str) -> Result<Self, VersionError> {
        if text.is_empty() {
            return Err(VersionError::Empty);
        }

        let Some((major, minor)) = text.split_once('.') else {
            return Err(VersionError::InvalidFormat(text.to_string()));
        };
        if minor.contains('.') {
            return Err(VersionError::InvalidFormat(text.to_string()));
        }

        Ok(Self {
            major: parse_component(major, text, "major")?,
            minor: parse_component(minor, text, "minor")?,
        })
    }

    /// Whether two versions are wire-compatible (equal major components).
    pub fn is_compatible_with(&self, other: &Self) -> bool {
        self.major == other.major
    }
}

/// Digits only: `u32::from_str` would accept a leading `+`.
fn parse_component(component: &str, got: &str, name: &'static str) -> Result<u32, VersionError> {
    if component.is_empty() || !component.bytes().all(|b| b.is_ascii_digit()) {
        return Err(VersionError::InvalidComponent {
            got: got.to_string(),
            component: name,
        });
    }
    component
        .parse::<u32>()
        .map_err(|_| VersionError::InvalidComponent {
            got: got.to_string(),
            component: name,
        })
}

impl Display for ProtocolVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for ProtocolVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Default for ProtocolVersion {
    fn default() -> Self {
        Self::current()
    }
}

/// The version string this build speaks. Never fails.
pub fn current_version() -> &'static str {
    PROTOCOL_VERSION
}

/// Whether `text` names a version wire-compatible with the current one.
///
/// # Errors
///
/// Returns [`VersionError`] when `text` is not a valid `major.minor` string;
/// an incompatible-but-well-formed version is `Ok(false)`.
pub fn is_version_compatible(text: &str) -> Result<bool, VersionError> {
    let version = ProtocolVersion::parse(text)?;
    Ok(version.is_compatible_with(&ProtocolVersion::current()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid() {
        assert_eq!(ProtocolVersion::parse("1.0").unwrap(), ProtocolVersion::new(1, 0));
        assert_eq!(ProtocolVersion::parse("0.1").unwrap(), ProtocolVersion::new(0, 1));
        assert_eq!(ProtocolVersion::parse("12.34").unwrap(), ProtocolVersion::new(12, 34));
    }

    #[test]
    fn parse_invalid() {
        assert!(matches!(ProtocolVersion::parse(""), Err(VersionError::Empty)));
        assert!(matches!(
            ProtocolVersion::parse("1"),
            Err(VersionError::InvalidFormat(_))
        ));
        assert!(matches!(
            ProtocolVersion::parse("1.0.0"),
            Err(VersionError::InvalidFormat(_))
        ));
        assert!(matches!(
            ProtocolVersion::parse("invalid"),
            Err(VersionError::InvalidFormat(_))
        ));
        assert!(matches!(
            ProtocolVersion::parse("a.0"),
            Err(VersionError::InvalidComponent { component: "major", .. })
        ));
        assert!(matches!(
            ProtocolVersion::parse("1.b"),
            Err(VersionError::InvalidComponent { component: "minor", .. })
        ));
        assert!(matches!(
            ProtocolVersion::parse("-1.0"),
            Err(VersionError::InvalidComponent { component: "major", .. })
        ));
        assert!(matches!(
            ProtocolVersion::parse("+1.0"),
            Err(VersionError::InvalidComponent { component: "major", .. })
        ));
        assert!(matches!(
            ProtocolVersion::parse("1. 0"),
            Err(VersionError::InvalidComponent { component: "minor", .. })
        ));
    }

    #[test]
    fn compatibility_ignores_minor() {
        assert!(is_version_compatible("1.0").unwrap());
        assert!(is_version_compatible("1.1").unwrap());
        assert!(is_version_compatible("1.99").unwrap());
        assert!(!is_version_compatible("2.0").unwrap());
        assert!(!is_version_compatible("0.9").unwrap());
    }

    #[test]
    fn malformed_is_an_error_not_false() {
        assert!(is_version_compatible("invalid").is_err());
    }

    #[test]
    fn current_constants_agree() {
        assert_eq!(current_version(), "1.0");
        assert_eq!(ProtocolVersion::current().to_string(), PROTOCOL_VERSION);
    }

    #[test]
    fn display_round_trip() {
        let v: ProtocolVersion = "2.5".parse().unwrap();
        assert_eq!(v.to_string(), "2.5");
    }
}
