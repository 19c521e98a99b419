//! Lenient version parsing
//!
//! Registry and manifest data is not always well-formed, so parsing never
//! fails: anything that is not a plain run of digits is dropped and the
//! remaining components are kept as strings. Numeric conversion is left to
//! the score encoder so it can see the original digit width.

use std::fmt;

use serde::{Serialize, Serializer};

/// Version used when a manifest or registry supplies no version at all
pub const FALLBACK_VERSION: &str = "0.0.0";

/// Ordered numeric components of a version, most significant first
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Version {
    components: Vec<String>,
}

impl Version {
    /// Builds a version from already-split components
    pub fn new<I, S>(components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            components: components.into_iter().map(Into::into).collect(),
        }
    }

    pub fn components(&self) -> &[String] {
        &self.components
    }

    /// Component at `index`, or `"0"` when the version is shorter than that
    pub fn component(&self, index: usize) -> &str {
        match self.components.get(index) {
            Some(component) if !component.is_empty() => component,
            _ => "0",
        }
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Components as numbers, saturating at `u64::MAX` for absurdly long digit runs
    pub fn as_numbers(&self) -> Vec<u64> {
        self.components
            .iter()
            .map(|c| {
                if c.is_empty() {
                    0
                } else {
                    c.parse().unwrap_or(u64::MAX)
                }
            })
            .collect()
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.components.join("."))
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.as_numbers())
    }
}

/// Parse a version string into its numeric components.
///
/// Everything from the first `-` or `+` onwards is discarded, the rest is
/// split on `.` and only purely-digit components are kept.
///
/// Examples:
/// - "1.2.3-beta.1" -> ["1", "2", "3"]
/// - "1.2" -> ["1", "2"]
/// - "1.x.3" -> ["1", "3"]
/// - "" -> []
pub fn parse(version: &str) -> Version {
    let release = version.split(['-', '+']).next().unwrap_or_default();

    let components = release
        .split('.')
        .filter(|c| !c.is_empty() && c.bytes().all(|b| b.is_ascii_digit()))
        .map(str::to_string)
        .collect();

    Version { components }
}

/// Parse a version string, substituting [`FALLBACK_VERSION`] for blank input
pub fn parse_or_fallback(version: &str) -> Version {
    if version.trim().is_empty() {
        parse(FALLBACK_VERSION)
    } else {
        parse(version.trim())
    }
}

/// Whether the string is a strict semantic version (`major.minor.patch[-pre][+build]`)
pub fn is_strict_semver(version: &str) -> bool {
    ::semver::Version::parse(version).is_ok()
}
