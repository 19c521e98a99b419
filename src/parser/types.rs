//! Common types for parsers

use std::collections::HashMap;

/// Exact versions pinned by a lockfile.
///
/// yarn.lock records one entry per descriptor (`name@range`), so a package
/// required under several ranges can be pinned to several versions.
/// package-lock.json pins a single top-level version per name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LockedVersions {
    by_descriptor: HashMap<String, String>,
    by_name: HashMap<String, Vec<String>>,
}

impl LockedVersions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pins `name` to `version` unless the name is already pinned
    pub fn pin(&mut self, name: &str, version: &str) {
        self.by_name
            .entry(name.to_string())
            .or_insert_with(|| vec![version.to_string()]);
    }

    /// Records the version the descriptor `name@range` resolved to.
    ///
    /// The first entry for a descriptor wins.
    pub fn pin_descriptor(&mut self, name: &str, range: &str, version: &str) {
        self.by_descriptor
            .entry(format!("{name}@{range}"))
            .or_insert_with(|| version.to_string());

        let versions = self.by_name.entry(name.to_string()).or_default();
        if !versions.iter().any(|v| v == version) {
            versions.push(version.to_string());
        }
    }

    /// Number of pinned package names
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// The version of `name`, when the lockfile pins exactly one
    pub fn get(&self, name: &str) -> Option<&str> {
        match self.by_name.get(name)?.as_slice() {
            [version] => Some(version.as_str()),
            _ => None,
        }
    }

    /// Version pinned for a dependency declared as `name` with `range`.
    ///
    /// An entry for the exact descriptor wins, in the classic (`name@range`)
    /// or berry (`name@npm:range`) form. Otherwise the name alone decides,
    /// and only when a single version of the package is locked.
    pub fn resolve(&self, name: &str, range: &str) -> Option<&str> {
        [format!("{name}@{range}"), format!("{name}@npm:{range}")]
            .iter()
            .find_map(|descriptor| self.by_descriptor.get(descriptor))
            .map(String::as_str)
            .or_else(|| self.get(name))
    }
}

/// Manifest section a dependency was declared in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyKind {
    /// `dependencies`
    Runtime,
    /// `devDependencies`
    Dev,
}

impl DependencyKind {
    /// Returns the tag attached to packages from this section
    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyKind::Runtime => "runtime",
            DependencyKind::Dev => "dev",
        }
    }
}

/// A dependency declared in the project manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    /// Key in the manifest, which is also the directory under `node_modules`
    pub name: String,
    /// Name to query the registry with (differs from `name` for `npm:` aliases)
    pub registry_name: String,
    /// Declared version range as written, including any `npm:` alias prefix
    pub range: String,
    pub kind: DependencyKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yarn_pins() -> LockedVersions {
        let mut locked = LockedVersions::new();
        locked.pin_descriptor("lodash", "^3.0.0", "3.10.1");
        locked.pin_descriptor("lodash", "^4.17.21", "4.17.21");
        locked.pin_descriptor("lodash", "^4.17.0", "4.17.21");
        locked.pin_descriptor("react", "npm:^17.0.2", "17.0.2");
        locked
    }

    #[test]
    fn resolve_matches_declared_range_among_several_entries() {
        let locked = yarn_pins();

        assert_eq!(locked.resolve("lodash", "^4.17.21"), Some("4.17.21"));
        assert_eq!(locked.resolve("lodash", "^3.0.0"), Some("3.10.1"));
    }

    #[test]
    fn resolve_matches_berry_descriptor() {
        assert_eq!(yarn_pins().resolve("react", "^17.0.2"), Some("17.0.2"));
    }

    #[test]
    fn resolve_falls_back_to_single_version_by_name() {
        let locked = yarn_pins();

        assert_eq!(locked.resolve("react", "^17.0.0"), Some("17.0.2"));
        assert_eq!(locked.resolve("lodash", "^4.0.0"), None);
        assert_eq!(locked.resolve("jest", "^27.0.6"), None);
    }

    #[test]
    fn get_counts_distinct_versions_only() {
        let mut locked = LockedVersions::new();
        locked.pin_descriptor("react", "^17.0.0", "17.0.2");
        locked.pin_descriptor("react", "^17.0.2", "17.0.2");

        assert_eq!(locked.len(), 1);
        assert_eq!(locked.get("react"), Some("17.0.2"));
        assert_eq!(yarn_pins().get("lodash"), None);
    }

    #[test]
    fn pin_keeps_first_version() {
        let mut locked = LockedVersions::new();
        locked.pin("jest", "27.0.6");
        locked.pin("jest", "27.0.1");

        assert_eq!(locked.get("jest"), Some("27.0.6"));
        assert_eq!(locked.resolve("jest", "^27.0.0"), Some("27.0.6"));
    }
}
