//! package.json parser

use indexmap::IndexMap;
use serde::Deserialize;

use crate::parser::traits::ParseError;
use crate::parser::types::{Dependency, DependencyKind};

/// The parts of a package.json this tool reads
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct PackageManifest {
    pub name: Option<String>,
    pub version: Option<String>,
    pub dependencies: IndexMap<String, String>,
    pub dev_dependencies: IndexMap<String, String>,
}

impl PackageManifest {
    pub fn parse(content: &str) -> Result<Self, ParseError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Declared dependencies, runtime first, in manifest order.
    ///
    /// A package listed in both sections is reported once, as runtime.
    pub fn dependencies(&self, include_dev: bool) -> Vec<Dependency> {
        let runtime = self
            .dependencies
            .iter()
            .map(|(name, range)| Self::to_dependency(name, range, DependencyKind::Runtime));

        let dev = self
            .dev_dependencies
            .iter()
            .filter(|(name, _)| include_dev && !self.dependencies.contains_key(*name))
            .map(|(name, range)| Self::to_dependency(name, range, DependencyKind::Dev));

        runtime.chain(dev).collect()
    }

    fn to_dependency(name: &str, range: &str, kind: DependencyKind) -> Dependency {
        Dependency {
            name: name.to_string(),
            registry_name: npm_alias_target(range).unwrap_or(name).to_string(),
            range: range.to_string(),
            kind,
        }
    }
}

/// Package an npm alias (`npm:package@version`, `npm:@scope/package`) points to
fn npm_alias_target(value: &str) -> Option<&str> {
    let rest = value.strip_prefix("npm:")?;

    // Skip the leading @ of a scoped name when looking for the version separator
    let search_from = usize::from(rest.starts_with('@'));
    match rest[search_from..].find('@') {
        Some(at_pos) => Some(&rest[..search_from + at_pos]),
        None => Some(rest),
    }
}
