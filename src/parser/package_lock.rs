//! package-lock.json parser

use std::collections::HashMap;

use serde::Deserialize;

use crate::parser::traits::{LockfileParser, ParseError};
use crate::parser::types::LockedVersions;

/// Prefix of top-level install locations in lockfile v2/v3 `packages`
const NODE_MODULES_PREFIX: &str = "node_modules/";

#[derive(Debug, Deserialize)]
struct PackageLock {
    /// lockfileVersion 2 and 3
    #[serde(default)]
    packages: HashMap<String, LockEntry>,
    /// lockfileVersion 1
    #[serde(default)]
    dependencies: HashMap<String, LockEntry>,
}

#[derive(Debug, Deserialize)]
struct LockEntry {
    version: Option<String>,
}

/// Parser for npm's package-lock.json
pub struct PackageLockParser;

impl LockfileParser for PackageLockParser {
    fn file_name(&self) -> &'static str {
        "package-lock.json"
    }

    fn parse(&self, content: &str) -> Result<LockedVersions, ParseError> {
        let lock: PackageLock = serde_json::from_str(content)?;

        let mut versions = LockedVersions::new();

        for (path, entry) in &lock.packages {
            let Some(name) = path.strip_prefix(NODE_MODULES_PREFIX) else {
                continue;
            };
            // Nested installs belong to another package's dependency tree
            if name.contains(NODE_MODULES_PREFIX) {
                continue;
            }
            if let Some(version) = &entry.version {
                versions.pin(name, version);
            }
        }

        for (name, entry) in &lock.dependencies {
            if let Some(version) = &entry.version {
                versions.pin(name, version);
            }
        }

        Ok(versions)
    }
}
