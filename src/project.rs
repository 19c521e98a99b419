//! Project directory access
//!
//! Reads the root manifest, the manifests of installed packages under
//! `node_modules` and, when present, a lockfile.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::parser::package_json::PackageManifest;
use crate::parser::package_lock::PackageLockParser;
use crate::parser::traits::{LockfileParser, ParseError};
use crate::parser::types::{Dependency, LockedVersions};
use crate::parser::yarn_lock::YarnLockParser;

const MANIFEST_FILE: &str = "package.json";
const NODE_MODULES_DIR: &str = "node_modules";

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Manifest not found: {0}")]
    ManifestNotFound(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid manifest {path}: {source}")]
    InvalidManifest {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

/// A JavaScript project rooted at a directory containing package.json
pub struct Project {
    root: PathBuf,
    lockfile_parsers: Vec<Box<dyn LockfileParser>>,
}

impl Project {
    /// Creates a project reading package-lock.json, then yarn.lock
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            lockfile_parsers: vec![
                Box::new(PackageLockParser) as Box<dyn LockfileParser>,
                Box::new(YarnLockParser),
            ],
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reads the project's own package.json
    pub fn manifest(&self) -> Result<PackageManifest, ProjectError> {
        read_manifest(&self.root.join(MANIFEST_FILE))
    }

    /// Dependencies declared by the project manifest
    pub fn dependencies(&self, include_dev: bool) -> Result<Vec<Dependency>, ProjectError> {
        Ok(self.manifest()?.dependencies(include_dev))
    }

    /// Version recorded in `node_modules/<name>/package.json`.
    ///
    /// A manifest without a version yields an empty string; a missing
    /// manifest is an error since the current version cannot be known.
    pub fn installed_version(&self, name: &str) -> Result<String, ProjectError> {
        let path = self
            .root
            .join(NODE_MODULES_DIR)
            .join(name)
            .join(MANIFEST_FILE);
        let manifest = read_manifest(&path)?;

        Ok(manifest.version.unwrap_or_else(|| {
            warn!("Installed package {} has no version", name);
            String::new()
        }))
    }

    /// Exact versions from the first lockfile that exists and parses.
    ///
    /// Missing or malformed lockfiles are never fatal.
    pub fn locked_versions(&self) -> Option<LockedVersions> {
        for parser in &self.lockfile_parsers {
            let path = self.root.join(parser.file_name());
            let content = match fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) => {
                    debug!("No lockfile at {}: {}", path.display(), e);
                    continue;
                }
            };

            match parser.parse(&content) {
                Ok(versions) => {
                    debug!(
                        "Read {} locked versions from {}",
                        versions.len(),
                        path.display()
                    );
                    return Some(versions);
                }
                Err(e) => warn!("Ignoring unparsable lockfile {}: {}", path.display(), e),
            }
        }

        None
    }
}

fn read_manifest(path: &Path) -> Result<PackageManifest, ProjectError> {
    let content = fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ProjectError::ManifestNotFound(path.to_path_buf())
        } else {
            ProjectError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    PackageManifest::parse(&content).map_err(|source| ProjectError::InvalidManifest {
        path: path.to_path_buf(),
        source,
    })
}
