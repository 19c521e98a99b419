//! Package evaluation: resolves versions for every dependency and scores them

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::{FETCH_STAGGER_DELAY_MS, MILLISECONDS_PER_DAY, ScoreConfig, invert_tag_groups};
use crate::parser::types::{Dependency, LockedVersions};
use crate::project::{Project, ProjectError};
use crate::report::{Metadata, ModuleLookup, Versions};
use crate::version::registry::Registry;
use crate::version::score::{ScorePolicy, diff};
use crate::version::semver::parse_or_fallback;
use crate::version::types::Packument;

#[derive(Debug, Error)]
pub enum EvaluateError {
    #[error(transparent)]
    Project(#[from] ProjectError),
}

/// What to evaluate and how to score it
#[derive(Debug, Clone, Default)]
pub struct EvaluateOptions {
    pub include_age: bool,
    pub include_dev_dependencies: bool,
    /// User tags per package name
    pub tags_by_package: HashMap<String, Vec<String>>,
    /// Packages scored with shift-left enabled
    pub shift_left: HashSet<String>,
    pub policy: ScorePolicy,
}

impl EvaluateOptions {
    pub fn from_config(config: &ScoreConfig) -> Self {
        Self {
            include_age: config.include_age,
            include_dev_dependencies: config.include_dev_dependencies,
            tags_by_package: invert_tag_groups(&config.tag_groups),
            shift_left: config.shift_left.iter().cloned().collect(),
            policy: config.base_policy(),
        }
    }

    /// Policy for a single package, honouring the shift-left list
    fn policy_for(&self, dependency: &Dependency) -> ScorePolicy {
        if self.shift_left.contains(&dependency.name)
            || self.shift_left.contains(&dependency.registry_name)
        {
            self.policy.shifted()
        } else {
            self.policy
        }
    }

    /// Section tag followed by user tags of either name, without duplicates
    fn tags_for(&self, dependency: &Dependency) -> Vec<String> {
        let mut tags = vec![dependency.kind.as_str().to_string()];
        let user_tags = [&dependency.name, &dependency.registry_name]
            .into_iter()
            .filter_map(|name| self.tags_by_package.get(name))
            .flatten();
        for tag in user_tags {
            if !tags.contains(tag) {
                tags.push(tag.clone());
            }
        }
        tags
    }
}

/// Latest version information for one package
#[derive(Debug, Clone, PartialEq, Eq)]
struct LatestRelease {
    version: String,
    age: Option<i64>,
}

/// Scores every dependency of a project against a registry
pub struct PackageEvaluator {
    project: Project,
    registry: Arc<dyn Registry>,
    options: EvaluateOptions,
}

impl PackageEvaluator {
    pub fn new(project: Project, registry: Arc<dyn Registry>, options: EvaluateOptions) -> Self {
        Self {
            project,
            registry,
            options,
        }
    }

    /// Evaluate all dependencies of the project.
    ///
    /// Current versions are resolved up front, so a dependency that is
    /// neither locked nor installed fails the run before any registry
    /// request is made. Registry lookups then run concurrently with
    /// staggered start times; results keep manifest order.
    pub async fn evaluate(&self) -> Result<ModuleLookup, EvaluateError> {
        let dependencies = self
            .project
            .dependencies(self.options.include_dev_dependencies)?;
        let locked = self.project.locked_versions().unwrap_or_default();

        let resolved = dependencies
            .into_iter()
            .map(|dependency| {
                let current = self.current_version(&dependency, &locked)?;
                Ok((dependency, current))
            })
            .collect::<Result<Vec<_>, ProjectError>>()?;

        info!("Evaluating {} dependencies", resolved.len());

        let futures = resolved.iter().enumerate().map(|(i, (dependency, current))| {
            let delay = Duration::from_millis(FETCH_STAGGER_DELAY_MS * i as u64);
            async move {
                sleep(delay).await;
                let metadata = self.evaluate_package(dependency, current).await;
                (dependency.name.clone(), metadata)
            }
        });

        Ok(join_all(futures).await.into_iter().collect())
    }

    /// Score a single dependency whose current version is already known
    pub async fn evaluate_package(&self, dependency: &Dependency, current: &str) -> Metadata {
        let latest = self.fetch_latest(dependency, current).await;

        let current_version = parse_or_fallback(current);
        let latest_version = parse_or_fallback(&latest.version);
        let score = diff(
            &current_version,
            &latest_version,
            self.options.policy_for(dependency),
        );

        debug!(
            "{}: current {} latest {} score {}",
            dependency.name, current, latest.version, score
        );

        Metadata {
            tags: self.options.tags_for(dependency),
            versions: Versions {
                current: current_version,
                latest: latest_version,
                score,
            },
            age: latest.age,
        }
    }

    /// Lockfile version when pinned, otherwise the installed package's version
    fn current_version(
        &self,
        dependency: &Dependency,
        locked: &LockedVersions,
    ) -> Result<String, ProjectError> {
        if let Some(version) = locked.resolve(&dependency.name, &dependency.range) {
            return Ok(version.to_string());
        }
        self.project.installed_version(&dependency.name)
    }

    /// Latest version from the registry.
    ///
    /// On failure the current version is treated as latest, so the package
    /// scores zero and carries no age.
    async fn fetch_latest(&self, dependency: &Dependency, current: &str) -> LatestRelease {
        let name = &dependency.registry_name;
        let result = if self.options.include_age {
            self.registry.fetch_full(name).await
        } else {
            self.registry.fetch_abbreviated(name).await
        };

        match result {
            Ok(packument) => {
                let latest = packument.latest().to_string();
                let age = if self.options.include_age {
                    age_in_days(&packument, current, &latest)
                } else {
                    None
                };
                LatestRelease {
                    version: latest,
                    age,
                }
            }
            Err(e) => {
                warn!(
                    "Failed to fetch latest version of {}: {}. Scoring it as up to date.",
                    name, e
                );
                LatestRelease {
                    version: current.to_string(),
                    age: None,
                }
            }
        }
    }
}

/// Whole days from the current release to the latest one, rounded down.
///
/// Negative when the registry dates the current release after latest.
fn age_in_days(packument: &Packument, current: &str, latest: &str) -> Option<i64> {
    let current_time = packument.published_at(current)?;
    let latest_time = packument.published_at(latest)?;
    let elapsed = (latest_time - current_time).num_milliseconds();
    Some(elapsed.div_euclid(MILLISECONDS_PER_DAY))
}
