//! Per-package results and their aggregation into a report

use indexmap::IndexMap;
use serde::Serialize;

use crate::version::semver::Version;

/// Current and latest version of a package with their score difference
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Versions {
    pub current: Version,
    pub latest: Version,
    pub score: i64,
}

/// Scoring result for a single package
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metadata {
    /// Section tag (`runtime`/`dev`) followed by user tag groups, without duplicates
    pub tags: Vec<String>,
    pub versions: Versions,
    /// Days between the current and latest release, when requested and known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i64>,
}

/// Results keyed by package name
pub type ModuleLookup = IndexMap<String, Metadata>;

/// Aggregated score over all packages
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub score: i64,
    pub tag_scores: IndexMap<String, i64>,
    pub modules: ModuleLookup,
}

/// Build a report from per-package results
pub fn aggregate(modules: ModuleLookup) -> Report {
    Report {
        score: sum_scores(&modules),
        tag_scores: tag_scores(&modules),
        modules,
    }
}

/// Sum of every package's score
pub fn sum_scores(modules: &ModuleLookup) -> i64 {
    modules
        .values()
        .fold(0i64, |total, metadata| total.saturating_add(metadata.versions.score))
}

/// Sum of scores per tag; a package counts in full towards each of its tags
pub fn tag_scores(modules: &ModuleLookup) -> IndexMap<String, i64> {
    let mut scores: IndexMap<String, i64> = IndexMap::new();

    for metadata in modules.values() {
        for tag in &metadata.tags {
            let total = scores.entry(tag.clone()).or_insert(0);
            *total = total.saturating_add(metadata.versions.score);
        }
    }

    scores
}
