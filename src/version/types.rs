//! Registry document types

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Distribution tags published for a package
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct DistTags {
    #[serde(default)]
    pub latest: String,
}

/// Package document returned by the registry
///
/// The abbreviated form only carries `dist-tags`; the full form also maps
/// every published version to its publish timestamp.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Packument {
    #[serde(rename = "dist-tags", default)]
    pub dist_tags: DistTags,
    #[serde(default)]
    pub time: HashMap<String, String>,
}

impl Packument {
    /// Creates an abbreviated document with only a latest tag
    pub fn with_latest(latest: impl Into<String>) -> Self {
        Self {
            dist_tags: DistTags {
                latest: latest.into(),
            },
            time: HashMap::new(),
        }
    }

    /// Adds a publish timestamp for `version`
    pub fn with_time(mut self, version: impl Into<String>, timestamp: impl Into<String>) -> Self {
        self.time.insert(version.into(), timestamp.into());
        self
    }

    pub fn latest(&self) -> &str {
        &self.dist_tags.latest
    }

    /// Publish time of `version`, if the registry recorded a parseable one
    pub fn published_at(&self, version: &str) -> Option<DateTime<Utc>> {
        let timestamp = self.time.get(version)?;
        DateTime::parse_from_rfc3339(timestamp)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }
}
