use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;

use crate::version::score::{DEFAULT_PADDING, ScorePolicy};

// =============================================================================
// Constants
// =============================================================================

/// Default base URL for the npm registry
pub const DEFAULT_REGISTRY_URL: &str = "https://registry.npmjs.org";

/// Milliseconds in one day, used to turn publish-time gaps into ages
pub const MILLISECONDS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Delay between starting each fetch request to avoid rate limiting (10ms)
pub const FETCH_STAGGER_DELAY_MS: u64 = 10;

/// Widest padding whose three-component score still fits an `i64`
pub const MAX_PADDING: usize = 6;

/// Name of the config file looked up in the user config directory
pub const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Scoring configuration, read from a JSON file
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ScoreConfig {
    /// Named groups of packages; every group name becomes a tag on its members
    pub tag_groups: IndexMap<String, Vec<String>>,
    /// Packages whose `0.x` releases are scored as if minor were major
    pub shift_left: Vec<String>,
    /// Digits reserved per version component
    pub padding: usize,
    /// Keep components wider than `padding` instead of capping them
    pub allow_overflow: bool,
    /// Registry base URL
    pub registry: String,
    /// Compute the age in days between current and latest release
    pub include_age: bool,
    /// Score devDependencies as well
    pub include_dev_dependencies: bool,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            tag_groups: IndexMap::new(),
            shift_left: Vec::new(),
            padding: DEFAULT_PADDING,
            allow_overflow: false,
            registry: DEFAULT_REGISTRY_URL.to_string(),
            include_age: false,
            include_dev_dependencies: false,
        }
    }
}

impl ScoreConfig {
    /// Reads and validates a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_PADDING).contains(&self.padding) {
            return Err(ConfigError::Invalid(format!(
                "padding must be between 1 and {}, got {}",
                MAX_PADDING, self.padding
            )));
        }
        if self.registry.trim().is_empty() {
            return Err(ConfigError::Invalid("registry must not be empty".to_string()));
        }
        Ok(())
    }

    /// Policy applied to packages not listed in `shift_left`
    pub fn base_policy(&self) -> ScorePolicy {
        ScorePolicy {
            padding: self.padding,
            allow_overflow: self.allow_overflow,
            shift_left: false,
        }
    }
}

/// Invert tag groups into a per-package list of tag names.
///
/// Tags keep group order and appear once per package even if a group lists
/// the package twice.
pub fn invert_tag_groups(tag_groups: &IndexMap<String, Vec<String>>) -> HashMap<String, Vec<String>> {
    let mut tags_by_package: HashMap<String, Vec<String>> = HashMap::new();

    for (tag, packages) in tag_groups {
        for package in packages {
            let tags = tags_by_package.entry(package.clone()).or_default();
            if !tags.contains(tag) {
                tags.push(tag.clone());
            }
        }
    }

    tags_by_package
}

/// Returns the path of the user-level config file, if a config directory is known.
/// Uses $XDG_CONFIG_HOME/dep-score/config.json if XDG_CONFIG_HOME is set,
/// otherwise ~/.config/dep-score/config.json.
pub fn default_config_path() -> Option<PathBuf> {
    config_path_with_env(std::env::var("XDG_CONFIG_HOME").ok(), dirs::home_dir())
}

fn config_path_with_env(xdg_config_home: Option<String>, home_dir: Option<PathBuf>) -> Option<PathBuf> {
    let config_dir = xdg_config_home
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".config")))?;

    Some(config_dir.join("dep-score").join(CONFIG_FILE_NAME))
}
