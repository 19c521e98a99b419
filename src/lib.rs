//! Dependency staleness scoring
//!
//! Compares the installed version of every dependency in a project against
//! the latest version published to the registry and condenses the gap into
//! a single number.
//!
//! # Modules
//!
//! - [`version`]: Version parsing, score encoding and registry access
//! - [`parser`]: package.json and lockfile parsers
//! - [`project`]: Reads manifests and lockfiles from a project directory
//! - [`evaluate`]: Scores every dependency of a project
//! - [`report`]: Per-package results and aggregation
//! - [`config`]: Config file and constants
//! - [`cli`]: Command-line interface

pub mod cli;
pub mod config;
pub mod evaluate;
pub mod parser;
pub mod project;
pub mod report;
pub mod version;
