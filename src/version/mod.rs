//! Version scoring and registry access
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Registry  │────▶│   Semver    │────▶│    Score    │
//! │  (latest)   │     │  (parse)    │     │(encode/diff)│
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │  Registries │
//! │    (npm)    │
//! └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`semver`]: Lenient parsing of version strings into numeric components
//! - [`score`]: Encoding versions into integer scores and diffing them
//! - [`registry`]: Registry trait for fetching package documents
//! - [`registries`]: Concrete registry implementations (npm)
//! - [`error`]: Error types for registry operations
//! - [`types`]: Registry document types like `Packument`

pub mod error;
pub mod registries;
pub mod registry;
pub mod score;
pub mod semver;
pub mod types;
