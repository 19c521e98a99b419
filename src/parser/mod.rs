//! Parser layer
//! - traits.rs: LockfileParser trait definition
//! - types.rs: Common types (Dependency, DependencyKind, LockedVersions)
//! - package_json.rs: package.json manifest parser
//! - package_lock.rs: package-lock.json parser
//! - yarn_lock.rs: yarn.lock parser

pub mod package_json;
pub mod package_lock;
pub mod traits;
pub mod types;
pub mod yarn_lock;

pub use package_json::PackageManifest;
pub use package_lock::PackageLockParser;
pub use traits::{LockfileParser, ParseError};
pub use types::{Dependency, DependencyKind, LockedVersions};
pub use yarn_lock::YarnLockParser;
