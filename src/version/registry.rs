//! Registry trait for fetching package documents

#[cfg(test)]
use mockall::automock;

use crate::version::error::RegistryError;
use crate::version::types::Packument;

/// Trait for querying a package registry
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Registry: Send + Sync {
    /// Fetches the abbreviated document (dist-tags only) for a package
    async fn fetch_abbreviated(&self, package_name: &str) -> Result<Packument, RegistryError>;

    /// Fetches the full document, including per-version publish times
    async fn fetch_full(&self, package_name: &str) -> Result<Packument, RegistryError>;
}
