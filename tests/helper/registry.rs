//! Registry test utilities

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use dep_score::version::error::RegistryError;
use dep_score::version::registry::Registry;
use dep_score::version::types::Packument;

/// Mock registry serving fixed documents and counting requests
#[derive(Default)]
pub struct MockRegistry {
    packuments: HashMap<String, Packument>,
    requests: AtomicUsize,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latest(mut self, package: &str, latest: &str) -> Self {
        self.packuments
            .insert(package.to_string(), Packument::with_latest(latest));
        self
    }

    pub fn with_packument(mut self, package: &str, packument: Packument) -> Self {
        self.packuments.insert(package.to_string(), packument);
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    fn lookup(&self, package_name: &str) -> Result<Packument, RegistryError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.packuments
            .get(package_name)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(package_name.to_string()))
    }
}

#[async_trait]
impl Registry for MockRegistry {
    async fn fetch_abbreviated(&self, package_name: &str) -> Result<Packument, RegistryError> {
        self.lookup(package_name).map(|p| Packument::with_latest(p.latest()))
    }

    async fn fetch_full(&self, package_name: &str) -> Result<Packument, RegistryError> {
        self.lookup(package_name)
    }
}
