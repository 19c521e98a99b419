//! npm registry API implementation

use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::DEFAULT_REGISTRY_URL;
use crate::version::error::RegistryError;
use crate::version::registry::Registry;
use crate::version::semver::is_strict_semver;
use crate::version::types::Packument;
use reqwest::header::{ACCEPT, HeaderValue};
use tracing::{debug, warn};

/// Accept header for the abbreviated ("corgi") package document
const ABBREVIATED_ACCEPT: &str = "application/vnd.npm.install-v1+json";

/// Accept header for the full package document
const FULL_ACCEPT: &str = "application/json";

/// Set once the first non-semver `latest` tag has been reported
static NON_SEMVER_LATEST_REPORTED: AtomicBool = AtomicBool::new(false);

/// Registry implementation for npm registry API
pub struct NpmRegistry {
    client: reqwest::Client,
    base_url: String,
}

impl NpmRegistry {
    /// Creates a new NpmRegistry with a custom base URL
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("dep-score")
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Encode package name for URL (handles scoped packages)
    fn encode_package_name(package_name: &str) -> String {
        if package_name.starts_with('@') {
            // Scoped package: @scope/name -> @scope%2Fname
            package_name.replace('/', "%2F")
        } else {
            package_name.to_string()
        }
    }

    async fn fetch_packument(
        &self,
        package_name: &str,
        accept: &'static str,
    ) -> Result<Packument, RegistryError> {
        let encoded_name = Self::encode_package_name(package_name);
        let url = format!("{}/{}", self.base_url, encoded_name);

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, HeaderValue::from_static(accept))
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(RegistryError::NotFound(package_name.to_string()));
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(RegistryError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        if !status.is_success() {
            warn!("npm registry returned status {}: {}", status, url);
            return Err(RegistryError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        let packument: Packument = response.json().await.map_err(|e| {
            warn!("Failed to parse npm registry response: {}", e);
            RegistryError::InvalidResponse(e.to_string())
        })?;

        if packument.latest().is_empty() {
            return Err(RegistryError::InvalidResponse(format!(
                "No latest dist-tag for {}",
                package_name
            )));
        }

        report_non_semver_latest(
            &NON_SEMVER_LATEST_REPORTED,
            package_name,
            packument.latest(),
        );

        Ok(packument)
    }
}

/// Reports a `latest` tag that is not a strict semver.
///
/// Only the first report through `reported` is a warning; later ones are
/// debug logs. Returns whether this call warned.
fn report_non_semver_latest(reported: &AtomicBool, package_name: &str, latest: &str) -> bool {
    if is_strict_semver(latest) {
        return false;
    }

    if reported.swap(true, Ordering::Relaxed) {
        debug!(
            "Latest version {} of {} is not a strict semver",
            latest, package_name
        );
        false
    } else {
        warn!(
            "Latest version {} of {} is not a strict semver; non-numeric parts are ignored when scoring",
            latest, package_name
        );
        true
    }
}

impl Default for NpmRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_REGISTRY_URL)
    }
}

#[async_trait::async_trait]
impl Registry for NpmRegistry {
    async fn fetch_abbreviated(&self, package_name: &str) -> Result<Packument, RegistryError> {
        self.fetch_packument(package_name, ABBREVIATED_ACCEPT).await
    }

    async fn fetch_full(&self, package_name: &str) -> Result<Packument, RegistryError> {
        self.fetch_packument(package_name, FULL_ACCEPT).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn fetch_abbreviated_returns_latest_dist_tag() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/lodash")
            .match_header("accept", ABBREVIATED_ACCEPT)
            .with_status(200)
            .with_header("content-type", "application/vnd.npm.install-v1+json")
            .with_body(
                r#"{
                    "name": "lodash",
                    "dist-tags": { "latest": "4.17.21" },
                    "versions": { "4.17.21": {} }
                }"#,
            )
            .create_async()
            .await;

        let registry = NpmRegistry::new(&server.url());
        let result = registry.fetch_abbreviated("lodash").await.unwrap();

        mock.assert_async().await;
        assert_eq!(result.latest(), "4.17.21");
        assert!(result.time.is_empty());
    }

    #[tokio::test]
    async fn fetch_full_returns_publish_times() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/react")
            .match_header("accept", FULL_ACCEPT)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "name": "react",
                    "dist-tags": { "latest": "19.0.0" },
                    "time": {
                        "17.0.2": "2021-03-22T21:56:19.536Z",
                        "19.0.0": "2024-12-05T18:10:24.000Z"
                    }
                }"#,
            )
            .create_async()
            .await;

        let registry = NpmRegistry::new(&server.url());
        let result = registry.fetch_full("react").await.unwrap();

        mock.assert_async().await;
        assert_eq!(result.latest(), "19.0.0");
        assert!(result.published_at("17.0.2").is_some());
        assert!(result.published_at("19.0.0").is_some());
    }

    #[tokio::test]
    async fn fetch_abbreviated_returns_not_found_for_nonexistent_package() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/nonexistent-package")
            .with_status(404)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": "Not found"}"#)
            .create_async()
            .await;

        let registry = NpmRegistry::new(&server.url());
        let result = registry.fetch_abbreviated("nonexistent-package").await;

        mock.assert_async().await;
        assert!(matches!(result, Err(RegistryError::NotFound(_))));
    }

    #[tokio::test]
    async fn fetch_abbreviated_handles_scoped_package() {
        let mut server = Server::new_async().await;

        // Scoped packages use URL encoding: @types/node -> @types%2Fnode
        let mock = server
            .mock("GET", "/@types%2Fnode")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{ "dist-tags": { "latest": "22.10.1" } }"#)
            .create_async()
            .await;

        let registry = NpmRegistry::new(&server.url());
        let result = registry.fetch_abbreviated("@types/node").await.unwrap();

        mock.assert_async().await;
        assert_eq!(result.latest(), "22.10.1");
    }

    #[tokio::test]
    async fn fetch_abbreviated_returns_rate_limited_with_retry_after() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/lodash")
            .with_status(429)
            .with_header("retry-after", "30")
            .create_async()
            .await;

        let registry = NpmRegistry::new(&server.url());
        let result = registry.fetch_abbreviated("lodash").await;

        mock.assert_async().await;
        assert!(matches!(
            result,
            Err(RegistryError::RateLimited {
                retry_after_secs: Some(30)
            })
        ));
    }

    #[tokio::test]
    async fn fetch_abbreviated_rejects_document_without_latest_tag() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{ "name": "unpublished", "dist-tags": {} }"#)
            .create_async()
            .await;

        let registry = NpmRegistry::new(&server.url());
        let result = registry.fetch_abbreviated("unpublished").await;

        mock.assert_async().await;
        assert!(matches!(result, Err(RegistryError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn fetch_abbreviated_accepts_non_semver_latest() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/legacy")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{ "name": "legacy", "dist-tags": { "latest": "1.2" } }"#)
            .create_async()
            .await;

        let registry = NpmRegistry::new(&server.url());
        let result = registry.fetch_abbreviated("legacy").await.unwrap();

        mock.assert_async().await;
        assert_eq!(result.latest(), "1.2");
    }

    #[test]
    fn report_non_semver_latest_warns_only_once() {
        let reported = AtomicBool::new(false);

        assert!(!report_non_semver_latest(&reported, "react", "19.0.0"));
        assert!(!reported.load(Ordering::Relaxed));

        assert!(report_non_semver_latest(&reported, "legacy", "1.2"));
        assert!(!report_non_semver_latest(&reported, "other", "2.0.0.1"));
        assert!(reported.load(Ordering::Relaxed));
    }

    #[tokio::test]
    async fn fetch_abbreviated_returns_invalid_response_for_server_error() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/lodash")
            .with_status(503)
            .create_async()
            .await;

        let registry = NpmRegistry::new(&server.url());
        let result = registry.fetch_abbreviated("lodash").await;

        mock.assert_async().await;
        assert!(matches!(result, Err(RegistryError::InvalidResponse(_))));
    }
}
