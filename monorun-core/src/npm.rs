//! HTTP client for the package registry's "latest version" endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::config::RegistryConfig;
use crate::error::{Error, Result};

/// Looks up the latest published version of a package.
#[async_trait]
pub trait PackageRegistry: Send + Sync {
    async fn latest_version(&self, package: &str) -> Result<String>;
}

#[derive(Deserialize)]
struct LatestManifest {
    version: String,
}

/// npm-compatible registry reached over HTTP.
pub struct NpmRegistry {
    client: Client,
    base_url: String,
}

impl NpmRegistry {
    /// Creates a registry client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: &RegistryConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| Error::Registry {
            package: "<client>".to_string(),
            message: format!("Failed to create HTTP client: {}", e),
        })?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
        })
    }

    fn latest_url(&self, package: &str) -> String {
        format!("{}/{}/latest", self.base_url, package)
    }
}

#[async_trait]
impl PackageRegistry for NpmRegistry {
    async fn latest_version(&self, package: &str) -> Result<String> {
        let url = self.latest_url(package);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Registry {
                package: package.to_string(),
                message: format!("Request to {} failed: {}", url, e),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Registry {
                package: package.to_string(),
                message: format!("{} returned status {}", url, status),
            });
        }

        let body = response.bytes().await.map_err(|e| Error::Registry {
            package: package.to_string(),
            message: format!("Failed to read response body: {}", e),
        })?;
        let latest: LatestManifest =
            serde_json::from_slice(&body).map_err(|e| Error::Registry {
                package: package.to_string(),
                message: format!("Invalid response body: {}", e),
            })?;

        Ok(latest.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_url() {
        let config = RegistryConfig {
            url: "https://registry.example.com/".to_string(),
            timeout_secs: Some(5),
        };
        let registry = NpmRegistry::new(&config).unwrap();

        assert_eq!(
            registry.latest_url("@scope/pkg"),
            "https://registry.example.com/@scope/pkg/latest"
        );
    }
}
