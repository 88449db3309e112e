//! npm Registry adapter
//!
//! Fetches package metadata from the npm registry.
//! API endpoint: https://registry.npmjs.org/{package}

use crate::error::RegistryError;
use crate::registry::{HttpClient, RegistryAdapter, VersionCatalog, VersionRecord};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// npm registry base URL
pub const NPM_REGISTRY_URL: &str = "https://registry.npmjs.org";

/// Abbreviated metadata: carries dependencies and peerDependencies per version
const NPM_ABBREVIATED_ACCEPT: &str =
    "application/vnd.npm.install-v1+json; q=1.0, application/json; q=0.8";

/// npm Registry adapter
pub struct NpmAdapter {
    client: HttpClient,
    base_url: String,
}

/// npm package metadata response
#[derive(Debug, Deserialize)]
struct NpmPackageResponse {
    #[serde(default, rename = "dist-tags")]
    dist_tags: HashMap<String, String>,
    #[serde(default)]
    versions: HashMap<String, NpmVersionManifest>,
}

/// Per-version manifest inside the package response
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NpmVersionManifest {
    #[serde(default)]
    dependencies: Option<BTreeMap<String, Value>>,
    #[serde(default)]
    peer_dependencies: Option<BTreeMap<String, Value>>,
}

/// Keeps string-valued entries; some published manifests carry garbage values
fn string_entries(map: Option<BTreeMap<String, Value>>) -> BTreeMap<String, String> {
    map.unwrap_or_default()
        .into_iter()
        .filter_map(|(k, v)| v.as_str().map(|s| (k, s.to_string())))
        .collect()
}

impl NpmAdapter {
    /// Create a new npm adapter
    pub fn new(client: HttpClient) -> Self {
        Self::with_base_url(client, NPM_REGISTRY_URL)
    }

    /// Create an adapter pointed at another npm-compatible registry
    pub fn with_base_url(client: HttpClient, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Build the URL for a package (scoped names are encoded)
    fn build_url(&self, package: &str) -> String {
        let encoded = if package.starts_with('@') {
            package.replace('/', "%2F")
        } else {
            package.to_string()
        };
        format!("{}/{}", self.base_url, encoded)
    }

    /// Convert the registry response into a catalog
    fn into_catalog(package: &str, response: NpmPackageResponse) -> VersionCatalog {
        let mut catalog = VersionCatalog::new(package);
        catalog.latest_tag = response.dist_tags.get("latest").cloned();
        for (version, manifest) in response.versions {
            let record = VersionRecord::new(
                string_entries(manifest.dependencies),
                string_entries(manifest.peer_dependencies),
            );
            catalog.versions.insert(version, record);
        }
        catalog
    }
}

#[async_trait]
impl RegistryAdapter for NpmAdapter {
    fn registry_name(&self) -> &'static str {
        "npm"
    }

    async fn fetch_catalog(&self, package: &str) -> Result<VersionCatalog, RegistryError> {
        let url = self.build_url(package);
        let response: NpmPackageResponse = self
            .client
            .get_json(&url, NPM_ABBREVIATED_ACCEPT, package, self.registry_name())
            .await?;

        Ok(Self::into_catalog(package, response))
    }
}
