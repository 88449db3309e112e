//! Registry access for package version metadata
//!
//! This module provides:
//! - HTTP client shared foundation with retry logic
//! - npm Registry adapter
//! - Typed version catalogs built from registry metadata
//! - Run-scoped metadata cache

mod cache;
mod catalog;
mod client;
mod npm;
pub mod testing;

pub use cache::{CatalogResult, MetadataCache};
pub use catalog::{VersionCatalog, VersionRecord};
pub use client::HttpClient;
pub use npm::{NpmAdapter, NPM_REGISTRY_URL};

use crate::error::RegistryError;
use async_trait::async_trait;

/// Environment variable overriding the npm registry base URL
pub const REGISTRY_ENV_VAR: &str = "REACTUP_REGISTRY";

/// Trait for registry adapters
#[async_trait]
pub trait RegistryAdapter: Send + Sync {
    /// Get the registry name
    fn registry_name(&self) -> &'static str;

    /// Fetch all published versions of a package with their metadata
    async fn fetch_catalog(&self, package: &str) -> Result<VersionCatalog, RegistryError>;
}

/// Create the npm adapter, honoring the registry override variable
pub fn create_adapter(client: HttpClient) -> NpmAdapter {
    match std::env::var(REGISTRY_ENV_VAR) {
        Ok(url) if !url.trim().is_empty() => NpmAdapter::with_base_url(client, url.trim()),
        _ => NpmAdapter::new(client),
    }
}
