//! In-memory registry for tests and offline runs

use crate::error::RegistryError;
use crate::registry::{RegistryAdapter, VersionCatalog};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Registry serving fixed catalogs and counting fetches per package
#[derive(Default)]
pub struct StaticRegistry {
    catalogs: HashMap<String, VersionCatalog>,
    failures: HashMap<String, RegistryError>,
    fetches: Mutex<HashMap<String, usize>>,
}

impl StaticRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve a catalog under its package name (builder pattern)
    pub fn with_catalog(mut self, catalog: VersionCatalog) -> Self {
        self.catalogs.insert(catalog.name.clone(), catalog);
        self
    }

    /// Fail every fetch of `package` with `error` (builder pattern)
    pub fn with_failure(mut self, package: impl Into<String>, error: RegistryError) -> Self {
        self.failures.insert(package.into(), error);
        self
    }

    /// Number of fetches issued for a package
    pub fn fetch_count(&self, package: &str) -> usize {
        self.fetches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(package)
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl RegistryAdapter for StaticRegistry {
    fn registry_name(&self) -> &'static str {
        "static"
    }

    async fn fetch_catalog(&self, package: &str) -> Result<VersionCatalog, RegistryError> {
        *self
            .fetches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(package.to_string())
            .or_insert(0) += 1;

        // Suspend once so concurrent requesters overlap like real fetches
        tokio::task::yield_now().await;

        if let Some(error) = self.failures.get(package) {
            return Err(error.clone());
        }
        self.catalogs
            .get(package)
            .cloned()
            .ok_or_else(|| RegistryError::package_not_found(package, self.registry_name()))
    }
}
