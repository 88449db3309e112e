//! Run-scoped memoization of registry responses
//!
//! One `MetadataCache` is created per run and passed to every analysis. Each
//! package name maps to a `OnceCell`: the first requester performs the fetch,
//! concurrent requesters await the same cell, and everyone observes the same
//! result, failures included. Nothing is persisted.

use crate::error::RegistryError;
use crate::registry::{RegistryAdapter, VersionCatalog};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{OnceCell, Semaphore};
use tracing::debug;

/// Default limit of concurrent registry requests
const DEFAULT_CONCURRENCY: usize = 10;

/// Cached outcome of a registry lookup
pub type CatalogResult = Result<Arc<VersionCatalog>, RegistryError>;

/// Registry cache with at most one in-flight fetch per package
pub struct MetadataCache {
    adapter: Arc<dyn RegistryAdapter>,
    entries: Mutex<HashMap<String, Arc<OnceCell<CatalogResult>>>>,
    semaphore: Semaphore,
}

impl MetadataCache {
    /// Create a cache over the given adapter
    pub fn new(adapter: Arc<dyn RegistryAdapter>) -> Self {
        Self::with_concurrency(adapter, DEFAULT_CONCURRENCY)
    }

    /// Create a cache with a custom concurrency limit
    pub fn with_concurrency(adapter: Arc<dyn RegistryAdapter>, concurrency: usize) -> Self {
        Self {
            adapter,
            entries: Mutex::new(HashMap::new()),
            semaphore: Semaphore::new(concurrency.max(1)),
        }
    }

    /// Fetch a package catalog, reusing any earlier or in-flight fetch
    pub async fn get(&self, package: &str) -> CatalogResult {
        let cell = {
            let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
            entries.entry(package.to_string()).or_default().clone()
        };

        if let Some(cached) = cell.get() {
            debug!(package, "registry cache hit");
            return cached.clone();
        }

        cell.get_or_init(|| async {
            let _permit = self.semaphore.acquire().await.ok();
            debug!(package, registry = self.adapter.registry_name(), "fetching metadata");
            self.adapter.fetch_catalog(package).await.map(Arc::new)
        })
        .await
        .clone()
    }

    /// Number of packages with a cache entry
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::testing::StaticRegistry;
    use crate::registry::VersionRecord;

    fn registry() -> Arc<StaticRegistry> {
        Arc::new(
            StaticRegistry::new().with_catalog(
                VersionCatalog::new("final-form")
                    .with_version("4.20.10", VersionRecord::default())
                    .with_latest_tag("4.20.10"),
            ),
        )
    }

    #[tokio::test]
    async fn test_get_returns_catalog() {
        let cache = MetadataCache::new(registry());
        let catalog = cache.get("final-form").await.unwrap();
        assert_eq!(catalog.name, "final-form");
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_repeated_get_fetches_once() {
        let registry = registry();
        let cache = MetadataCache::new(registry.clone());
        cache.get("final-form").await.unwrap();
        cache.get("final-form").await.unwrap();
        assert_eq!(registry.fetch_count("final-form"), 1);
    }

    #[tokio::test]
    async fn test_concurrent_get_fetches_once() {
        let registry = registry();
        let cache = MetadataCache::new(registry.clone());
        let results =
            futures::future::join_all((0..8).map(|_| cache.get("final-form"))).await;
        assert!(results.iter().all(|r| r.is_ok()));
        assert_eq!(registry.fetch_count("final-form"), 1);

        let first = results[0].as_ref().unwrap();
        assert!(results
            .iter()
            .all(|r| Arc::ptr_eq(r.as_ref().unwrap(), first)));
    }

    #[tokio::test]
    async fn test_failures_are_cached() {
        let registry = registry();
        let cache = MetadataCache::new(registry.clone());
        let first = cache.get("missing").await;
        let second = cache.get("missing").await;
        assert!(first.unwrap_err().is_not_found());
        assert!(second.is_err());
        assert_eq!(registry.fetch_count("missing"), 1);
    }

    #[tokio::test]
    async fn test_caches_are_isolated() {
        let registry = registry();
        let first = MetadataCache::new(registry.clone());
        let second = MetadataCache::new(registry.clone());
        first.get("final-form").await.unwrap();
        second.get("final-form").await.unwrap();
        assert_eq!(registry.fetch_count("final-form"), 2);
        assert!(!second.is_empty());
    }
}
