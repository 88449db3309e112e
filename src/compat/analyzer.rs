//! Per-dependency compatibility analysis
//!
//! Combines the range matcher, version search and companion resolver into a
//! `DependencyRecord`. Registry failures never escape: they degrade the
//! affected record to `unknown`.

use crate::compat::companions::resolve_companions;
use crate::compat::range::{evaluate, strip_range_prefix};
use crate::compat::search::{find_latest_compatible, find_nearest_compatible, resolve_installed_record};
use crate::compat::DeclaredVersions;
use crate::domain::{CompanionUpgrade, DependencyClass, DependencyRecord, UNKNOWN_VERSION};
use crate::registry::{MetadataCache, VersionCatalog};
use futures::future::join_all;
use tracing::{debug, warn};

/// Analyzes declared dependencies against one target React version
pub struct DependencyAnalyzer<'a> {
    cache: &'a MetadataCache,
    target_version: String,
    declared: &'a DeclaredVersions,
}

impl<'a> DependencyAnalyzer<'a> {
    pub fn new(
        cache: &'a MetadataCache,
        target_version: impl Into<String>,
        declared: &'a DeclaredVersions,
    ) -> Self {
        Self {
            cache,
            target_version: target_version.into(),
            declared,
        }
    }

    pub fn target_version(&self) -> &str {
        &self.target_version
    }

    /// Analyze one dependency as declared in the manifest
    pub async fn analyze(
        &self,
        name: &str,
        installed_range: &str,
        class: DependencyClass,
    ) -> DependencyRecord {
        let installed = strip_range_prefix(installed_range);

        match self.cache.get(name).await {
            Ok(catalog) => analyze_catalog(
                &catalog,
                &installed,
                class,
                &self.target_version,
                self.declared,
            ),
            Err(e) => {
                warn!(package = name, error = %e, "registry lookup failed, status unknown");
                DependencyRecord::unknown(name, installed, class, UNKNOWN_VERSION)
            }
        }
    }

    /// Analyze many dependencies concurrently, keeping input order
    pub async fn analyze_all(
        &self,
        dependencies: &[(String, String, DependencyClass)],
    ) -> Vec<DependencyRecord> {
        let futures = dependencies
            .iter()
            .map(|(name, range, class)| self.analyze(name, range, *class));
        join_all(futures).await
    }
}

/// Build the record for `installed` from an already fetched catalog
pub fn analyze_catalog(
    catalog: &VersionCatalog,
    installed: &str,
    class: DependencyClass,
    target: &str,
    declared: &DeclaredVersions,
) -> DependencyRecord {
    let registry_latest = catalog.latest_stable();

    let Some((resolved, record)) = resolve_installed_record(catalog, installed) else {
        debug!(package = %catalog.name, "no published versions");
        return DependencyRecord::unknown(
            &catalog.name,
            installed,
            class,
            registry_latest.unwrap_or_else(|| UNKNOWN_VERSION.to_string()),
        );
    };
    debug!(package = %catalog.name, installed, resolved, "resolved installed version");

    let declared_peer_range = record.peer_requirement.clone();
    let status = evaluate(target, declared_peer_range.as_deref());

    let mut result = DependencyRecord {
        name: catalog.name.clone(),
        installed_version: installed.to_string(),
        dependency_class: class,
        status,
        declared_peer_range,
        nearest_compatible_version: None,
        latest_version: registry_latest
            .clone()
            .unwrap_or_else(|| UNKNOWN_VERSION.to_string()),
        latest_is_compatible: false,
        required_upgrades_for_nearest: Vec::new(),
        required_upgrades_for_latest: Vec::new(),
    };

    if !status.is_incompatible() {
        return result;
    }

    if let Some(nearest) = find_nearest_compatible(catalog, installed, target) {
        result.required_upgrades_for_nearest = companions_for(catalog, &nearest, declared);
        result.nearest_compatible_version = Some(nearest);
    }

    let latest_compatible = find_latest_compatible(catalog, target);
    result.latest_is_compatible = latest_compatible.is_some();
    if let Some(latest) = latest_compatible.or(registry_latest) {
        result.required_upgrades_for_latest = companions_for(catalog, &latest, declared);
        result.latest_version = latest;
    }

    result
}

fn companions_for(
    catalog: &VersionCatalog,
    version: &str,
    declared: &DeclaredVersions,
) -> Vec<CompanionUpgrade> {
    let resolution = resolve_companions(catalog, version, declared);
    if resolution.is_undetermined() {
        debug!(package = %catalog.name, version, "companion requirements undetermined");
    }
    resolution.into_upgrades()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CompatibilityStatus;
    use crate::error::RegistryError;
    use crate::registry::testing::StaticRegistry;
    use crate::registry::VersionRecord;
    use std::sync::Arc;

    const TARGET: &str = "19.0.0";

    fn react_select() -> VersionCatalog {
        VersionCatalog::new("react-select")
            .with_version("3.0.4", VersionRecord::with_react_peer("^16.8.0"))
            .with_version("5.8.0", VersionRecord::with_react_peer("^16.8.0 || ^17.0.0 || ^18.0.0"))
            .with_version("5.9.0", VersionRecord::with_react_peer("^16.8.0 || ^17.0.0 || ^18.0.0 || ^19.0.0"))
            .with_version("5.10.2", VersionRecord::with_react_peer("^16.8.0 || ^17.0.0 || ^18.0.0 || ^19.0.0"))
            .with_latest_tag("5.10.2")
    }

    fn react_final_form() -> VersionCatalog {
        VersionCatalog::new("react-final-form")
            .with_version(
                "6.5.9",
                VersionRecord::default()
                    .with_peer("final-form", "^4.20.4")
                    .with_peer("react", "^16.8.0 || ^17.0.0 || ^18.0.0"),
            )
            .with_version(
                "7.0.0",
                VersionRecord::default()
                    .with_peer("final-form", "^4.20.10")
                    .with_peer("react", "^16.8.0 || ^17.0.0 || ^18.0.0 || ^19.0.0"),
            )
            .with_latest_tag("7.0.0")
    }

    fn declared(entries: &[(&str, &str)]) -> DeclaredVersions {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_react_select_scenario() {
        let record = analyze_catalog(
            &react_select(),
            "3.0.4",
            DependencyClass::Direct,
            TARGET,
            &DeclaredVersions::new(),
        );

        assert_eq!(record.status, CompatibilityStatus::Incompatible);
        assert_eq!(record.declared_peer_range.as_deref(), Some("^16.8.0"));
        assert_eq!(record.nearest_compatible_version.as_deref(), Some("5.9.0"));
        assert_eq!(record.latest_version, "5.10.2");
        assert!(record.latest_is_compatible);
        assert!(!record.has_required_upgrades());
    }

    #[test]
    fn test_compatible_record_has_registry_latest() {
        let record = analyze_catalog(
            &react_select(),
            "5.9.0",
            DependencyClass::Dev,
            TARGET,
            &DeclaredVersions::new(),
        );

        assert_eq!(record.status, CompatibilityStatus::Compatible);
        assert_eq!(record.dependency_class, DependencyClass::Dev);
        assert!(record.nearest_compatible_version.is_none());
        assert_eq!(record.latest_version, "5.10.2");
    }

    #[test]
    fn test_no_peer_range_is_unknown() {
        let catalog = VersionCatalog::new("lodash")
            .with_version("4.17.21", VersionRecord::default())
            .with_latest_tag("4.17.21");
        let record = analyze_catalog(
            &catalog,
            "4.17.21",
            DependencyClass::Direct,
            TARGET,
            &DeclaredVersions::new(),
        );

        assert_eq!(record.status, CompatibilityStatus::Unknown);
        assert!(record.declared_peer_range.is_none());
        assert_eq!(record.latest_version, "4.17.21");
    }

    #[test]
    fn test_empty_catalog_is_unknown() {
        let record = analyze_catalog(
            &VersionCatalog::new("ghost"),
            "1.0.0",
            DependencyClass::Optional,
            TARGET,
            &DeclaredVersions::new(),
        );

        assert_eq!(record.status, CompatibilityStatus::Unknown);
        assert_eq!(record.latest_version, UNKNOWN_VERSION);
        assert!(record.nearest_compatible_version.is_none());
    }

    #[test]
    fn test_companions_for_both_paths() {
        let project = declared(&[("final-form", "^4.20.0"), ("react-final-form", "^6.5.9")]);
        let record = analyze_catalog(
            &react_final_form(),
            "6.5.9",
            DependencyClass::Direct,
            TARGET,
            &project,
        );

        let expected = vec![CompanionUpgrade::new("final-form", "4.20.0", "^4.20.10")];
        assert_eq!(record.nearest_compatible_version.as_deref(), Some("7.0.0"));
        assert_eq!(record.required_upgrades_for_nearest, expected);
        assert_eq!(record.required_upgrades_for_latest, expected);
    }

    #[test]
    fn test_no_compatible_version_falls_back_to_registry_latest() {
        let catalog = VersionCatalog::new("legacy-lib")
            .with_version("1.0.0", VersionRecord::with_react_peer("^16.0.0"))
            .with_version("1.2.0", VersionRecord::with_react_peer("^17.0.0"))
            .with_latest_tag("1.2.0");
        let record = analyze_catalog(
            &catalog,
            "1.0.0",
            DependencyClass::Direct,
            TARGET,
            &DeclaredVersions::new(),
        );

        assert_eq!(record.status, CompatibilityStatus::Incompatible);
        assert!(record.nearest_compatible_version.is_none());
        assert_eq!(record.latest_version, "1.2.0");
        assert!(!record.latest_is_compatible);
        assert!(!record.is_compatible_target("1.2.0"));
    }

    #[tokio::test]
    async fn test_analyze_strips_installed_range() {
        let cache = MetadataCache::new(Arc::new(
            StaticRegistry::new().with_catalog(react_select()),
        ));
        let project = DeclaredVersions::new();
        let analyzer = DependencyAnalyzer::new(&cache, TARGET, &project);

        let record = analyzer
            .analyze("react-select", "^3.0.4 || ^4.0.0", DependencyClass::Direct)
            .await;
        assert_eq!(record.installed_version, "3.0.4");
        assert_eq!(record.status, CompatibilityStatus::Incompatible);
    }

    #[tokio::test]
    async fn test_registry_failure_degrades_record() {
        let registry = StaticRegistry::new().with_failure(
            "flaky",
            RegistryError::network_error("flaky", "static", "connection reset"),
        );
        let cache = MetadataCache::new(Arc::new(registry));
        let project = DeclaredVersions::new();
        let analyzer = DependencyAnalyzer::new(&cache, TARGET, &project);

        let missing = analyzer.analyze("not-published", "1.0.0", DependencyClass::Direct).await;
        let flaky = analyzer.analyze("flaky", "~2.1.0", DependencyClass::Dev).await;

        for record in [&missing, &flaky] {
            assert_eq!(record.status, CompatibilityStatus::Unknown);
            assert_eq!(record.latest_version, UNKNOWN_VERSION);
            assert!(!record.has_required_upgrades());
        }
        assert_eq!(flaky.installed_version, "2.1.0");
    }

    #[tokio::test]
    async fn test_analyze_all_keeps_order_and_shares_fetches() {
        let registry = Arc::new(
            StaticRegistry::new()
                .with_catalog(react_select())
                .with_catalog(react_final_form()),
        );
        let cache = MetadataCache::new(registry.clone());
        let project = declared(&[("final-form", "4.20.0")]);
        let analyzer = DependencyAnalyzer::new(&cache, TARGET, &project);

        let deps = vec![
            ("react-final-form".to_string(), "^6.5.9".to_string(), DependencyClass::Direct),
            ("react-select".to_string(), "^3.0.4".to_string(), DependencyClass::Direct),
            ("react-select".to_string(), "^5.9.0".to_string(), DependencyClass::Dev),
        ];
        let records = analyzer.analyze_all(&deps).await;

        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["react-final-form", "react-select", "react-select"]);
        assert_eq!(records[2].status, CompatibilityStatus::Compatible);
        assert_eq!(registry.fetch_count("react-select"), 1);
    }
}
