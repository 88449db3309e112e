//! Searches a version catalog for React-compatible releases

use crate::compat::range::{coerce_version, evaluate};
use crate::registry::{VersionCatalog, VersionRecord};
use semver::Version;

fn is_compatible_with(record: &VersionRecord, target: &str) -> bool {
    record
        .peer_requirement
        .as_deref()
        .is_some_and(|range| evaluate(target, Some(range)).is_compatible())
}

/// Smallest stable version above `installed` whose peer range accepts `target`
///
/// Returns `None` when `installed` cannot be coerced to a version.
pub fn find_nearest_compatible(
    catalog: &VersionCatalog,
    installed: &str,
    target: &str,
) -> Option<String> {
    let installed = coerce_version(installed)?;

    catalog
        .stable_versions()
        .into_iter()
        .filter(|(version, _)| *version > installed)
        .find(|(_, raw)| {
            catalog
                .get(raw)
                .is_some_and(|record| is_compatible_with(record, target))
        })
        .map(|(_, raw)| raw.to_string())
}

/// Highest stable version whose peer range accepts `target`
pub fn find_latest_compatible(catalog: &VersionCatalog, target: &str) -> Option<String> {
    catalog
        .stable_versions()
        .into_iter()
        .rev()
        .find(|(_, raw)| {
            catalog
                .get(raw)
                .is_some_and(|record| is_compatible_with(record, target))
        })
        .map(|(_, raw)| raw.to_string())
}

/// Metadata of the version the project has installed
///
/// Lookup order: exact key, highest stable version not above `installed`,
/// then the oldest published version.
pub fn resolve_installed_record<'a>(
    catalog: &'a VersionCatalog,
    installed: &str,
) -> Option<(&'a str, &'a VersionRecord)> {
    if let Some((raw, record)) = catalog.versions.get_key_value(installed) {
        return Some((raw.as_str(), record));
    }

    let floor = coerce_version(installed).and_then(|installed| highest_at_most(catalog, &installed));
    let raw = floor.or_else(|| catalog.oldest())?;

    let (raw, record) = catalog.versions.get_key_value(raw)?;
    Some((raw.as_str(), record))
}

fn highest_at_most<'a>(catalog: &'a VersionCatalog, ceiling: &Version) -> Option<&'a str> {
    catalog
        .stable_versions()
        .into_iter()
        .rev()
        .find(|(version, _)| version <= ceiling)
        .map(|(_, raw)| raw)
}
