//! Resolution of the target React version from user input

use crate::error::ConfigError;
use crate::registry::VersionCatalog;
use semver::Version;

/// Resolve `input` against the `react` catalog
///
/// Accepts `latest`, an exact published version, a major (`19`) or a
/// major.minor (`18.3`). Partial inputs resolve to the highest stable match.
pub fn resolve_target_version(catalog: &VersionCatalog, input: &str) -> Result<String, ConfigError> {
    let input = input.trim();

    if input.eq_ignore_ascii_case("latest") {
        return catalog
            .latest_stable()
            .ok_or_else(|| ConfigError::invalid_target_version(input));
    }

    if catalog.versions.contains_key(input) {
        return Ok(input.to_string());
    }

    let input_without_v = input.trim_start_matches(['v', 'V']);
    let parts: Vec<u64> = input_without_v
        .split('.')
        .map(|p| p.parse::<u64>())
        .collect::<Result<_, _>>()
        .map_err(|_| ConfigError::invalid_target_version(input))?;

    let matches = |version: &Version| match parts.as_slice() {
        [major] => version.major == *major,
        [major, minor] => version.major == *major && version.minor == *minor,
        _ => false,
    };

    catalog
        .stable_versions()
        .into_iter()
        .rev()
        .find(|(version, _)| matches(version))
        .map(|(_, raw)| raw.to_string())
        .ok_or_else(|| ConfigError::invalid_target_version(input))
}
