//! Typed view of a package's published versions
//!
//! A `VersionCatalog` is built once per package from registry metadata and
//! then shared read-only through the metadata cache.

use semver::Version;
use std::collections::BTreeMap;

/// Peer dependency keys that describe the React host version
const REACT_PEER_KEYS: &[&str] = &["react", "react-dom"];

/// Metadata of one published version
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VersionRecord {
    /// `dependencies` of the published version
    pub dependencies: BTreeMap<String, String>,
    /// `peerDependencies` of the published version
    pub peer_dependencies: BTreeMap<String, String>,
    /// React range from `peerDependencies` (`react`, else `react-dom`)
    pub peer_requirement: Option<String>,
}

impl VersionRecord {
    /// Creates a record, extracting the React peer requirement
    pub fn new(
        dependencies: BTreeMap<String, String>,
        peer_dependencies: BTreeMap<String, String>,
    ) -> Self {
        let peer_requirement = REACT_PEER_KEYS
            .iter()
            .find_map(|key| peer_dependencies.get(*key))
            .cloned();
        Self {
            dependencies,
            peer_dependencies,
            peer_requirement,
        }
    }

    /// Creates a record with only a React peer requirement
    pub fn with_react_peer(range: impl Into<String>) -> Self {
        let mut peers = BTreeMap::new();
        peers.insert("react".to_string(), range.into());
        Self::new(BTreeMap::new(), peers)
    }

    /// Adds a declared dependency (builder pattern)
    pub fn with_dependency(mut self, name: impl Into<String>, range: impl Into<String>) -> Self {
        self.dependencies.insert(name.into(), range.into());
        self
    }

    /// Adds a peer dependency (builder pattern)
    pub fn with_peer(mut self, name: impl Into<String>, range: impl Into<String>) -> Self {
        self.peer_dependencies.insert(name.into(), range.into());
        self.peer_requirement = REACT_PEER_KEYS
            .iter()
            .find_map(|key| self.peer_dependencies.get(*key))
            .cloned();
        self
    }

    /// Declared and peer dependencies merged, peers taking precedence
    pub fn required_dependencies(&self) -> BTreeMap<&str, &str> {
        let mut required: BTreeMap<&str, &str> = self
            .dependencies
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        for (name, range) in &self.peer_dependencies {
            required.insert(name.as_str(), range.as_str());
        }
        required
    }
}

/// All published versions of a package
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VersionCatalog {
    /// Package name
    pub name: String,
    /// Version string to metadata
    pub versions: BTreeMap<String, VersionRecord>,
    /// The registry's `latest` dist-tag
    pub latest_tag: Option<String>,
}

impl VersionCatalog {
    /// Creates an empty catalog
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            versions: BTreeMap::new(),
            latest_tag: None,
        }
    }

    /// Adds a version (builder pattern)
    pub fn with_version(mut self, version: impl Into<String>, record: VersionRecord) -> Self {
        self.versions.insert(version.into(), record);
        self
    }

    /// Sets the `latest` dist-tag (builder pattern)
    pub fn with_latest_tag(mut self, version: impl Into<String>) -> Self {
        self.latest_tag = Some(version.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// Looks up the metadata of an exact version string
    pub fn get(&self, version: &str) -> Option<&VersionRecord> {
        self.versions.get(version)
    }

    /// Versions that parse as semver, sorted ascending by precedence
    pub fn sorted_versions(&self) -> Vec<(Version, &str)> {
        let mut parsed: Vec<(Version, &str)> = self
            .versions
            .keys()
            .filter_map(|v| Version::parse(v).ok().map(|parsed| (parsed, v.as_str())))
            .collect();
        parsed.sort_by(|a, b| a.0.cmp(&b.0));
        parsed
    }

    /// Non-prerelease versions sorted ascending by precedence
    pub fn stable_versions(&self) -> Vec<(Version, &str)> {
        self.sorted_versions()
            .into_iter()
            .filter(|(v, _)| v.pre.is_empty())
            .collect()
    }

    /// The registry's latest stable version
    ///
    /// Uses the `latest` dist-tag when it names a stable published version,
    /// otherwise the highest stable version.
    pub fn latest_stable(&self) -> Option<String> {
        if let Some(tag) = &self.latest_tag {
            let is_stable = Version::parse(tag).map(|v| v.pre.is_empty()).unwrap_or(false);
            if is_stable && self.versions.contains_key(tag) {
                return Some(tag.clone());
            }
        }
        self.stable_versions()
            .last()
            .map(|(_, raw)| raw.to_string())
    }

    /// The oldest published version
    pub fn oldest(&self) -> Option<&str> {
        self.sorted_versions()
            .first()
            .map(|(_, raw)| *raw)
            .or_else(|| self.versions.keys().next().map(String::as_str))
    }
}
