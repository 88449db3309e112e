//! Per-dependency analysis records

use super::CompatibilityStatus;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder used for the latest version when the registry could not be reached
pub const UNKNOWN_VERSION: &str = "unknown";

/// Which manifest section a dependency is declared in
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum DependencyClass {
    /// `dependencies`
    #[default]
    Direct,
    /// `devDependencies`
    Dev,
    /// `optionalDependencies`
    Optional,
}

impl DependencyClass {
    /// Returns the package.json field holding this class
    pub fn manifest_field(&self) -> &'static str {
        match self {
            DependencyClass::Direct => "dependencies",
            DependencyClass::Dev => "devDependencies",
            DependencyClass::Optional => "optionalDependencies",
        }
    }

    /// Returns the short label (`direct`, `dev`, `optional`)
    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyClass::Direct => "direct",
            DependencyClass::Dev => "dev",
            DependencyClass::Optional => "optional",
        }
    }

    /// Returns all classes in manifest order
    pub fn all() -> &'static [DependencyClass] {
        &[
            DependencyClass::Direct,
            DependencyClass::Dev,
            DependencyClass::Optional,
        ]
    }
}

impl fmt::Display for DependencyClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A package already declared by the project whose version must be raised
/// for a chosen upgrade target to be satisfied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanionUpgrade {
    /// Package name
    pub name: String,
    /// Version currently declared in the project (operators stripped)
    pub current_version: String,
    /// Range required by the upgrade target, operators preserved
    pub required_range: String,
}

impl CompanionUpgrade {
    pub fn new(
        name: impl Into<String>,
        current_version: impl Into<String>,
        required_range: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            current_version: current_version.into(),
            required_range: required_range.into(),
        }
    }
}

impl fmt::Display for CompanionUpgrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{} (requires {})",
            self.name, self.current_version, self.required_range
        )
    }
}

/// Compatibility analysis of one declared dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyRecord {
    /// Package name
    pub name: String,
    /// Installed version with range operators stripped
    pub installed_version: String,
    /// Manifest section the dependency was declared in
    pub dependency_class: DependencyClass,
    /// Compatibility with the target React version
    pub status: CompatibilityStatus,
    /// React range declared by the installed version, if any
    pub declared_peer_range: Option<String>,
    /// Lowest version above the installed one that supports the target
    pub nearest_compatible_version: Option<String>,
    /// Latest compatible version, or the registry latest when none is compatible
    pub latest_version: String,
    /// Set on incompatible records whose `latest_version` supports the target
    #[serde(default)]
    pub latest_is_compatible: bool,
    /// Companion upgrades required by `nearest_compatible_version`
    pub required_upgrades_for_nearest: Vec<CompanionUpgrade>,
    /// Companion upgrades required by `latest_version`
    pub required_upgrades_for_latest: Vec<CompanionUpgrade>,
}

impl DependencyRecord {
    /// Creates a record for a dependency whose compatibility could not be determined
    pub fn unknown(
        name: impl Into<String>,
        installed_version: impl Into<String>,
        dependency_class: DependencyClass,
        latest_version: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            installed_version: installed_version.into(),
            dependency_class,
            status: CompatibilityStatus::Unknown,
            declared_peer_range: None,
            nearest_compatible_version: None,
            latest_version: latest_version.into(),
            latest_is_compatible: false,
            required_upgrades_for_nearest: Vec::new(),
            required_upgrades_for_latest: Vec::new(),
        }
    }

    /// Returns true if either upgrade path needs companion upgrades
    pub fn has_required_upgrades(&self) -> bool {
        !self.required_upgrades_for_nearest.is_empty()
            || !self.required_upgrades_for_latest.is_empty()
    }

    /// Returns true if the record carries a declared peer range
    pub fn has_peer_range(&self) -> bool {
        self.declared_peer_range.is_some()
    }

    /// Returns true if moving to `version` makes the package support the target
    pub fn is_compatible_target(&self, version: &str) -> bool {
        self.nearest_compatible_version.as_deref() == Some(version)
            || (self.latest_is_compatible && self.latest_version == version)
    }
}

impl fmt::Display for DependencyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{} [{}] {}",
            self.name, self.installed_version, self.dependency_class, self.status
        )
    }
}
