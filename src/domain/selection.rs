//! Fix policies and per-package upgrade selections

use super::DependencyClass;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Automation mode for choosing upgrades without prompting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixPolicy {
    /// Leave every incompatible package as-is
    #[default]
    None,
    /// Prefer the nearest compatible version, falling back to latest
    Nearest,
    /// Always take the latest version
    Latest,
}

impl FromStr for FixPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(FixPolicy::None),
            "nearest" => Ok(FixPolicy::Nearest),
            "latest" => Ok(FixPolicy::Latest),
            other => Err(format!(
                "invalid fix policy '{}': expected 'none', 'nearest' or 'latest'",
                other
            )),
        }
    }
}

impl fmt::Display for FixPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FixPolicy::None => "none",
            FixPolicy::Nearest => "nearest",
            FixPolicy::Latest => "latest",
        };
        f.write_str(label)
    }
}

/// What to do with one incompatible package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UpgradeAction {
    /// Keep the installed version
    Skip,
    /// Move to the nearest compatible version
    NearestCompatible,
    /// Move to the latest version
    Latest,
}

impl fmt::Display for UpgradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            UpgradeAction::Skip => "skip",
            UpgradeAction::NearestCompatible => "nearest-compatible",
            UpgradeAction::Latest => "latest",
        };
        f.write_str(label)
    }
}

/// Chosen action for one package; `target_version` is `None` iff the action is skip
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeSelection {
    pub package_name: String,
    /// Section of the record this selection was made for
    #[serde(default)]
    pub dependency_class: DependencyClass,
    pub action: UpgradeAction,
    pub target_version: Option<String>,
}

impl UpgradeSelection {
    /// Creates a skip selection
    pub fn skip(package_name: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            dependency_class: DependencyClass::Direct,
            action: UpgradeAction::Skip,
            target_version: None,
        }
    }

    /// Creates a selection targeting the nearest compatible version
    pub fn nearest(package_name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            dependency_class: DependencyClass::Direct,
            action: UpgradeAction::NearestCompatible,
            target_version: Some(version.into()),
        }
    }

    /// Creates a selection targeting the latest version
    pub fn latest(package_name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            dependency_class: DependencyClass::Direct,
            action: UpgradeAction::Latest,
            target_version: Some(version.into()),
        }
    }

    /// Sets the section of the record this selection applies to
    pub fn in_class(mut self, dependency_class: DependencyClass) -> Self {
        self.dependency_class = dependency_class;
        self
    }

    pub fn is_skip(&self) -> bool {
        self.action == UpgradeAction::Skip
    }
}
