//! Write plan derived from upgrade selections

use super::{CompanionUpgrade, DependencyClass};
use serde::{Deserialize, Serialize};

/// One version bump of a package chosen by the user or the fix policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MainUpgrade {
    pub name: String,
    pub version: String,
    /// Section the package is declared in, which is also where it is written
    pub dependency_class: DependencyClass,
}

impl MainUpgrade {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        dependency_class: DependencyClass,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            dependency_class,
        }
    }

    /// Value written into the manifest
    pub fn manifest_value(&self) -> String {
        format!("^{}", self.version)
    }
}

/// Manifest edits for one run
///
/// A (name, section) pair appears at most once among main upgrades and a name
/// at most once among companions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UpgradePlan {
    pub main_upgrades: Vec<MainUpgrade>,
    pub companion_upgrades: Vec<CompanionUpgrade>,
}

impl UpgradePlan {
    pub fn is_empty(&self) -> bool {
        self.main_upgrades.is_empty() && self.companion_upgrades.is_empty()
    }

    pub fn has_companions(&self) -> bool {
        !self.companion_upgrades.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_value_has_caret() {
        let upgrade = MainUpgrade::new("react-select", "5.9.0", DependencyClass::Direct);
        assert_eq!(upgrade.manifest_value(), "^5.9.0");
    }

    #[test]
    fn test_empty_plan() {
        let plan = UpgradePlan::default();
        assert!(plan.is_empty());
        assert!(!plan.has_companions());
    }
}
