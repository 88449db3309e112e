//! Companion upgrade resolution
//!
//! A target release may require newer versions of packages the project
//! already declares (`react-final-form@7` needs `final-form@^4.20.10`).
//! Those requirements become `CompanionUpgrade`s.

use crate::compat::range::{coerce_version, normalize_range, satisfies, strip_range_prefix};
use crate::compat::{is_react_core, DeclaredVersions};
use crate::domain::CompanionUpgrade;
use crate::registry::VersionCatalog;

/// Outcome of companion resolution for one target version
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompanionResolution {
    /// Requirements were checked; the list may be empty
    Resolved(Vec<CompanionUpgrade>),
    /// The target version has no metadata in the catalog
    Undetermined,
}

impl CompanionResolution {
    pub fn is_undetermined(&self) -> bool {
        matches!(self, Self::Undetermined)
    }

    /// Upgrades to apply; undetermined resolves to none
    pub fn into_upgrades(self) -> Vec<CompanionUpgrade> {
        match self {
            Self::Resolved(upgrades) => upgrades,
            Self::Undetermined => Vec::new(),
        }
    }
}

/// Companion upgrades needed to move to `target_version`
pub fn resolve_companions(
    catalog: &VersionCatalog,
    target_version: &str,
    declared: &DeclaredVersions,
) -> CompanionResolution {
    let Some(record) = catalog.get(target_version) else {
        return CompanionResolution::Undetermined;
    };

    let upgrades = record
        .required_dependencies()
        .into_iter()
        .filter(|(name, _)| !is_react_core(name))
        .filter_map(|(name, required_range)| {
            let declared_range = declared.get(name)?;
            let current_version = strip_range_prefix(declared_range);

            let range = normalize_range(required_range)?;
            let current = coerce_version(&current_version)?;
            if satisfies(&range, &current)? {
                return None;
            }

            Some(CompanionUpgrade::new(name, current_version, required_range))
        })
        .collect();

    CompanionResolution::Resolved(upgrades)
}
