//! React compatibility resolution
//!
//! This module provides:
//! - npm range normalization and evaluation
//! - Nearest and latest compatible version search
//! - Companion upgrade resolution
//! - Per-dependency analysis over the metadata cache
//! - Target version resolution

pub mod analyzer;
pub mod companions;
pub mod range;
pub mod search;
pub mod target;

pub use analyzer::{analyze_catalog, DependencyAnalyzer};
pub use companions::{resolve_companions, CompanionResolution};
pub use range::{coerce_version, evaluate, normalize_range, strip_range_prefix};
pub use search::{find_latest_compatible, find_nearest_compatible, resolve_installed_record};
pub use target::resolve_target_version;

use std::collections::BTreeMap;

/// Package name to the range declared in the project manifest
pub type DeclaredVersions = BTreeMap<String, String>;

/// Packages that define the React version itself
const REACT_CORE: &[&str] = &["react", "react-dom"];

/// Name prefixes of React ecosystem packages
const REACT_ECOSYSTEM_PREFIXES: &[&str] = &[
    "react-",
    "@react-",
    "@types/react",
    "next",
    "@testing-library/react",
    "@mui/",
    "@emotion/",
    "styled-components",
    "@tanstack/react",
    "@reduxjs/",
    "redux",
    "gatsby",
    "@storybook/react",
    "@apollo/client",
    "formik",
    "framer-motion",
    "mobx-react",
    "@radix-ui/",
    "@headlessui/react",
];

/// Returns true for `react` and `react-dom`
pub fn is_react_core(name: &str) -> bool {
    REACT_CORE.contains(&name)
}

/// Whether an analyzed dependency should be reported
///
/// A package is reported when it declares a React peer range or its name
/// belongs to the React ecosystem. The core packages never are.
pub fn is_react_related(name: &str, has_peer_range: bool) -> bool {
    if is_react_core(name) {
        return false;
    }
    has_peer_range
        || REACT_ECOSYSTEM_PREFIXES
            .iter()
            .any(|prefix| name.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_react_core() {
        assert!(is_react_core("react"));
        assert!(is_react_core("react-dom"));
        assert!(!is_react_core("react-select"));
        assert!(!is_react_core("preact"));
    }

    #[test]
    fn test_react_related_by_name() {
        assert!(is_react_related("react-select", false));
        assert!(is_react_related("@types/react-dom", false));
        assert!(is_react_related("@mui/material", false));
        assert!(is_react_related("next", false));
        assert!(!is_react_related("lodash", false));
    }

    #[test]
    fn test_react_related_by_peer_range() {
        assert!(is_react_related("zustand", true));
    }

    #[test]
    fn test_core_packages_never_related() {
        assert!(!is_react_related("react", true));
        assert!(!is_react_related("react-dom", true));
    }
}
