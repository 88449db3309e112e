//! Compatibility status of a dependency against the target React version

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of matching a package's peer requirement against a React version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompatibilityStatus {
    /// The peer requirement is satisfied by the target version
    Compatible,
    /// The peer requirement excludes the target version
    Incompatible,
    /// No peer requirement was declared, or it could not be parsed
    Unknown,
}

impl CompatibilityStatus {
    /// Returns the lowercase label used in JSON output
    pub fn as_str(&self) -> &'static str {
        match self {
            CompatibilityStatus::Compatible => "compatible",
            CompatibilityStatus::Incompatible => "incompatible",
            CompatibilityStatus::Unknown => "unknown",
        }
    }

    pub fn is_compatible(&self) -> bool {
        matches!(self, CompatibilityStatus::Compatible)
    }

    pub fn is_incompatible(&self) -> bool {
        matches!(self, CompatibilityStatus::Incompatible)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, CompatibilityStatus::Unknown)
    }
}

impl fmt::Display for CompatibilityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
