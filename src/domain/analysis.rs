//! Analysis result aggregated over all surfaced dependencies

use super::{CompatibilityStatus, DependencyRecord};
use serde::{Deserialize, Serialize};

/// Outcome of analyzing a project against a target React version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Resolved target React version
    pub target_version: String,
    /// One record per surfaced dependency, in manifest order
    pub dependencies: Vec<DependencyRecord>,
    pub has_incompatible: bool,
    pub has_unknown: bool,
}

/// Counts shown in the summary line and JSON summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub total: usize,
    pub compatible: usize,
    pub incompatible: usize,
    pub unknown: usize,
    pub with_required_upgrades: usize,
}

impl AnalysisResult {
    /// Creates a result, deriving the status flags from the records
    pub fn new(target_version: impl Into<String>, dependencies: Vec<DependencyRecord>) -> Self {
        let has_incompatible = dependencies.iter().any(|d| d.status.is_incompatible());
        let has_unknown = dependencies.iter().any(|d| d.status.is_unknown());
        Self {
            target_version: target_version.into(),
            dependencies,
            has_incompatible,
            has_unknown,
        }
    }

    /// Returns the records with the given status
    pub fn with_status(
        &self,
        status: CompatibilityStatus,
    ) -> impl Iterator<Item = &DependencyRecord> {
        self.dependencies.iter().filter(move |d| d.status == status)
    }

    /// Returns the incompatible records, cloned for selection
    pub fn incompatible(&self) -> Vec<DependencyRecord> {
        self.with_status(CompatibilityStatus::Incompatible)
            .cloned()
            .collect()
    }

    /// Returns true if any incompatible record needs companion upgrades
    pub fn has_required_upgrades(&self) -> bool {
        self.dependencies.iter().any(|d| d.has_required_upgrades())
    }

    /// Computes the summary counts
    pub fn summary(&self) -> AnalysisSummary {
        let mut summary = AnalysisSummary {
            total: self.dependencies.len(),
            ..AnalysisSummary::default()
        };
        for dep in &self.dependencies {
            match dep.status {
                CompatibilityStatus::Compatible => summary.compatible += 1,
                CompatibilityStatus::Incompatible => summary.incompatible += 1,
                CompatibilityStatus::Unknown => summary.unknown += 1,
            }
            if dep.has_required_upgrades() {
                summary.with_required_upgrades += 1;
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CompanionUpgrade, DependencyClass};

    fn record(name: &str, status: CompatibilityStatus) -> DependencyRecord {
        let mut record = DependencyRecord::unknown(name, "1.0.0", DependencyClass::Direct, "2.0.0");
        record.status = status;
        record
    }

    #[test]
    fn test_flags_derived() {
        let result = AnalysisResult::new(
            "19.0.0",
            vec![
                record("a", CompatibilityStatus::Compatible),
                record("b", CompatibilityStatus::Incompatible),
            ],
        );
        assert!(result.has_incompatible);
        assert!(!result.has_unknown);
    }

    #[test]
    fn test_empty_result() {
        let result = AnalysisResult::new("19.0.0", Vec::new());
        assert!(!result.has_incompatible);
        assert!(!result.has_unknown);
        assert_eq!(result.summary(), AnalysisSummary::default());
    }

    #[test]
    fn test_summary_counts() {
        let mut with_companion = record("c", CompatibilityStatus::Incompatible);
        with_companion
            .required_upgrades_for_nearest
            .push(CompanionUpgrade::new("final-form", "4.20.0", "^4.20.10"));

        let result = AnalysisResult::new(
            "19.0.0",
            vec![
                record("a", CompatibilityStatus::Compatible),
                record("b", CompatibilityStatus::Unknown),
                with_companion,
            ],
        );
        let summary = result.summary();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.compatible, 1);
        assert_eq!(summary.incompatible, 1);
        assert_eq!(summary.unknown, 1);
        assert_eq!(summary.with_required_upgrades, 1);
        assert!(result.has_required_upgrades());
        assert_eq!(result.incompatible().len(), 1);
    }
}
