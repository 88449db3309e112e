//! Core domain models for reactup
//!
//! This module contains the fundamental types used throughout the application:
//! - Compatibility status of a dependency against a React version
//! - Per-dependency analysis records and companion upgrades
//! - Fix policies and upgrade selections
//! - Aggregated analysis results and the resulting write plan

mod analysis;
mod dependency;
mod plan;
mod selection;
mod status;

pub use analysis::{AnalysisResult, AnalysisSummary};
pub use dependency::{CompanionUpgrade, DependencyClass, DependencyRecord, UNKNOWN_VERSION};
pub use plan::{MainUpgrade, UpgradePlan};
pub use selection::{FixPolicy, UpgradeAction, UpgradeSelection};
pub use status::CompatibilityStatus;
