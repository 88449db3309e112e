//! JSON output formatter for machine processing
//!
//! Field names are camelCase; absent optional values serialize as `null`.

use crate::domain::{
    AnalysisResult, CompanionUpgrade, CompatibilityStatus, DependencyClass, DependencyRecord,
};
use crate::output::OutputFormatter;
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
#[derive(Debug, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }
}

/// JSON representation of the full result
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonOutput<'a> {
    target_react_version: &'a str,
    summary: JsonSummary,
    has_incompatible: bool,
    has_required_upgrades: bool,
    dependencies: Vec<JsonDependency<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonSummary {
    total: usize,
    compatible: usize,
    incompatible: usize,
    with_required_upgrades: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonDependency<'a> {
    name: &'a str,
    installed_version: &'a str,
    status: CompatibilityStatus,
    supported_react_range: Option<&'a str>,
    nearest_compatible_version: Option<&'a str>,
    latest_version: &'a str,
    dependency_type: DependencyClass,
    required_upgrades_for_nearest: Vec<JsonCompanion<'a>>,
    required_upgrades_for_latest: Vec<JsonCompanion<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonCompanion<'a> {
    name: &'a str,
    current_version: &'a str,
    required_range: &'a str,
}

fn companions_to_json(companions: &[CompanionUpgrade]) -> Vec<JsonCompanion<'_>> {
    companions
        .iter()
        .map(|c| JsonCompanion {
            name: &c.name,
            current_version: &c.current_version,
            required_range: &c.required_range,
        })
        .collect()
}

fn dependency_to_json(record: &DependencyRecord) -> JsonDependency<'_> {
    JsonDependency {
        name: &record.name,
        installed_version: &record.installed_version,
        status: record.status,
        supported_react_range: record.declared_peer_range.as_deref(),
        nearest_compatible_version: record.nearest_compatible_version.as_deref(),
        latest_version: &record.latest_version,
        dependency_type: record.dependency_class,
        required_upgrades_for_nearest: companions_to_json(&record.required_upgrades_for_nearest),
        required_upgrades_for_latest: companions_to_json(&record.required_upgrades_for_latest),
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, result: &AnalysisResult, writer: &mut dyn Write) -> std::io::Result<()> {
        let summary = result.summary();
        let output = JsonOutput {
            target_react_version: &result.target_version,
            summary: JsonSummary {
                total: summary.total,
                compatible: summary.compatible,
                incompatible: summary.incompatible,
                with_required_upgrades: summary.with_required_upgrades,
            },
            has_incompatible: result.has_incompatible,
            has_required_upgrades: result.has_required_upgrades(),
            dependencies: result.dependencies.iter().map(dependency_to_json).collect(),
        };

        let json = serde_json::to_string_pretty(&output).map_err(std::io::Error::other)?;

        writeln!(writer, "{}", json)?;

        Ok(())
    }
}
