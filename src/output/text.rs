//! Text output formatter for human-readable display
//!
//! This module provides:
//! - A compatibility table with colored status
//! - Companion upgrade notes per incompatible package
//! - Summary with counts per status

use crate::domain::{AnalysisResult, CompanionUpgrade, CompatibilityStatus, DependencyRecord};
use crate::output::OutputFormatter;
use colored::Colorize;
use std::io::Write;

const HEADERS: [&str; 7] = [
    "Package",
    "Installed",
    "Status",
    "Supported range",
    "Nearest",
    "Latest",
    "Type",
];

/// Placeholder for absent optional cells
const EMPTY_CELL: &str = "-";

/// Text formatter for human-readable output
pub struct TextFormatter {
    verbose: bool,
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            color: true,
        }
    }

    /// Create a new text formatter with color option
    pub fn with_color(verbose: bool, color: bool) -> Self {
        Self { verbose, color }
    }

    fn row(record: &DependencyRecord) -> [String; 7] {
        [
            record.name.clone(),
            record.installed_version.clone(),
            record.status.to_string(),
            record
                .declared_peer_range
                .clone()
                .unwrap_or_else(|| EMPTY_CELL.to_string()),
            record
                .nearest_compatible_version
                .clone()
                .unwrap_or_else(|| EMPTY_CELL.to_string()),
            record.latest_version.clone(),
            record.dependency_class.to_string(),
        ]
    }

    fn column_widths(rows: &[[String; 7]]) -> [usize; 7] {
        let mut widths = HEADERS.map(str::len);
        for row in rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }
        widths
    }

    /// Colorize a cell already padded to its column width
    fn paint(&self, column: usize, padded: String, status: CompatibilityStatus) -> String {
        if !self.color {
            return padded;
        }
        match column {
            0 => padded.bold().to_string(),
            2 => match status {
                CompatibilityStatus::Compatible => padded.green().to_string(),
                CompatibilityStatus::Incompatible => padded.red().bold().to_string(),
                CompatibilityStatus::Unknown => padded.yellow().to_string(),
            },
            4 | 5 if status.is_incompatible() => padded.cyan().to_string(),
            _ => padded.dimmed().to_string(),
        }
    }

    fn write_table(&self, result: &AnalysisResult, writer: &mut dyn Write) -> std::io::Result<()> {
        let rows: Vec<[String; 7]> = result.dependencies.iter().map(Self::row).collect();
        let widths = Self::column_widths(&rows);

        let header: Vec<String> = HEADERS
            .iter()
            .zip(widths)
            .map(|(h, w)| format!("{:w$}", h, w = w))
            .collect();
        let header = header.join("  ");
        if self.color {
            writeln!(writer, "  {}", header.bold().underline())?;
        } else {
            writeln!(writer, "  {}", header)?;
        }

        for (record, row) in result.dependencies.iter().zip(&rows) {
            let cells: Vec<String> = row
                .iter()
                .zip(widths)
                .enumerate()
                .map(|(column, (cell, w))| {
                    self.paint(column, format!("{:w$}", cell, w = w), record.status)
                })
                .collect();
            writeln!(writer, "  {}", cells.join("  ").trim_end())?;
        }
        Ok(())
    }

    fn write_companions(
        &self,
        label: &str,
        version: &str,
        companions: &[CompanionUpgrade],
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        if companions.is_empty() {
            return Ok(());
        }
        let target = format!("{}@{}", label, version);
        if self.color {
            writeln!(writer, "  {} requires:", target.bold())?;
        } else {
            writeln!(writer, "  {} requires:", target)?;
        }
        for companion in companions {
            if self.color {
                writeln!(
                    writer,
                    "    {} {} {} {}",
                    companion.name,
                    companion.current_version.dimmed(),
                    "→".dimmed(),
                    companion.required_range.cyan()
                )?;
            } else {
                writeln!(
                    writer,
                    "    {} {} -> {}",
                    companion.name, companion.current_version, companion.required_range
                )?;
            }
        }
        Ok(())
    }

    fn write_required_upgrades(
        &self,
        result: &AnalysisResult,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        if !result.has_required_upgrades() {
            return Ok(());
        }

        writeln!(writer)?;
        if self.color {
            writeln!(writer, "{}:", "Required companion upgrades".bold())?;
        } else {
            writeln!(writer, "Required companion upgrades:")?;
        }
        for record in result.dependencies.iter().filter(|r| r.has_required_upgrades()) {
            if let Some(nearest) = &record.nearest_compatible_version {
                self.write_companions(
                    &record.name,
                    nearest,
                    &record.required_upgrades_for_nearest,
                    writer,
                )?;
            }
            if record.nearest_compatible_version.as_deref() != Some(record.latest_version.as_str())
                || record.required_upgrades_for_nearest != record.required_upgrades_for_latest
            {
                self.write_companions(
                    &record.name,
                    &record.latest_version,
                    &record.required_upgrades_for_latest,
                    writer,
                )?;
            }
        }
        Ok(())
    }

    fn write_summary(&self, result: &AnalysisResult, writer: &mut dyn Write) -> std::io::Result<()> {
        let summary = result.summary();
        writeln!(writer)?;
        if self.color {
            writeln!(
                writer,
                "{}: {} package(s), {} compatible, {} incompatible, {} unknown",
                "Summary".bold(),
                summary.total,
                summary.compatible.to_string().green(),
                summary.incompatible.to_string().red(),
                summary.unknown.to_string().yellow()
            )?;
        } else {
            writeln!(
                writer,
                "Summary: {} package(s), {} compatible, {} incompatible, {} unknown",
                summary.total, summary.compatible, summary.incompatible, summary.unknown
            )?;
        }

        if self.verbose && summary.unknown > 0 {
            let note = "unknown: no React peer range declared, unparsable range, or registry unavailable";
            if self.color {
                writeln!(writer, "  {}", note.dimmed())?;
            } else {
                writeln!(writer, "  {}", note)?;
            }
        }
        Ok(())
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, result: &AnalysisResult, writer: &mut dyn Write) -> std::io::Result<()> {
        let title = format!("React compatibility report (target {})", result.target_version);
        if self.color {
            writeln!(writer, "{}", title.bold())?;
        } else {
            writeln!(writer, "{}", title)?;
        }
        writeln!(writer)?;

        if result.dependencies.is_empty() {
            if self.color {
                writeln!(writer, "  {}", "No React-related dependencies found".dimmed())?;
            } else {
                writeln!(writer, "  No React-related dependencies found")?;
            }
            return Ok(());
        }

        self.write_table(result, writer)?;
        self.write_required_upgrades(result, writer)?;
        self.write_summary(result, writer)?;

        Ok(())
    }
}
