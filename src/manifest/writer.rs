//! Manifest file writing
//!
//! This module provides:
//! - ManifestWriter for applying an upgrade plan to package.json
//! - Format preservation: only the version strings change
//! - Section scoping: a package is rewritten only inside its own section

use crate::domain::{DependencyClass, UpgradePlan};
use crate::error::ManifestError;
use crate::manifest::package_json::{manifest_path, PackageManifest};
use regex::Regex;
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writer applying upgrade plans to one manifest file
pub struct ManifestWriter {
    path: PathBuf,
}

/// One version string rewritten in the manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedEdit {
    pub name: String,
    pub dependency_class: DependencyClass,
    /// Value now in the manifest, e.g. `^5.9.0`
    pub value: String,
}

impl AppliedEdit {
    pub fn new(
        name: impl Into<String>,
        dependency_class: DependencyClass,
        value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            dependency_class,
            value: value.into(),
        }
    }
}

/// Result of applying a plan to a manifest file
#[derive(Debug)]
pub struct WriteResult {
    /// Path to the manifest file
    pub path: PathBuf,
    /// Rewrites in the order they were applied
    pub applied: Vec<AppliedEdit>,
    /// Edits that could not be applied
    pub errors: Vec<ManifestError>,
    /// Whether the file was actually modified
    pub file_modified: bool,
}

impl WriteResult {
    fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            applied: Vec::new(),
            errors: Vec::new(),
            file_modified: false,
        }
    }

    /// Returns true if any edit was applied
    pub fn has_updates(&self) -> bool {
        !self.applied.is_empty()
    }

    /// Returns true if any edit failed
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Value finally written for `name` in `class`, if any
    pub fn written_value(&self, name: &str, class: DependencyClass) -> Option<&str> {
        self.applied
            .iter()
            .rev()
            .find(|edit| edit.name == name && edit.dependency_class == class)
            .map(|edit| edit.value.as_str())
    }
}

impl ManifestWriter {
    /// Create a writer for the project at `root` (directory or manifest path)
    pub fn new(root: &Path) -> Self {
        Self {
            path: manifest_path(root),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `plan` to the manifest
    ///
    /// Main upgrades are written as `^<version>` into their section.
    /// Companions are written only when `include_companions` is set, as
    /// their required range, into the section that declares them. Writes are
    /// applied in plan order, so a companion naming a main upgrade replaces it.
    pub fn apply_plan(
        &self,
        plan: &UpgradePlan,
        include_companions: bool,
    ) -> Result<WriteResult, ManifestError> {
        let content = read_manifest_content(&self.path)?;
        let manifest = PackageManifest::parse(&self.path, &content)?;
        let mut result = WriteResult::new(&self.path);
        let mut current = content;

        for upgrade in &plan.main_upgrades {
            let value = upgrade.manifest_value();
            match update_section_version(&current, upgrade.dependency_class, &upgrade.name, &value) {
                Some(updated) => {
                    debug!(package = %upgrade.name, %value, "rewrote main upgrade");
                    current = updated;
                    result.applied.push(AppliedEdit::new(
                        &upgrade.name,
                        upgrade.dependency_class,
                        value,
                    ));
                }
                None => result.errors.push(ManifestError::package_not_declared(
                    &self.path,
                    &upgrade.name,
                    upgrade.dependency_class.manifest_field(),
                )),
            }
        }

        if include_companions {
            for companion in &plan.companion_upgrades {
                let Some(class) = manifest.class_of(&companion.name) else {
                    result.errors.push(ManifestError::package_not_declared(
                        &self.path,
                        &companion.name,
                        "any dependency section",
                    ));
                    continue;
                };
                match update_section_version(&current, class, &companion.name, &companion.required_range)
                {
                    Some(updated) => {
                        debug!(package = %companion.name, range = %companion.required_range, "rewrote companion");
                        current = updated;
                        result.applied.push(AppliedEdit::new(
                            &companion.name,
                            class,
                            &companion.required_range,
                        ));
                    }
                    None => result.errors.push(ManifestError::package_not_declared(
                        &self.path,
                        &companion.name,
                        class.manifest_field(),
                    )),
                }
            }
        }

        if result.has_updates() {
            write_manifest(&self.path, &current)?;
            result.file_modified = true;
        }

        Ok(result)
    }
}

/// Replace the version of `package` inside the `class` section
///
/// Returns `None` when the section or the entry does not exist.
pub fn update_section_version(
    content: &str,
    class: DependencyClass,
    package: &str,
    new_value: &str,
) -> Option<String> {
    let span = section_span(content, class.manifest_field())?;

    // Matches: "package-name": "version" with flexible whitespace
    let pattern = format!(r#"("{}"\s*:\s*)"([^"]*)""#, regex::escape(package));
    let re = Regex::new(&pattern).ok()?;

    let section = &content[span.clone()];
    let caps = re.captures(section)?;
    let prefix = caps.get(1)?;
    let whole = caps.get(0)?;

    let mut updated = String::with_capacity(content.len() + new_value.len());
    updated.push_str(&content[..span.start + whole.start()]);
    updated.push_str(prefix.as_str());
    updated.push('"');
    updated.push_str(new_value);
    updated.push('"');
    updated.push_str(&content[span.start + whole.end()..]);
    Some(updated)
}

/// Byte range of the top-level `"section": { ... }` object, braces included
fn section_span(content: &str, section: &str) -> Option<Range<usize>> {
    let bytes = content.as_bytes();
    let mut depth = 0usize;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'"' => {
                let end = string_end(bytes, i)?;
                if depth == 1 && content[i + 1..end] == *section {
                    if let Some(open) = object_start(content, end + 1) {
                        let close = matching_brace(bytes, open)?;
                        return Some(open..close + 1);
                    }
                }
                i = end;
            }
            b'{' | b'[' => depth += 1,
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
        i += 1;
    }
    None
}

/// Index of the quote closing the string opened at `open`
fn string_end(bytes: &[u8], open: usize) -> Option<usize> {
    let mut i = open + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return Some(i),
            _ => i += 1,
        }
    }
    None
}

/// Index of `{` when the text at `from` reads `: {`
fn object_start(content: &str, from: usize) -> Option<usize> {
    let rest = &content[from..];
    let after_key = rest.trim_start();
    let after_colon = after_key.strip_prefix(':')?.trim_start();
    after_colon
        .starts_with('{')
        .then(|| content.len() - after_colon.len())
}

fn matching_brace(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = open;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => i = string_end(bytes, i)?,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Read a manifest file content
pub fn read_manifest_content(path: &Path) -> Result<String, ManifestError> {
    if !path.exists() {
        return Err(ManifestError::not_found(path));
    }
    fs::read_to_string(path).map_err(|e| ManifestError::read_error(path, e))
}

/// Write content to a manifest file
pub fn write_manifest(path: &Path, content: &str) -> Result<(), ManifestError> {
    fs::write(path, content).map_err(|e| ManifestError::write_error(path, e))
}
