//! package.json reader
//!
//! Handles:
//! - dependencies
//! - devDependencies
//! - optionalDependencies
//!
//! Non-string entries are skipped. Key order follows the file.

use crate::compat::DeclaredVersions;
use crate::domain::DependencyClass;
use crate::error::ManifestError;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Manifest file name
pub const PACKAGE_JSON: &str = "package.json";

/// One dependency entry as written in the manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredDependency {
    pub name: String,
    /// Declared range, untouched
    pub range: String,
    pub class: DependencyClass,
}

/// Dependencies declared by a project's package.json
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageManifest {
    /// Path of the manifest file
    pub path: PathBuf,
    /// Entries of all sections, in section then file order
    pub dependencies: Vec<DeclaredDependency>,
}

impl PackageManifest {
    /// Parse manifest content read from `path`
    pub fn parse(path: impl Into<PathBuf>, content: &str) -> Result<Self, ManifestError> {
        let path = path.into();
        let json: Value = serde_json::from_str(content)
            .map_err(|e| ManifestError::json_parse_error(&path, e.to_string()))?;

        let mut dependencies = Vec::new();
        for class in DependencyClass::all() {
            if let Some(section) = json.get(class.manifest_field()).and_then(Value::as_object) {
                collect_section(section, *class, &mut dependencies);
            }
        }

        Ok(Self { path, dependencies })
    }

    /// Entries declared in one section
    pub fn section(&self, class: DependencyClass) -> impl Iterator<Item = &DeclaredDependency> {
        self.dependencies.iter().filter(move |d| d.class == class)
    }

    /// Entries of the selected sections
    pub fn in_classes<'a>(
        &'a self,
        classes: &'a [DependencyClass],
    ) -> impl Iterator<Item = &'a DeclaredDependency> {
        self.dependencies
            .iter()
            .filter(move |d| classes.contains(&d.class))
    }

    /// Ranges of every declared package; the first section declaring a name wins
    pub fn declared_versions(&self) -> DeclaredVersions {
        let mut declared = DeclaredVersions::new();
        for dep in &self.dependencies {
            declared
                .entry(dep.name.clone())
                .or_insert_with(|| dep.range.clone());
        }
        declared
    }

    /// First section declaring `name`
    pub fn class_of(&self, name: &str) -> Option<DependencyClass> {
        self.dependencies
            .iter()
            .find(|d| d.name == name)
            .map(|d| d.class)
    }

    /// The declared `react` range, if any
    pub fn react_range(&self) -> Option<&str> {
        self.dependencies
            .iter()
            .find(|d| d.name == "react")
            .map(|d| d.range.as_str())
    }
}

fn collect_section(
    section: &Map<String, Value>,
    class: DependencyClass,
    output: &mut Vec<DeclaredDependency>,
) {
    for (name, value) in section {
        if let Some(range) = value.as_str() {
            output.push(DeclaredDependency {
                name: name.clone(),
                range: range.to_string(),
                class,
            });
        }
    }
}

/// Path of the manifest for a project path
///
/// A path to a file is used as-is; a directory gets `package.json` appended.
pub fn manifest_path(root: &Path) -> PathBuf {
    if root.is_file() {
        root.to_path_buf()
    } else {
        root.join(PACKAGE_JSON)
    }
}

/// Read and parse the manifest of the project at `root`
pub fn read_manifest(root: &Path) -> Result<PackageManifest, ManifestError> {
    let path = manifest_path(root);
    if !path.exists() {
        return Err(ManifestError::not_found(path));
    }
    let content = fs::read_to_string(&path).map_err(|e| ManifestError::read_error(&path, e))?;
    PackageManifest::parse(path, &content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn parse(content: &str) -> Result<PackageManifest, ManifestError> {
        PackageManifest::parse(PACKAGE_JSON, content)
    }

    #[test]
    fn test_parse_sections() {
        let content = r#"{
            "name": "app",
            "dependencies": {
                "react": "^18.2.0",
                "react-select": "^3.0.4"
            },
            "devDependencies": {
                "@testing-library/react": "^14.0.0"
            },
            "peerDependencies": {
                "ignored": "^1.0.0"
            },
            "optionalDependencies": {
                "react-virtualized": "~9.22.3"
            }
        }"#;

        let manifest = parse(content).unwrap();
        assert_eq!(manifest.dependencies.len(), 4);
        assert_eq!(manifest.section(DependencyClass::Direct).count(), 2);
        assert_eq!(
            manifest.class_of("@testing-library/react"),
            Some(DependencyClass::Dev)
        );
        assert_eq!(
            manifest.class_of("react-virtualized"),
            Some(DependencyClass::Optional)
        );
        assert_eq!(manifest.class_of("ignored"), None);
        assert_eq!(manifest.react_range(), Some("^18.2.0"));
    }

    #[test]
    fn test_parse_keeps_file_order() {
        let content = r#"{"dependencies": {"zod": "^3.0.0", "axios": "^1.0.0", "lodash": "^4.0.0"}}"#;
        let names: Vec<String> = parse(content)
            .unwrap()
            .dependencies
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["zod", "axios", "lodash"]);
    }

    #[test]
    fn test_parse_skips_non_string_values() {
        let content = r#"{"dependencies": {"good": "^1.0.0", "bad": {"version": "1.0.0"}}}"#;
        let manifest = parse(content).unwrap();
        assert_eq!(manifest.dependencies.len(), 1);
        assert_eq!(manifest.dependencies[0].name, "good");
    }

    #[test]
    fn test_parse_empty_object() {
        assert!(parse("{}").unwrap().dependencies.is_empty());
    }

    #[test]
    fn test_parse_invalid_json() {
        let err = parse("not json").unwrap_err();
        assert!(matches!(err, ManifestError::JsonParseError { .. }));
    }

    #[test]
    fn test_in_classes() {
        let content = r#"{
            "dependencies": {"react-select": "^3.0.4"},
            "devDependencies": {"react-test-renderer": "^18.2.0"}
        }"#;
        let manifest = parse(content).unwrap();
        assert_eq!(manifest.in_classes(&[DependencyClass::Direct]).count(), 1);
        assert_eq!(
            manifest
                .in_classes(&[DependencyClass::Direct, DependencyClass::Dev])
                .count(),
            2
        );
    }

    #[test]
    fn test_declared_versions_first_section_wins() {
        let content = r#"{
            "dependencies": {"final-form": "^4.20.0"},
            "devDependencies": {"final-form": "^4.21.0"}
        }"#;
        let declared = parse(content).unwrap().declared_versions();
        assert_eq!(declared.get("final-form").map(String::as_str), Some("^4.20.0"));
    }

    #[test]
    fn test_read_manifest_from_directory() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(PACKAGE_JSON),
            r#"{"dependencies": {"react": "^18.2.0"}}"#,
        )
        .unwrap();

        let manifest = read_manifest(dir.path()).unwrap();
        assert_eq!(manifest.path, dir.path().join(PACKAGE_JSON));
        assert_eq!(manifest.dependencies.len(), 1);

        let from_file = read_manifest(&dir.path().join(PACKAGE_JSON)).unwrap();
        assert_eq!(from_file, manifest);
    }

    #[test]
    fn test_read_manifest_not_found() {
        let dir = TempDir::new().unwrap();
        let err = read_manifest(dir.path()).unwrap_err();
        assert!(matches!(err, ManifestError::NotFound { .. }));
    }
}
