//! Manifest reading and writing
//!
//! This module provides functionality to:
//! - Read the dependency sections of package.json
//! - Apply an upgrade plan with format-preserving, section-scoped edits

mod package_json;
mod writer;

pub use package_json::{
    manifest_path, read_manifest, DeclaredDependency, PackageManifest, PACKAGE_JSON,
};
pub use writer::{
    read_manifest_content, update_section_version, write_manifest, AppliedEdit, ManifestWriter,
    WriteResult,
};
