//! Package manager integration for installing dependencies after a fix
//!
//! This module provides:
//! - Detection of the project's package manager from its lockfile
//! - Execution of the install command with the console attached

use crate::error::InstallError;
use std::fmt;
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

/// Node.js package managers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Installer {
    Npm,
    Yarn,
    Pnpm,
}

impl Installer {
    /// Executable name
    pub fn program(&self) -> &'static str {
        match self {
            Installer::Npm => "npm",
            Installer::Yarn => "yarn",
            Installer::Pnpm => "pnpm",
        }
    }

    /// Full install command line
    pub fn install_command(&self) -> Vec<&'static str> {
        vec![self.program(), "install"]
    }
}

impl fmt::Display for Installer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

/// Detect the package manager from lockfiles, defaulting to npm
pub fn detect_installer(working_dir: &Path) -> Installer {
    if working_dir.join("pnpm-lock.yaml").exists() {
        return Installer::Pnpm;
    }
    if working_dir.join("yarn.lock").exists() {
        return Installer::Yarn;
    }
    Installer::Npm
}

/// Where the installer's standard output goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InstallOutput {
    /// Share the terminal with reactup
    #[default]
    Inherit,
    /// Redirect to stderr, keeping stdout for a machine-readable report
    Stderr,
}

impl InstallOutput {
    /// Output mode for a run reporting text or JSON
    pub fn for_report(json: bool) -> Self {
        if json {
            InstallOutput::Stderr
        } else {
            InstallOutput::Inherit
        }
    }
}

/// Result of a package manager installation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallResult {
    /// The package manager used
    pub installer: Installer,
    /// The command that was executed
    pub command: String,
    /// Whether the command succeeded
    pub success: bool,
    /// Exit status as reported by the OS
    pub status: String,
}

impl InstallResult {
    /// Create a successful install result
    pub fn success(installer: Installer) -> Self {
        Self {
            installer,
            command: installer.install_command().join(" "),
            success: true,
            status: "exit status: 0".to_string(),
        }
    }

    /// Create a failed install result
    pub fn failure(installer: Installer, status: impl Into<String>) -> Self {
        Self {
            installer,
            command: installer.install_command().join(" "),
            success: false,
            status: status.into(),
        }
    }

    /// Turn a failed run into an error
    pub fn ensure_success(self) -> Result<Self, InstallError> {
        if self.success {
            Ok(self)
        } else {
            Err(InstallError::Failed {
                command: self.command,
                status: self.status,
            })
        }
    }
}

/// Trait for running package manager install commands
pub trait InstallerRunner {
    /// Run the install command of `installer` in `working_dir`
    fn run_install(
        &self,
        installer: Installer,
        working_dir: &Path,
        output: InstallOutput,
    ) -> Result<InstallResult, InstallError>;
}

/// Runner that executes real commands, inheriting stdin and stderr
#[derive(Debug, Default)]
pub struct SystemInstaller;

impl SystemInstaller {
    pub fn new() -> Self {
        Self
    }
}

impl InstallerRunner for SystemInstaller {
    fn run_install(
        &self,
        installer: Installer,
        working_dir: &Path,
        output: InstallOutput,
    ) -> Result<InstallResult, InstallError> {
        let parts = installer.install_command();
        let command = parts.join(" ");
        debug!(%command, dir = %working_dir.display(), ?output, "running installer");

        let mut child = Command::new(parts[0]);
        child.args(&parts[1..]).current_dir(working_dir);
        if output == InstallOutput::Stderr {
            child.stdout(Stdio::from(io::stderr()));
        }
        let status = child
            .status()
            .map_err(|source| InstallError::Spawn {
                command: command.clone(),
                source,
            })?;

        if status.success() {
            Ok(InstallResult::success(installer))
        } else {
            Ok(InstallResult::failure(installer, status.to_string()))
        }
    }
}
