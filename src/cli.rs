//! CLI argument parsing module for reactup

use crate::domain::{DependencyClass, FixPolicy};
use crate::error::ConfigError;
use clap::Parser;
use std::path::PathBuf;

fn parse_fix_policy(s: &str) -> Result<FixPolicy, String> {
    s.parse()
}

/// React upgrade compatibility checker
#[derive(Parser, Debug, Clone)]
#[command(
    name = "reactup",
    version,
    about = "Check package.json dependencies against a React version and fix incompatible ones"
)]
pub struct CliArgs {
    /// Project directory or package.json path (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Target React version: `latest`, an exact version, a major or a major.minor
    #[arg(long = "react", value_name = "VERSION")]
    pub react: Option<String>,

    /// Also analyze devDependencies
    #[arg(long)]
    pub include_dev: bool,

    /// Also analyze optionalDependencies
    #[arg(long)]
    pub include_optional: bool,

    /// Output results in JSON format (requires --react)
    #[arg(long)]
    pub json: bool,

    /// Apply upgrades without prompting: none, nearest or latest
    #[arg(long, value_name = "POLICY", value_parser = parse_fix_policy)]
    pub fix: Option<FixPolicy>,

    /// Also write companion upgrades required by the chosen versions
    #[arg(long)]
    pub with_companions: bool,

    /// Do not run the package manager after writing package.json
    #[arg(long)]
    pub no_install: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,
}

impl CliArgs {
    /// Fix policy in effect; `none` when not given
    pub fn fix_policy(&self) -> FixPolicy {
        self.fix.unwrap_or_default()
    }

    /// Manifest sections to analyze
    pub fn dependency_classes(&self) -> Vec<DependencyClass> {
        let mut classes = vec![DependencyClass::Direct];
        if self.include_dev {
            classes.push(DependencyClass::Dev);
        }
        if self.include_optional {
            classes.push(DependencyClass::Optional);
        }
        classes
    }

    /// Reject option combinations that cannot run
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.json && self.react.is_none() {
            return Err(ConfigError::conflicting_options(
                "--json requires --react <VERSION>",
            ));
        }
        Ok(())
    }
}
