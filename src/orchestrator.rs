//! Run orchestrator coordinating the whole workflow
//!
//! This module provides:
//! - Workflow coordination: read → resolve target → analyze → report → fix → install
//! - Interactive and policy-driven upgrade selection
//! - Exit code derivation from the run outcome

use crate::cli::CliArgs;
use crate::compat::{is_react_core, is_react_related, resolve_target_version, DependencyAnalyzer};
use crate::domain::{AnalysisResult, DependencyClass, DependencyRecord, UpgradeAction, UpgradeSelection};
use crate::error::AppError;
use crate::interaction::Prompter;
use crate::manifest::{manifest_path, read_manifest, ManifestWriter, WriteResult};
use crate::output::{create_formatter, OutputConfig};
use crate::package_manager::{detect_installer, InstallOutput, InstallResult, InstallerRunner};
use crate::progress::Progress;
use crate::registry::{create_adapter, HttpClient, MetadataCache, RegistryAdapter};
use crate::upgrade::{build_plan, select, select_with};
use colored::Colorize;
use futures::future::join_all;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Exit code when nothing incompatible is left
pub const EXIT_OK: u8 = 0;
/// Exit code when incompatible packages remain unresolved
pub const EXIT_INCOMPATIBLE: u8 = 1;
/// Exit code for runtime, network, file, input and installer errors
pub const EXIT_ERROR: u8 = 2;

/// Orchestrator for one reactup run
pub struct Orchestrator {
    args: CliArgs,
    adapter: Arc<dyn RegistryAdapter>,
    /// Prompt on the terminal instead of applying the fix policy
    interactive: bool,
    show_progress: bool,
    color: bool,
}

/// Result of running the orchestrator
#[derive(Debug)]
pub struct RunOutcome {
    pub analysis: AnalysisResult,
    /// One selection per incompatible record
    pub selections: Vec<UpgradeSelection>,
    /// Present when a non-empty plan was applied
    pub write_result: Option<WriteResult>,
    /// Present when the installer ran successfully
    pub install_result: Option<InstallResult>,
}

impl RunOutcome {
    /// Incompatible records not rewritten to a compatible version
    ///
    /// A record counts as resolved only when the value finally written into
    /// its own section is `^` followed by a version supporting the target.
    pub fn unresolved(&self) -> Vec<&DependencyRecord> {
        self.analysis
            .dependencies
            .iter()
            .filter(|r| r.status.is_incompatible())
            .filter(|r| !self.is_resolved(r))
            .collect()
    }

    fn is_resolved(&self, record: &DependencyRecord) -> bool {
        self.write_result
            .as_ref()
            .and_then(|w| w.written_value(&record.name, record.dependency_class))
            .and_then(|value| value.strip_prefix('^'))
            .is_some_and(|version| record.is_compatible_target(version))
    }

    pub fn exit_code(&self) -> u8 {
        if self.unresolved().is_empty() {
            EXIT_OK
        } else {
            EXIT_INCOMPATIBLE
        }
    }
}

impl Orchestrator {
    /// Create an orchestrator talking to the npm registry
    ///
    /// Prompts are enabled when stdin is a terminal, output is text and no
    /// `--fix` policy was given.
    pub fn new(args: CliArgs) -> Result<Self, AppError> {
        let client = HttpClient::new()?;
        let interactive = io::stdin().is_terminal() && !args.json && args.fix.is_none();
        let show_progress = !args.json;
        Ok(Self {
            args,
            adapter: Arc::new(create_adapter(client)),
            interactive,
            show_progress,
            color: io::stdout().is_terminal(),
        })
    }

    /// Create a non-interactive orchestrator over a custom adapter (for testing)
    pub fn with_adapter(args: CliArgs, adapter: Arc<dyn RegistryAdapter>) -> Self {
        Self {
            args,
            adapter,
            interactive: false,
            show_progress: false,
            color: false,
        }
    }

    /// Run with the terminal for prompts and stdout for the report
    pub async fn run(&self, runner: &dyn InstallerRunner) -> Result<RunOutcome, AppError> {
        let mut stdout = io::stdout();
        if self.interactive {
            let mut prompter = Prompter::stdio();
            self.run_with(Some(&mut prompter), &mut stdout, runner).await
        } else {
            self.run_with(None::<&mut Prompter<io::Empty, io::Sink>>, &mut stdout, runner)
                .await
        }
    }

    /// Run the workflow, prompting through `prompter` when given
    pub async fn run_with<R: BufRead, W: Write>(
        &self,
        mut prompter: Option<&mut Prompter<R, W>>,
        out: &mut dyn Write,
        runner: &dyn InstallerRunner,
    ) -> Result<RunOutcome, AppError> {
        self.args.validate()?;

        // Step 1: Read the manifest before any network access
        let manifest = read_manifest(&self.args.path)?;
        debug!(path = %manifest.path.display(), dependencies = manifest.dependencies.len(), "read manifest");

        // Step 2: Resolve the target React version
        let cache = MetadataCache::new(self.adapter.clone());
        let mut progress = Progress::new(self.show_progress);
        progress.spinner("Fetching React versions...");
        let react = cache.get("react").await;
        progress.finish_and_clear();
        let react = react?;

        let input = match (&self.args.react, prompter.as_deref_mut()) {
            (Some(version), _) => version.clone(),
            (None, Some(prompter)) => {
                let default = react.latest_stable().unwrap_or_else(|| "latest".to_string());
                prompter.ask_target_version(&default)?
            }
            (None, None) => "latest".to_string(),
        };
        let target = resolve_target_version(&react, &input)?;
        debug!(input = %input, %target, "resolved target React version");
        if self.args.verbose && !self.args.json {
            eprintln!("Target React version: {}", target);
            if let Some(range) = manifest.react_range() {
                eprintln!("Declared react: {}", range);
            }
        }

        // Step 3: Analyze the declared dependencies
        let classes = self.args.dependency_classes();
        let candidates: Vec<(String, String, DependencyClass)> = manifest
            .in_classes(&classes)
            .filter(|d| !is_react_core(&d.name))
            .map(|d| (d.name.clone(), d.range.clone(), d.class))
            .collect();
        let declared = manifest.declared_versions();
        let analyzer = DependencyAnalyzer::new(&cache, &target, &declared);

        progress.start(candidates.len() as u64, "Analyzing dependencies");
        let (analyzer, bar) = (&analyzer, &progress);
        let records = join_all(candidates.iter().map(|(name, range, class)| async move {
            let record = analyzer.analyze(name, range, *class).await;
            bar.inc();
            record
        }))
        .await;
        progress.finish_and_clear();

        let records: Vec<DependencyRecord> = records
            .into_iter()
            .filter(|r| is_react_related(&r.name, r.has_peer_range()))
            .collect();
        let analysis = AnalysisResult::new(target, records);

        // Step 4: Report
        let mut config = OutputConfig::from_cli(self.args.json, self.args.verbose);
        config.color = self.color;
        create_formatter(config).format(&analysis, out)?;
        out.flush()?;

        // Step 5: Select upgrades
        let incompatible = analysis.incompatible();
        let selections = match prompter.as_deref_mut() {
            Some(prompter) if !incompatible.is_empty() => choose_interactively(prompter, &incompatible)?,
            _ => select(&incompatible, self.args.fix_policy()),
        };

        let plan = build_plan(&selections, &incompatible);
        if plan.is_empty() {
            return Ok(RunOutcome {
                analysis,
                selections,
                write_result: None,
                install_result: None,
            });
        }

        let include_companions = match prompter.as_deref_mut() {
            _ if self.args.with_companions => true,
            Some(prompter) if plan.has_companions() => {
                prompter.confirm_companions(&plan.companion_upgrades)?
            }
            _ => false,
        };

        // Step 6: Write the manifest
        let writer = ManifestWriter::new(&self.args.path);
        let write_result = writer.apply_plan(&plan, include_companions)?;
        self.report_write(&write_result);

        // Step 7: Install
        let install_result = if write_result.file_modified && !self.args.no_install {
            let dir = project_dir(&self.args.path);
            let installer = detect_installer(&dir);
            debug!(%installer, dir = %dir.display(), "running install");
            if !self.args.json {
                eprintln!("Running {}...", installer.install_command().join(" "));
            }
            let output = InstallOutput::for_report(self.args.json);
            Some(runner.run_install(installer, &dir, output)?.ensure_success()?)
        } else {
            None
        };

        Ok(RunOutcome {
            analysis,
            selections,
            write_result: Some(write_result),
            install_result,
        })
    }

    fn report_write(&self, result: &WriteResult) {
        for error in &result.errors {
            eprintln!("{} {}", "warning:".yellow().bold(), error);
        }
        if result.file_modified && !self.args.json {
            let edits: Vec<String> = result
                .applied
                .iter()
                .map(|edit| format!("{}@{}", edit.name, edit.value))
                .collect();
            eprintln!(
                "{} {} ({})",
                "Updated".green().bold(),
                result.path.display(),
                edits.join(", ")
            );
        }
    }
}

fn choose_interactively<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    incompatible: &[DependencyRecord],
) -> Result<Vec<UpgradeSelection>, AppError> {
    let mut failure = None;
    let selections = select_with(incompatible, |record, actions| {
        if failure.is_some() {
            return UpgradeAction::Skip;
        }
        prompter.choose_action(record, actions).unwrap_or_else(|e| {
            failure = Some(e);
            UpgradeAction::Skip
        })
    });
    match failure {
        Some(e) => Err(e.into()),
        None => Ok(selections),
    }
}

/// Directory holding the manifest, where the installer runs
fn project_dir(path: &Path) -> PathBuf {
    manifest_path(path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}
