//! Terminal prompts for the interactive fix flow
//!
//! Prompts read from any `BufRead` and write to any `Write`, so the flow can
//! be driven by scripted input in tests. End of input picks the
//! conservative answer (default target, skip, decline).

use crate::domain::{CompanionUpgrade, DependencyRecord, UpgradeAction};
use colored::Colorize;
use std::io::{self, BufRead, Write};

/// Prompts the user for target version, upgrade choices and companions
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl Prompter<io::StdinLock<'static>, io::Stdout> {
    /// Prompter over the process stdin and stdout
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Read one trimmed line; `None` at end of input
    fn read_answer(&mut self) -> io::Result<Option<String>> {
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Ask for the target React version; an empty answer keeps `default`
    pub fn ask_target_version(&mut self, default: &str) -> io::Result<String> {
        write!(
            self.output,
            "{} {} ",
            "Target React version".bold(),
            format!("[{}]:", default).dimmed()
        )?;
        match self.read_answer()? {
            Some(answer) if !answer.is_empty() => Ok(answer),
            _ => Ok(default.to_string()),
        }
    }

    /// Ask which action to take for an incompatible package
    ///
    /// Accepts the option number or its initial (`n`, `l`, `s`). An empty
    /// answer takes the first option.
    pub fn choose_action(
        &mut self,
        record: &DependencyRecord,
        actions: &[UpgradeAction],
    ) -> io::Result<UpgradeAction> {
        writeln!(
            self.output,
            "\n{} {} {}",
            record.name.white().bold(),
            record.installed_version.red(),
            format!("(supports React {})", record.declared_peer_range.as_deref().unwrap_or("?"))
                .dimmed()
        )?;
        for (index, action) in actions.iter().enumerate() {
            writeln!(self.output, "  {}) {}", index + 1, describe(record, *action))?;
        }

        loop {
            write!(self.output, "{}", "Choose an option: ".bold())?;
            let Some(answer) = self.read_answer()? else {
                return Ok(UpgradeAction::Skip);
            };

            if answer.is_empty() {
                return Ok(actions.first().copied().unwrap_or(UpgradeAction::Skip));
            }
            if let Some(action) = parse_choice(&answer, actions) {
                return Ok(action);
            }
            writeln!(
                self.output,
                "{}",
                format!("Please answer with a number between 1 and {}.", actions.len()).red()
            )?;
        }
    }

    /// Ask whether companion upgrades should be written too
    pub fn confirm_companions(&mut self, companions: &[CompanionUpgrade]) -> io::Result<bool> {
        if companions.is_empty() {
            return Ok(false);
        }

        writeln!(self.output, "\n{}", "The chosen versions also require:".bold())?;
        for companion in companions {
            writeln!(
                self.output,
                "  {} {} {} {}",
                companion.name.white().bold(),
                companion.current_version.red(),
                "→".dimmed(),
                companion.required_range.green()
            )?;
        }

        loop {
            write!(self.output, "{}", "Update these packages too? [y/N]: ".bold())?;
            let Some(answer) = self.read_answer()? else {
                return Ok(false);
            };
            match answer.to_lowercase().as_str() {
                "y" | "yes" => return Ok(true),
                "" | "n" | "no" => return Ok(false),
                _ => writeln!(self.output, "{}", "Please answer with y(es) or n(o).".red())?,
            }
        }
    }
}

fn describe(record: &DependencyRecord, action: UpgradeAction) -> String {
    match action {
        UpgradeAction::NearestCompatible => format!(
            "nearest compatible ({})",
            record.nearest_compatible_version.as_deref().unwrap_or("?")
        ),
        UpgradeAction::Latest => format!("latest ({})", record.latest_version),
        UpgradeAction::Skip => "skip".to_string(),
    }
}

fn parse_choice(answer: &str, actions: &[UpgradeAction]) -> Option<UpgradeAction> {
    if let Ok(number) = answer.parse::<usize>() {
        return number.checked_sub(1).and_then(|i| actions.get(i)).copied();
    }
    let wanted = match answer.to_lowercase().as_str() {
        "n" | "nearest" => UpgradeAction::NearestCompatible,
        "l" | "latest" => UpgradeAction::Latest,
        "s" | "skip" => UpgradeAction::Skip,
        _ => return None,
    };
    actions.contains(&wanted).then_some(wanted)
}
