//! Maps a fix policy or explicit choices to per-package selections

use crate::domain::{DependencyRecord, FixPolicy, UpgradeAction, UpgradeSelection, UNKNOWN_VERSION};

/// Select an upgrade for every record according to `policy`, keeping order
pub fn select(records: &[DependencyRecord], policy: FixPolicy) -> Vec<UpgradeSelection> {
    select_with(records, |record, _| match policy {
        FixPolicy::None => UpgradeAction::Skip,
        FixPolicy::Nearest if record.nearest_compatible_version.is_some() => {
            UpgradeAction::NearestCompatible
        }
        FixPolicy::Nearest | FixPolicy::Latest => UpgradeAction::Latest,
    })
}

/// Select an upgrade for every record by asking `chooser`
///
/// The chooser receives the record and the actions available for it. An
/// unavailable nearest choice falls back to latest.
pub fn select_with<F>(records: &[DependencyRecord], mut chooser: F) -> Vec<UpgradeSelection>
where
    F: FnMut(&DependencyRecord, &[UpgradeAction]) -> UpgradeAction,
{
    records
        .iter()
        .map(|record| {
            let actions = available_actions(record);
            selection_for(record, chooser(record, &actions))
        })
        .collect()
}

/// Actions a user may pick for `record`, most conservative upgrade first
pub fn available_actions(record: &DependencyRecord) -> Vec<UpgradeAction> {
    let mut actions = Vec::with_capacity(3);
    if record.nearest_compatible_version.is_some() {
        actions.push(UpgradeAction::NearestCompatible);
    }
    if has_known_latest(record) {
        actions.push(UpgradeAction::Latest);
    }
    actions.push(UpgradeAction::Skip);
    actions
}

fn has_known_latest(record: &DependencyRecord) -> bool {
    record.latest_version != UNKNOWN_VERSION
}

fn selection_for(record: &DependencyRecord, action: UpgradeAction) -> UpgradeSelection {
    let selection = match (action, &record.nearest_compatible_version) {
        (UpgradeAction::Skip, _) => UpgradeSelection::skip(&record.name),
        (UpgradeAction::NearestCompatible, Some(nearest)) => {
            UpgradeSelection::nearest(&record.name, nearest)
        }
        // A version literally named "unknown" cannot be written
        _ if !has_known_latest(record) => UpgradeSelection::skip(&record.name),
        _ => UpgradeSelection::latest(&record.name, &record.latest_version),
    };
    selection.in_class(record.dependency_class)
}
