//! Aggregation of selections into a manifest write plan

use crate::domain::{
    CompanionUpgrade, DependencyClass, DependencyRecord, MainUpgrade, UpgradeAction, UpgradePlan,
    UpgradeSelection,
};
use std::collections::{HashMap, HashSet};

/// Build the write plan for `selections`
///
/// Records are matched to selections by package name and section. Each
/// (name, section) pair appears at most once among main upgrades: a later
/// selection replaces the version of an earlier one and keeps its position.
/// Companions appear once per name.
pub fn build_plan(selections: &[UpgradeSelection], records: &[DependencyRecord]) -> UpgradePlan {
    let mut positions: HashMap<(&str, DependencyClass), usize> = HashMap::new();
    let mut main_upgrades: Vec<MainUpgrade> = Vec::new();

    for selection in selections.iter().filter(|s| !s.is_skip()) {
        let Some(version) = selection.target_version.as_ref() else {
            continue;
        };
        let Some(record) = find_record(records, selection) else {
            continue;
        };
        let upgrade = MainUpgrade::new(&record.name, version, record.dependency_class);
        let key = (record.name.as_str(), record.dependency_class);
        match positions.get(&key) {
            Some(&index) => main_upgrades[index] = upgrade,
            None => {
                positions.insert(key, main_upgrades.len());
                main_upgrades.push(upgrade);
            }
        }
    }

    UpgradePlan {
        main_upgrades,
        companion_upgrades: collect_companions(selections, records),
    }
}

/// Companion upgrades of every non-skip selection, first occurrence wins
pub fn collect_companions(
    selections: &[UpgradeSelection],
    records: &[DependencyRecord],
) -> Vec<CompanionUpgrade> {
    let mut seen = HashSet::new();
    let mut companions = Vec::new();

    for selection in selections.iter().filter(|s| !s.is_skip()) {
        let Some(record) = find_record(records, selection) else {
            continue;
        };
        let required = match selection.action {
            UpgradeAction::NearestCompatible => &record.required_upgrades_for_nearest,
            _ => &record.required_upgrades_for_latest,
        };
        for companion in required {
            if seen.insert(companion.name.as_str()) {
                companions.push(companion.clone());
            }
        }
    }

    companions
}

fn find_record<'a>(
    records: &'a [DependencyRecord],
    selection: &UpgradeSelection,
) -> Option<&'a DependencyRecord> {
    records.iter().find(|r| {
        r.name == selection.package_name && r.dependency_class == selection.dependency_class
    })
}
