use super::InstallationRecord;
use crate::utils::format_local_iso;
use std::collections::HashMap;

/// Fill in the first-install fields of every record.
///
/// Records sharing `(name, version)` all get the group's minimum epoch;
/// only the member(s) installed at that minimum are marked first.
/// Existing annotations are ignored, so re-running is a no-op.
pub fn resolve_first_installs(records: &mut [InstallationRecord]) {
    let mut min_epochs: HashMap<(String, String), i64> = HashMap::new();

    for record in records.iter() {
        min_epochs
            .entry((record.name.clone(), record.version.clone()))
            .and_modify(|min| *min = (*min).min(record.install_epoch))
            .or_insert(record.install_epoch);
    }

    for record in records.iter_mut() {
        let key = (record.name.clone(), record.version.clone());
        let Some(&min) = min_epochs.get(&key) else {
            continue;
        };

        record.first_installed_epoch = min;
        record.first_installed_time = format_local_iso(min);
        record.first_installed = record.install_epoch == min;
    }
}
