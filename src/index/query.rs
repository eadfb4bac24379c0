use super::InstallationRecord;

const SECONDS_PER_DAY: i64 = 86_400;

/// Inclusive epoch window between `older_days` and `newer_days` ago
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub start: i64,
    pub end: i64,
}

impl DayWindow {
    /// `None` when a bound does not fit in epoch seconds
    pub fn days_ago(now: i64, older_days: i64, newer_days: i64) -> Option<Self> {
        let bound = |days: i64| days.checked_mul(SECONDS_PER_DAY).and_then(|secs| now.checked_sub(secs));

        Some(Self {
            start: bound(older_days)?,
            end: bound(newer_days)?,
        })
    }

    pub fn contains(&self, epoch: i64) -> bool {
        self.start <= epoch && epoch <= self.end
    }
}

/// First installs whose first-install epoch falls inside the window, in index order
pub fn first_installs_within<'a>(
    records: &'a [InstallationRecord],
    window: DayWindow,
) -> Vec<&'a InstallationRecord> {
    records
        .iter()
        .filter(|r| r.first_installed && window.contains(r.first_installed_epoch))
        .collect()
}
