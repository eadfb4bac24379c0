//! First-commit history for installed packages.
//!
//! A package resolves to `(owner/repo, file)` through [`HistoryContext`],
//! then the commits API is asked for the oldest commit touching that file.

pub mod context;
pub mod fetcher;
pub mod pagination;

pub use context::*;
pub use fetcher::*;

use crate::index::InstallationRecord;
use std::collections::HashMap;

/// Set `repo_first_commit_date` on every record whose name has history
pub fn apply_history(records: &mut [InstallationRecord], history: &HashMap<String, String>) {
    for record in records.iter_mut() {
        if let Some(date) = history.get(&record.name) {
            record.repo_first_commit_date = Some(date.clone());
        }
    }
}
