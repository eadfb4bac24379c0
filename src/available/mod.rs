//! "What's new" feed: packages recently added to local tap checkouts that
//! are not installed here.

use crate::clients::AdditionLog;
use crate::index::{InstallStatus, InstallationRecord, PackageKind};
use crate::utils::parse_epoch;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Tap subdirectories holding package definitions
const DEFINITION_DIRS: &[&str] = &["Formula", "Casks"];

const DATE_PREFIX: &str = "DT:";

/// Most recent addition of a definition file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Addition {
    pub date: String,
    pub kind: PackageKind,
}

/// Fold `DT:<date>` / `<path>` log output into `additions`.
///
/// The log is newest first, so the first date seen for a name is kept.
pub fn parse_additions(log: &str, additions: &mut BTreeMap<String, Addition>) {
    let mut current_date: Option<&str> = None;

    for line in log.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(date) = line.strip_prefix(DATE_PREFIX) {
            current_date = Some(date);
            continue;
        }

        let Some(date) = current_date else {
            continue;
        };

        let path = Path::new(line);
        let Some(name) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
            continue;
        };

        let kind = if path.starts_with("Casks") {
            PackageKind::Cask
        } else {
            PackageKind::Package
        };

        additions.entry(name).or_insert_with(|| Addition {
            date: date.to_string(),
            kind,
        });
    }
}

/// Git checkouts under `<taps>/<user>/<tap>`
pub fn tap_repos(taps_dir: &Path) -> Vec<PathBuf> {
    let mut repos = Vec::new();

    let Ok(users) = fs::read_dir(taps_dir) else {
        log::warn!("Taps directory not found: {}", taps_dir.display());
        return repos;
    };

    for user in users.flatten().map(|e| e.path()).filter(|p| p.is_dir()) {
        let Ok(taps) = fs::read_dir(&user) else {
            continue;
        };
        repos.extend(
            taps.flatten()
                .map(|e| e.path())
                .filter(|p| p.is_dir() && p.join(".git").exists()),
        );
    }

    repos.sort();
    repos
}

/// Scan every tap checkout for definitions added since `since`.
///
/// A tap whose log cannot be read is skipped.
pub fn scan_taps(log: &dyn AdditionLog, taps_dir: &Path, since: &str) -> BTreeMap<String, Addition> {
    let mut additions = BTreeMap::new();

    for repo in tap_repos(taps_dir) {
        let paths: Vec<String> = DEFINITION_DIRS
            .iter()
            .filter(|dir| repo.join(dir).is_dir())
            .map(|dir| format!("{}/", dir))
            .collect();

        if paths.is_empty() {
            continue;
        }

        let paths: Vec<&str> = paths.iter().map(String::as_str).collect();

        match log.added_files(&repo, &paths, since) {
            Ok(output) => parse_additions(&output, &mut additions),
            Err(e) => log::warn!("Failed to scan tap {}: {:#}", repo.display(), e),
        }
    }

    additions
}

/// Synthetic records for additions whose name is not installed.
///
/// An addition with an unparsable date is dropped.
pub fn available_records(
    additions: &BTreeMap<String, Addition>,
    installed: &[InstallationRecord],
) -> Vec<InstallationRecord> {
    let installed_names: HashSet<&str> = installed.iter().map(|r| r.name.as_str()).collect();

    additions
        .iter()
        .filter(|(name, _)| !installed_names.contains(name.as_str()))
        .filter_map(|(name, addition)| {
            let Some(epoch) = parse_epoch(&addition.date) else {
                log::debug!("Dropping {}: bad date {:?}", name, addition.date);
                return None;
            };

            Some(InstallationRecord {
                name: name.clone(),
                version: "N/A".to_string(),
                install_path: String::new(),
                install_time: addition.date.clone(),
                install_epoch: epoch,
                kind: addition.kind,
                first_installed: true,
                first_installed_epoch: epoch,
                first_installed_time: addition.date.clone(),
                repo_first_commit_date: Some(addition.date.clone()),
                status: InstallStatus::Available,
            })
        })
        .collect()
}
