use super::{InstallationRecord, PackageKind};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

const RECEIPT_FILE: &str = "INSTALL_RECEIPT.json";
const CASK_METADATA_DIR: &str = ".metadata";

#[derive(Debug, Default, Deserialize)]
struct Receipt {
    #[serde(default)]
    formula: Option<ReceiptFormula>,
}

#[derive(Debug, Default, Deserialize)]
struct ReceiptFormula {
    #[serde(default)]
    name: Option<String>,
}

/// Scan `<cellar>/<formula>/<version>/INSTALL_RECEIPT.json` receipts
pub fn scan_cellar(cellar: &Path) -> Vec<InstallationRecord> {
    if !cellar.is_dir() {
        log::warn!("Cellar not found: {}", cellar.display());
        return Vec::new();
    }

    let mut receipts = Vec::new();
    collect_receipts(cellar, &mut receipts);
    receipts.sort();

    receipts
        .iter()
        .filter_map(|receipt| match receipt_record(receipt) {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!("Skipping {}: {:#}", receipt.display(), e);
                None
            }
        })
        .collect()
}

/// Scan `<caskroom>/<cask>/<version>/` directories
pub fn scan_caskroom(caskroom: &Path) -> Vec<InstallationRecord> {
    if !caskroom.is_dir() {
        log::warn!("Caskroom not found: {}", caskroom.display());
        return Vec::new();
    }

    let cask_dirs = match sorted_dirs(caskroom) {
        Ok(dirs) => dirs,
        Err(e) => {
            log::warn!("Failed to read caskroom {}: {:#}", caskroom.display(), e);
            return Vec::new();
        }
    };

    let mut records = Vec::new();

    for cask_dir in cask_dirs {
        let version_dirs = match sorted_dirs(&cask_dir) {
            Ok(dirs) => dirs,
            Err(e) => {
                log::warn!("Skipping {}: {:#}", cask_dir.display(), e);
                continue;
            }
        };

        for version_dir in version_dirs {
            if file_name(&version_dir) == CASK_METADATA_DIR {
                continue;
            }

            match cask_record(&cask_dir, &version_dir) {
                Ok(record) => records.push(record),
                Err(e) => log::warn!("Skipping {}: {:#}", version_dir.display(), e),
            }
        }
    }

    records
}

fn collect_receipts(dir: &Path, found: &mut Vec<PathBuf>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("Failed to read {}: {}", dir.display(), e);
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        // Don't follow symlinked directories (e.g. `opt` style links)
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);

        if is_dir {
            collect_receipts(&path, found);
        } else if entry.file_name() == RECEIPT_FILE {
            found.push(path);
        }
    }
}

fn receipt_record(receipt: &Path) -> Result<InstallationRecord> {
    let version_dir = receipt
        .parent()
        .context("Receipt has no version directory")?;
    let formula_dir = version_dir
        .parent()
        .context("Receipt has no formula directory")?;

    let version = file_name(version_dir);
    let mut name = file_name(formula_dir);

    if let Some(receipt_name) = receipt_formula_name(receipt) {
        name = receipt_name;
    }

    let epoch = mtime_epoch(receipt)?;

    Ok(InstallationRecord::installed(
        name,
        version,
        receipt.display().to_string(),
        epoch,
        PackageKind::Package,
    ))
}

/// The canonical name embedded in a receipt, if it can be read
fn receipt_formula_name(receipt: &Path) -> Option<String> {
    let content = fs::read_to_string(receipt).ok()?;
    let parsed: Receipt = match serde_json::from_str(&content) {
        Ok(parsed) => parsed,
        Err(e) => {
            log::debug!("Unparsable receipt {}: {}", receipt.display(), e);
            return None;
        }
    };

    parsed
        .formula
        .and_then(|f| f.name)
        .filter(|name| !name.is_empty())
}

fn cask_record(cask_dir: &Path, version_dir: &Path) -> Result<InstallationRecord> {
    let epoch = mtime_epoch(version_dir)?;

    Ok(InstallationRecord::installed(
        file_name(cask_dir),
        file_name(version_dir),
        version_dir.display().to_string(),
        epoch,
        PackageKind::Cask,
    ))
}

fn sorted_dirs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("Failed to read {}", dir.display()))?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();
    Ok(dirs)
}

fn mtime_epoch(path: &Path) -> Result<i64> {
    let modified = fs::metadata(path)
        .and_then(|m| m.modified())
        .with_context(|| format!("Failed to stat {}", path.display()))?;

    let epoch = match modified.duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_secs() as i64,
        Err(e) => -(e.duration().as_secs() as i64),
    };

    Ok(epoch)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::time::{Duration, SystemTime};
    use tempfile::tempdir;

    fn write_receipt(cellar: &Path, name: &str, version: &str, body: &str, epoch: u64) {
        let dir = cellar.join(name).join(version);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(RECEIPT_FILE);
        fs::write(&path, body).unwrap();
        File::options()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(epoch))
            .unwrap();
    }

    #[test]
    fn cellar_scan_uses_receipt_mtime_and_dirs() {
        let tmp = tempdir().unwrap();
        write_receipt(tmp.path(), "wget", "1.21.4", "{}", 1_700_000_000);
        write_receipt(tmp.path(), "jq", "1.7", "{}", 1_600_000_000);

        let records = scan_cellar(tmp.path());

        assert_eq!(records.len(), 2);
        let jq = records.iter().find(|r| r.name == "jq").unwrap();
        assert_eq!(jq.version, "1.7");
        assert_eq!(jq.install_epoch, 1_600_000_000);
        assert_eq!(jq.kind, PackageKind::Package);
        assert!(jq.install_path.ends_with("jq/1.7/INSTALL_RECEIPT.json"));
        assert_eq!(jq.install_time, crate::utils::format_local_iso(1_600_000_000));
    }

    #[test]
    fn receipt_name_overrides_directory_name() {
        let tmp = tempdir().unwrap();
        write_receipt(
            tmp.path(),
            "python@3.12",
            "3.12.1",
            r#"{"formula": {"name": "python-canonical"}}"#,
            1_700_000_000,
        );

        let records = scan_cellar(tmp.path());

        assert_eq!(records[0].name, "python-canonical");
        assert_eq!(records[0].version, "3.12.1");
    }

    #[test]
    fn malformed_receipt_keeps_directory_name() {
        let tmp = tempdir().unwrap();
        write_receipt(tmp.path(), "git", "2.43.0", "{not json", 1_700_000_000);

        let records = scan_cellar(tmp.path());

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "git");
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_receipt_is_skipped_and_scan_continues() {
        let tmp = tempdir().unwrap();
        write_receipt(tmp.path(), "jq", "1.7", "{}", 1_600_000_000);
        write_receipt(tmp.path(), "wget", "1.24", "{}", 1_700_000_000);
        let broken = tmp.path().join("ghost/0.1");
        fs::create_dir_all(&broken).unwrap();
        std::os::unix::fs::symlink(tmp.path().join("gone.json"), broken.join(RECEIPT_FILE)).unwrap();

        let records = scan_cellar(tmp.path());

        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["jq", "wget"]);
    }

    #[test]
    fn caskroom_scan_skips_metadata_and_files() {
        let tmp = tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("firefox/120.0")).unwrap();
        fs::create_dir_all(tmp.path().join("firefox/.metadata")).unwrap();
        fs::write(tmp.path().join("firefox/stray.txt"), "").unwrap();
        fs::write(tmp.path().join("not-a-cask"), "").unwrap();

        let records = scan_caskroom(tmp.path());

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "firefox");
        assert_eq!(records[0].version, "120.0");
        assert_eq!(records[0].kind, PackageKind::Cask);
        assert!(records[0].install_epoch > 0);
    }

    #[test]
    fn missing_roots_yield_nothing() {
        let tmp = tempdir().unwrap();
        assert!(scan_cellar(&tmp.path().join("nope")).is_empty());
        assert!(scan_caskroom(&tmp.path().join("nope")).is_empty());
    }
}
