use super::InstallationRecord;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Failures reading or writing the on-disk index
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("Index file not found at {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to read index {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("Failed to parse index {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Error writing output to {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Sort records the way the index persists them: name, version, install time
pub fn sort_records(records: &mut [InstallationRecord]) {
    records.sort_by(|a, b| {
        (a.name.as_str(), a.version.as_str(), a.install_epoch).cmp(&(
            b.name.as_str(),
            b.version.as_str(),
            b.install_epoch,
        ))
    });
}

/// Render records as a pretty JSON array with keys in sorted order
pub fn to_index_json<R: Serialize>(records: &[R]) -> Result<String, serde_json::Error> {
    // serde_json's default map is ordered, so going through Value sorts the keys
    let value = serde_json::to_value(records)?;
    serde_json::to_string_pretty(&value)
}

/// Sort and write the full index, replacing any previous file
pub fn write_index(path: &Path, records: &mut [InstallationRecord]) -> Result<(), IndexError> {
    sort_records(records);

    let json = to_index_json(&*records).map_err(|e| IndexError::Write {
        path: path.to_path_buf(),
        source: io::Error::new(io::ErrorKind::InvalidData, e),
    })?;

    fs::write(path, json).map_err(|source| IndexError::Write {
        path: path.to_path_buf(),
        source,
    })
}

pub fn read_index(path: &Path) -> Result<Vec<InstallationRecord>, IndexError> {
    if !path.is_file() {
        return Err(IndexError::NotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path).map_err(|source| IndexError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| IndexError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
