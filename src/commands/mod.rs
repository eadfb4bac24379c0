pub mod index;
pub mod query;

use crate::config::Config;
use std::path::{Path, PathBuf};

/// Explicit `--index` path, or the configured file under the brew repository
pub fn index_path(explicit: Option<&Path>, config: &Config, repository: &Path) -> PathBuf {
    match explicit {
        Some(path) => path.to_path_buf(),
        None => repository.join(&config.settings.index_file),
    }
}
