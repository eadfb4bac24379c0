use super::Config;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Find config file in order of priority:
/// 1. Explicit --config flag path
/// 2. ./brewdex.toml (current directory)
/// 3. ~/.config/brewdex/brewdex.toml
/// 4. ~/.brewdex.toml
///
/// Unlike an explicit path, a missing discovered file is not an error.
pub fn find_config_file(explicit_path: Option<&Path>) -> Result<Option<PathBuf>> {
    // 1. Explicit path
    if let Some(path) = explicit_path {
        if path.exists() {
            return Ok(Some(path.to_path_buf()));
        }
        anyhow::bail!("Config file not found: {}", path.display());
    }

    // 2. Current directory
    let cwd_config = PathBuf::from("./brewdex.toml");
    if cwd_config.exists() {
        return Ok(Some(cwd_config));
    }

    // 3. ~/.config/brewdex/brewdex.toml
    if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join("brewdex/brewdex.toml");
        if config_path.exists() {
            return Ok(Some(config_path));
        }
    }

    // 4. ~/.brewdex.toml
    if let Some(home_dir) = dirs::home_dir() {
        let home_config = home_dir.join(".brewdex.toml");
        if home_config.exists() {
            return Ok(Some(home_config));
        }
    }

    Ok(None)
}

/// Load and parse config file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML config: {}", path.display()))?;

    Ok(config)
}

/// Load and validate config with automatic discovery, defaulting when none exists
pub fn load_config_auto(explicit_path: Option<&Path>) -> Result<Config> {
    let config = match find_config_file(explicit_path)? {
        Some(path) => {
            log::debug!("Using config {}", path.display());
            load_config(&path)?
        }
        None => Config::default(),
    };

    super::validate_config(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn explicit_missing_path_is_an_error() {
        let tmp = tempdir().unwrap();
        assert!(find_config_file(Some(tmp.path().join("nope.toml").as_path())).is_err());
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("brewdex.toml");
        fs::write(
            &path,
            "[settings]\nmax_parallel = 8\n\n[taps]\n\"me/tools\" = \"me/homebrew-tools\"\n",
        )
        .unwrap();

        let config = load_config_auto(Some(path.as_path())).unwrap();

        assert_eq!(config.settings.max_parallel, 8);
        assert_eq!(config.settings.available_since, "1 year ago");
        assert_eq!(config.settings.index_file, "installs_index.json");
        assert_eq!(config.taps["me/tools"], "me/homebrew-tools");
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("brewdex.toml");
        fs::write(&path, "[settings\n").unwrap();
        assert!(load_config(&path).is_err());
    }
}
