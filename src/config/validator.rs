use super::Config;
use anyhow::Result;

/// Validate config for correctness
pub fn validate_config(config: &Config) -> Result<()> {
    if config.settings.max_parallel == 0 {
        anyhow::bail!("settings.max_parallel must be at least 1");
    }

    if config.settings.index_file.trim().is_empty() {
        anyhow::bail!("settings.index_file must not be empty");
    }

    validate_taps(config)?;

    Ok(())
}

/// Tap mappings must point at `owner/repo`
fn validate_taps(config: &Config) -> Result<()> {
    for (tap, repo) in &config.taps {
        let valid = matches!(
            repo.split_once('/'),
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/')
        );

        if !valid {
            anyhow::bail!("Tap '{}' must map to 'owner/repo', got '{}'", tap, repo);
        }
    }
    Ok(())
}
