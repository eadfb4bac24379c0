use anyhow::{Context, Result};
use std::path::PathBuf;
use std::process::Command;

/// Wrapper over the `brew` CLI
pub struct Brew;

impl Brew {
    pub fn new() -> Self {
        Self
    }

    /// Create brew command with HOMEBREW_NO_AUTO_UPDATE=1
    fn brew_command(&self) -> Command {
        let mut cmd = Command::new("brew");
        cmd.env("HOMEBREW_NO_AUTO_UPDATE", "1");
        cmd
    }

    fn stdout(&self, args: &[&str]) -> Result<String> {
        log::debug!("Executing: brew {}", args.join(" "));

        let output = self
            .brew_command()
            .args(args)
            .output()
            .with_context(|| format!("Failed to run brew {}", args.join(" ")))?;

        if !output.status.success() {
            anyhow::bail!("brew {} failed", args.join(" "));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn path(&self, flag: &str) -> Result<PathBuf> {
        let out = self.stdout(&[flag])?;
        if out.is_empty() {
            anyhow::bail!("brew {} printed nothing", flag);
        }
        Ok(PathBuf::from(out))
    }

    /// Homebrew repository root, falling back to ~/.homebrew
    pub fn repository(&self) -> PathBuf {
        match self.path("--repository") {
            Ok(path) => path,
            Err(e) => {
                log::debug!("{:#}", e);
                dirs::home_dir()
                    .unwrap_or_default()
                    .join(".homebrew")
            }
        }
    }

    pub fn cellar(&self) -> Result<PathBuf> {
        self.path("--cellar")
    }

    pub fn caskroom(&self) -> Result<PathBuf> {
        self.path("--caskroom")
    }

    /// `brew tap-info --json` for all taps
    pub fn tap_info_json(&self) -> Result<String> {
        self.stdout(&["tap-info", "--json"])
            .context("Failed to load tap info")
    }

    /// `brew info --json=v2 --installed`
    pub fn installed_info_json(&self) -> Result<String> {
        self.stdout(&["info", "--json=v2", "--installed"])
            .context("Failed to load installed info")
    }

    /// Stream `brew info <name>` to the terminal
    pub fn show_info(&self, name: &str) -> Result<()> {
        let status = self
            .brew_command()
            .args(["info", name])
            .status()
            .with_context(|| format!("Failed to run brew info {}", name))?;

        if !status.success() {
            anyhow::bail!("brew info {} failed", name);
        }

        Ok(())
    }
}
