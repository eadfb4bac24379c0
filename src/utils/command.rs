use anyhow::{Context, Result};
use std::process::{Command, Output};

/// Execute a command and return output
pub fn execute_command(program: &str, args: &[&str]) -> Result<Output> {
    log::debug!("Executing: {} {}", program, args.join(" "));

    let output = Command::new(program)
        .args(args)
        .output()
        .with_context(|| format!("Failed to run {}", program))?;

    Ok(output)
}

/// Execute a command and return its trimmed stdout, failing on non-zero exit
pub fn command_stdout(program: &str, args: &[&str]) -> Result<String> {
    let output = execute_command(program, args)?;

    if !output.status.success() {
        anyhow::bail!(
            "{} {} failed: {}",
            program,
            args.join(" "),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Check if a command exists in PATH
pub fn command_exists(command: &str) -> bool {
    which::which(command).is_ok()
}
