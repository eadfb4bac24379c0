use super::AdditionLog;
use crate::utils;
use anyhow::Result;
use std::path::Path;

/// Repository history through the `git` CLI
pub struct GitCli;

impl GitCli {
    pub fn new() -> Self {
        Self
    }
}

impl AdditionLog for GitCli {
    fn added_files(&self, repo: &Path, paths: &[&str], since: &str) -> Result<String> {
        let repo = repo.display().to_string();
        let since = format!("--since={}", since);

        let mut args = vec![
            "-C",
            repo.as_str(),
            "log",
            "--diff-filter=A",
            "--name-only",
            "--format=DT:%aI",
            since.as_str(),
            "--",
        ];
        args.extend_from_slice(paths);

        utils::command_stdout("git", &args)
    }
}
