use super::{ApiClient, ApiResponse};
use crate::utils;
use anyhow::{Context, Result};

/// Hosted API access through the `gh` CLI, which owns authentication
pub struct GhApi;

impl GhApi {
    pub fn new() -> Self {
        Self
    }

    fn api(&self, args: &[&str]) -> Result<String> {
        let output = utils::execute_command("gh", args)?;

        if !output.status.success() {
            anyhow::bail!(
                "gh {} failed: {}",
                args.join(" "),
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        String::from_utf8(output.stdout).context("gh api returned non UTF-8 output")
    }
}

impl ApiClient for GhApi {
    fn get_with_headers(&self, endpoint: &str) -> Result<ApiResponse> {
        let raw = self.api(&["api", "-i", endpoint])?;
        Ok(split_response(&raw))
    }

    fn get(&self, endpoint: &str) -> Result<String> {
        self.api(&["api", endpoint])
    }
}

/// Split `gh api -i` output at the first blank line
pub fn split_response(raw: &str) -> ApiResponse {
    let raw = raw.replace("\r\n", "\n");

    match raw.split_once("\n\n") {
        Some((headers, body)) => ApiResponse {
            headers: headers.to_string(),
            body: body.to_string(),
        },
        None => ApiResponse {
            headers: raw,
            body: String::new(),
        },
    }
}
