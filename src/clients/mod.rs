pub mod brew;
pub mod gh;
pub mod git;

use anyhow::Result;
use std::path::Path;

/// Raw HTTP response from the hosted API: header block and body text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiResponse {
    pub headers: String,
    pub body: String,
}

/// Trait for the hosted API used to read commit history
pub trait ApiClient: Sync {
    /// GET an endpoint, keeping the response headers
    fn get_with_headers(&self, endpoint: &str) -> Result<ApiResponse>;

    /// GET an endpoint, body only
    fn get(&self, endpoint: &str) -> Result<String>;
}

/// Trait for reading file additions out of a repository's history
pub trait AdditionLog {
    /// Log output of `DT:<date>` lines each followed by the paths added in
    /// that commit, newest first
    fn added_files(&self, repo: &Path, paths: &[&str], since: &str) -> Result<String>;
}
