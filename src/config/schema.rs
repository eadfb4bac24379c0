use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,

    /// Extra tap -> `owner/repo` mappings for history lookups
    #[serde(default)]
    pub taps: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    /// Concurrent history fetches
    #[serde(default = "default_max_parallel")]
    pub max_parallel: usize,

    /// `git log --since` window for the availability scan
    #[serde(default = "default_available_since")]
    pub available_since: String,

    /// Index file name under the Homebrew repository
    #[serde(default = "default_index_file")]
    pub index_file: String,
}

fn default_max_parallel() -> usize {
    5
}

fn default_available_since() -> String {
    "1 year ago".to_string()
}

fn default_index_file() -> String {
    "installs_index.json".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_parallel: default_max_parallel(),
            available_since: default_available_since(),
            index_file: default_index_file(),
        }
    }
}
