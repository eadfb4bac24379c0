use crate::clients::brew::Brew;
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Taps that may not be tapped locally but are still resolvable
const DEFAULT_TAPS: &[(&str, &str)] = &[
    ("homebrew/core", "Homebrew/homebrew-core"),
    ("homebrew/cask", "Homebrew/homebrew-cask"),
    ("homebrew/cask-fonts", "Homebrew/homebrew-cask-fonts"),
    ("homebrew/cask-versions", "Homebrew/homebrew-cask-versions"),
];

#[derive(Debug, Deserialize)]
struct TapInfo {
    name: Option<String>,
    remote: Option<String>,
}

/// Tap name -> `owner/repo` on GitHub
#[derive(Debug, Clone, Default)]
pub struct TapMapping {
    repos: HashMap<String, String>,
}

impl TapMapping {
    /// Defaults, then taps from `brew tap-info --json`, then explicit overrides
    pub fn build(tap_info_json: Option<&str>, overrides: &BTreeMap<String, String>) -> Self {
        let mut repos: HashMap<String, String> = DEFAULT_TAPS
            .iter()
            .map(|(tap, repo)| (tap.to_string(), repo.to_string()))
            .collect();

        if let Some(json) = tap_info_json {
            match serde_json::from_str::<Vec<TapInfo>>(json) {
                Ok(taps) => {
                    for tap in taps {
                        let (Some(name), Some(remote)) = (tap.name, tap.remote) else {
                            continue;
                        };
                        if let Some(repo) = github_repo_from_remote(&remote) {
                            repos.insert(name, repo);
                        }
                    }
                }
                Err(e) => log::warn!("Failed to parse tap info: {}", e),
            }
        }

        for (tap, repo) in overrides {
            repos.insert(tap.clone(), repo.clone());
        }

        Self { repos }
    }

    pub fn repo_for(&self, tap: &str) -> Option<&str> {
        self.repos.get(tap).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.repos.len()
    }
}

/// `owner/repo` from a GitHub remote URL (https or ssh form)
pub fn github_repo_from_remote(remote: &str) -> Option<String> {
    if !remote.contains("github.com") {
        return None;
    }

    let trimmed = remote.trim().trim_end_matches('/');
    let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);

    let mut parts = trimmed.rsplit(['/', ':']);
    let repo = parts.next().filter(|s| !s.is_empty())?;
    let owner = parts.next().filter(|s| !s.is_empty() && !s.contains("github.com"))?;

    Some(format!("{}/{}", owner, repo))
}

/// Where an installed formula or cask is defined
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    pub tap: Option<String>,
    pub source_path: Option<String>,
}

/// Installed names and aliases -> defining tap and file
#[derive(Debug, Clone, Default)]
pub struct InstalledMetadata {
    entries: HashMap<String, SourceEntry>,
}

impl InstalledMetadata {
    /// Parse `brew info --json=v2 --installed` output
    pub fn from_info_json(json: &str) -> Result<Self> {
        let data: Value = serde_json::from_str(json).context("Failed to parse installed info")?;
        let mut entries = HashMap::new();

        let items = ["formulae", "casks"]
            .iter()
            .filter_map(|section| data.get(section).and_then(Value::as_array))
            .flatten();

        for item in items {
            let Some(object) = item.as_object() else {
                continue;
            };

            let entry = SourceEntry {
                tap: string_field(item, "tap"),
                source_path: string_field(item, "ruby_source_path"),
            };

            let keys = ["token", "full_token", "name", "full_name"]
                .iter()
                .filter_map(|key| object.get(*key).and_then(Value::as_str));
            let aliases = object
                .get("aliases")
                .and_then(Value::as_array)
                .into_iter()
                .flatten()
                .filter_map(Value::as_str);

            for key in keys.chain(aliases).filter(|k| !k.is_empty()) {
                entries.insert(key.to_string(), entry.clone());
            }
        }

        Ok(Self { entries })
    }

    pub fn get(&self, name: &str) -> Option<&SourceEntry> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

fn string_field(item: &Value, key: &str) -> Option<String> {
    item.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Lookup state for history fetches, loaded once per run
#[derive(Debug, Clone, Default)]
pub struct HistoryContext {
    pub taps: TapMapping,
    pub installed: InstalledMetadata,
}

impl HistoryContext {
    /// Load tap and installed metadata from brew; failures leave them empty
    pub fn load(brew: &Brew, tap_overrides: &BTreeMap<String, String>) -> Self {
        let tap_info = brew
            .tap_info_json()
            .map_err(|e| log::warn!("{:#}", e))
            .ok();
        let taps = TapMapping::build(tap_info.as_deref(), tap_overrides);

        let installed = brew
            .installed_info_json()
            .and_then(|json| InstalledMetadata::from_info_json(&json))
            .unwrap_or_else(|e| {
                log::warn!("{:#}", e);
                InstalledMetadata::default()
            });

        Self { taps, installed }
    }

    /// `(owner/repo, path)` defining the package, if both lookups succeed
    pub fn resolve(&self, name: &str) -> Option<(&str, &str)> {
        let entry = self.installed.get(name)?;
        let repo = self.taps.repo_for(entry.tap.as_deref()?)?;
        let path = entry.source_path.as_deref()?;
        Some((repo, path))
    }
}
