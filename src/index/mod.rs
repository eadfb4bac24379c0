pub mod grouper;
pub mod query;
pub mod scanner;
pub mod store;

pub use grouper::*;
pub use query::*;
pub use scanner::*;
pub use store::*;

use serde::{Deserialize, Serialize};

/// What kind of Homebrew artifact a record describes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageKind {
    #[default]
    Package,
    Cask,
}

/// Whether the package is on disk or only known from a tap's history
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallStatus {
    #[default]
    Installed,
    Available,
}

/// One installation event, or one "available" package from a tap
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct InstallationRecord {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub install_path: String,
    pub install_time: String,
    pub install_epoch: i64,

    #[serde(default)]
    pub kind: PackageKind,

    #[serde(default)]
    pub first_installed: bool,
    #[serde(default)]
    pub first_installed_epoch: i64,
    #[serde(default)]
    pub first_installed_time: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_first_commit_date: Option<String>,

    #[serde(default)]
    pub status: InstallStatus,
}

impl InstallationRecord {
    /// A freshly scanned install; first-install fields are filled by the grouper
    pub fn installed(
        name: impl Into<String>,
        version: impl Into<String>,
        install_path: impl Into<String>,
        install_epoch: i64,
        kind: PackageKind,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            install_path: install_path.into(),
            install_time: crate::utils::format_local_iso(install_epoch),
            install_epoch,
            kind,
            first_installed: false,
            first_installed_epoch: 0,
            first_installed_time: String::new(),
            repo_first_commit_date: None,
            status: InstallStatus::Installed,
        }
    }

    pub fn is_available(&self) -> bool {
        self.status == InstallStatus::Available
    }
}
