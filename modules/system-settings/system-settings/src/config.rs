use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Configuration for the settings store
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsConfig {
    /// Live settings document.
    #[serde(default = "default_document_path")]
    pub document_path: PathBuf,
    /// Where backups are written. Defaults to the live document's directory.
    #[serde(default)]
    pub backup_dir: Option<PathBuf>,
    #[serde(default)]
    pub limits: FieldLimits,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            document_path: default_document_path(),
            backup_dir: None,
            limits: FieldLimits::default(),
        }
    }
}

impl SettingsConfig {
    #[must_use]
    pub fn backup_dir(&self) -> PathBuf {
        self.backup_dir.clone().unwrap_or_else(|| {
            self.document_path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
        })
    }
}

fn default_document_path() -> PathBuf {
    PathBuf::from("config/config.json")
}

/// Maximum lengths (in characters) accepted by `update`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldLimits {
    #[serde(default = "default_name_max")]
    pub name_max: usize,
    #[serde(default = "default_smtp_host_max")]
    pub smtp_host_max: usize,
    #[serde(default = "default_smtp_credential_max")]
    pub smtp_credential_max: usize,
}

impl Default for FieldLimits {
    fn default() -> Self {
        Self {
            name_max: default_name_max(),
            smtp_host_max: default_smtp_host_max(),
            smtp_credential_max: default_smtp_credential_max(),
        }
    }
}

fn default_name_max() -> usize {
    100
}

fn default_smtp_host_max() -> usize {
    200
}

fn default_smtp_credential_max() -> usize {
    100
}
