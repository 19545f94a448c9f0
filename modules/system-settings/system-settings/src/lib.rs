//! System Settings Module Implementation
//!
//! The public API is defined in `system-settings-sdk` and re-exported here.

pub use system_settings_sdk::{
    BackupInfo, BackupKind, ConfigDocument, ConfigPatch, ExportedDocument, SettingsError,
    SystemSettingsApi,
};

pub mod api;
pub mod config;
pub mod domain;
pub mod infra;
pub mod local_client;

use std::sync::Arc;

pub use config::SettingsConfig;
pub use local_client::SystemSettingsLocalClient;

/// Wire the file store, service and local client from configuration.
#[must_use]
pub fn build(config: &SettingsConfig) -> Arc<dyn SystemSettingsApi> {
    let store = Arc::new(infra::fs_store::FileConfigStore::new(
        config.document_path.clone(),
        config.backup_dir(),
    ));
    let service = Arc::new(domain::service::Service::new(store, config.limits.clone()));
    Arc::new(SystemSettingsLocalClient::new(service))
}
