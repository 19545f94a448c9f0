//! System Settings SDK
//!
//! Public contract of the settings store: the JSON configuration document
//! that drives branding, mail, theme and security behaviour, plus its
//! backup/restore lifecycle.

pub mod api;
pub mod errors;
pub mod models;

pub use api::SystemSettingsApi;
pub use errors::SettingsError;
pub use models::{
    BackupInfo, BackupKind, ConfigDocument, ConfigPatch, ExportedDocument, MailServerConfig,
    MailServerPatch, REQUIRED_KEYS, RestoreOutcome, SecurityConfig, SecurityPatch, ThemeConfig,
    ThemePatch,
};
