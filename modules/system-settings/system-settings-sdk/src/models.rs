//! Settings document and patch models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::value::RawValue;

/// Top-level keys an uploaded document must carry to be accepted by restore.
pub const REQUIRED_KEYS: [&str; 5] = ["app_name", "client_name", "theme", "mail_server", "security"];

/// The live settings document.
///
/// `database` is never interpreted: it is carried as raw JSON text and
/// written back exactly as it was read. Unknown top-level keys are not kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigDocument {
    #[serde(default)]
    pub app_name: String,
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub theme: ThemeConfig,
    #[serde(default)]
    pub mail_server: MailServerConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    #[serde(default)]
    pub admin_email: String,
    #[serde(
        default,
        deserialize_with = "deserialize_raw",
        skip_serializing_if = "Option::is_none"
    )]
    pub database: Option<Box<RawValue>>,
}

// A present `null` must stay `null`, so this never yields `None` for a present key.
fn deserialize_raw<'de, D>(deserializer: D) -> Result<Option<Box<RawValue>>, D::Error>
where
    D: Deserializer<'de>,
{
    Box::<RawValue>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeConfig {
    #[serde(default = "default_theme")]
    pub default: String,
    #[serde(default = "default_available_themes")]
    pub available: Vec<String>,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            default: default_theme(),
            available: default_available_themes(),
        }
    }
}

fn default_theme() -> String {
    "light".to_owned()
}

fn default_available_themes() -> Vec<String> {
    vec!["light".to_owned(), "dark".to_owned()]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailServerConfig {
    #[serde(default)]
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    #[serde(default)]
    pub smtp_user: String,
    #[serde(default)]
    pub smtp_password: String,
    #[serde(default = "default_true")]
    pub use_tls: bool,
}

impl Default for MailServerConfig {
    fn default() -> Self {
        Self {
            smtp_host: String::new(),
            smtp_port: default_smtp_port(),
            smtp_user: String::new(),
            smtp_password: String::new(),
            use_tls: true,
        }
    }
}

fn default_smtp_port() -> u16 {
    587
}

fn default_true() -> bool {
    true
}

/// Security section. Keys other than the two typed ones
/// (`secret_key`, `csrf_enabled`, ...) are kept as-is in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(default = "default_session_lifetime")]
    pub session_lifetime: u64,
    #[serde(default = "default_password_min_length")]
    pub password_min_length: u32,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            session_lifetime: default_session_lifetime(),
            password_min_length: default_password_min_length(),
            extra: serde_json::Map::new(),
        }
    }
}

fn default_session_lifetime() -> u64 {
    86400
}

fn default_password_min_length() -> u32 {
    8
}

/// Partial update of the settings document. `None` keeps the current value.
/// The `database` section cannot be changed through a patch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigPatch {
    pub app_name: Option<String>,
    pub client_name: Option<String>,
    pub theme: Option<ThemePatch>,
    pub mail_server: Option<MailServerPatch>,
    pub security: Option<SecurityPatch>,
    pub admin_email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemePatch {
    pub default: Option<String>,
    pub available: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MailServerPatch {
    pub smtp_host: Option<String>,
    pub smtp_port: Option<u16>,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
    pub use_tls: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SecurityPatch {
    pub session_lifetime: Option<u64>,
    pub password_min_length: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackupKind {
    /// Taken before an update.
    Routine,
    /// Taken before a restore.
    BeforeRestore,
}

/// One backup file next to (or configured away from) the live document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupInfo {
    pub file_name: String,
    pub kind: BackupKind,
    pub size_bytes: u64,
    pub modified: DateTime<Utc>,
}

/// Result of a restore: the live document was replaced by the upload as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestoreOutcome {
    /// Pre-restore backup, absent when there was no live document to back up.
    pub backup_file: Option<String>,
    pub restored_from: Option<String>,
}

/// Live document bytes offered for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedDocument {
    pub file_name: String,
    pub bytes: Vec<u8>,
}
