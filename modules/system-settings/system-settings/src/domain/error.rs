use admin_security::AccessDenied;
use system_settings_sdk::SettingsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("settings document unavailable at '{path}': {source}")]
    StorageUnavailable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("settings document is malformed: {0}")]
    MalformedDocument(#[source] serde_json::Error),

    #[error("invalid configuration file format: {0}")]
    InvalidRestoreDocument(String),

    #[error("failed to write backup '{file}': {source}")]
    BackupWrite {
        file: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to replace settings document: {source}")]
    LiveWrite {
        backup_file: Option<String>,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode settings document: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to list backups: {0}")]
    BackupListing(#[source] std::io::Error),

    #[error("validation failed on '{field}': {message}")]
    Validation { field: &'static str, message: String },

    #[error("access forbidden: {0}")]
    Forbidden(#[from] AccessDenied),
}

impl DomainError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn invalid_restore(message: impl Into<String>) -> Self {
        Self::InvalidRestoreDocument(message.into())
    }

    /// Backup file left behind by a failed write, if any.
    #[must_use]
    pub fn backup_file(&self) -> Option<&str> {
        match self {
            Self::LiveWrite { backup_file, .. } => backup_file.as_deref(),
            _ => None,
        }
    }
}

impl From<DomainError> for SettingsError {
    fn from(e: DomainError) -> Self {
        let message = e.to_string();
        match e {
            DomainError::StorageUnavailable { path, source } => {
                SettingsError::storage_unavailable(path, source.to_string())
            }
            DomainError::MalformedDocument(err) => SettingsError::malformed(err.to_string()),
            DomainError::InvalidRestoreDocument(msg) => SettingsError::invalid_restore(msg),
            DomainError::LiveWrite { backup_file, .. } => {
                SettingsError::persistence(message, backup_file)
            }
            DomainError::BackupWrite { .. }
            | DomainError::Encode(_)
            | DomainError::BackupListing(_) => SettingsError::persistence(message, None),
            DomainError::Validation { field, message } => SettingsError::validation(field, message),
            DomainError::Forbidden(denied) => SettingsError::permission_denied(denied.reason),
        }
    }
}
