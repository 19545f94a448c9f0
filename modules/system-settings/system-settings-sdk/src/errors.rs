//! Public error types for the settings store.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    /// The live document is missing or unreadable.
    #[error("Settings storage unavailable at '{path}': {message}")]
    StorageUnavailable { path: String, message: String },

    /// The live document exists but does not match the settings schema.
    #[error("Settings document is malformed: {message}")]
    MalformedDocument { message: String },

    /// An uploaded document was rejected by restore.
    #[error("Invalid configuration file format: {message}")]
    InvalidRestoreDocument { message: String },

    /// A backup or the live document could not be written. The live document is unchanged.
    #[error("Failed to persist settings: {message}")]
    PersistenceFailure {
        message: String,
        backup_file: Option<String>,
    },

    #[error("Permission denied: {reason}")]
    PermissionDenied { reason: String },

    #[error("Validation error on '{field}': {message}")]
    Validation { field: String, message: String },
}

impl SettingsError {
    pub fn storage_unavailable(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StorageUnavailable {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedDocument {
            message: message.into(),
        }
    }

    pub fn invalid_restore(message: impl Into<String>) -> Self {
        Self::InvalidRestoreDocument {
            message: message.into(),
        }
    }

    pub fn persistence(message: impl Into<String>, backup_file: Option<String>) -> Self {
        Self::PersistenceFailure {
            message: message.into(),
            backup_file,
        }
    }

    pub fn permission_denied(reason: impl Into<String>) -> Self {
        Self::PermissionDenied {
            reason: reason.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}
