//! Public error types for the master-data module.

use thiserror::Error;

/// Errors that can be returned by the `MasterDataApi`.
///
/// Row-level import problems are never reported here; they are counted in
/// [`crate::ImportBatchResult::rows_failed`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MasterDataError {
    #[error("Master data not found: {id}")]
    NotFound { id: i32 },

    /// A record with this `(category, code)` already exists.
    #[error("Master data '{category}:{code}' already exists")]
    DuplicateKey { category: String, code: String },

    /// The staged import could not be committed; nothing was written.
    #[error("Import batch could not be committed: {message}")]
    BatchCommitFailure { message: String },

    /// The upload is not a readable CSV document.
    #[error("Invalid CSV: {message}")]
    InvalidCsv { message: String },

    #[error("Permission denied: {reason}")]
    PermissionDenied { reason: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Internal error")]
    Internal,
}

impl MasterDataError {
    #[must_use]
    pub fn not_found(id: i32) -> Self {
        Self::NotFound { id }
    }

    pub fn duplicate_key(category: impl Into<String>, code: impl Into<String>) -> Self {
        Self::DuplicateKey {
            category: category.into(),
            code: code.into(),
        }
    }

    pub fn batch_commit(message: impl Into<String>) -> Self {
        Self::BatchCommitFailure {
            message: message.into(),
        }
    }

    pub fn invalid_csv(message: impl Into<String>) -> Self {
        Self::InvalidCsv {
            message: message.into(),
        }
    }

    pub fn permission_denied(reason: impl Into<String>) -> Self {
        Self::PermissionDenied {
            reason: reason.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn internal() -> Self {
        Self::Internal
    }
}
