//! Public error types for the accounts module.

use thiserror::Error;

/// Errors that can be returned by the `AccountsApi`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccountsError {
    /// Account with the specified ID was not found.
    #[error("Account not found: {id}")]
    NotFound { id: i32 },

    /// Another account already uses this username or email.
    #[error("Account with {field} '{value}' already exists")]
    DuplicateKey { field: String, value: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    /// An administrator tried to deactivate their own account.
    #[error("You cannot deactivate your own account")]
    SelfDeactivation,

    /// The account is still referenced by records it created.
    #[error("Account {id} still owns records and cannot be deleted")]
    InUse { id: i32 },

    #[error("Permission denied: {reason}")]
    PermissionDenied { reason: String },

    #[error("Internal error")]
    Internal,
}

impl AccountsError {
    #[must_use]
    pub fn not_found(id: i32) -> Self {
        Self::NotFound { id }
    }

    pub fn duplicate_key(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::DuplicateKey {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn permission_denied(reason: impl Into<String>) -> Self {
        Self::PermissionDenied {
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn internal() -> Self {
        Self::Internal
    }
}
