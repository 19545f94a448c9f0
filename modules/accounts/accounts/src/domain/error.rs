use accounts_sdk::AccountsError;
use admin_security::AccessDenied;
use thiserror::Error;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Account not found: {id}")]
    NotFound { id: i32 },

    #[error("Account with {field} '{value}' already exists")]
    DuplicateKey { field: &'static str, value: String },

    #[error("Validation failed: {field}: {message}")]
    Validation { field: &'static str, message: String },

    #[error("You cannot deactivate your own account")]
    SelfDeactivation,

    #[error("Account {id} still owns records and cannot be deleted")]
    InUse { id: i32 },

    #[error("Access forbidden: {0}")]
    Forbidden(#[from] AccessDenied),

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    #[must_use]
    pub fn not_found(id: i32) -> Self {
        Self::NotFound { id }
    }

    pub fn duplicate_key(field: &'static str, value: impl Into<String>) -> Self {
        Self::DuplicateKey {
            field,
            value: value.into(),
        }
    }

    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}

/// Convert domain errors to SDK errors for public API consumption.
impl From<DomainError> for AccountsError {
    fn from(domain_error: DomainError) -> Self {
        match domain_error {
            DomainError::NotFound { id } => AccountsError::not_found(id),
            DomainError::DuplicateKey { field, value } => AccountsError::duplicate_key(field, value),
            DomainError::Validation { field, message } => {
                AccountsError::validation(format!("{field}: {message}"))
            }
            DomainError::SelfDeactivation => AccountsError::SelfDeactivation,
            DomainError::InUse { id } => AccountsError::InUse { id },
            DomainError::Forbidden(denied) => AccountsError::permission_denied(denied.reason),
            DomainError::Database { message } => {
                tracing::error!(error = %message, "Accounts storage failure");
                AccountsError::internal()
            }
        }
    }
}
