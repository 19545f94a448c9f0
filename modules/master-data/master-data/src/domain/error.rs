use admin_security::AccessDenied;
use master_data_sdk::MasterDataError;
use thiserror::Error;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Master data not found: {id}")]
    NotFound { id: i32 },

    #[error("Master data '{category}:{code}' already exists")]
    DuplicateKey { category: String, code: String },

    #[error("Validation failed: {field}: {message}")]
    Validation { field: &'static str, message: String },

    #[error("Invalid CSV: {0}")]
    InvalidCsv(#[source] csv::Error),

    #[error("Batch commit failed: {message}")]
    BatchCommit { message: String },

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

    pub fn duplicate_key(category: impl Into<String>, code: impl Into<String>) -> Self {
        Self::DuplicateKey {
            category: category.into(),
            code: code.into(),
        }
    }

    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn batch_commit(message: impl Into<String>) -> Self {
        Self::BatchCommit {
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
impl From<DomainError> for MasterDataError {
    fn from(domain_error: DomainError) -> Self {
        match domain_error {
            DomainError::NotFound { id } => MasterDataError::not_found(id),
            DomainError::DuplicateKey { category, code } => {
                MasterDataError::duplicate_key(category, code)
            }
            DomainError::Validation { field, message } => {
                MasterDataError::validation(format!("{field}: {message}"))
            }
            DomainError::InvalidCsv(e) => MasterDataError::invalid_csv(e.to_string()),
            DomainError::BatchCommit { message } => MasterDataError::batch_commit(message),
            DomainError::Forbidden(denied) => MasterDataError::permission_denied(denied.reason),
            DomainError::Database { message } => {
                tracing::error!(error = %message, "Master data storage failure");
                MasterDataError::internal()
            }
        }
    }
}
