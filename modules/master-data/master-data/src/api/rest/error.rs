use admin_api::{Problem, WithRequestContext, problem};
use axum::http::Uri;

use crate::domain::error::DomainError;

/// Map domain error to RFC 9457 Problem
pub fn domain_error_to_problem(e: &DomainError, uri: &Uri) -> Problem {
    let problem = match e {
        DomainError::NotFound { .. } => {
            problem::not_found(e.to_string()).with_code("MASTER_DATA_NOT_FOUND")
        }
        DomainError::DuplicateKey { .. } => {
            problem::conflict(e.to_string()).with_code("MASTER_DATA_DUPLICATE_KEY")
        }
        DomainError::Validation { .. } => {
            problem::unprocessable(e.to_string()).with_code("MASTER_DATA_VALIDATION")
        }
        DomainError::InvalidCsv(_) => {
            problem::bad_request(e.to_string()).with_code("MASTER_DATA_INVALID_CSV")
        }
        DomainError::BatchCommit { .. } => {
            problem::internal_error("The import could not be committed; no rows were added")
                .with_code("MASTER_DATA_BATCH_COMMIT_FAILURE")
        }
        DomainError::Forbidden(_) => {
            problem::forbidden("You do not have permission to access this area.")
                .with_code("MASTER_DATA_PERMISSION_DENIED")
        }
        DomainError::Database { .. } => {
            tracing::error!(error = ?e, "Database error occurred");
            problem::internal_error("An internal database error occurred")
                .with_code("MASTER_DATA_INTERNAL")
        }
    };
    problem.with_request_context(uri)
}
