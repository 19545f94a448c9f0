use admin_api::{Problem, WithRequestContext, problem};
use axum::http::Uri;

use crate::domain::error::DomainError;

/// Map domain error to RFC 9457 Problem
pub fn domain_error_to_problem(e: &DomainError, uri: &Uri) -> Problem {
    let problem = match e {
        DomainError::NotFound { .. } => problem::not_found(e.to_string()).with_code("ACCOUNTS_NOT_FOUND"),
        DomainError::DuplicateKey { .. } => {
            problem::conflict(e.to_string()).with_code("ACCOUNTS_DUPLICATE_KEY")
        }
        DomainError::Validation { .. } => {
            problem::unprocessable(e.to_string()).with_code("ACCOUNTS_VALIDATION")
        }
        DomainError::SelfDeactivation => {
            problem::bad_request(e.to_string()).with_code("ACCOUNTS_SELF_DEACTIVATION")
        }
        DomainError::InUse { .. } => problem::conflict(e.to_string()).with_code("ACCOUNTS_IN_USE"),
        DomainError::Forbidden(_) => {
            problem::forbidden("You do not have permission to access this area.")
                .with_code("ACCOUNTS_PERMISSION_DENIED")
        }
        DomainError::Database { .. } => {
            tracing::error!(error = ?e, "Database error occurred");
            problem::internal_error("An internal database error occurred")
                .with_code("ACCOUNTS_INTERNAL")
        }
    };
    problem.with_request_context(uri)
}
