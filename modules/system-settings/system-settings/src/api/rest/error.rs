use admin_api::{Problem, WithRequestContext, problem};
use axum::http::Uri;
use system_settings_sdk::SettingsError;

/// Map a settings error to RFC 9457 Problem
pub fn settings_error_to_problem(e: &SettingsError, uri: &Uri) -> Problem {
    let problem = match e {
        SettingsError::PermissionDenied { .. } => {
            problem::forbidden("You do not have permission to access this area.")
                .with_code("SETTINGS_PERMISSION_DENIED")
        }
        SettingsError::Validation { .. } => {
            problem::unprocessable(e.to_string()).with_code("SETTINGS_VALIDATION")
        }
        SettingsError::InvalidRestoreDocument { .. } => {
            problem::bad_request(e.to_string()).with_code("SETTINGS_INVALID_RESTORE_DOCUMENT")
        }
        SettingsError::StorageUnavailable { .. } => {
            tracing::error!(error = %e, "Settings document unavailable");
            problem::service_unavailable("Error loading configuration. Please check the logs.")
                .with_code("SETTINGS_STORAGE_UNAVAILABLE")
        }
        SettingsError::MalformedDocument { .. } => {
            tracing::error!(error = %e, "Settings document malformed");
            problem::service_unavailable("Error loading configuration. Please check the logs.")
                .with_code("SETTINGS_MALFORMED_DOCUMENT")
        }
        SettingsError::PersistenceFailure { .. } => {
            tracing::error!(error = %e, "Settings persistence failure");
            problem::internal_error(e.to_string()).with_code("SETTINGS_PERSISTENCE_FAILURE")
        }
    };
    problem.with_request_context(uri)
}
