//! Operation audit trail.
//!
//! Audit events go to the `audit` target so they can be routed or filtered
//! separately from diagnostics.

use serde::Serialize;

pub const AUDIT_TARGET: &str = "audit";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OperationStatus {
    Success,
    Failure,
    Error,
}

impl OperationStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Failure => "Failure",
            Self::Error => "Error",
        }
    }
}

impl std::fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Record one admin operation outcome.
///
/// `Success` is logged at INFO, `Failure` at WARN and `Error` at ERROR.
pub fn log_operation(
    operation: &str,
    status: OperationStatus,
    actor_id: Option<i32>,
    details: &serde_json::Value,
) {
    let actor = actor_id.map_or_else(|| "anonymous".to_owned(), |id| id.to_string());
    let details = details.to_string();
    match status {
        OperationStatus::Success => tracing::info!(
            target: AUDIT_TARGET,
            operation,
            status = status.as_str(),
            actor_id = %actor,
            details = %details,
            "Operation: {operation} - Status: {status}"
        ),
        OperationStatus::Failure => tracing::warn!(
            target: AUDIT_TARGET,
            operation,
            status = status.as_str(),
            actor_id = %actor,
            details = %details,
            "Operation: {operation} - Status: {status}"
        ),
        OperationStatus::Error => tracing::error!(
            target: AUDIT_TARGET,
            operation,
            status = status.as_str(),
            actor_id = %actor,
            details = %details,
            "Operation: {operation} - Status: {status}"
        ),
    }
}
