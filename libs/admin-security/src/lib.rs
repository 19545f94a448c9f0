#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Identity capability shared by the admin modules.
//!
//! Every admin operation receives a [`SecurityContext`] and calls
//! [`SecurityContext::require_admin_for`] before doing any work.

pub mod audit;
pub mod axum_ext;
pub mod context;

pub use audit::{OperationStatus, log_operation};
pub use axum_ext::{AuthError, AuthMode, AuthState, Authz, SubjectResolver, with_auth};
pub use context::{AccessDenied, SecurityContext, SecurityContextBuilder};
