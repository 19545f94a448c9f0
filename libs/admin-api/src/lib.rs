#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Shared REST helpers for the admin modules.
//!
//! - [`problem`]: RFC 9457 Problem Details and axum integration
//! - [`page`]: page-number pagination used by list endpoints
//! - [`response`]: short constructors for common success responses
//! - [`trace`]: enrich problems with request path and trace id

pub mod page;
pub mod problem;
pub mod response;
pub mod trace;

pub use page::{MAX_OFFSET, Page, PageRequest};
pub use problem::{APPLICATION_PROBLEM_JSON, Problem};
pub use trace::WithRequestContext;

/// Result type for REST handlers. Errors render as `application/problem+json`.
pub type ApiResult<T> = Result<T, Problem>;
