//! Request context for problem responses.

use axum::http::Uri;

use crate::problem::Problem;

pub trait WithRequestContext {
    /// Record the request path as `instance` and, inside a span, its id as `trace_id`.
    #[must_use]
    fn with_request_context(self, uri: &Uri) -> Self;
}

impl WithRequestContext for Problem {
    fn with_request_context(self, uri: &Uri) -> Self {
        let problem = self.with_instance(uri.path());
        let span_id = tracing::Span::current().id();
        match span_id {
            Some(id) => problem.with_trace_id(format!("{:016x}", id.into_u64())),
            None => problem,
        }
    }
}
