//! RFC 9457 Problem Details for HTTP APIs

use axum::Json;
use http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

/// Content type for Problem Details as per RFC 9457.
pub const APPLICATION_PROBLEM_JSON: &str = "application/problem+json";

/// `type` used when a problem carries no more specific type URI.
pub const BLANK_TYPE: &str = "about:blank";

fn blank_type() -> String {
    BLANK_TYPE.to_owned()
}

/// Error body of every admin endpoint.
///
/// `code` is the stable, machine-readable discriminator clients should match
/// on; `title` and `detail` are for humans. Empty `instance`/`code` and a
/// missing `trace_id` are left out of the JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[must_use]
pub struct Problem {
    #[serde(rename = "type", default = "blank_type")]
    pub type_url: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub instance: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

impl Problem {
    pub fn new(status: StatusCode, title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            type_url: blank_type(),
            title: title.into(),
            status: status.as_u16(),
            detail: detail.into(),
            instance: String::new(),
            code: String::new(),
            trace_id: None,
        }
    }

    /// Problem titled with the status' canonical reason phrase.
    pub fn from_status(status: StatusCode, detail: impl Into<String>) -> Self {
        Self::new(status, status.canonical_reason().unwrap_or("Error"), detail)
    }

    /// HTTP status; unknown codes read back from JSON become 500.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn with_type(mut self, type_url: impl Into<String>) -> Self {
        self.type_url = type_url.into();
        self
    }

    pub fn with_instance(mut self, uri: impl Into<String>) -> Self {
        self.instance = uri.into();
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }
}

impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            [(header::CONTENT_TYPE, APPLICATION_PROBLEM_JSON)],
            Json(self),
        )
            .into_response()
    }
}

pub fn bad_request(detail: impl Into<String>) -> Problem {
    Problem::from_status(StatusCode::BAD_REQUEST, detail)
}

pub fn forbidden(detail: impl Into<String>) -> Problem {
    Problem::from_status(StatusCode::FORBIDDEN, detail)
}

pub fn not_found(detail: impl Into<String>) -> Problem {
    Problem::from_status(StatusCode::NOT_FOUND, detail)
}

pub fn conflict(detail: impl Into<String>) -> Problem {
    Problem::from_status(StatusCode::CONFLICT, detail)
}

pub fn unprocessable(detail: impl Into<String>) -> Problem {
    Problem::from_status(StatusCode::UNPROCESSABLE_ENTITY, detail)
}

pub fn service_unavailable(detail: impl Into<String>) -> Problem {
    Problem::from_status(StatusCode::SERVICE_UNAVAILABLE, detail)
}

pub fn internal_error(detail: impl Into<String>) -> Problem {
    Problem::from_status(StatusCode::INTERNAL_SERVER_ERROR, detail)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn response_carries_status_content_type_and_body() {
        let resp = conflict("duplicate key")
            .with_code("MASTER_DATA_DUPLICATE_KEY")
            .into_response();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            APPLICATION_PROBLEM_JSON
        );
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], 409);
        assert_eq!(json["title"], "Conflict");
        assert_eq!(json["type"], BLANK_TYPE);
        assert_eq!(json["code"], "MASTER_DATA_DUPLICATE_KEY");
        assert!(json.get("instance").is_none());
        assert!(json.get("trace_id").is_none());
    }

    #[test]
    fn titles_follow_reason_phrases() {
        assert_eq!(bad_request("x").title, "Bad Request");
        assert_eq!(forbidden("x").status, 403);
        assert_eq!(not_found("x").title, "Not Found");
        assert_eq!(unprocessable("x").title, "Unprocessable Entity");
        assert_eq!(service_unavailable("x").status, 503);
        assert_eq!(internal_error("x").title, "Internal Server Error");
    }

    #[test]
    fn parses_back_with_defaults() {
        let p: Problem =
            serde_json::from_str(r#"{"title":"Gone","status":410,"detail":"bye"}"#).unwrap();
        assert_eq!(p.type_url, BLANK_TYPE);
        assert_eq!(p.status_code(), StatusCode::GONE);
        assert_eq!(p.code, "");

        let odd = Problem { status: 1, ..p };
        assert_eq!(odd.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
