//! Axum extractors and middleware for request authentication

use std::{collections::HashMap, sync::Arc};

use admin_api::Problem;
use async_trait::async_trait;
use axum::{
    Router,
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, StatusCode, request::Parts},
    middleware::{Next, from_fn, from_fn_with_state},
    response::{IntoResponse, Response},
};

use crate::context::SecurityContext;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("SecurityContext not found - auth middleware not configured")]
    MissingContext,

    #[error("Subject resolution failed: {0}")]
    Resolution(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        Problem::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Authentication Error",
            self.to_string(),
        )
        .with_code("AUTH_INTERNAL")
        .into_response()
    }
}

/// Extractor for `SecurityContext` - validates that auth middleware has run
#[derive(Debug, Clone)]
pub struct Authz(pub SecurityContext);

impl<S> FromRequestParts<S> for Authz
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SecurityContext>()
            .cloned()
            .map(Authz)
            .ok_or(AuthError::MissingContext)
    }
}

/// Looks up the account behind an authenticated username.
#[async_trait]
pub trait SubjectResolver: Send + Sync {
    /// Returns `None` when the account does not exist or is inactive.
    async fn resolve(&self, username: &str) -> Result<Option<SecurityContext>, AuthError>;
}

#[derive(Clone)]
pub struct AuthState {
    tokens: Arc<HashMap<String, String>>,
    resolver: Arc<dyn SubjectResolver>,
}

impl AuthState {
    /// `tokens` maps a bearer token to a username.
    #[must_use]
    pub fn new(tokens: HashMap<String, String>, resolver: Arc<dyn SubjectResolver>) -> Self {
        Self {
            tokens: Arc::new(tokens),
            resolver,
        }
    }
}

/// How requests obtain their `SecurityContext`.
pub enum AuthMode {
    /// Every request runs as the given subject.
    Disabled(SecurityContext),
    /// Bearer tokens are mapped to accounts; anything else is anonymous.
    Tokens(AuthState),
}

/// Apply the auth layer to a router.
pub fn with_auth(router: Router, mode: AuthMode) -> Router {
    match mode {
        AuthMode::Disabled(ctx) => {
            tracing::warn!(
                subject = ctx.username(),
                "Auth-disabled mode enabled with default subject"
            );
            router.layer(from_fn(move |mut req: Request, next: Next| {
                let sec_context = ctx.clone();
                async move {
                    req.extensions_mut().insert(sec_context);
                    next.run(req).await
                }
            }))
        }
        AuthMode::Tokens(state) => router.layer(from_fn_with_state(state, authenticate)),
    }
}

/// Resolve `Authorization: Bearer <token>` into a `SecurityContext` request extension.
///
/// Missing or unknown tokens and inactive accounts yield an anonymous context;
/// handlers decide whether that is enough.
pub async fn authenticate(
    State(state): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let username = extract_bearer_token(request.headers())
        .and_then(|token| state.tokens.get(token))
        .cloned();

    let ctx = match username {
        Some(username) => match state.resolver.resolve(&username).await {
            Ok(Some(ctx)) => ctx,
            Ok(None) => {
                tracing::debug!(username = %username, "Token maps to unknown or inactive account");
                SecurityContext::anonymous()
            }
            Err(err) => return err.into_response(),
        },
        None => SecurityContext::anonymous(),
    };

    request.extensions_mut().insert(ctx);
    next.run(request).await
}

/// Extract Bearer token from Authorization header
fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer ").map(str::trim))
}
