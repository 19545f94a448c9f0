use std::sync::Arc;

use accounts_sdk::{Account, AccountsApi};
use admin_security::{AuthError, AuthMode, AuthState, SecurityContext, SubjectResolver};
use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::config::AuthConfig;

/// Security context for an account.
#[must_use]
pub fn context_for(account: &Account) -> SecurityContext {
    SecurityContext::builder()
        .subject_id(account.id)
        .username(&account.username)
        .email(&account.email)
        .admin(account.is_admin)
        .build()
}

/// Resolves authenticated usernames through the accounts directory.
pub struct AccountsResolver {
    accounts: Arc<dyn AccountsApi>,
}

impl AccountsResolver {
    #[must_use]
    pub fn new(accounts: Arc<dyn AccountsApi>) -> Self {
        Self { accounts }
    }
}

#[async_trait]
impl SubjectResolver for AccountsResolver {
    async fn resolve(&self, username: &str) -> Result<Option<SecurityContext>, AuthError> {
        let account = self
            .accounts
            .find_by_username(username)
            .await
            .map_err(|e| AuthError::Resolution(e.to_string()))?;
        Ok(account.filter(|a| a.is_active).map(|a| context_for(&a)))
    }
}

/// Look up an active account by username and build its context.
///
/// # Errors
/// Returns an error if the lookup fails or no active account has that name.
pub async fn operator_context(
    accounts: &dyn AccountsApi,
    username: &str,
) -> Result<SecurityContext> {
    let account = accounts
        .find_by_username(username)
        .await
        .with_context(|| format!("failed to look up account '{username}'"))?
        .filter(|a| a.is_active)
        .with_context(|| format!("no active account named '{username}'"))?;
    Ok(context_for(&account))
}

/// Pick the request authentication mode from configuration.
///
/// # Errors
/// Returns an error if auth is disabled and the default subject cannot be resolved.
pub async fn auth_mode(config: &AuthConfig, accounts: Arc<dyn AccountsApi>) -> Result<AuthMode> {
    if config.disabled {
        let ctx = operator_context(accounts.as_ref(), &config.default_subject)
            .await
            .context("auth is disabled but the default subject is unusable")?;
        return Ok(AuthMode::Disabled(ctx));
    }
    if config.tokens.is_empty() {
        tracing::warn!("No API tokens configured; every request is anonymous");
    }
    let resolver = Arc::new(AccountsResolver::new(accounts));
    Ok(AuthMode::Tokens(AuthState::new(
        config.tokens.clone(),
        resolver,
    )))
}
