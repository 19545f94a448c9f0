use std::sync::Arc;

use accounts_sdk::AccountsApi;
use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::repo::UserDirectory;

/// [`UserDirectory`] over the accounts module's public API.
pub struct AccountsDirectory {
    accounts: Arc<dyn AccountsApi>,
}

impl AccountsDirectory {
    #[must_use]
    pub fn new(accounts: Arc<dyn AccountsApi>) -> Self {
        Self { accounts }
    }
}

#[async_trait]
impl UserDirectory for AccountsDirectory {
    async fn user_id_by_email(&self, email: &str) -> Result<Option<i32>, DomainError> {
        let account = self
            .accounts
            .find_by_email(email)
            .await
            .map_err(|e| DomainError::database(format!("account lookup failed: {e}")))?;
        Ok(account.map(|a| a.id))
    }
}
