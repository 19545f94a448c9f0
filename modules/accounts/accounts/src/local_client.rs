//! In-process implementation of [`AccountsApi`] backed by the domain service.

use std::sync::Arc;

use accounts_sdk::{
    Account, AccountPatch, AccountStats, AccountsApi, AccountsError, NewAccount, Profile,
    ProfileUpdate,
};
use admin_api::{Page, PageRequest};
use admin_security::SecurityContext;
use async_trait::async_trait;

use crate::domain::service::Service;

pub struct AccountsLocalClient {
    service: Arc<Service>,
}

impl AccountsLocalClient {
    #[must_use]
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl AccountsApi for AccountsLocalClient {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AccountsError> {
        Ok(self.service.find_by_email(email).await?)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, AccountsError> {
        Ok(self.service.find_by_username(username).await?)
    }

    async fn get(&self, ctx: &SecurityContext, id: i32) -> Result<Account, AccountsError> {
        Ok(self.service.get(ctx, id).await?)
    }

    async fn list(
        &self,
        ctx: &SecurityContext,
        page: PageRequest,
    ) -> Result<Page<Account>, AccountsError> {
        Ok(self.service.list(ctx, page).await?)
    }

    async fn create(
        &self,
        ctx: &SecurityContext,
        new_account: NewAccount,
    ) -> Result<Account, AccountsError> {
        Ok(self.service.create(ctx, new_account).await?)
    }

    async fn update(
        &self,
        ctx: &SecurityContext,
        id: i32,
        patch: AccountPatch,
    ) -> Result<Account, AccountsError> {
        Ok(self.service.update(ctx, id, patch).await?)
    }

    async fn toggle_active(&self, ctx: &SecurityContext, id: i32) -> Result<Account, AccountsError> {
        Ok(self.service.toggle_active(ctx, id).await?)
    }

    async fn stats(&self, ctx: &SecurityContext) -> Result<AccountStats, AccountsError> {
        Ok(self.service.stats(ctx).await?)
    }

    async fn profile(&self, ctx: &SecurityContext) -> Result<Profile, AccountsError> {
        Ok(self.service.profile(ctx).await?)
    }

    async fn update_profile(
        &self,
        ctx: &SecurityContext,
        update: ProfileUpdate,
    ) -> Result<Profile, AccountsError> {
        Ok(self.service.update_profile(ctx, update).await?)
    }

    async fn delete_own_account(&self, ctx: &SecurityContext) -> Result<(), AccountsError> {
        Ok(self.service.delete_own_account(ctx).await?)
    }

    async fn ensure_admin(
        &self,
        username: &str,
        email: &str,
    ) -> Result<(Account, bool), AccountsError> {
        Ok(self.service.ensure_admin(username, email).await?)
    }
}
