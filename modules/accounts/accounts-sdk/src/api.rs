//! `AccountsApi` trait definition.

use admin_api::{Page, PageRequest};
use admin_security::SecurityContext;
use async_trait::async_trait;

use crate::errors::AccountsError;
use crate::models::{Account, AccountPatch, AccountStats, NewAccount, Profile, ProfileUpdate};

/// Public API of the accounts module.
///
/// Lookups by email or username are directory queries used by other modules
/// (request authentication, import attribution) and take no caller context.
/// The profile operations act on the caller's own account and only need an
/// authenticated caller. Everything else is an admin operation and refuses
/// non-admin callers with [`AccountsError::PermissionDenied`].
#[async_trait]
pub trait AccountsApi: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AccountsError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, AccountsError>;

    async fn get(&self, ctx: &SecurityContext, id: i32) -> Result<Account, AccountsError>;

    /// List accounts ordered by id.
    async fn list(
        &self,
        ctx: &SecurityContext,
        page: PageRequest,
    ) -> Result<Page<Account>, AccountsError>;

    async fn create(
        &self,
        ctx: &SecurityContext,
        new_account: NewAccount,
    ) -> Result<Account, AccountsError>;

    async fn update(
        &self,
        ctx: &SecurityContext,
        id: i32,
        patch: AccountPatch,
    ) -> Result<Account, AccountsError>;

    /// Flip `is_active`. Callers cannot deactivate themselves.
    async fn toggle_active(&self, ctx: &SecurityContext, id: i32) -> Result<Account, AccountsError>;

    async fn stats(&self, ctx: &SecurityContext) -> Result<AccountStats, AccountsError>;

    /// The caller's account and preferences.
    async fn profile(&self, ctx: &SecurityContext) -> Result<Profile, AccountsError>;

    /// Change the caller's email, full name and preferences in one step.
    async fn update_profile(
        &self,
        ctx: &SecurityContext,
        update: ProfileUpdate,
    ) -> Result<Profile, AccountsError>;

    /// Delete the caller's account and preferences.
    ///
    /// Fails with [`AccountsError::InUse`] while other records still point at the account.
    async fn delete_own_account(&self, ctx: &SecurityContext) -> Result<(), AccountsError>;

    /// Create the bootstrap administrator unless an account with `username` exists.
    ///
    /// Returns the existing or newly created account and whether it was created.
    async fn ensure_admin(
        &self,
        username: &str,
        email: &str,
    ) -> Result<(Account, bool), AccountsError>;
}
