use accounts_sdk::{Account, AccountPatch, NewAccount, UserPreferences};
use admin_api::{Page, PageRequest};
use async_trait::async_trait;

use super::error::DomainError;

/// Resolved self-service changes: every field holds the value to store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileChanges {
    pub email: String,
    pub full_name: Option<String>,
    pub preferences: UserPreferences,
}

/// Storage port for accounts.
///
/// Unique-constraint violations on insert/update surface as
/// [`DomainError::DuplicateKey`].
#[async_trait]
pub trait UsersRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<Account>, DomainError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, DomainError>;

    async fn list(&self, page: PageRequest) -> Result<Page<Account>, DomainError>;

    async fn insert(&self, new_account: NewAccount) -> Result<Account, DomainError>;

    async fn update(&self, id: i32, patch: AccountPatch) -> Result<Account, DomainError>;

    async fn set_active(&self, id: i32, active: bool) -> Result<Account, DomainError>;

    /// Count all accounts, or only active ones.
    async fn count(&self, active_only: bool) -> Result<u64, DomainError>;

    /// Stored preferences; `None` when the user never saved any.
    async fn find_preferences(&self, user_id: i32) -> Result<Option<UserPreferences>, DomainError>;

    /// Write the account fields and upsert the preferences atomically.
    async fn save_profile(
        &self,
        id: i32,
        changes: ProfileChanges,
    ) -> Result<(Account, UserPreferences), DomainError>;

    /// Delete the account and its preferences. Rows referencing the account
    /// from other tables surface as [`DomainError::InUse`].
    async fn delete(&self, id: i32) -> Result<(), DomainError>;
}
