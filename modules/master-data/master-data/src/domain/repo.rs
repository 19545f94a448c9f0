use admin_api::{Page, PageRequest};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use master_data_sdk::{MasterDataPatch, MasterDataRecord};

use super::error::DomainError;

/// A validated record ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
    pub category: String,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub tags: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_by_id: i32,
    pub created_at: DateTime<Utc>,
}

impl NewRecord {
    #[must_use]
    pub fn key(&self) -> (String, String) {
        (self.category.clone(), self.code.clone())
    }
}

/// Storage port for master data.
///
/// Unique-constraint violations on single-record writes surface as
/// [`DomainError::DuplicateKey`].
#[async_trait]
pub trait MasterDataRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<MasterDataRecord>, DomainError>;

    async fn find_by_key(
        &self,
        category: &str,
        code: &str,
    ) -> Result<Option<MasterDataRecord>, DomainError>;

    async fn list(
        &self,
        category: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<MasterDataRecord>, DomainError>;

    async fn categories(&self) -> Result<Vec<String>, DomainError>;

    async fn insert(&self, record: NewRecord) -> Result<MasterDataRecord, DomainError>;

    /// Insert all `records` in one transaction.
    ///
    /// Any failure rolls the whole batch back and returns
    /// [`DomainError::BatchCommit`]; no row of the batch is visible afterwards.
    async fn insert_batch(&self, records: Vec<NewRecord>) -> Result<u64, DomainError>;

    async fn update(
        &self,
        id: i32,
        patch: MasterDataPatch,
    ) -> Result<MasterDataRecord, DomainError>;

    /// Returns `false` when no record had this id.
    async fn delete(&self, id: i32) -> Result<bool, DomainError>;

    async fn delete_all(&self) -> Result<u64, DomainError>;

    async fn count(&self) -> Result<u64, DomainError>;
}

/// Resolves the account a row is attributed to.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn user_id_by_email(&self, email: &str) -> Result<Option<i32>, DomainError>;
}
