//! `MasterDataApi` trait definition.

use admin_api::{Page, PageRequest};
use admin_security::SecurityContext;
use async_trait::async_trait;

use crate::errors::MasterDataError;
use crate::models::{ImportBatchResult, MasterDataPatch, MasterDataRecord, NewMasterData, RawRow};

/// Public API of the master-data module.
///
/// Every operation is an admin operation and refuses non-admin callers with
/// [`MasterDataError::PermissionDenied`] before touching storage.
#[async_trait]
pub trait MasterDataApi: Send + Sync {
    /// Reconcile `rows` into storage without overwriting existing keys.
    ///
    /// Rows whose `created_by` email matches no account are attributed to the caller.
    /// All added rows are committed together or not at all.
    async fn import_batch(
        &self,
        ctx: &SecurityContext,
        rows: Vec<RawRow>,
    ) -> Result<ImportBatchResult, MasterDataError>;

    /// Decode a UTF-8 CSV document with a header row and import its rows.
    async fn import_csv(
        &self,
        ctx: &SecurityContext,
        csv: Vec<u8>,
    ) -> Result<ImportBatchResult, MasterDataError>;

    /// Delete every record when `confirmed`; otherwise only count them.
    ///
    /// Returns the number of records deleted, or that would be deleted.
    async fn delete_all(
        &self,
        ctx: &SecurityContext,
        confirmed: bool,
    ) -> Result<u64, MasterDataError>;

    async fn get(&self, ctx: &SecurityContext, id: i32)
    -> Result<MasterDataRecord, MasterDataError>;

    /// List records ordered by category, sort order and id.
    async fn list(
        &self,
        ctx: &SecurityContext,
        category: Option<String>,
        page: PageRequest,
    ) -> Result<Page<MasterDataRecord>, MasterDataError>;

    /// Distinct categories, sorted.
    async fn categories(&self, ctx: &SecurityContext) -> Result<Vec<String>, MasterDataError>;

    async fn create(
        &self,
        ctx: &SecurityContext,
        new_record: NewMasterData,
    ) -> Result<MasterDataRecord, MasterDataError>;

    async fn update(
        &self,
        ctx: &SecurityContext,
        id: i32,
        patch: MasterDataPatch,
    ) -> Result<MasterDataRecord, MasterDataError>;

    async fn delete(&self, ctx: &SecurityContext, id: i32) -> Result<(), MasterDataError>;

    async fn count(&self, ctx: &SecurityContext) -> Result<u64, MasterDataError>;
}
