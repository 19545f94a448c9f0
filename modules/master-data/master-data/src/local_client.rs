//! In-process implementation of [`MasterDataApi`] backed by the domain service.

use std::sync::Arc;

use admin_api::{Page, PageRequest};
use admin_security::SecurityContext;
use async_trait::async_trait;
use master_data_sdk::{
    ImportBatchResult, MasterDataApi, MasterDataError, MasterDataPatch, MasterDataRecord,
    NewMasterData, RawRow,
};

use crate::domain::service::Service;

pub struct MasterDataLocalClient {
    service: Arc<Service>,
}

impl MasterDataLocalClient {
    #[must_use]
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl MasterDataApi for MasterDataLocalClient {
    async fn import_batch(
        &self,
        ctx: &SecurityContext,
        rows: Vec<RawRow>,
    ) -> Result<ImportBatchResult, MasterDataError> {
        Ok(self.service.import_batch(ctx, rows).await?)
    }

    async fn import_csv(
        &self,
        ctx: &SecurityContext,
        csv: Vec<u8>,
    ) -> Result<ImportBatchResult, MasterDataError> {
        Ok(self.service.import_csv(ctx, &csv).await?)
    }

    async fn delete_all(
        &self,
        ctx: &SecurityContext,
        confirmed: bool,
    ) -> Result<u64, MasterDataError> {
        Ok(self.service.delete_all(ctx, confirmed).await?)
    }

    async fn get(
        &self,
        ctx: &SecurityContext,
        id: i32,
    ) -> Result<MasterDataRecord, MasterDataError> {
        Ok(self.service.get(ctx, id).await?)
    }

    async fn list(
        &self,
        ctx: &SecurityContext,
        category: Option<String>,
        page: PageRequest,
    ) -> Result<Page<MasterDataRecord>, MasterDataError> {
        Ok(self.service.list(ctx, category.as_deref(), page).await?)
    }

    async fn categories(&self, ctx: &SecurityContext) -> Result<Vec<String>, MasterDataError> {
        Ok(self.service.categories(ctx).await?)
    }

    async fn create(
        &self,
        ctx: &SecurityContext,
        new_record: NewMasterData,
    ) -> Result<MasterDataRecord, MasterDataError> {
        Ok(self.service.create(ctx, new_record).await?)
    }

    async fn update(
        &self,
        ctx: &SecurityContext,
        id: i32,
        patch: MasterDataPatch,
    ) -> Result<MasterDataRecord, MasterDataError> {
        Ok(self.service.update(ctx, id, patch).await?)
    }

    async fn delete(&self, ctx: &SecurityContext, id: i32) -> Result<(), MasterDataError> {
        Ok(self.service.delete(ctx, id).await?)
    }

    async fn count(&self, ctx: &SecurityContext) -> Result<u64, MasterDataError> {
        Ok(self.service.count(ctx).await?)
    }
}
