//! In-process implementation of [`SystemSettingsApi`].
//!
//! The domain service does blocking file I/O, so every call runs on the
//! blocking thread pool.

use std::sync::Arc;

use admin_security::SecurityContext;
use async_trait::async_trait;
use system_settings_sdk::{
    BackupInfo, ConfigDocument, ConfigPatch, ExportedDocument, RestoreOutcome, SettingsError,
    SystemSettingsApi,
};

use crate::domain::error::DomainError;
use crate::domain::service::Service;

pub struct SystemSettingsLocalClient {
    service: Arc<Service>,
}

impl SystemSettingsLocalClient {
    #[must_use]
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }

    async fn run<T, F>(&self, ctx: &SecurityContext, f: F) -> Result<T, SettingsError>
    where
        T: Send + 'static,
        F: FnOnce(&Service, &SecurityContext) -> Result<T, DomainError> + Send + 'static,
    {
        let service = self.service.clone();
        let ctx = ctx.clone();
        tokio::task::spawn_blocking(move || f(&service, &ctx))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Settings task failed");
                SettingsError::persistence(format!("settings task failed: {e}"), None)
            })?
            .map_err(SettingsError::from)
    }
}

#[async_trait]
impl SystemSettingsApi for SystemSettingsLocalClient {
    async fn load(&self, ctx: &SecurityContext) -> Result<ConfigDocument, SettingsError> {
        self.run(ctx, |svc, ctx| svc.load(ctx)).await
    }

    async fn update(
        &self,
        ctx: &SecurityContext,
        patch: ConfigPatch,
    ) -> Result<ConfigDocument, SettingsError> {
        self.run(ctx, move |svc, ctx| svc.update(ctx, patch)).await
    }

    async fn restore(
        &self,
        ctx: &SecurityContext,
        uploaded: Vec<u8>,
        source_name: Option<String>,
    ) -> Result<RestoreOutcome, SettingsError> {
        self.run(ctx, move |svc, ctx| {
            svc.restore(ctx, &uploaded, source_name.as_deref())
        })
        .await
    }

    async fn export_backup(
        &self,
        ctx: &SecurityContext,
    ) -> Result<ExportedDocument, SettingsError> {
        self.run(ctx, |svc, ctx| svc.export_backup(ctx)).await
    }

    async fn list_backups(&self, ctx: &SecurityContext) -> Result<Vec<BackupInfo>, SettingsError> {
        self.run(ctx, |svc, ctx| svc.list_backups(ctx)).await
    }
}
