//! `SystemSettingsApi` trait definition.

use admin_security::SecurityContext;
use async_trait::async_trait;

use crate::errors::SettingsError;
use crate::models::{BackupInfo, ConfigDocument, ConfigPatch, ExportedDocument, RestoreOutcome};

/// Public API of the settings store.
///
/// Every operation requires an administrator and refuses other callers with
/// [`SettingsError::PermissionDenied`] before the filesystem is touched.
#[async_trait]
pub trait SystemSettingsApi: Send + Sync {
    /// Read and parse the live document.
    async fn load(&self, ctx: &SecurityContext) -> Result<ConfigDocument, SettingsError>;

    /// Back up the live document, then replace it with `patch` merged over it.
    async fn update(
        &self,
        ctx: &SecurityContext,
        patch: ConfigPatch,
    ) -> Result<ConfigDocument, SettingsError>;

    /// Back up the live document, then replace it with `uploaded` verbatim.
    ///
    /// Only the shape is checked: a JSON object carrying every key in
    /// [`crate::REQUIRED_KEYS`]. Section contents are not validated.
    /// `source_name` is the uploaded file's name, recorded in the audit trail.
    async fn restore(
        &self,
        ctx: &SecurityContext,
        uploaded: Vec<u8>,
        source_name: Option<String>,
    ) -> Result<RestoreOutcome, SettingsError>;

    /// Live document bytes with a timestamped download name. Creates no backup.
    async fn export_backup(&self, ctx: &SecurityContext)
    -> Result<ExportedDocument, SettingsError>;

    /// Existing backups, newest first.
    async fn list_backups(&self, ctx: &SecurityContext) -> Result<Vec<BackupInfo>, SettingsError>;
}
