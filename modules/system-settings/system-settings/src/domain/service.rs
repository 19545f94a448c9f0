use std::sync::Arc;

use admin_security::{OperationStatus, SecurityContext, log_operation};
use chrono::Utc;
use serde_json::json;
use system_settings_sdk::{
    BackupInfo, BackupKind, ConfigDocument, ConfigPatch, ExportedDocument, REQUIRED_KEYS,
    RestoreOutcome,
};

use super::error::DomainError;
use super::merge::{apply_patch, validate_patch};
use super::naming;
use super::store::ConfigStore;
use crate::config::FieldLimits;

const OP_LOAD: &str = "System Settings Load";
const OP_UPDATE: &str = "System Settings Update";
const OP_RESTORE: &str = "Configuration Restore";
const OP_BACKUP: &str = "Configuration Backup";
const OP_LIST: &str = "Configuration Backup List";

/// Settings store operations. Each call reads the live document afresh;
/// nothing is cached between calls.
///
/// Concurrent `update`/`restore` calls on the same document are not
/// serialised against each other.
pub struct Service {
    store: Arc<dyn ConfigStore>,
    limits: FieldLimits,
}

impl Service {
    #[must_use]
    pub fn new(store: Arc<dyn ConfigStore>, limits: FieldLimits) -> Self {
        Self { store, limits }
    }

    /// # Errors
    /// `Forbidden`, `StorageUnavailable` or `MalformedDocument`.
    pub fn load(&self, ctx: &SecurityContext) -> Result<ConfigDocument, DomainError> {
        ctx.require_admin_for(OP_LOAD)?;
        let result = self.read_current().map(|(_, doc)| doc);
        if let Err(e) = &result {
            tracing::error!(error = %e, path = %self.store.location(), "Error loading configuration");
            log_operation(
                OP_LOAD,
                OperationStatus::Error,
                ctx.actor_id(),
                &json!({"error": e.to_string()}),
            );
        }
        result
    }

    /// Back up the live document, merge `patch` over it and atomically replace it.
    ///
    /// # Errors
    /// `Forbidden` and `Validation` before anything is read; `StorageUnavailable` or
    /// `MalformedDocument` if the live document cannot be loaded; `BackupWrite`,
    /// `Encode` or `LiveWrite` when persisting fails, in which case the live
    /// document is unchanged.
    pub fn update(
        &self,
        ctx: &SecurityContext,
        patch: ConfigPatch,
    ) -> Result<ConfigDocument, DomainError> {
        ctx.require_admin_for(OP_UPDATE)?;
        validate_patch(&patch, &self.limits)?;

        let result = self.update_inner(patch);
        match &result {
            Ok((doc, backup_file)) => {
                tracing::info!(backup_file = %backup_file, app_name = %doc.app_name, "Configuration updated");
                log_operation(
                    OP_UPDATE,
                    OperationStatus::Success,
                    ctx.actor_id(),
                    &json!({"user_id": ctx.actor_id(), "backup_file": backup_file}),
                );
            }
            Err(e) => {
                tracing::error!(error = %e, "Error updating configuration");
                log_operation(
                    OP_UPDATE,
                    OperationStatus::Error,
                    ctx.actor_id(),
                    &json!({
                        "user_id": ctx.actor_id(),
                        "error": e.to_string(),
                        "backup_file": e.backup_file(),
                    }),
                );
            }
        }
        result.map(|(doc, _)| doc)
    }

    fn update_inner(&self, patch: ConfigPatch) -> Result<(ConfigDocument, String), DomainError> {
        let (current_bytes, current) = self.read_current()?;
        let merged = apply_patch(current, patch)?;
        let encoded = serde_json::to_vec_pretty(&merged).map_err(DomainError::Encode)?;

        let backup_file =
            self.store
                .write_backup(BackupKind::Routine, Utc::now(), &current_bytes)?;
        tracing::debug!(backup_file = %backup_file, "Backup created");

        self.store
            .replace_live(&encoded)
            .map_err(|e| with_backup_file(e, &backup_file))?;
        Ok((merged, backup_file))
    }

    /// Back up the live document and replace it with `uploaded` as-is.
    ///
    /// # Errors
    /// `Forbidden`; `InvalidRestoreDocument` when `uploaded` is not a JSON object
    /// carrying every required key; `BackupWrite` or `LiveWrite` when persisting fails.
    pub fn restore(
        &self,
        ctx: &SecurityContext,
        uploaded: &[u8],
        source_name: Option<&str>,
    ) -> Result<RestoreOutcome, DomainError> {
        ctx.require_admin_for(OP_RESTORE)?;

        let result = check_restore_document(uploaded).and_then(|()| {
            let backup_file = self.backup_before_restore()?;
            self.store.replace_live(uploaded).map_err(|e| match &backup_file {
                Some(name) => with_backup_file(e, name),
                None => e,
            })?;
            Ok(backup_file)
        });

        match &result {
            Ok(backup_file) => log_operation(
                OP_RESTORE,
                OperationStatus::Success,
                ctx.actor_id(),
                &json!({"backup_file": backup_file, "restored_from": source_name}),
            ),
            Err(DomainError::InvalidRestoreDocument(reason)) => {
                tracing::warn!(reason = %reason, restored_from = ?source_name, "Rejected restore document");
                log_operation(
                    OP_RESTORE,
                    OperationStatus::Error,
                    ctx.actor_id(),
                    &json!({"error": "Invalid configuration format"}),
                );
            }
            Err(e) => log_operation(
                OP_RESTORE,
                OperationStatus::Error,
                ctx.actor_id(),
                &json!({"error": e.to_string(), "backup_file": e.backup_file()}),
            ),
        }
        result.map(|backup_file| RestoreOutcome {
            backup_file,
            restored_from: source_name.map(str::to_owned),
        })
    }

    fn backup_before_restore(&self) -> Result<Option<String>, DomainError> {
        if !self.store.live_exists() {
            tracing::warn!(
                path = %self.store.location(),
                "No live settings document; restoring without a pre-restore backup"
            );
            return Ok(None);
        }
        // Backed up raw, so a malformed live document is still preserved.
        let current = self.store.read_live()?;
        let name = self
            .store
            .write_backup(BackupKind::BeforeRestore, Utc::now(), &current)?;
        Ok(Some(name))
    }

    /// # Errors
    /// `Forbidden` or `StorageUnavailable`.
    pub fn export_backup(&self, ctx: &SecurityContext) -> Result<ExportedDocument, DomainError> {
        ctx.require_admin_for(OP_BACKUP)?;
        let file_name = naming::export_file_name(Utc::now());
        match self.store.read_live() {
            Ok(bytes) => {
                log_operation(
                    OP_BACKUP,
                    OperationStatus::Success,
                    ctx.actor_id(),
                    &json!({"filename": file_name}),
                );
                Ok(ExportedDocument { file_name, bytes })
            }
            Err(e) => {
                log_operation(
                    OP_BACKUP,
                    OperationStatus::Error,
                    ctx.actor_id(),
                    &json!({"error": e.to_string()}),
                );
                Err(e)
            }
        }
    }

    /// # Errors
    /// `Forbidden` or `BackupListing`.
    pub fn list_backups(&self, ctx: &SecurityContext) -> Result<Vec<BackupInfo>, DomainError> {
        ctx.require_admin_for(OP_LIST)?;
        self.store.list_backups()
    }

    fn read_current(&self) -> Result<(Vec<u8>, ConfigDocument), DomainError> {
        let bytes = self.store.read_live()?;
        let doc = serde_json::from_slice(&bytes).map_err(DomainError::MalformedDocument)?;
        Ok((bytes, doc))
    }
}

fn with_backup_file(e: DomainError, backup_file: &str) -> DomainError {
    match e {
        DomainError::LiveWrite { source, .. } => DomainError::LiveWrite {
            backup_file: Some(backup_file.to_owned()),
            source,
        },
        other => other,
    }
}

/// Structural check of an uploaded document: a JSON object with every required key.
/// Section contents are left to whoever loads the document next.
fn check_restore_document(uploaded: &[u8]) -> Result<(), DomainError> {
    let value: serde_json::Value = serde_json::from_slice(uploaded)
        .map_err(|e| DomainError::invalid_restore(format!("not valid JSON: {e}")))?;
    let Some(object) = value.as_object() else {
        return Err(DomainError::invalid_restore("document must be a JSON object"));
    };
    let missing: Vec<&str> = REQUIRED_KEYS
        .iter()
        .copied()
        .filter(|key| !object.contains_key(*key))
        .collect();
    if !missing.is_empty() {
        return Err(DomainError::invalid_restore(format!(
            "missing required keys: {}",
            missing.join(", ")
        )));
    }
    Ok(())
}
