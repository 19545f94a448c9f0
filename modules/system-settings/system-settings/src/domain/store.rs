use chrono::{DateTime, Utc};
use system_settings_sdk::{BackupInfo, BackupKind};

use super::error::DomainError;

/// Storage port for the live settings document and its backups.
pub trait ConfigStore: Send + Sync {
    /// Location of the live document, for diagnostics.
    fn location(&self) -> String;

    fn live_exists(&self) -> bool;

    /// # Errors
    /// [`DomainError::StorageUnavailable`] when the document is missing or unreadable.
    fn read_live(&self) -> Result<Vec<u8>, DomainError>;

    /// Durably write a new backup and return its file name.
    /// Existing backups are never overwritten.
    ///
    /// # Errors
    /// [`DomainError::BackupWrite`] when the backup cannot be created.
    fn write_backup(
        &self,
        kind: BackupKind,
        taken_at: DateTime<Utc>,
        bytes: &[u8],
    ) -> Result<String, DomainError>;

    /// Atomically replace the live document. On error the previous document is intact.
    ///
    /// # Errors
    /// [`DomainError::LiveWrite`] when the replacement cannot be completed.
    fn replace_live(&self, bytes: &[u8]) -> Result<(), DomainError>;

    /// # Errors
    /// [`DomainError::BackupListing`] when the backup directory cannot be read.
    fn list_backups(&self) -> Result<Vec<BackupInfo>, DomainError>;
}
