//! Filesystem-backed settings store.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use system_settings_sdk::{BackupInfo, BackupKind};
use tempfile::NamedTempFile;

use crate::domain::error::DomainError;
use crate::domain::naming;
use crate::domain::store::ConfigStore;

/// Upper bound on `_<n>` suffixes tried for one timestamp.
const MAX_NAME_ATTEMPTS: u32 = 1000;

pub struct FileConfigStore {
    live_path: PathBuf,
    backup_dir: PathBuf,
}

impl FileConfigStore {
    #[must_use]
    pub fn new(live_path: PathBuf, backup_dir: PathBuf) -> Self {
        Self {
            live_path,
            backup_dir,
        }
    }

    fn live_dir(&self) -> &Path {
        self.live_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
    }
}

impl ConfigStore for FileConfigStore {
    fn location(&self) -> String {
        self.live_path.display().to_string()
    }

    fn live_exists(&self) -> bool {
        self.live_path.is_file()
    }

    fn read_live(&self) -> Result<Vec<u8>, DomainError> {
        fs::read(&self.live_path).map_err(|source| DomainError::StorageUnavailable {
            path: self.location(),
            source,
        })
    }

    fn write_backup(
        &self,
        kind: BackupKind,
        taken_at: DateTime<Utc>,
        bytes: &[u8],
    ) -> Result<String, DomainError> {
        let first = naming::backup_file_name(kind, taken_at, 0);
        fs::create_dir_all(&self.backup_dir).map_err(|source| DomainError::BackupWrite {
            file: first.clone(),
            source,
        })?;

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let name = naming::backup_file_name(kind, taken_at, attempt);
            let path = self.backup_dir.join(&name);
            let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(source) => return Err(DomainError::BackupWrite { file: name, source }),
            };
            file.write_all(bytes)
                .and_then(|()| file.sync_all())
                .map_err(|source| DomainError::BackupWrite {
                    file: name.clone(),
                    source,
                })?;
            return Ok(name);
        }

        Err(DomainError::BackupWrite {
            file: first,
            source: std::io::Error::new(
                ErrorKind::AlreadyExists,
                "too many backups with the same timestamp",
            ),
        })
    }

    fn replace_live(&self, bytes: &[u8]) -> Result<(), DomainError> {
        let live_write = |source| DomainError::LiveWrite {
            backup_file: None,
            source,
        };
        // Same directory as the live file so the final rename stays on one filesystem.
        let mut tmp = NamedTempFile::new_in(self.live_dir()).map_err(live_write)?;
        tmp.write_all(bytes).map_err(live_write)?;
        tmp.as_file().sync_all().map_err(live_write)?;
        tmp.persist(&self.live_path)
            .map_err(|e| live_write(e.error))?;
        Ok(())
    }

    fn list_backups(&self) -> Result<Vec<BackupInfo>, DomainError> {
        let entries = match fs::read_dir(&self.backup_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(DomainError::BackupListing(e)),
        };

        let mut found = Vec::new();
        for entry in entries {
            let entry = entry.map_err(DomainError::BackupListing)?;
            let Some(file_name) = entry.file_name().to_str().map(str::to_owned) else {
                continue;
            };
            let Some(parsed) = naming::parse_backup_name(&file_name) else {
                continue;
            };
            let metadata = entry.metadata().map_err(DomainError::BackupListing)?;
            if !metadata.is_file() {
                continue;
            }
            let modified = metadata
                .modified()
                .map_or_else(|_| parsed.taken_at.and_utc(), DateTime::<Utc>::from);
            found.push((
                parsed,
                BackupInfo {
                    file_name,
                    kind: parsed.kind,
                    size_bytes: metadata.len(),
                    modified,
                },
            ));
        }

        found.sort_by(|(a, a_info), (b, b_info)| {
            b.taken_at
                .cmp(&a.taken_at)
                .then_with(|| b.attempt.cmp(&a.attempt))
                .then_with(|| b_info.file_name.cmp(&a_info.file_name))
        });
        Ok(found.into_iter().map(|(_, info)| info).collect())
    }
}
