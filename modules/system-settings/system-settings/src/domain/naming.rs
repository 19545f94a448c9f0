//! Backup file names.
//!
//! `config_backup_<YYYYMMDD_HHMMSS>.json` for routine backups and
//! `config_backup_before_restore_<YYYYMMDD_HHMMSS>.json` for pre-restore ones,
//! timestamps in UTC. A second backup within the same second gets `_<n>`
//! appended before the extension.

use chrono::{DateTime, NaiveDateTime, Utc};
use system_settings_sdk::BackupKind;

pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const ROUTINE_PREFIX: &str = "config_backup_";
const BEFORE_RESTORE_PREFIX: &str = "config_backup_before_restore_";
const EXTENSION: &str = ".json";

#[must_use]
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// File name for the `attempt`-th backup of `kind` taken at `at`; attempt 0 has no suffix.
#[must_use]
pub fn backup_file_name(kind: BackupKind, at: DateTime<Utc>, attempt: u32) -> String {
    let prefix = match kind {
        BackupKind::Routine => ROUTINE_PREFIX,
        BackupKind::BeforeRestore => BEFORE_RESTORE_PREFIX,
    };
    let ts = timestamp(at);
    if attempt == 0 {
        format!("{prefix}{ts}{EXTENSION}")
    } else {
        format!("{prefix}{ts}_{attempt}{EXTENSION}")
    }
}

/// Suggested download name for an export.
#[must_use]
pub fn export_file_name(at: DateTime<Utc>) -> String {
    backup_file_name(BackupKind::Routine, at, 0)
}

/// A file name recognised as a backup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedName {
    pub kind: BackupKind,
    pub taken_at: NaiveDateTime,
    pub attempt: u32,
}

#[must_use]
pub fn parse_backup_name(file_name: &str) -> Option<ParsedName> {
    let (kind, rest) = if let Some(rest) = file_name.strip_prefix(BEFORE_RESTORE_PREFIX) {
        (BackupKind::BeforeRestore, rest)
    } else {
        (BackupKind::Routine, file_name.strip_prefix(ROUTINE_PREFIX)?)
    };
    let stem = rest.strip_suffix(EXTENSION)?;
    let (ts, attempt) = match stem.get(15..) {
        Some("") => (stem, 0),
        Some(suffix) => (stem.get(..15)?, suffix.strip_prefix('_')?.parse().ok()?),
        None => return None,
    };
    let taken_at = NaiveDateTime::parse_from_str(ts, TIMESTAMP_FORMAT).ok()?;
    Some(ParsedName {
        kind,
        taken_at,
        attempt,
    })
}
