//! Public models for the master-data module.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One import row: column name to raw cell text.
pub type RawRow = HashMap<String, String>;

/// A lookup entry. `(category, code)` is unique across all records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterDataRecord {
    pub id: i32,
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
    pub updated_at: DateTime<Utc>,
}

/// Data for creating a record by hand. The creator is the calling admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMasterData {
    pub category: String,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Partial update of a record. `None` leaves the field unchanged; an empty
/// string clears `description`, `icon` or `tags`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MasterDataPatch {
    pub category: Option<String>,
    pub code: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub tags: Option<String>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

impl MasterDataPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Outcome of one import run. Never persisted.
///
/// `rows_added + rows_skipped_existing + rows_failed == rows_seen` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportBatchResult {
    pub rows_seen: u64,
    pub rows_added: u64,
    pub rows_skipped_existing: u64,
    pub rows_failed: u64,
}

impl ImportBatchResult {
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.rows_added + self.rows_skipped_existing + self.rows_failed == self.rows_seen
    }
}
