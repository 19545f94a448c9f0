//! Public models for the accounts module.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub is_active: bool,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for creating a new account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

/// Partial update of an account. `None` leaves the field unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountPatch {
    pub username: Option<String>,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub is_admin: Option<bool>,
}

impl AccountPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.full_name.is_none()
            && self.is_admin.is_none()
    }
}

/// Themes a user may pick for their own session.
pub const THEMES: [&str; 2] = ["light", "dark"];

/// Interface languages a user may pick.
pub const LANGUAGES: [&str; 3] = ["en", "es", "fr"];

/// Per-user interface preferences. Users without a stored row get the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPreferences {
    pub theme: String,
    pub language: String,
    pub sidebar_pinned: bool,
    pub notifications_enabled: bool,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            theme: THEMES[0].to_owned(),
            language: LANGUAGES[0].to_owned(),
            sidebar_pinned: true,
            notifications_enabled: true,
        }
    }
}

/// The caller's own account together with their preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub account: Account,
    pub preferences: UserPreferences,
}

/// Self-service profile change. `None` leaves the field unchanged; an empty
/// `full_name` clears it. Username and admin flag are not self-editable.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProfileUpdate {
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub theme: Option<String>,
    pub language: Option<String>,
    pub sidebar_pinned: Option<bool>,
    pub notifications_enabled: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountStats {
    pub total_users: u64,
    pub active_users: u64,
}
