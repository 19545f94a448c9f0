//! Accounts SDK
//!
//! Public contract of the `accounts` module: the identity directory the
//! other admin modules resolve actors through.
//!
//! - [`AccountsApi`] trait
//! - Models ([`Account`], [`NewAccount`], [`AccountPatch`], [`AccountStats`],
//!   [`Profile`], [`ProfileUpdate`], [`UserPreferences`])
//! - Error type ([`AccountsError`])

pub mod api;
pub mod errors;
pub mod models;

pub use api::AccountsApi;
pub use errors::AccountsError;
pub use models::{
    Account, AccountPatch, AccountStats, LANGUAGES, NewAccount, Profile, ProfileUpdate, THEMES,
    UserPreferences,
};
