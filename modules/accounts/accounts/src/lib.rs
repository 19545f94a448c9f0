//! Accounts Module Implementation
//!
//! The public API is defined in `accounts-sdk` and re-exported here.

pub use accounts_sdk::{
    Account, AccountPatch, AccountStats, AccountsApi, AccountsError, NewAccount, Profile,
    ProfileUpdate, UserPreferences,
};

pub mod api;
pub mod domain;
pub mod infra;
pub mod local_client;

use std::sync::Arc;

use sea_orm::DatabaseConnection;

pub use infra::storage::migrations::Migrator;
pub use local_client::AccountsLocalClient;

/// Wire the sea-orm repository, service and local client for one connection.
#[must_use]
pub fn build(db: DatabaseConnection) -> (Arc<domain::service::Service>, Arc<dyn AccountsApi>) {
    let repo = Arc::new(infra::storage::sea_orm_repo::SeaOrmUsersRepository::new(db));
    let service = Arc::new(domain::service::Service::new(repo));
    let client: Arc<dyn AccountsApi> = Arc::new(AccountsLocalClient::new(service.clone()));
    (service, client)
}
