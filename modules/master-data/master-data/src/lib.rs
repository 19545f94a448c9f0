//! Master Data Module Implementation
//!
//! The public API is defined in `master-data-sdk` and re-exported here.

pub use master_data_sdk::{
    ImportBatchResult, MasterDataApi, MasterDataError, MasterDataPatch, MasterDataRecord,
    NewMasterData, RawRow,
};

pub mod api;
pub mod config;
pub mod domain;
pub mod infra;
pub mod local_client;

use std::sync::Arc;

use accounts_sdk::AccountsApi;
use sea_orm::DatabaseConnection;

pub use config::MasterDataConfig;
pub use infra::storage::migrations::Migrator;
pub use local_client::MasterDataLocalClient;

/// Wire the sea-orm repository, account directory, service and local client.
///
/// The master-data tables reference `users`, so the accounts migrator must
/// have run on `db` before [`Migrator`].
#[must_use]
pub fn build(
    db: DatabaseConnection,
    accounts: Arc<dyn AccountsApi>,
) -> (Arc<domain::service::Service>, Arc<dyn MasterDataApi>) {
    let repo = Arc::new(infra::storage::sea_orm_repo::SeaOrmMasterDataRepository::new(db));
    let directory = Arc::new(infra::directory::AccountsDirectory::new(accounts));
    let service = Arc::new(domain::service::Service::new(repo, directory));
    let client: Arc<dyn MasterDataApi> = Arc::new(MasterDataLocalClient::new(service.clone()));
    (service, client)
}
