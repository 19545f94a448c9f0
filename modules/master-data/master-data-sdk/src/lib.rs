//! Master Data SDK
//!
//! Public contract of the `master-data` module: admin-curated lookup entries
//! keyed by `(category, code)` and the CSV reconciler that fills them.
//!
//! - [`MasterDataApi`] trait
//! - Models ([`MasterDataRecord`], [`NewMasterData`], [`MasterDataPatch`], [`ImportBatchResult`])
//! - Error type ([`MasterDataError`])

pub mod api;
pub mod errors;
pub mod models;

pub use api::MasterDataApi;
pub use errors::MasterDataError;
pub use models::{
    ImportBatchResult, MasterDataPatch, MasterDataRecord, NewMasterData, RawRow,
};
