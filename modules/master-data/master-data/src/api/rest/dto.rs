use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteAllQuery {
    #[serde(default)]
    pub confirm: bool,
}

/// Outcome of a delete-all request. Without confirmation `count` is the
/// number of records that would be deleted and nothing is removed.
#[derive(Debug, Serialize)]
pub struct DeleteAllResponse {
    pub count: u64,
    pub deleted: bool,
}
