use accounts_sdk::AccountPatch;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

/// Partial user update from the admin user editor.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatchUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub is_admin: Option<bool>,
}

impl From<PatchUserRequest> for AccountPatch {
    fn from(req: PatchUserRequest) -> Self {
        Self {
            username: req.username,
            email: req.email,
            full_name: req.full_name,
            is_admin: req.is_admin,
        }
    }
}
