use master_data_sdk::MasterDataRecord;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "master_data")]
pub struct Model {
    #[sea_orm(primary_key)]
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
    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for MasterDataRecord {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            category: m.category,
            code: m.code,
            name: m.name,
            description: m.description,
            icon: m.icon,
            tags: m.tags,
            sort_order: m.sort_order,
            is_active: m.is_active,
            created_by_id: m.created_by_id,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
