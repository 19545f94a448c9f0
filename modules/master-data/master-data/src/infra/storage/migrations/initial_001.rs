use sea_orm_migration::prelude::*;

pub const UNIQUE_KEY_INDEX: &str = "uq_master_data_category_code";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MasterData::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MasterData::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MasterData::Category).string_len(50).not_null())
                    .col(ColumnDef::new(MasterData::Code).string_len(50).not_null())
                    .col(ColumnDef::new(MasterData::Name).string_len(100).not_null())
                    .col(ColumnDef::new(MasterData::Description).string_len(500))
                    .col(ColumnDef::new(MasterData::Icon).string_len(50))
                    .col(ColumnDef::new(MasterData::Tags).string_len(100))
                    .col(
                        ColumnDef::new(MasterData::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(MasterData::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(MasterData::CreatedById).integer().not_null())
                    .col(
                        ColumnDef::new(MasterData::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MasterData::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_master_data_created_by")
                            .from(MasterData::Table, MasterData::CreatedById)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(UNIQUE_KEY_INDEX)
                    .table(MasterData::Table)
                    .col(MasterData::Category)
                    .col(MasterData::Code)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MasterData::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum MasterData {
    Table,
    Id,
    Category,
    Code,
    Name,
    Description,
    Icon,
    Tags,
    SortOrder,
    IsActive,
    CreatedById,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
