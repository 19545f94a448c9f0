use admin_api::{Page, PageRequest};
use async_trait::async_trait;
use chrono::Utc;
use master_data_sdk::{MasterDataPatch, MasterDataRecord};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, SqlErr, TransactionTrait,
};

use crate::domain::error::DomainError;
use crate::domain::repo::{MasterDataRepository, NewRecord};

use super::entity::{self, Column, Entity as MasterDataEntity};

pub struct SeaOrmMasterDataRepository {
    db: DatabaseConnection,
}

impl SeaOrmMasterDataRepository {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn require(&self, id: i32) -> Result<entity::Model, DomainError> {
        MasterDataEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error)?
            .ok_or_else(|| DomainError::not_found(id))
    }
}

fn db_error(e: DbErr) -> DomainError {
    DomainError::database(e.to_string())
}

/// Map a write error, turning the `(category, code)` unique violation into `DuplicateKey`.
fn write_error(e: DbErr, category: &str, code: &str) -> DomainError {
    if let Some(SqlErr::UniqueConstraintViolation(_)) = e.sql_err() {
        return DomainError::duplicate_key(category, code);
    }
    db_error(e)
}

fn to_active_model(record: NewRecord) -> entity::ActiveModel {
    entity::ActiveModel {
        id: ActiveValue::NotSet,
        category: ActiveValue::Set(record.category),
        code: ActiveValue::Set(record.code),
        name: ActiveValue::Set(record.name),
        description: ActiveValue::Set(record.description),
        icon: ActiveValue::Set(record.icon),
        tags: ActiveValue::Set(record.tags),
        sort_order: ActiveValue::Set(record.sort_order),
        is_active: ActiveValue::Set(record.is_active),
        created_by_id: ActiveValue::Set(record.created_by_id),
        created_at: ActiveValue::Set(record.created_at),
        updated_at: ActiveValue::Set(Utc::now()),
    }
}

/// Empty text clears an optional column.
fn optional(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

async fn insert_all<C>(conn: &C, records: Vec<NewRecord>) -> Result<u64, DbErr>
where
    C: ConnectionTrait,
{
    let mut inserted = 0;
    for record in records {
        to_active_model(record).insert(conn).await?;
        inserted += 1;
    }
    Ok(inserted)
}

#[async_trait]
impl MasterDataRepository for SeaOrmMasterDataRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<MasterDataRecord>, DomainError> {
        let found = MasterDataEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error)?;
        Ok(found.map(Into::into))
    }

    async fn find_by_key(
        &self,
        category: &str,
        code: &str,
    ) -> Result<Option<MasterDataRecord>, DomainError> {
        let found = MasterDataEntity::find()
            .filter(Column::Category.eq(category))
            .filter(Column::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(db_error)?;
        Ok(found.map(Into::into))
    }

    async fn list(
        &self,
        category: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<MasterDataRecord>, DomainError> {
        let mut query = MasterDataEntity::find();
        if let Some(category) = category {
            query = query.filter(Column::Category.eq(category));
        }
        let paginator = query
            .order_by_asc(Column::Category)
            .order_by_asc(Column::SortOrder)
            .order_by_asc(Column::Id)
            .paginate(&self.db, page.per_page);
        let total = paginator.num_items().await.map_err(db_error)?;
        let items = paginator
            .fetch_page(page.index())
            .await
            .map_err(db_error)?;
        Ok(Page::new(
            items.into_iter().map(Into::into).collect(),
            page,
            total,
        ))
    }

    async fn categories(&self) -> Result<Vec<String>, DomainError> {
        MasterDataEntity::find()
            .select_only()
            .column(Column::Category)
            .distinct()
            .order_by_asc(Column::Category)
            .into_tuple::<String>()
            .all(&self.db)
            .await
            .map_err(db_error)
    }

    async fn insert(&self, record: NewRecord) -> Result<MasterDataRecord, DomainError> {
        let (category, code) = record.key();
        let model = to_active_model(record)
            .insert(&self.db)
            .await
            .map_err(|e| write_error(e, &category, &code))?;
        Ok(model.into())
    }

    async fn insert_batch(&self, records: Vec<NewRecord>) -> Result<u64, DomainError> {
        let batch_size = records.len();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DomainError::batch_commit(e.to_string()))?;

        let inserted = match insert_all(&txn, records).await {
            Ok(inserted) => inserted,
            Err(e) => {
                tracing::error!(error = %e, batch_size, "Import batch insert failed; rolling back");
                if let Err(rollback) = txn.rollback().await {
                    tracing::error!(error = %rollback, "Rollback of import batch failed");
                }
                return Err(DomainError::batch_commit(e.to_string()));
            }
        };

        txn.commit()
            .await
            .map_err(|e| DomainError::batch_commit(e.to_string()))?;
        tracing::debug!(inserted, "Import batch committed");
        Ok(inserted)
    }

    async fn update(
        &self,
        id: i32,
        patch: MasterDataPatch,
    ) -> Result<MasterDataRecord, DomainError> {
        let existing = self.require(id).await?;
        let category = patch
            .category
            .clone()
            .unwrap_or_else(|| existing.category.clone());
        let code = patch.code.clone().unwrap_or_else(|| existing.code.clone());

        let mut active_model: entity::ActiveModel = existing.into();
        if let Some(v) = patch.category {
            active_model.category = ActiveValue::Set(v);
        }
        if let Some(v) = patch.code {
            active_model.code = ActiveValue::Set(v);
        }
        if let Some(v) = patch.name {
            active_model.name = ActiveValue::Set(v);
        }
        if let Some(v) = patch.description {
            active_model.description = ActiveValue::Set(optional(v));
        }
        if let Some(v) = patch.icon {
            active_model.icon = ActiveValue::Set(optional(v));
        }
        if let Some(v) = patch.tags {
            active_model.tags = ActiveValue::Set(optional(v));
        }
        if let Some(v) = patch.sort_order {
            active_model.sort_order = ActiveValue::Set(v);
        }
        if let Some(v) = patch.is_active {
            active_model.is_active = ActiveValue::Set(v);
        }
        active_model.updated_at = ActiveValue::Set(Utc::now());

        let model = active_model
            .update(&self.db)
            .await
            .map_err(|e| write_error(e, &category, &code))?;
        Ok(model.into())
    }

    async fn delete(&self, id: i32) -> Result<bool, DomainError> {
        let result = MasterDataEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_error)?;
        Ok(result.rows_affected > 0)
    }

    async fn delete_all(&self) -> Result<u64, DomainError> {
        let result = MasterDataEntity::delete_many()
            .exec(&self.db)
            .await
            .map_err(db_error)?;
        Ok(result.rows_affected)
    }

    async fn count(&self) -> Result<u64, DomainError> {
        MasterDataEntity::find()
            .count(&self.db)
            .await
            .map_err(db_error)
    }
}
