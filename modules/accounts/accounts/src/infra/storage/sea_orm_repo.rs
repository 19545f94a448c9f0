use accounts_sdk::{Account, AccountPatch, NewAccount, UserPreferences};
use admin_api::{Page, PageRequest};
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, SqlErr, TransactionTrait,
};

use crate::domain::error::DomainError;
use crate::domain::repo::{ProfileChanges, UsersRepository};

use super::entity::{self, Column, Entity as UserEntity, preferences};

pub struct SeaOrmUsersRepository {
    db: DatabaseConnection,
}

impl SeaOrmUsersRepository {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn require(&self, id: i32) -> Result<entity::Model, DomainError> {
        UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error)?
            .ok_or_else(|| DomainError::not_found(id))
    }
}

fn db_error(e: DbErr) -> DomainError {
    DomainError::database(e.to_string())
}

/// Map a write error, turning unique-constraint violations into `DuplicateKey`.
fn write_error(e: DbErr, username: &str, email: &str) -> DomainError {
    if let Some(SqlErr::UniqueConstraintViolation(detail)) = e.sql_err() {
        return if detail.contains("username") {
            DomainError::duplicate_key("username", username)
        } else {
            DomainError::duplicate_key("email", email)
        };
    }
    db_error(e)
}

/// Map a delete error, turning foreign-key violations into `InUse`.
fn delete_error(e: DbErr, id: i32) -> DomainError {
    if let Some(SqlErr::ForeignKeyConstraintViolation(_)) = e.sql_err() {
        return DomainError::InUse { id };
    }
    db_error(e)
}

#[async_trait]
impl UsersRepository for SeaOrmUsersRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Account>, DomainError> {
        let found = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error)?;
        Ok(found.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError> {
        let found = UserEntity::find()
            .filter(Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(db_error)?;
        Ok(found.map(Into::into))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, DomainError> {
        let found = UserEntity::find()
            .filter(Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(db_error)?;
        Ok(found.map(Into::into))
    }

    async fn list(&self, page: PageRequest) -> Result<Page<Account>, DomainError> {
        let paginator = UserEntity::find()
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

    async fn insert(&self, new_account: NewAccount) -> Result<Account, DomainError> {
        let now = Utc::now();
        let active_model = entity::ActiveModel {
            id: ActiveValue::NotSet,
            username: ActiveValue::Set(new_account.username.clone()),
            email: ActiveValue::Set(new_account.email.clone()),
            full_name: ActiveValue::Set(new_account.full_name),
            is_active: ActiveValue::Set(true),
            is_admin: ActiveValue::Set(new_account.is_admin),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        };
        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| write_error(e, &new_account.username, &new_account.email))?;
        Ok(model.into())
    }

    async fn update(&self, id: i32, patch: AccountPatch) -> Result<Account, DomainError> {
        let existing = self.require(id).await?;
        let username = patch.username.clone().unwrap_or_else(|| existing.username.clone());
        let email = patch.email.clone().unwrap_or_else(|| existing.email.clone());

        let mut active_model: entity::ActiveModel = existing.into();
        if let Some(v) = patch.username {
            active_model.username = ActiveValue::Set(v);
        }
        if let Some(v) = patch.email {
            active_model.email = ActiveValue::Set(v);
        }
        if let Some(v) = patch.full_name {
            active_model.full_name = ActiveValue::Set(Some(v));
        }
        if let Some(v) = patch.is_admin {
            active_model.is_admin = ActiveValue::Set(v);
        }
        active_model.updated_at = ActiveValue::Set(Utc::now());

        let model = active_model
            .update(&self.db)
            .await
            .map_err(|e| write_error(e, &username, &email))?;
        Ok(model.into())
    }

    async fn set_active(&self, id: i32, active: bool) -> Result<Account, DomainError> {
        let mut active_model: entity::ActiveModel = self.require(id).await?.into();
        active_model.is_active = ActiveValue::Set(active);
        active_model.updated_at = ActiveValue::Set(Utc::now());
        let model = active_model.update(&self.db).await.map_err(db_error)?;
        Ok(model.into())
    }

    async fn count(&self, active_only: bool) -> Result<u64, DomainError> {
        let mut query = UserEntity::find();
        if active_only {
            query = query.filter(Column::IsActive.eq(true));
        }
        query.count(&self.db).await.map_err(db_error)
    }

    async fn find_preferences(&self, user_id: i32) -> Result<Option<UserPreferences>, DomainError> {
        let found = preferences::Entity::find()
            .filter(preferences::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(db_error)?;
        Ok(found.map(Into::into))
    }

    async fn save_profile(
        &self,
        id: i32,
        changes: ProfileChanges,
    ) -> Result<(Account, UserPreferences), DomainError> {
        let now = Utc::now();
        // Dropping the transaction on an early return rolls it back.
        let txn = self.db.begin().await.map_err(db_error)?;

        let existing = UserEntity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_error)?
            .ok_or_else(|| DomainError::not_found(id))?;
        let username = existing.username.clone();
        let mut user: entity::ActiveModel = existing.into();
        user.email = ActiveValue::Set(changes.email.clone());
        user.full_name = ActiveValue::Set(changes.full_name);
        user.updated_at = ActiveValue::Set(now);
        let user = user
            .update(&txn)
            .await
            .map_err(|e| write_error(e, &username, &changes.email))?;

        let prefs = changes.preferences;
        let stored = preferences::Entity::find()
            .filter(preferences::Column::UserId.eq(id))
            .one(&txn)
            .await
            .map_err(db_error)?;
        let saved = match stored {
            Some(row) => {
                let mut row: preferences::ActiveModel = row.into();
                row.theme = ActiveValue::Set(prefs.theme);
                row.language = ActiveValue::Set(prefs.language);
                row.sidebar_pinned = ActiveValue::Set(prefs.sidebar_pinned);
                row.notifications_enabled = ActiveValue::Set(prefs.notifications_enabled);
                row.updated_at = ActiveValue::Set(now);
                row.update(&txn).await
            }
            None => {
                preferences::ActiveModel {
                    id: ActiveValue::NotSet,
                    user_id: ActiveValue::Set(id),
                    theme: ActiveValue::Set(prefs.theme),
                    language: ActiveValue::Set(prefs.language),
                    sidebar_pinned: ActiveValue::Set(prefs.sidebar_pinned),
                    notifications_enabled: ActiveValue::Set(prefs.notifications_enabled),
                    created_at: ActiveValue::Set(now),
                    updated_at: ActiveValue::Set(now),
                }
                .insert(&txn)
                .await
            }
        }
        .map_err(db_error)?;

        txn.commit().await.map_err(db_error)?;
        Ok((user.into(), saved.into()))
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let txn = self.db.begin().await.map_err(db_error)?;
        preferences::Entity::delete_many()
            .filter(preferences::Column::UserId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_error)?;
        let deleted = UserEntity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| delete_error(e, id))?;
        if deleted.rows_affected == 0 {
            return Err(DomainError::not_found(id));
        }
        txn.commit().await.map_err(|e| delete_error(e, id))?;
        Ok(())
    }
}
