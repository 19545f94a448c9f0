use std::collections::HashSet;
use std::sync::Arc;

use admin_api::{Page, PageRequest};
use admin_security::{OperationStatus, SecurityContext, log_operation};
use chrono::{DateTime, Utc};
use master_data_sdk::{
    ImportBatchResult, MasterDataPatch, MasterDataRecord, NewMasterData, RawRow,
};
use serde_json::json;

use super::csv_source;
use super::error::DomainError;
use super::repo::{MasterDataRepository, NewRecord, UserDirectory};
use super::row::{self, RowError, column};

const OP_VIEW: &str = "Master Data View";
const OP_CREATE: &str = "Master Data Creation";
const OP_UPDATE: &str = "Master Data Update";
const OP_DELETE: &str = "Master Data Deletion";
const OP_IMPORT: &str = "Master Data Import";
const OP_DELETE_ALL: &str = "Master Data Delete All";

/// What happened to one import row that did not fail.
enum Staging {
    Added(NewRecord),
    Existing { category: String, code: String },
}

pub struct Service {
    repo: Arc<dyn MasterDataRepository>,
    directory: Arc<dyn UserDirectory>,
}

impl Service {
    #[must_use]
    pub fn new(repo: Arc<dyn MasterDataRepository>, directory: Arc<dyn UserDirectory>) -> Self {
        Self { repo, directory }
    }

    /// Reconcile raw rows into storage, attributing unknown creators to the caller.
    ///
    /// # Errors
    /// Refuses non-admins; [`DomainError::BatchCommit`] when the staged rows cannot be committed.
    pub async fn import_batch(
        &self,
        ctx: &SecurityContext,
        rows: Vec<RawRow>,
    ) -> Result<ImportBatchResult, DomainError> {
        ctx.require_admin_for(OP_IMPORT)?;
        self.import_rows(ctx, rows.into_iter().map(Ok)).await
    }

    /// # Errors
    /// Refuses non-admins; [`DomainError::InvalidCsv`] for an unreadable header;
    /// [`DomainError::BatchCommit`] as for [`Self::import_batch`].
    pub async fn import_csv(
        &self,
        ctx: &SecurityContext,
        csv: &[u8],
    ) -> Result<ImportBatchResult, DomainError> {
        ctx.require_admin_for(OP_IMPORT)?;
        let rows = match csv_source::read_rows(csv) {
            Ok(rows) => rows,
            Err(e) => {
                log_operation(
                    OP_IMPORT,
                    OperationStatus::Error,
                    ctx.actor_id(),
                    &json!({"error": e.to_string()}),
                );
                return Err(e);
            }
        };
        self.import_rows(ctx, rows).await
    }

    async fn import_rows<I>(
        &self,
        ctx: &SecurityContext,
        rows: I,
    ) -> Result<ImportBatchResult, DomainError>
    where
        I: IntoIterator<Item = Result<RawRow, RowError>> + Send,
        I::IntoIter: Send,
    {
        let now = Utc::now();
        let mut result = ImportBatchResult::default();
        let mut staged = Vec::new();
        let mut staged_keys = HashSet::new();

        for (index, raw) in rows.into_iter().enumerate() {
            let line = index + 1;
            result.rows_seen += 1;
            let outcome = match raw {
                Ok(raw) => self.stage_row(&raw, ctx.subject_id(), now, &staged_keys).await,
                Err(e) => Err(e),
            };
            match outcome {
                Ok(Staging::Added(record)) => {
                    tracing::info!(row = line, category = %record.category, code = %record.code, "Added");
                    staged_keys.insert(record.key());
                    staged.push(record);
                    result.rows_added += 1;
                }
                Ok(Staging::Existing { category, code }) => {
                    tracing::info!(row = line, %category, %code, "Skipping existing record");
                    result.rows_skipped_existing += 1;
                }
                Err(e) => {
                    tracing::warn!(row = line, error = %e, "Error processing row");
                    result.rows_failed += 1;
                }
            }
        }

        if !staged.is_empty()
            && let Err(e) = self.repo.insert_batch(staged).await
        {
            log_operation(
                OP_IMPORT,
                OperationStatus::Error,
                ctx.actor_id(),
                &json!({"error": e.to_string(), "rows_seen": result.rows_seen}),
            );
            return Err(match e {
                DomainError::BatchCommit { .. } => e,
                other => DomainError::batch_commit(other.to_string()),
            });
        }

        tracing::info!(
            rows_seen = result.rows_seen,
            rows_added = result.rows_added,
            rows_skipped_existing = result.rows_skipped_existing,
            rows_failed = result.rows_failed,
            "Import completed"
        );
        log_operation(
            OP_IMPORT,
            OperationStatus::Success,
            ctx.actor_id(),
            &json!({
                "success_count": result.rows_added,
                "skip_count": result.rows_skipped_existing,
                "error_count": result.rows_failed,
            }),
        );
        Ok(result)
    }

    async fn stage_row(
        &self,
        raw: &RawRow,
        fallback_actor: i32,
        now: DateTime<Utc>,
        staged_keys: &HashSet<(String, String)>,
    ) -> Result<Staging, RowError> {
        let category = row::required(raw, column::CATEGORY)?;
        let code = row::required(raw, column::CODE)?;
        let is_active = row::parse_is_active(raw.get(column::IS_ACTIVE).map(String::as_str));
        let created_at =
            row::parse_created_on(raw.get(column::CREATED_ON).map(String::as_str), now);

        let created_by_id = match raw.get(column::CREATED_BY).filter(|e| !e.is_empty()) {
            Some(email) => self
                .directory
                .user_id_by_email(email)
                .await?
                .unwrap_or(fallback_actor),
            None => fallback_actor,
        };

        let key = (category.to_owned(), code.to_owned());
        if staged_keys.contains(&key) || self.repo.find_by_key(category, code).await?.is_some() {
            return Ok(Staging::Existing {
                category: key.0,
                code: key.1,
            });
        }

        // The description doubles as the display name.
        let description = row::required(raw, column::DESCRIPTION)?;
        let record = NewRecord {
            category: key.0,
            code: key.1,
            name: description.to_owned(),
            description: row::optional_text(Some(description)),
            icon: row::optional_text(raw.get(column::ICON).map(String::as_str)),
            tags: row::optional_text(raw.get(column::TAGS).map(String::as_str)),
            sort_order: 0,
            is_active,
            created_by_id,
            created_at,
        };
        row::validate_record(&record)?;
        Ok(Staging::Added(record))
    }

    /// Delete every record, or only count them when not `confirmed`.
    ///
    /// # Errors
    /// Refuses non-admins.
    pub async fn delete_all(
        &self,
        ctx: &SecurityContext,
        confirmed: bool,
    ) -> Result<u64, DomainError> {
        ctx.require_admin_for(OP_DELETE_ALL)?;
        if !confirmed {
            let count = self.repo.count().await?;
            tracing::info!(count, "Delete of all master data not confirmed; nothing deleted");
            return Ok(count);
        }

        match self.repo.delete_all().await {
            Ok(deleted) => {
                log_operation(
                    OP_DELETE_ALL,
                    OperationStatus::Success,
                    ctx.actor_id(),
                    &json!({"deleted": deleted}),
                );
                Ok(deleted)
            }
            Err(e) => {
                log_operation(
                    OP_DELETE_ALL,
                    OperationStatus::Error,
                    ctx.actor_id(),
                    &json!({"error": e.to_string()}),
                );
                Err(e)
            }
        }
    }

    /// # Errors
    /// Refuses non-admins; `NotFound` when the id is unknown.
    pub async fn get(
        &self,
        ctx: &SecurityContext,
        id: i32,
    ) -> Result<MasterDataRecord, DomainError> {
        ctx.require_admin_for(OP_VIEW)?;
        self.require(id).await
    }

    /// # Errors
    /// Refuses non-admins.
    pub async fn list(
        &self,
        ctx: &SecurityContext,
        category: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<MasterDataRecord>, DomainError> {
        ctx.require_admin_for(OP_VIEW)?;
        self.repo
            .list(category.filter(|c| !c.is_empty()), page)
            .await
    }

    /// # Errors
    /// Refuses non-admins.
    pub async fn categories(&self, ctx: &SecurityContext) -> Result<Vec<String>, DomainError> {
        ctx.require_admin_for(OP_VIEW)?;
        self.repo.categories().await
    }

    /// # Errors
    /// Refuses non-admins.
    pub async fn count(&self, ctx: &SecurityContext) -> Result<u64, DomainError> {
        ctx.require_admin_for(OP_VIEW)?;
        self.repo.count().await
    }

    /// # Errors
    /// Refuses non-admins; `Validation` for bad fields; `DuplicateKey` when `(category, code)` is taken.
    pub async fn create(
        &self,
        ctx: &SecurityContext,
        new_record: NewMasterData,
    ) -> Result<MasterDataRecord, DomainError> {
        ctx.require_admin_for(OP_CREATE)?;
        let record = NewRecord {
            category: new_record.category,
            code: new_record.code,
            name: new_record.name,
            description: row::optional_text(new_record.description.as_deref()),
            icon: row::optional_text(new_record.icon.as_deref()),
            tags: row::optional_text(new_record.tags.as_deref()),
            sort_order: new_record.sort_order,
            is_active: new_record.is_active,
            created_by_id: ctx.subject_id(),
            created_at: Utc::now(),
        };
        row::require_name(&record.name)?;
        row::validate_record(&record)?;

        let result = async {
            self.ensure_key_free(&record.category, &record.code, None)
                .await?;
            self.repo.insert(record).await
        }
        .await;
        match &result {
            Ok(created) => log_operation(
                OP_CREATE,
                OperationStatus::Success,
                ctx.actor_id(),
                &json!({"category": created.category, "code": created.code}),
            ),
            Err(e) => log_operation(
                OP_CREATE,
                OperationStatus::Error,
                ctx.actor_id(),
                &json!({"error": e.to_string()}),
            ),
        }
        result
    }

    /// # Errors
    /// Refuses non-admins; `NotFound`, `Validation` or `DuplicateKey` as for create.
    pub async fn update(
        &self,
        ctx: &SecurityContext,
        id: i32,
        patch: MasterDataPatch,
    ) -> Result<MasterDataRecord, DomainError> {
        ctx.require_admin_for(OP_UPDATE)?;
        let current = self.require(id).await?;
        if patch.is_empty() {
            return Ok(current);
        }

        let merged = merge(&current, &patch);
        row::require_name(&merged.name)?;
        row::validate_record(&merged)?;

        let result = async {
            self.ensure_key_free(&merged.category, &merged.code, Some(id))
                .await?;
            self.repo.update(id, patch).await
        }
        .await;
        match &result {
            Ok(updated) => log_operation(
                OP_UPDATE,
                OperationStatus::Success,
                ctx.actor_id(),
                &json!({"data_id": id, "category": updated.category, "code": updated.code}),
            ),
            Err(e) => log_operation(
                OP_UPDATE,
                OperationStatus::Error,
                ctx.actor_id(),
                &json!({"data_id": id, "error": e.to_string()}),
            ),
        }
        result
    }

    /// # Errors
    /// Refuses non-admins; `NotFound` when the id is unknown.
    pub async fn delete(&self, ctx: &SecurityContext, id: i32) -> Result<(), DomainError> {
        ctx.require_admin_for(OP_DELETE)?;
        let current = self.require(id).await?;
        match self.repo.delete(id).await {
            Ok(true) => {
                log_operation(
                    OP_DELETE,
                    OperationStatus::Success,
                    ctx.actor_id(),
                    &json!({"data_id": id, "category": current.category, "code": current.code}),
                );
                Ok(())
            }
            Ok(false) => Err(DomainError::not_found(id)),
            Err(e) => {
                log_operation(
                    OP_DELETE,
                    OperationStatus::Error,
                    ctx.actor_id(),
                    &json!({"data_id": id, "error": e.to_string()}),
                );
                Err(e)
            }
        }
    }

    async fn require(&self, id: i32) -> Result<MasterDataRecord, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(id))
    }

    async fn ensure_key_free(
        &self,
        category: &str,
        code: &str,
        except_id: Option<i32>,
    ) -> Result<(), DomainError> {
        match self.repo.find_by_key(category, code).await? {
            Some(existing) if Some(existing.id) != except_id => {
                Err(DomainError::duplicate_key(category, code))
            }
            _ => Ok(()),
        }
    }
}

/// The record `patch` would produce, for validation before writing.
fn merge(current: &MasterDataRecord, patch: &MasterDataPatch) -> NewRecord {
    NewRecord {
        category: patch.category.clone().unwrap_or_else(|| current.category.clone()),
        code: patch.code.clone().unwrap_or_else(|| current.code.clone()),
        name: patch.name.clone().unwrap_or_else(|| current.name.clone()),
        description: patched_text(patch.description.as_deref(), current.description.as_deref()),
        icon: patched_text(patch.icon.as_deref(), current.icon.as_deref()),
        tags: patched_text(patch.tags.as_deref(), current.tags.as_deref()),
        sort_order: patch.sort_order.unwrap_or(current.sort_order),
        is_active: patch.is_active.unwrap_or(current.is_active),
        created_by_id: current.created_by_id,
        created_at: current.created_at,
    }
}

fn patched_text(new: Option<&str>, old: Option<&str>) -> Option<String> {
    match new {
        Some(v) => row::optional_text(Some(v)),
        None => old.map(str::to_owned),
    }
}
