use std::sync::Arc;

use accounts_sdk::{
    Account, AccountPatch, AccountStats, LANGUAGES, NewAccount, Profile, ProfileUpdate, THEMES,
};
use admin_api::{Page, PageRequest};
use admin_security::{OperationStatus, SecurityContext, log_operation};
use serde_json::json;

use super::error::DomainError;
use super::repo::{ProfileChanges, UsersRepository};

const USERNAME_MAX: usize = 64;
const EMAIL_MAX: usize = 120;
const FULL_NAME_MAX: usize = 100;
const BOOTSTRAP_FULL_NAME: &str = "Administrator";

pub struct Service {
    repo: Arc<dyn UsersRepository>,
}

impl Service {
    #[must_use]
    pub fn new(repo: Arc<dyn UsersRepository>) -> Self {
        Self { repo }
    }

    /// # Errors
    /// Returns [`DomainError::Database`] when the lookup fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError> {
        self.repo.find_by_email(email).await
    }

    /// # Errors
    /// Returns [`DomainError::Database`] when the lookup fails.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<Account>, DomainError> {
        self.repo.find_by_username(username).await
    }

    /// # Errors
    /// Refuses non-admins; `NotFound` when the id is unknown.
    pub async fn get(&self, ctx: &SecurityContext, id: i32) -> Result<Account, DomainError> {
        ctx.require_admin_for("User View")?;
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(id))
    }

    /// # Errors
    /// Refuses non-admins.
    pub async fn list(
        &self,
        ctx: &SecurityContext,
        page: PageRequest,
    ) -> Result<Page<Account>, DomainError> {
        ctx.require_admin_for("User List")?;
        self.repo.list(page).await
    }

    /// # Errors
    /// Refuses non-admins; `Validation` for bad fields; `DuplicateKey` for a taken username or email.
    pub async fn create(
        &self,
        ctx: &SecurityContext,
        new_account: NewAccount,
    ) -> Result<Account, DomainError> {
        ctx.require_admin_for("User Create")?;
        let account = self.insert_checked(new_account).await?;
        log_operation(
            "User Create",
            OperationStatus::Success,
            ctx.actor_id(),
            &json!({"user_id": account.id, "username": account.username}),
        );
        Ok(account)
    }

    /// # Errors
    /// Refuses non-admins; `NotFound`, `Validation` or `DuplicateKey` as for create.
    pub async fn update(
        &self,
        ctx: &SecurityContext,
        id: i32,
        patch: AccountPatch,
    ) -> Result<Account, DomainError> {
        ctx.require_admin_for("User Update")?;
        let current = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(id))?;

        if let Some(username) = &patch.username {
            validate_username(username)?;
            if *username != current.username {
                self.ensure_username_free(username).await?;
            }
        }
        if let Some(email) = &patch.email {
            validate_email(email)?;
            if *email != current.email {
                self.ensure_email_free(email).await?;
            }
        }
        if let Some(full_name) = &patch.full_name {
            validate_full_name(full_name)?;
        }

        let result = if patch.is_empty() {
            Ok(current)
        } else {
            self.repo.update(id, patch).await
        };

        match &result {
            Ok(account) => log_operation(
                "User Update",
                OperationStatus::Success,
                ctx.actor_id(),
                &json!({
                    "user_id": account.id,
                    "username": account.username,
                    "email": account.email,
                    "full_name": account.full_name,
                    "is_active": account.is_active,
                    "is_admin": account.is_admin,
                }),
            ),
            Err(e) => log_operation(
                "User Update",
                OperationStatus::Error,
                ctx.actor_id(),
                &json!({"user_id": id, "error": e.to_string()}),
            ),
        }
        result
    }

    /// # Errors
    /// Refuses non-admins; `SelfDeactivation` when the caller targets their own account.
    pub async fn toggle_active(
        &self,
        ctx: &SecurityContext,
        id: i32,
    ) -> Result<Account, DomainError> {
        ctx.require_admin_for("User Status Toggle")?;
        if ctx.subject_id() == id {
            log_operation(
                "User Status Toggle",
                OperationStatus::Failure,
                ctx.actor_id(),
                &json!({"user_id": id, "reason": "Cannot deactivate self"}),
            );
            return Err(DomainError::SelfDeactivation);
        }

        let current = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(id))?;

        match self.repo.set_active(id, !current.is_active).await {
            Ok(account) => {
                log_operation(
                    "User Status Toggle",
                    OperationStatus::Success,
                    ctx.actor_id(),
                    &json!({"user_id": id, "new_status": account.is_active}),
                );
                Ok(account)
            }
            Err(e) => {
                log_operation(
                    "User Status Toggle",
                    OperationStatus::Error,
                    ctx.actor_id(),
                    &json!({"user_id": id, "error": e.to_string()}),
                );
                Err(e)
            }
        }
    }

    /// # Errors
    /// Refuses non-admins.
    pub async fn stats(&self, ctx: &SecurityContext) -> Result<AccountStats, DomainError> {
        ctx.require_admin_for("Admin Dashboard Access")?;
        Ok(AccountStats {
            total_users: self.repo.count(false).await?,
            active_users: self.repo.count(true).await?,
        })
    }

    /// # Errors
    /// Refuses anonymous callers; `NotFound` when the caller's account is gone.
    pub async fn profile(&self, ctx: &SecurityContext) -> Result<Profile, DomainError> {
        ctx.require_authenticated()?;
        let account = self.own_account(ctx).await?;
        let preferences = self
            .repo
            .find_preferences(account.id)
            .await?
            .unwrap_or_default();
        Ok(Profile {
            account,
            preferences,
        })
    }

    /// Apply a self-service profile change to the caller's own account.
    ///
    /// # Errors
    /// Refuses anonymous callers; `Validation` for bad fields or unknown
    /// theme/language; `DuplicateKey` when the new email belongs to someone else.
    pub async fn update_profile(
        &self,
        ctx: &SecurityContext,
        update: ProfileUpdate,
    ) -> Result<Profile, DomainError> {
        ctx.require_authenticated()?;
        let current = self.own_account(ctx).await?;
        let mut preferences = self
            .repo
            .find_preferences(current.id)
            .await?
            .unwrap_or_default();

        let email = match update.email {
            Some(email) => {
                validate_email(&email)?;
                if email != current.email {
                    self.ensure_email_free(&email).await?;
                }
                email
            }
            None => current.email.clone(),
        };
        let full_name = match update.full_name {
            Some(full_name) => {
                validate_full_name(&full_name)?;
                Some(full_name).filter(|n| !n.trim().is_empty())
            }
            None => current.full_name.clone(),
        };
        if let Some(theme) = update.theme {
            validate_choice("theme", &theme, &THEMES)?;
            preferences.theme = theme;
        }
        if let Some(language) = update.language {
            validate_choice("language", &language, &LANGUAGES)?;
            preferences.language = language;
        }
        if let Some(v) = update.sidebar_pinned {
            preferences.sidebar_pinned = v;
        }
        if let Some(v) = update.notifications_enabled {
            preferences.notifications_enabled = v;
        }

        let changes = ProfileChanges {
            email,
            full_name,
            preferences,
        };
        match self.repo.save_profile(current.id, changes).await {
            Ok((account, preferences)) => {
                log_operation(
                    "Profile Update",
                    OperationStatus::Success,
                    ctx.actor_id(),
                    &json!({
                        "user_id": account.id,
                        "updated_fields": {
                            "email": account.email,
                            "full_name": account.full_name,
                            "theme": preferences.theme,
                            "language": preferences.language,
                            "notifications": preferences.notifications_enabled,
                        },
                    }),
                );
                Ok(Profile {
                    account,
                    preferences,
                })
            }
            Err(e) => {
                log_operation(
                    "Profile Update",
                    OperationStatus::Error,
                    ctx.actor_id(),
                    &json!({"user_id": current.id, "error": e.to_string()}),
                );
                Err(e)
            }
        }
    }

    /// # Errors
    /// Refuses anonymous callers; `InUse` while other records reference the account.
    pub async fn delete_own_account(&self, ctx: &SecurityContext) -> Result<(), DomainError> {
        ctx.require_authenticated()?;
        let account = self.own_account(ctx).await?;
        match self.repo.delete(account.id).await {
            Ok(()) => {
                log_operation(
                    "Account Deletion",
                    OperationStatus::Success,
                    ctx.actor_id(),
                    &json!({"user_id": account.id, "username": account.username}),
                );
                Ok(())
            }
            Err(e) => {
                log_operation(
                    "Account Deletion",
                    OperationStatus::Error,
                    ctx.actor_id(),
                    &json!({"user_id": account.id, "error": e.to_string()}),
                );
                Err(e)
            }
        }
    }

    async fn own_account(&self, ctx: &SecurityContext) -> Result<Account, DomainError> {
        let id = ctx.subject_id();
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(id))
    }

    /// Create the bootstrap administrator unless `username` already exists.
    ///
    /// # Errors
    /// `Validation` for bad input, `DuplicateKey` when the email belongs to another account.
    pub async fn ensure_admin(
        &self,
        username: &str,
        email: &str,
    ) -> Result<(Account, bool), DomainError> {
        if let Some(existing) = self.repo.find_by_username(username).await? {
            tracing::info!(username, "Admin user already exists");
            return Ok((existing, false));
        }

        let account = self
            .insert_checked(NewAccount {
                username: username.to_owned(),
                email: email.to_owned(),
                full_name: Some(BOOTSTRAP_FULL_NAME.to_owned()),
                is_admin: true,
            })
            .await?;
        tracing::info!(username, user_id = account.id, "Admin user created");
        Ok((account, true))
    }

    async fn insert_checked(&self, new_account: NewAccount) -> Result<Account, DomainError> {
        validate_username(&new_account.username)?;
        validate_email(&new_account.email)?;
        if let Some(full_name) = &new_account.full_name {
            validate_full_name(full_name)?;
        }
        self.ensure_username_free(&new_account.username).await?;
        self.ensure_email_free(&new_account.email).await?;
        self.repo.insert(new_account).await
    }

    async fn ensure_username_free(&self, username: &str) -> Result<(), DomainError> {
        if self.repo.find_by_username(username).await?.is_some() {
            return Err(DomainError::duplicate_key("username", username));
        }
        Ok(())
    }

    async fn ensure_email_free(&self, email: &str) -> Result<(), DomainError> {
        if self.repo.find_by_email(email).await?.is_some() {
            return Err(DomainError::duplicate_key("email", email));
        }
        Ok(())
    }
}

fn validate_username(username: &str) -> Result<(), DomainError> {
    let len = username.chars().count();
    if username.trim().is_empty() {
        return Err(DomainError::validation("username", "must not be empty"));
    }
    if len > USERNAME_MAX {
        return Err(DomainError::validation(
            "username",
            format!("too long: {len} characters (max: {USERNAME_MAX})"),
        ));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), DomainError> {
    let len = email.chars().count();
    if len > EMAIL_MAX {
        return Err(DomainError::validation(
            "email",
            format!("too long: {len} characters (max: {EMAIL_MAX})"),
        ));
    }
    let plausible = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.') && !domain.contains('@'));
    if !plausible {
        return Err(DomainError::validation(
            "email",
            format!("invalid email: '{email}'"),
        ));
    }
    Ok(())
}

fn validate_choice(field: &'static str, value: &str, allowed: &[&str]) -> Result<(), DomainError> {
    if allowed.contains(&value) {
        return Ok(());
    }
    Err(DomainError::validation(
        field,
        format!("'{value}' is not one of: {}", allowed.join(", ")),
    ))
}

fn validate_full_name(full_name: &str) -> Result<(), DomainError> {
    let len = full_name.chars().count();
    if len > FULL_NAME_MAX {
        return Err(DomainError::validation(
            "full_name",
            format!("too long: {len} characters (max: {FULL_NAME_MAX})"),
        ));
    }
    Ok(())
}
