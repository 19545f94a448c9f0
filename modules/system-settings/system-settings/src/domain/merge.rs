//! Patch validation and merging.

use system_settings_sdk::{ConfigDocument, ConfigPatch};

use super::error::DomainError;
use crate::config::FieldLimits;

/// Check every value carried by `patch` on its own.
///
/// # Errors
/// Returns [`DomainError::Validation`] naming the first offending field.
pub fn validate_patch(patch: &ConfigPatch, limits: &FieldLimits) -> Result<(), DomainError> {
    if let Some(v) = &patch.app_name {
        required_text("app_name", v, limits.name_max)?;
    }
    if let Some(v) = &patch.client_name {
        required_text("client_name", v, limits.name_max)?;
    }
    if let Some(v) = &patch.admin_email {
        admin_email(v)?;
    }
    if let Some(theme) = &patch.theme {
        if let Some(default) = &theme.default {
            required_text("theme.default", default, limits.name_max)?;
        }
        if let Some(available) = &theme.available {
            if available.is_empty() {
                return Err(DomainError::validation(
                    "theme.available",
                    "at least one theme is required",
                ));
            }
            for name in available {
                required_text("theme.available", name, limits.name_max)?;
            }
        }
    }
    if let Some(mail) = &patch.mail_server {
        if let Some(v) = &mail.smtp_host {
            max_len("mail_server.smtp_host", v, limits.smtp_host_max)?;
        }
        if let Some(v) = &mail.smtp_user {
            max_len("mail_server.smtp_user", v, limits.smtp_credential_max)?;
        }
        if let Some(v) = &mail.smtp_password {
            max_len("mail_server.smtp_password", v, limits.smtp_credential_max)?;
        }
        if mail.smtp_port == Some(0) {
            return Err(DomainError::validation(
                "mail_server.smtp_port",
                "must be between 1 and 65535",
            ));
        }
    }
    if let Some(security) = &patch.security {
        if security.session_lifetime == Some(0) {
            return Err(DomainError::validation(
                "security.session_lifetime",
                "must be greater than zero",
            ));
        }
        if security.password_min_length == Some(0) {
            return Err(DomainError::validation(
                "security.password_min_length",
                "must be at least 1",
            ));
        }
    }
    Ok(())
}

/// Merge `patch` over `current`. `database` and unknown security keys are kept.
///
/// # Errors
/// Returns [`DomainError::Validation`] when the resulting default theme is not
/// one of the available themes.
pub fn apply_patch(
    mut current: ConfigDocument,
    patch: ConfigPatch,
) -> Result<ConfigDocument, DomainError> {
    if let Some(v) = patch.app_name {
        current.app_name = v;
    }
    if let Some(v) = patch.client_name {
        current.client_name = v;
    }
    if let Some(v) = patch.admin_email {
        current.admin_email = v;
    }
    if let Some(theme) = patch.theme {
        if let Some(v) = theme.available {
            current.theme.available = v;
        }
        if let Some(v) = theme.default {
            current.theme.default = v;
        }
    }
    if let Some(mail) = patch.mail_server {
        let target = &mut current.mail_server;
        if let Some(v) = mail.smtp_host {
            target.smtp_host = v;
        }
        if let Some(v) = mail.smtp_port {
            target.smtp_port = v;
        }
        if let Some(v) = mail.smtp_user {
            target.smtp_user = v;
        }
        if let Some(v) = mail.smtp_password {
            target.smtp_password = v;
        }
        if let Some(v) = mail.use_tls {
            target.use_tls = v;
        }
    }
    if let Some(security) = patch.security {
        if let Some(v) = security.session_lifetime {
            current.security.session_lifetime = v;
        }
        if let Some(v) = security.password_min_length {
            current.security.password_min_length = v;
        }
    }

    if !current.theme.available.contains(&current.theme.default) {
        return Err(DomainError::validation(
            "theme.default",
            format!(
                "'{}' is not one of the available themes",
                current.theme.default
            ),
        ));
    }
    Ok(current)
}

fn required_text(field: &'static str, value: &str, max: usize) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(field, "must not be empty"));
    }
    max_len(field, value, max)
}

fn max_len(field: &'static str, value: &str, max: usize) -> Result<(), DomainError> {
    let len = value.chars().count();
    if len > max {
        return Err(DomainError::validation(
            field,
            format!("too long: {len} characters (max: {max})"),
        ));
    }
    Ok(())
}

fn admin_email(value: &str) -> Result<(), DomainError> {
    if value.is_empty() {
        return Ok(());
    }
    let plausible = value.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty() && domain.contains('.') && !domain.contains('@')
    });
    if !plausible {
        return Err(DomainError::validation(
            "admin_email",
            format!("invalid email: '{value}'"),
        ));
    }
    Ok(())
}
