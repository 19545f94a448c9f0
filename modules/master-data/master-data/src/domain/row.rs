//! Field rules shared by hand edits and CSV import.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use master_data_sdk::RawRow;
use thiserror::Error;

use super::error::DomainError;
use super::repo::NewRecord;

pub const CATEGORY_MAX: usize = 50;
pub const CODE_MAX: usize = 50;
pub const NAME_MAX: usize = 100;
pub const DESCRIPTION_MAX: usize = 500;
pub const ICON_MAX: usize = 50;
pub const TAGS_MAX: usize = 100;

pub mod column {
    pub const CATEGORY: &str = "category";
    pub const CODE: &str = "code";
    pub const DESCRIPTION: &str = "description";
    pub const ICON: &str = "icon";
    pub const TAGS: &str = "tags";
    pub const IS_ACTIVE: &str = "is_active";
    pub const CREATED_ON: &str = "created_on";
    pub const CREATED_BY: &str = "created_by";
}

/// Why a single import row was not added. Counted, never surfaced.
#[derive(Error, Debug)]
pub enum RowError {
    #[error("missing column '{0}'")]
    MissingColumn(&'static str),

    #[error("unreadable record: {0}")]
    Unreadable(String),

    #[error(transparent)]
    Rejected(#[from] DomainError),
}

/// Only `TRUE` in any letter case is true. Surrounding whitespace is not ignored.
#[must_use]
pub fn parse_is_active(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.eq_ignore_ascii_case("TRUE"))
}

/// Parse a row timestamp, falling back to `now` for anything unrecognised.
///
/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM:SS[.f]`, `YYYY-MM-DD HH:MM:SS[.f]`
/// (naive values are UTC) and a bare `YYYY-MM-DD` (midnight UTC).
#[must_use]
pub fn parse_created_on(value: Option<&str>, now: DateTime<Utc>) -> DateTime<Utc> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return now;
    };
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return parsed.with_timezone(&Utc);
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return parsed.and_utc();
        }
    }
    if let Some(midnight) = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return midnight.and_utc();
    }
    tracing::debug!(value, "Unparseable created_on, using processing time");
    now
}

/// Value of a column that must be present (it may still be empty).
///
/// # Errors
/// [`RowError::MissingColumn`] when the row has no such column.
pub fn required<'a>(row: &'a RawRow, column: &'static str) -> Result<&'a str, RowError> {
    row.get(column)
        .map(String::as_str)
        .ok_or(RowError::MissingColumn(column))
}

/// Empty optional text is stored as absent.
#[must_use]
pub fn optional_text(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_owned)
}

/// Check every field of `record` against the column limits.
///
/// # Errors
/// [`DomainError::Validation`] naming the first offending field.
pub fn validate_record(record: &NewRecord) -> Result<(), DomainError> {
    non_empty("category", &record.category)?;
    max_len("category", &record.category, CATEGORY_MAX)?;
    non_empty("code", &record.code)?;
    max_len("code", &record.code, CODE_MAX)?;
    max_len("name", &record.name, NAME_MAX)?;
    if let Some(description) = &record.description {
        max_len("description", description, DESCRIPTION_MAX)?;
    }
    if let Some(icon) = &record.icon {
        max_len("icon", icon, ICON_MAX)?;
    }
    if let Some(tags) = &record.tags {
        max_len("tags", tags, TAGS_MAX)?;
    }
    Ok(())
}

/// Hand-edited records also need a name.
///
/// # Errors
/// [`DomainError::Validation`] when the name is blank.
pub fn require_name(name: &str) -> Result<(), DomainError> {
    non_empty("name", name)
}

fn non_empty(field: &'static str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(field, "must not be empty"));
    }
    Ok(())
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
