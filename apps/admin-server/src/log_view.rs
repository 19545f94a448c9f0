//! Paged, newest-first view of the JSON log file.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;

pub const PER_PAGE: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: String,
    pub message: String,
}

impl LogEntry {
    /// Parse one JSON line as written by the file layer.
    ///
    /// Lines that are not JSON objects keep their raw text with level `UNKNOWN`.
    #[must_use]
    pub fn parse(line: &str) -> Self {
        let Ok(Value::Object(record)) = serde_json::from_str::<Value>(line) else {
            return Self::unknown(line);
        };
        let text = |v: Option<&Value>| v.and_then(Value::as_str).unwrap_or_default().to_owned();
        let message = record
            .get("fields")
            .and_then(|fields| fields.get("message"))
            .or_else(|| record.get("message"));
        Self {
            timestamp: text(record.get("timestamp")),
            level: record
                .get("level")
                .and_then(Value::as_str)
                .unwrap_or("UNKNOWN")
                .to_owned(),
            message: text(message),
        }
    }

    fn unknown(line: &str) -> Self {
        Self {
            timestamp: String::new(),
            level: "UNKNOWN".to_owned(),
            message: line.to_owned(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LogPage {
    pub entries: Vec<LogEntry>,
    pub page: usize,
    pub total_pages: usize,
    pub total: usize,
}

/// Entries of `page` (1-based), newest first. Blank lines are ignored.
#[must_use]
pub fn paginate(content: &str, page: usize) -> LogPage {
    let lines: Vec<&str> = content.lines().filter(|l| !l.trim().is_empty()).collect();
    let total = lines.len();
    let total_pages = total.div_ceil(PER_PAGE).max(1);
    let page = page.clamp(1, total_pages);
    let entries = lines
        .into_iter()
        .rev()
        .skip((page - 1) * PER_PAGE)
        .take(PER_PAGE)
        .map(LogEntry::parse)
        .collect();
    LogPage {
        entries,
        page,
        total_pages,
        total,
    }
}

/// Read `path` and return one page. A missing file is an empty log.
///
/// # Errors
/// Returns an error if the file exists but cannot be read.
pub fn read_page(path: &Path, page: usize) -> Result<LogPage> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => {
            return Err(e).with_context(|| format!("failed to read {}", path.display()));
        }
    };
    Ok(paginate(&content, page))
}
