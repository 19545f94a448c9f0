//! Maintenance subcommands run from the command line.

use std::path::Path;

use admin_security::SecurityContext;
use anyhow::{Context, Result};

use crate::app::{self, Services};
use crate::auth::operator_context;
use crate::config::AppConfig;
use crate::log_view;

/// Identity used by `check`, which reads the settings document without a database.
fn maintenance_context() -> SecurityContext {
    SecurityContext::builder()
        .subject_id(0)
        .username("cli")
        .admin(true)
        .build()
}

async fn services(config: &AppConfig) -> Result<Services> {
    let db = app::connect_database(&config.database).await?;
    Ok(Services::build(&db, config))
}

/// Validate the configuration and load the live settings document.
///
/// An unreadable settings document is reported as degraded but is not fatal.
///
/// # Errors
/// Returns an error only if the configuration cannot be rendered.
pub async fn check(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");
    println!("Configuration is valid");

    let settings = system_settings::build(&config.settings);
    match settings.load(&maintenance_context()).await {
        Ok(document) => println!(
            "Settings document OK: {} (app_name: {})",
            config.settings.document_path.display(),
            document.app_name
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Settings document unavailable");
            println!(
                "Settings document DEGRADED: {}: {e}",
                config.settings.document_path.display()
            );
        }
    }
    println!("{}", config.to_pretty_json()?);
    Ok(())
}

/// # Errors
/// Returns an error if the database is unavailable or the input is rejected.
pub async fn create_admin(config: &AppConfig, username: &str, email: &str) -> Result<()> {
    let services = services(config).await?;
    let (account, created) = services
        .accounts
        .ensure_admin(username, email)
        .await
        .context("failed to create admin user")?;
    if created {
        println!("Admin user '{}' created (id {})", account.username, account.id);
    } else {
        println!("Admin user '{}' already exists", account.username);
    }
    Ok(())
}

/// # Errors
/// Returns an error if the file cannot be read, the operator is unknown, the
/// CSV header is unreadable or the batch commit fails.
pub async fn import_master_data(config: &AppConfig, csv: &Path, operator: &str) -> Result<()> {
    let bytes = std::fs::read(csv).with_context(|| format!("failed to read {}", csv.display()))?;
    let services = services(config).await?;
    let ctx = operator_context(services.accounts.as_ref(), operator).await?;
    let result = services
        .master_data
        .import_csv(&ctx, bytes)
        .await
        .context("master data import failed")?;

    println!("Import completed:");
    println!("  Rows processed:          {}", result.rows_seen);
    println!("  Successfully imported:   {}", result.rows_added);
    println!("  Skipped (already exist): {}", result.rows_skipped_existing);
    println!("  Errors:                  {}", result.rows_failed);
    Ok(())
}

/// Without `confirmed` only the number of records is reported.
///
/// # Errors
/// Returns an error if the database is unavailable or the operator is unknown.
pub async fn delete_master_data(config: &AppConfig, confirmed: bool, operator: &str) -> Result<()> {
    let services = services(config).await?;
    let ctx = operator_context(services.accounts.as_ref(), operator).await?;
    let count = services
        .master_data
        .delete_all(&ctx, confirmed)
        .await
        .context("failed to delete master data")?;
    if confirmed {
        println!("Deleted {count} master data records");
    } else {
        println!("{count} master data records would be deleted; rerun with --yes to confirm");
    }
    Ok(())
}

/// # Errors
/// Returns an error if the log file exists but cannot be read.
pub fn logs(config: &AppConfig, page: usize) -> Result<()> {
    let page = log_view::read_page(&config.logging.file_path(), page)?;
    if page.entries.is_empty() {
        println!("No log entries");
        return Ok(());
    }
    for entry in &page.entries {
        println!("{} {:<7} {}", entry.timestamp, entry.level, entry.message);
    }
    println!(
        "Page {} of {} ({} entries)",
        page.page, page.total_pages, page.total
    );
    Ok(())
}
