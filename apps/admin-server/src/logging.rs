use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::config::LoggingConfig;

pub const LOG_FILE_NAME: &str = "app.log";

/// Filter directive: `RUST_LOG` if set, else the `-v` count, else the configured level.
fn filter(config: &LoggingConfig, verbose: u8) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    let directive = match verbose {
        0 => config.level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    EnvFilter::try_new(directive).with_context(|| format!("invalid log level '{directive}'"))
}

/// Install the global subscriber: a stderr console layer plus JSON lines in `<dir>/app.log`.
///
/// The returned guard flushes the file writer on drop and must live as long as `main`.
///
/// # Errors
/// Returns an error if the log directory cannot be created, the level is not a
/// valid filter, or a global subscriber is already installed.
pub fn init(config: &LoggingConfig, verbose: u8) -> Result<WorkerGuard> {
    std::fs::create_dir_all(&config.dir)
        .with_context(|| format!("failed to create log directory {}", config.dir.display()))?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE_NAME)
        .build(&config.dir)
        .context("failed to open log file")?;
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    let console_layer = if config.json_console {
        fmt::layer().json().with_writer(std::io::stderr).boxed()
    } else {
        fmt::layer().with_writer(std::io::stderr).boxed()
    };
    let file_layer = fmt::layer()
        .json()
        .with_ansi(false)
        .with_writer(file_writer);

    tracing_subscriber::registry()
        .with(filter(config, verbose)?)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;
    Ok(guard)
}
