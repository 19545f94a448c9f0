//! Layered server configuration.
//!
//! Sources, later ones winning: built-in defaults, the YAML file passed with
//! `--config`, `ADMIN__*` environment variables (`__` separates sections, e.g.
//! `ADMIN__SERVER__BIND_ADDR`), then CLI overrides.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use master_data::MasterDataConfig;
use serde::{Deserialize, Serialize};
use system_settings::SettingsConfig;

pub const ENV_PREFIX: &str = "ADMIN__";

/// DSN used by `--mock`. Every pooled connection would get its own database,
/// so mock mode pins the pool to a single connection.
pub const MOCK_DSN: &str = "sqlite::memory:";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub settings: SettingsConfig,
    #[serde(default)]
    pub master_data: MasterDataConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            request_timeout: default_request_timeout(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8087))
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_body_limit() -> usize {
    16 * 1024 * 1024
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    #[serde(default = "default_dsn")]
    pub dsn: String,
    #[serde(default = "default_max_conns")]
    pub max_conns: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            dsn: default_dsn(),
            max_conns: default_max_conns(),
        }
    }
}

fn default_dsn() -> String {
    "sqlite://admin.db?mode=rwc".to_owned()
}

fn default_max_conns() -> u32 {
    5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Filter directive used when neither `RUST_LOG` nor `-v` is given.
    #[serde(default = "default_level")]
    pub level: String,
    /// Directory holding `app.log` (JSON lines).
    #[serde(default = "default_log_dir")]
    pub dir: PathBuf,
    #[serde(default)]
    pub json_console: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            dir: default_log_dir(),
            json_console: false,
        }
    }
}

impl LoggingConfig {
    #[must_use]
    pub fn file_path(&self) -> PathBuf {
        self.dir.join(crate::logging::LOG_FILE_NAME)
    }
}

fn default_level() -> String {
    "info".to_owned()
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// Run every request as `default_subject`. Single-operator local use only.
    #[serde(default)]
    pub disabled: bool,
    #[serde(default = "default_subject")]
    pub default_subject: String,
    /// Bearer token to username.
    #[serde(default)]
    pub tokens: HashMap<String, String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            disabled: false,
            default_subject: default_subject(),
            tokens: HashMap::new(),
        }
    }
}

fn default_subject() -> String {
    "admin".to_owned()
}

impl AppConfig {
    /// Defaults, then the YAML file (if any), then `ADMIN__*` environment variables.
    #[must_use]
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load the layered configuration.
    ///
    /// # Errors
    /// Returns an error if `path` is not a file or a layer does not match the schema.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path
            && !path.is_file()
        {
            anyhow::bail!("config file does not exist: {}", path.display());
        }
        Self::figment(path)
            .extract()
            .context("invalid configuration")
    }

    pub fn apply_cli_overrides(&mut self, port: Option<u16>, mock: bool) {
        if let Some(port) = port {
            self.server.bind_addr.set_port(port);
        }
        if mock {
            MOCK_DSN.clone_into(&mut self.database.dsn);
            self.database.max_conns = 1;
        }
    }

    /// Effective configuration as pretty JSON.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_pretty_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize configuration")
    }
}
