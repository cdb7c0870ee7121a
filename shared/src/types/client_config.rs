use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Root of the backend REST API, e.g. `http://127.0.0.1:8080/api`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Lifetime the backend gives its tokens. Only used to pace the expiry
    /// monitor; the token's own `exp` claim is what decides expiry.
    #[serde(default = "default_token_lifetime")]
    pub token_lifetime_minutes: u64,
    /// Lower bound on the monitor's check interval.
    #[serde(default = "default_check_interval")]
    pub min_check_interval_secs: u64,
    /// Upper bound on the monitor's check interval.
    #[serde(default = "default_check_interval")]
    pub max_check_interval_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Directory holding the persisted `token` and `user` entries.
    #[serde(default = "default_storage_dir")]
    pub dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Resolve the API root with the `PORTAL_API_URL` env var taking
    /// priority over the config file field. Trailing slashes are trimmed.
    pub fn resolved_base_url(&self) -> String {
        std::env::var("PORTAL_API_URL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| self.base_url.clone())
            .trim_end_matches('/')
            .to_string()
    }
}

impl AuthConfig {
    pub fn token_lifetime(&self) -> Duration {
        Duration::from_secs(self.token_lifetime_minutes.saturating_mul(60))
    }

    pub fn min_check_interval(&self) -> Duration {
        Duration::from_secs(self.min_check_interval_secs)
    }

    pub fn max_check_interval(&self) -> Duration {
        Duration::from_secs(self.max_check_interval_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_lifetime_minutes: default_token_lifetime(),
            min_check_interval_secs: default_check_interval(),
            max_check_interval_secs: default_check_interval(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: default_storage_dir(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Serde defaults
// ---------------------------------------------------------------------------

pub fn default_base_url() -> String {
    "http://127.0.0.1:8080/api".to_string()
}

pub fn default_timeout_secs() -> u64 {
    15
}

pub fn default_token_lifetime() -> u64 {
    60
}

pub fn default_check_interval() -> u64 {
    60
}

pub fn default_storage_dir() -> String {
    ".portal".to_string()
}

pub fn default_log_level() -> String {
    "info".to_string()
}
