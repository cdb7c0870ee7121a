use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, error, info, warn};

use crate::types::client_config::{ClientConfig, ConfigError};

pub fn load_config(path: impl AsRef<Path>) -> Result<ClientConfig, ConfigError> {
    let path = path.as_ref();
    info!("Loading configuration from: {}", path.display());

    let contents = fs::read_to_string(path)?;
    debug!("Processing file: {}", path.display());

    if contents.trim().is_empty() {
        error!("Configuration file is empty");
        return Err(ConfigError::InvalidConfig("empty file".into()));
    }

    let config: ClientConfig = toml::from_str(&contents)?;

    info!("Configuration loaded successfully");
    debug!("Config: {:?}", config);

    validate_config(&config)?;

    info!("Config validated");

    Ok(config)
}

/// Like [`load_config`], but a missing file yields the defaults. Any other
/// failure (unreadable, malformed, invalid) is still an error.
pub fn load_config_or_default(path: impl AsRef<Path>) -> Result<ClientConfig, ConfigError> {
    match load_config(path.as_ref()) {
        Err(ConfigError::Io(e)) if e.kind() == ErrorKind::NotFound => {
            warn!(
                "No configuration at {}, using defaults",
                path.as_ref().display()
            );
            let config = ClientConfig::default();
            validate_config(&config)?;
            Ok(config)
        }
        other => other,
    }
}

fn validate_config(config: &ClientConfig) -> Result<(), ConfigError> {
    if config.api.resolved_base_url().is_empty() {
        return Err(ConfigError::InvalidConfig(
            "base_url must be set via the PORTAL_API_URL env var or api.base_url config field"
                .into(),
        ));
    }

    if config.api.timeout_secs == 0 {
        return Err(ConfigError::InvalidConfig(
            "timeout_secs must be greater than 0".into(),
        ));
    }

    if config.auth.token_lifetime_minutes == 0 {
        return Err(ConfigError::InvalidConfig(
            "token_lifetime_minutes must be greater than 0".into(),
        ));
    }

    if config.auth.min_check_interval_secs == 0 {
        return Err(ConfigError::InvalidConfig(
            "min_check_interval_secs must be greater than 0".into(),
        ));
    }

    if config.auth.max_check_interval_secs < config.auth.min_check_interval_secs {
        return Err(ConfigError::InvalidConfig(
            "max_check_interval_secs must not be below min_check_interval_secs".into(),
        ));
    }

    if config.storage.dir.trim().is_empty() {
        return Err(ConfigError::InvalidConfig("storage.dir cannot be empty".into()));
    }

    Ok(())
}
