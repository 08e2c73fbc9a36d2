use std::path::Path;

use reqwest::Url;

use crate::config::schema::Config;
use crate::error::ConfigError;

pub const SUPPORTED_VERSION: &str = "1.0";

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    let config: Config = serde_json::from_str(content)?;

    validate_config(&config)?;

    Ok(config)
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        message: message.into(),
    }
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.version != SUPPORTED_VERSION {
        return Err(invalid(format!(
            "Unsupported config version: {}",
            config.version
        )));
    }

    let api = &config.api;
    let url = Url::parse(&api.base_url)
        .map_err(|e| invalid(format!("api.baseUrl '{}' is not a URL: {}", api.base_url, e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!(
            "api.baseUrl must use http or https, got '{}'",
            url.scheme()
        )));
    }

    if !api.token.is_configured() {
        return Err(invalid(
            "api.token needs one of: value, file, envVar",
        ));
    }

    if api.connect_timeout_secs == 0 || api.request_timeout_secs == 0 {
        return Err(invalid("api timeouts must be greater than zero"));
    }

    if config.board.event_capacity == 0 {
        return Err(invalid("board.eventCapacity must be greater than zero"));
    }

    if config.board.default_priority.trim().is_empty() {
        return Err(invalid("board.defaultPriority must not be empty"));
    }

    Ok(())
}
