use secrecy::SecretString;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::secrets::SecretRef;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub version: String,
    pub api: ApiConfig,
    #[serde(default)]
    pub board: BoardConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default)]
    pub token: SecretRef,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl ApiConfig {
    /// Resolves the bearer token from its configured source.
    pub fn resolve_token(&self) -> Result<SecretString, ConfigError> {
        Ok(self.token.resolve()?)
    }
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_request_timeout() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardConfig {
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
    /// Priority given to promoted records that carry none.
    #[serde(default = "default_priority")]
    pub default_priority: String,
}

fn default_event_capacity() -> usize {
    100
}

fn default_priority() -> String {
    "medium".to_string()
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            event_capacity: default_event_capacity(),
            default_priority: default_priority(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
        }
    }
}
