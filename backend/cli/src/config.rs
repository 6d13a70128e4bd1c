use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use eteon_agent::{RelaySettings, DEFAULT_MODEL};
use eteon_logging::{LogFormat, LoggerConfig};
use eteon_providers::providers::gemini::DEFAULT_BASE_URL;

const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Eteon runtime configuration.
#[derive(Clone)]
pub struct Config {
    /// Telegram bot token
    pub telegram_token: String,
    /// Gemini API key
    pub gemini_api_key: String,
    pub model: String,
    pub gemini_base_url: String,
    pub request_timeout: Duration,
    pub log_level: String,
    pub log_format: LogFormat,
    pub log_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup`, treating blank values as unset.
    pub fn from_env_with<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let request_timeout = match var("ETEON_REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().map_err(|e| ConfigError::Invalid {
                name: "ETEON_REQUEST_TIMEOUT_SECS",
                reason: e.to_string(),
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            telegram_token: var("TELEGRAM_BOT_TOKEN").unwrap_or_default(),
            gemini_api_key: var("GEMINI_API_KEY").unwrap_or_default(),
            model: var("ETEON_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            gemini_base_url: var("ETEON_GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            request_timeout: Duration::from_secs(request_timeout),
            log_level: var("ETEON_LOG_LEVEL")
                .or_else(|| var("RUST_LOG"))
                .unwrap_or_else(|| "info".to_string()),
            log_format: var("ETEON_LOG_FORMAT")
                .map(|v| LogFormat::parse(&v))
                .unwrap_or_default(),
            log_dir: var("ETEON_LOG_DIR").map(PathBuf::from),
        })
    }

    /// Startup checks: both secrets present and a non-zero timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.telegram_token.is_empty() {
            return Err(ConfigError::Missing("TELEGRAM_BOT_TOKEN"));
        }
        if self.gemini_api_key.is_empty() {
            return Err(ConfigError::Missing("GEMINI_API_KEY"));
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::Invalid {
                name: "ETEON_REQUEST_TIMEOUT_SECS",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    pub fn logger(&self) -> LoggerConfig {
        LoggerConfig {
            level: self.log_level.clone(),
            format: self.log_format,
            log_dir: self.log_dir.clone(),
        }
    }

    pub fn relay_settings(&self) -> RelaySettings {
        RelaySettings {
            model: self.model.clone(),
            request_timeout: self.request_timeout,
            ..RelaySettings::default()
        }
    }
}

fn mask(secret: &str) -> &'static str {
    if secret.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("telegram_token", &mask(&self.telegram_token))
            .field("gemini_api_key", &mask(&self.gemini_api_key))
            .field("model", &self.model)
            .field("gemini_base_url", &self.gemini_base_url)
            .field("request_timeout", &self.request_timeout)
            .field("log_level", &self.log_level)
            .field("log_format", &self.log_format)
            .field("log_dir", &self.log_dir)
            .finish()
    }
}
