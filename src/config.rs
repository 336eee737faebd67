//! Process configuration from environment variables

use crate::gateway::DEFAULT_API_BASE;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_PING_INTERVAL_SECS: u64 = 14 * 60;
const DEFAULT_PING_RETRY_SECS: u64 = 60;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("{name} has invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Self-ping and health responder settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LivenessConfig {
    pub port: u16,
    /// Public address of this process; no self-ping when unset
    pub self_url: Option<String>,
    pub ping_interval: Duration,
    pub ping_retry_delay: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bot_token: String,
    pub telegram_api_base: String,
    pub liveness: LivenessConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&std::env::vars().collect())
    }

    fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let get = |name: &str| vars.get(name).map(|v| v.trim()).filter(|v| !v.is_empty());

        let bot_token = get("TELEGRAM_BOT_TOKEN")
            .ok_or(ConfigError::Missing("TELEGRAM_BOT_TOKEN"))?
            .to_string();

        let port = match get("EXPENSE_BOT_PORT") {
            Some(v) => parse_var("EXPENSE_BOT_PORT", v)?,
            None => match get("PORT") {
                Some(v) => parse_var("PORT", v)?,
                None => DEFAULT_PORT,
            },
        };

        let ping_interval = match get("EXPENSE_BOT_PING_INTERVAL_SECS") {
            Some(v) => parse_var("EXPENSE_BOT_PING_INTERVAL_SECS", v)?,
            None => DEFAULT_PING_INTERVAL_SECS,
        };
        let ping_retry = match get("EXPENSE_BOT_PING_RETRY_SECS") {
            Some(v) => parse_var("EXPENSE_BOT_PING_RETRY_SECS", v)?,
            None => DEFAULT_PING_RETRY_SECS,
        };

        Ok(Self {
            bot_token,
            telegram_api_base: get("TELEGRAM_API_BASE")
                .map_or_else(|| DEFAULT_API_BASE.to_string(), str::to_string),
            liveness: LivenessConfig {
                port,
                self_url: get("EXPENSE_BOT_SELF_URL").map(str::to_string),
                ping_interval: Duration::from_secs(ping_interval),
                ping_retry_delay: Duration::from_secs(ping_retry),
            },
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::Invalid {
        name,
        value: value.to_string(),
    })
}
