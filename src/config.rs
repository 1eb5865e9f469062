use crate::errors::ConfigError;
use crate::models::AnalyticsShape;
use std::{env, time::Duration};

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:7071/api";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub analytics_shape: AnalyticsShape,
    pub confirm_delete: bool,
    pub request_timeout: Duration,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Reads settings through `lookup`; unset variables take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_base_url = lookup("TASK_API_BASE_URL")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        let analytics_shape = match lookup("TASK_ANALYTICS_SHAPE") {
            Some(value) => AnalyticsShape::parse(&value).ok_or_else(|| {
                ConfigError::invalid("TASK_ANALYTICS_SHAPE", value, "expected completion or productivity")
            })?,
            None => AnalyticsShape::default(),
        };

        let confirm_delete = match lookup("TASK_CONFIRM_DELETE") {
            Some(value) => parse_bool(&value)
                .ok_or_else(|| ConfigError::invalid("TASK_CONFIRM_DELETE", value, "expected true or false"))?,
            None => true,
        };

        let timeout_secs = match lookup("TASK_API_TIMEOUT_SECS") {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::invalid("TASK_API_TIMEOUT_SECS", value, "expected a positive integer"))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let port = match lookup("PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|err| ConfigError::invalid("PORT", value, err.to_string()))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            api_base_url,
            analytics_shape,
            confirm_delete,
            request_timeout: Duration::from_secs(timeout_secs),
            port,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
