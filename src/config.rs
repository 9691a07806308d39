use std::env;
use std::time::Duration;

use dotenvy::dotenv;
use tracing::info;

use crate::error::ConfigError;

#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    pub api_base_url: String,
    pub api_token: Option<String>,
    pub page_limit: u32,
    pub request_timeout: Option<Duration>,
    pub actor_buffer: usize,
    /// Answer yes to every confirmation prompt. For scripted runs.
    pub assume_yes: bool,
}

impl ConsoleConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok(); // .env is optional
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_base_url = get("ADMIN_API_BASE_URL").ok_or_else(|| ConfigError::Missing("ADMIN_API_BASE_URL".into()))?;
        let api_token = get("ADMIN_API_TOKEN");
        let page_limit = parse_or("ADMIN_PAGE_LIMIT", get("ADMIN_PAGE_LIMIT"), 10u32)?;
        if page_limit == 0 {
            return Err(ConfigError::Invalid { name: "ADMIN_PAGE_LIMIT".into(), reason: "must be at least 1".into() });
        }
        let request_timeout = get("ADMIN_REQUEST_TIMEOUT_SECS")
            .map(|raw| parse::<u64>("ADMIN_REQUEST_TIMEOUT_SECS", &raw))
            .transpose()?
            .map(Duration::from_secs);
        let actor_buffer = parse_or("ADMIN_ACTOR_BUFFER", get("ADMIN_ACTOR_BUFFER"), 32usize)?;
        let assume_yes = parse_or("ADMIN_ASSUME_YES", get("ADMIN_ASSUME_YES"), false)?;

        info!(base_url = %api_base_url, page_limit, assume_yes, "Console configuration loaded");
        // The token stays out of the log.

        Ok(Self { api_base_url, api_token, page_limit, request_timeout, actor_buffer, assume_yes })
    }
}

fn parse<T>(name: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>().map_err(|e| ConfigError::Invalid { name: name.to_string(), reason: e.to_string() })
}

fn parse_or<T>(name: &str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(raw) => parse(name, &raw),
        None => Ok(default),
    }
}
