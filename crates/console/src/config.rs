//! Console configuration.
//!
//! Natively read from `BACKOFFICE_*` environment variables; the wasm build
//! uses the defaults.

use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::landing::RetryPolicy;
use crate::storage::TOKEN_KEY;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub api_url: String,
    pub token_key: String,
    pub landing_retry: RetryPolicy,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be a non-negative integer, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },

    #[error("{0} must not be empty")]
    Empty(&'static str),
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token_key: TOKEN_KEY.to_string(),
            landing_retry: RetryPolicy::default(),
        }
    }
}

impl ConsoleConfig {
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; missing keys fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let api_url = non_empty(lookup("BACKOFFICE_API_URL"), "BACKOFFICE_API_URL")?.unwrap_or(defaults.api_url);
        let token_key = non_empty(lookup("BACKOFFICE_TOKEN_KEY"), "BACKOFFICE_TOKEN_KEY")?.unwrap_or(defaults.token_key);

        let max_attempts = match lookup("BACKOFFICE_LANDING_MAX_RETRIES") {
            Some(v) => parse_number("BACKOFFICE_LANDING_MAX_RETRIES", &v)?,
            None => defaults.landing_retry.max_attempts,
        };
        let delay = match lookup("BACKOFFICE_LANDING_RETRY_DELAY_MS") {
            Some(v) => Duration::from_millis(parse_number("BACKOFFICE_LANDING_RETRY_DELAY_MS", &v)?),
            None => defaults.landing_retry.delay,
        };

        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            token_key,
            landing_retry: RetryPolicy { max_attempts, delay },
        })
    }
}

fn non_empty(value: Option<String>, key: &'static str) -> Result<Option<String>, ConfigError> {
    match value {
        Some(v) if v.trim().is_empty() => Err(ConfigError::Empty(key)),
        Some(v) => Ok(Some(v.trim().to_string())),
        None => Ok(None),
    }
}

fn parse_number<T: FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        key,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = ConsoleConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg, ConsoleConfig::default());
        assert_eq!(cfg.landing_retry.max_attempts, 2);
        assert_eq!(cfg.token_key, "token");
    }

    #[test]
    fn overrides_are_applied() {
        let cfg = ConsoleConfig::from_lookup(lookup(&[
            ("BACKOFFICE_API_URL", "https://pricing.example.com/api/"),
            ("BACKOFFICE_TOKEN_KEY", "auth_token"),
            ("BACKOFFICE_LANDING_MAX_RETRIES", "5"),
            ("BACKOFFICE_LANDING_RETRY_DELAY_MS", "50"),
        ]))
        .unwrap();

        assert_eq!(cfg.api_url, "https://pricing.example.com/api");
        assert_eq!(cfg.token_key, "auth_token");
        assert_eq!(cfg.landing_retry.max_attempts, 5);
        assert_eq!(cfg.landing_retry.delay, Duration::from_millis(50));
    }

    #[test]
    fn rejects_bad_values() {
        let err = ConsoleConfig::from_lookup(lookup(&[("BACKOFFICE_LANDING_MAX_RETRIES", "two")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { key: "BACKOFFICE_LANDING_MAX_RETRIES", .. }));

        let err = ConsoleConfig::from_lookup(lookup(&[("BACKOFFICE_API_URL", "  ")])).unwrap_err();
        assert_eq!(err, ConfigError::Empty("BACKOFFICE_API_URL"));
    }
}
