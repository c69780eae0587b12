//! API client configuration parsed from environment variables.

use std::time::Duration;

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DEFAULT_API_BASE_URL: &str = "https://vehiclerental.infinityfreeapp.com/api";
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

pub const BASE_URL_ENV: &str = "API_BASE_URL";
pub const WITH_CREDENTIALS_ENV: &str = "API_WITH_CREDENTIALS";

/// Errors produced while building configuration.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The base URL is not an absolute `http`/`https` URL.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

/// Settings fixed when the API client is constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Backend root every relative request path is joined onto. No trailing slash.
    pub base_url: String,
    /// Transport-level timeout applied to every request.
    pub timeout: Duration,
    /// Keep and resend cookies across requests.
    pub with_credentials: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_owned(),
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            with_credentials: false,
        }
    }
}

impl ApiConfig {
    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `API_BASE_URL`: backend root, default [`DEFAULT_API_BASE_URL`]
    /// - `API_WITH_CREDENTIALS`: `1/true/yes/on` enables the cookie store
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] for a non-http(s) base URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ApiConfig::from_env`] with an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] for a non-http(s) base URL.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            config.base_url = normalize_base_url(&raw)?;
        }

        match lookup(WITH_CREDENTIALS_ENV).as_deref().map(parse_bool) {
            Some(Some(value)) => config.with_credentials = value,
            Some(None) => tracing::warn!(var = WITH_CREDENTIALS_ENV, "ignoring unrecognized boolean"),
            None => {}
        }

        Ok(config)
    }

    /// Replace the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] for a non-http(s) base URL.
    pub fn with_base_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        self.base_url = normalize_base_url(raw)?;
        Ok(self)
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::InvalidBaseUrl(raw.to_owned()));
    }
    Ok(trimmed.to_owned())
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
