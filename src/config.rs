//! Client configuration and per-call overrides.

use std::env;
use std::time::Duration;

use crate::error::ClientError;

pub const DEFAULT_HOST: &str = "https://api.reasked.com";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_RETRIES: u32 = 3;

pub const API_KEY_ENV: &str = "REASKED_API_KEY";
pub const HOST_ENV: &str = "REASKED_HOST";
pub const TIMEOUT_ENV: &str = "REASKED_TIMEOUT";
pub const RETRIES_ENV: &str = "REASKED_RETRIES";
pub const DEBUG_ENV: &str = "REASKED_DEBUG";

/// Optional settings accepted at construction. Unset fields take the defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientOptions {
    /// Base URL of the API (defaults to https://api.reasked.com)
    pub host: Option<String>,
    /// Per-attempt timeout in milliseconds
    pub timeout: Option<u64>,
    /// Number of retries after the first attempt
    pub retries: Option<u32>,
    /// Emit `[Reasked Debug]` log lines
    pub debug: Option<bool>,
}

impl ClientOptions {
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout = Some(timeout_ms);
        self
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = Some(retries);
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = Some(debug);
        self
    }

    /// Reads options from `REASKED_HOST`, `REASKED_TIMEOUT`, `REASKED_RETRIES`
    /// and `REASKED_DEBUG`.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_env_with(|key| env::var(key))
    }

    /// Same as [`ClientOptions::from_env`], with a custom variable lookup.
    pub fn from_env_with<F>(lookup: F) -> Result<Self, ClientError>
    where
        F: Fn(&str) -> Result<String, env::VarError>,
    {
        let host = lookup(HOST_ENV).ok().filter(|h| !h.is_empty());

        let timeout = match lookup(TIMEOUT_ENV) {
            Ok(raw) => Some(raw.trim().parse::<u64>().map_err(|_| {
                ClientError::Configuration(format!(
                    "Invalid {} value '{}': expected milliseconds",
                    TIMEOUT_ENV, raw
                ))
            })?),
            Err(_) => None,
        };

        let retries = match lookup(RETRIES_ENV) {
            Ok(raw) => Some(raw.trim().parse::<u32>().map_err(|_| {
                ClientError::Configuration(format!(
                    "Invalid {} value '{}': expected a retry count",
                    RETRIES_ENV, raw
                ))
            })?),
            Err(_) => None,
        };

        let debug = lookup(DEBUG_ENV)
            .ok()
            .map(|raw| matches!(raw.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"));

        Ok(Self {
            host,
            timeout,
            retries,
            debug,
        })
    }
}

/// Reads the API key from `REASKED_API_KEY`.
pub fn api_key_from_env() -> Result<String, ClientError> {
    env::var(API_KEY_ENV)
        .ok()
        .filter(|key| !key.is_empty())
        .ok_or_else(|| ClientError::Configuration("API key is required".to_string()))
}

/// Resolved, immutable connection settings of one client.
#[derive(Clone, PartialEq)]
pub struct ClientConfig {
    base_url: String,
    api_key: String,
    timeout: Duration,
    max_retries: u32,
    debug: bool,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>, options: ClientOptions) -> Result<Self, ClientError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(ClientError::Configuration("API key is required".to_string()));
        }

        let timeout_ms = options.timeout.unwrap_or(DEFAULT_TIMEOUT_MS);
        if timeout_ms == 0 {
            return Err(ClientError::Configuration(
                "Timeout must be greater than zero".to_string(),
            ));
        }

        let host = options.host.unwrap_or_else(|| DEFAULT_HOST.to_string());
        let base_url = host.trim_end_matches('/').to_string();

        Ok(Self {
            base_url,
            api_key,
            timeout: Duration::from_millis(timeout_ms),
            max_retries: options.retries.unwrap_or(DEFAULT_RETRIES),
            debug: options.debug.unwrap_or(false),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn debug(&self) -> bool {
        self.debug
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &mask_api_key(&self.api_key))
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .field("debug", &self.debug)
            .finish()
    }
}

/// Masks a key for log output, keeping at most the first 4 and last 4 chars.
pub(crate) fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 12 {
        return "*********".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}*********{}", head, tail)
}

/// Overrides for a single call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    /// Extra headers, applied after every other header
    pub headers: Vec<(String, String)>,
    /// Timeout override in milliseconds
    pub timeout: Option<u64>,
    /// Retry budget override
    pub retries: Option<u32>,
}

impl RequestOptions {
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout = Some(timeout_ms);
        self
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = Some(retries);
        self
    }
}
