//! Configuration for the iiko Cloud API client
//!
//! Supports environment-based configuration with sensible defaults.

use crate::error::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::time::Duration;

/// Default iiko Cloud API host
pub const DEFAULT_BASE_URL: &str = "https://api-ru.iiko.services";

/// Default value of the vendor `Timeout` header
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Default transport timeout for the underlying HTTP client
const DEFAULT_TRANSPORT_TIMEOUT: Duration = Duration::from_secs(60);

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API login issued by iiko
    pub api_login: String,
    /// Base URL of the iiko Cloud API
    pub base_url: String,
    /// Token obtained elsewhere; adopted as-is instead of exchanging the login
    pub working_token: Option<String>,
    /// Extra headers sent with every request
    pub headers: BTreeMap<String, String>,
    /// Log full request and response bodies at debug level
    pub debug: bool,
    /// Per-call timeout sent in the vendor `Timeout` header
    #[serde(with = "duration_secs")]
    pub request_timeout: Duration,
    /// Transport timeout for the HTTP client
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_login: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            working_token: None,
            headers: BTreeMap::new(),
            debug: false,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            timeout: DEFAULT_TRANSPORT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Create a configuration for the given API login
    pub fn new(api_login: impl Into<String>) -> Self {
        Self {
            api_login: api_login.into(),
            ..Self::default()
        }
    }

    /// Create configuration from environment variables
    ///
    /// Reads the following environment variables:
    /// - `IIKO_API_LOGIN`: API login (required)
    /// - `IIKO_BASE_URL`: Base URL override
    /// - `IIKO_TOKEN`: Working token to adopt instead of exchanging the login
    /// - `IIKO_DEBUG`: `1`/`true` enables body logging
    /// - `IIKO_TIMEOUT_SECS`: Transport timeout in seconds
    /// - `IIKO_REQUEST_TIMEOUT_SECS`: Default vendor `Timeout` header in seconds
    pub fn from_env() -> ApiResult<Self> {
        let api_login =
            env::var("IIKO_API_LOGIN").map_err(|_| ApiError::missing_env("IIKO_API_LOGIN"))?;

        let base_url = env::var("IIKO_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let working_token = env::var("IIKO_TOKEN").ok().filter(|t| !t.is_empty());

        let debug = env::var("IIKO_DEBUG")
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let timeout = secs_from_env("IIKO_TIMEOUT_SECS").unwrap_or(DEFAULT_TRANSPORT_TIMEOUT);
        let request_timeout =
            secs_from_env("IIKO_REQUEST_TIMEOUT_SECS").unwrap_or(DEFAULT_REQUEST_TIMEOUT);

        Ok(Self {
            api_login,
            base_url,
            working_token,
            headers: BTreeMap::new(),
            debug,
            request_timeout,
            timeout,
        })
    }

    /// Builder-style method to set base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Builder-style method to resume a session with an already issued token
    #[must_use]
    pub fn with_working_token(mut self, token: impl Into<String>) -> Self {
        self.working_token = Some(token.into());
        self
    }

    /// Builder-style method to add a header sent with every request
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Builder-style method to toggle body logging
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Builder-style method to set the default vendor `Timeout`
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Builder-style method to set the transport timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Base URL without a trailing slash
    #[must_use]
    pub fn base_url_trimmed(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Validate the configuration
    pub fn validate(&self) -> ApiResult<()> {
        if self.api_login.trim().is_empty() {
            return Err(ApiError::config("api_login cannot be empty"));
        }

        if self.base_url.is_empty() {
            return Err(ApiError::config("base_url cannot be empty"));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ApiError::config("base_url must start with http:// or https://"));
        }

        if self.timeout.is_zero() || self.request_timeout.is_zero() {
            return Err(ApiError::config("timeouts cannot be zero"));
        }

        if matches!(self.working_token.as_deref(), Some("")) {
            return Err(ApiError::config("working_token cannot be empty"));
        }

        Ok(())
    }
}

fn secs_from_env(var: &str) -> Option<Duration> {
    env::var(var)
        .ok()
        .and_then(|s| s.parse().ok())
        .map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(15));
        assert!(config.working_token.is_none());
        assert!(!config.debug);
    }

    #[test]
    fn test_builder_pattern() {
        let config = ClientConfig::new("login")
            .with_base_url("https://api-eu.iiko.services/")
            .with_working_token("tok")
            .with_header("X-Source", "tests")
            .with_request_timeout(Duration::from_secs(30));

        assert_eq!(config.base_url_trimmed(), "https://api-eu.iiko.services");
        assert_eq!(config.working_token.as_deref(), Some("tok"));
        assert_eq!(config.headers.get("X-Source").map(String::as_str), Some("tests"));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_validation() {
        assert!(ClientConfig::new("login").validate().is_ok());
        assert!(ClientConfig::default().validate().is_err());
        assert!(ClientConfig::new("login").with_base_url("").validate().is_err());
        assert!(ClientConfig::new("login").with_base_url("ftp://x").validate().is_err());
        assert!(
            ClientConfig::new("login")
                .with_timeout(Duration::ZERO)
                .validate()
                .is_err()
        );
        assert!(ClientConfig::new("login").with_working_token("").validate().is_err());
    }

    #[test]
    fn test_serde_roundtrip_uses_seconds() {
        let config = ClientConfig::new("login");
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["request_timeout"], 15);
        let back: ClientConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back.timeout, config.timeout);
    }
}
