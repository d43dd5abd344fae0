//! Configuration for the REST adapter.
//!
//! Fixed at construction and never mutated by the adapter afterwards.

use std::env;
use std::fmt;

use crate::error::ConfigError;
use crate::tls::{TlsPolicy, TlsVerify};

/// Base URL of the API, including protocol and path prefix.
pub const ENV_API_URL: &str = "GRAYLOG_API_URL";
/// API token; sent as the Basic auth username.
pub const ENV_API_KEY: &str = "GRAYLOG_API_KEY";
/// `true`, `false`, or a path to a PEM CA bundle.
pub const ENV_TLS_VERIFY: &str = "GRAYLOG_TLS_VERIFY";
/// Set to a truthy value to silence the insecure-TLS warning.
pub const ENV_SUPPRESS_INSECURE_WARNINGS: &str = "GRAYLOG_SUPPRESS_INSECURE_WARNINGS";

/// Adapter configuration: where to connect, how to authenticate, how to
/// verify the server.
#[derive(Clone, PartialEq, Eq)]
pub struct AdapterConfig {
    pub base_url: String,
    pub api_key: String,
    pub tls: TlsPolicy,
}

impl fmt::Debug for AdapterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("tls", &self.tls)
            .finish()
    }
}

impl AdapterConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            tls: TlsPolicy::default(),
        }
    }

    /// Create configuration from environment variables
    ///
    /// Reads `GRAYLOG_API_URL` and `GRAYLOG_API_KEY` (both required), plus the
    /// optional `GRAYLOG_TLS_VERIFY` and `GRAYLOG_SUPPRESS_INSECURE_WARNINGS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = required_var(ENV_API_URL)?;
        let api_key = required_var(ENV_API_KEY)?;

        let verify = env::var(ENV_TLS_VERIFY)
            .ok()
            .and_then(|v| v.parse::<TlsVerify>().ok())
            .unwrap_or_default();
        let mut tls = TlsPolicy::new(verify);
        if env::var(ENV_SUPPRESS_INSECURE_WARNINGS).is_ok_and(|v| is_truthy(&v)) {
            tls = tls.suppress_insecure_warnings();
        }

        let config = Self {
            base_url,
            api_key,
            tls,
        };
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn with_tls(mut self, tls: TlsPolicy) -> Self {
        self.tls = tls;
        self
    }

    #[must_use]
    pub fn with_tls_verify(mut self, verify: impl Into<TlsVerify>) -> Self {
        self.tls = TlsPolicy::new(verify);
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("base_url cannot be empty".into()));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::Invalid(
                "base_url must start with http:// or https://".into(),
            ));
        }
        Ok(())
    }

    /// Base URL ending in exactly one `/`, ready for path concatenation.
    pub fn normalized_base_url(&self) -> String {
        format!("{}/", self.base_url.trim_end_matches('/'))
    }
}

fn required_var(name: &str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_exactly_one_trailing_separator() {
        let plain = AdapterConfig::new("https://graylog.example.org/api", "key");
        assert_eq!(plain.normalized_base_url(), "https://graylog.example.org/api/");

        let slashed = AdapterConfig::new("https://graylog.example.org/api//", "key");
        assert_eq!(slashed.normalized_base_url(), "https://graylog.example.org/api/");
    }

    #[test]
    fn validation_rejects_missing_scheme() {
        assert!(AdapterConfig::new("https://graylog/api", "k").validate().is_ok());
        assert!(AdapterConfig::new("", "k").validate().is_err());
        assert!(AdapterConfig::new("graylog/api", "k").validate().is_err());
    }

    #[test]
    fn debug_output_redacts_the_api_key() {
        let config = AdapterConfig::new("https://graylog/api", "s3cr3t-token");
        let debug = format!("{config:?}");
        assert!(!debug.contains("s3cr3t-token"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn tls_verify_builder_accepts_bool() {
        let config = AdapterConfig::new("https://graylog/api", "k").with_tls_verify(false);
        assert!(config.tls.is_insecure());
    }
}
