//! Application configuration.
//!
//! Every value has a default and can be overridden from the environment:
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `RESOURCE_API_URL` | unset | REST base URL; unset runs against in-memory stores |
//! | `RESOURCE_API_TIMEOUT_SECS` | `30` | HTTP request timeout |
//! | `RESOURCE_NOTICE_MS` | `1300` | create/update success notice lifetime |
//! | `RESOURCE_DELETE_NOTICE_MS` | `1200` | delete success notice lifetime |
//! | `RESOURCE_CHANNEL_BUFFER` | `32` | session and store channel capacity |
//! | `RESOURCE_AUTO_CONFIRM` | `true` | answer of the headless confirmer |

use std::time::Duration;

use thiserror::Error;

use crate::framework::SessionConfig;

/// Base URL of the backend in the reference deployment.
pub const DEFAULT_API_URL: &str = "http://backend:8080/api";

/// Invalid configuration value.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("{var} must be a non-negative integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },

    #[error("{var} must be true or false, got {value:?}")]
    InvalidFlag { var: &'static str, value: String },

    #[error("{var} must be greater than zero")]
    Zero { var: &'static str },
}

/// Top-level configuration for the console.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// REST base URL. `None` selects in-memory stores.
    pub api_base_url: Option<String>,
    pub request_timeout: Duration,
    pub notice_dismiss: Duration,
    pub delete_notice_dismiss: Duration,
    pub channel_buffer: usize,
    pub auto_confirm: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        let session = SessionConfig::default();
        Self {
            api_base_url: None,
            request_timeout: Duration::from_secs(30),
            notice_dismiss: session.notice_dismiss,
            delete_notice_dismiss: session.delete_notice_dismiss,
            channel_buffer: session.buffer_size,
            auto_confirm: true,
        }
    }
}

impl AppConfig {
    /// Reads overrides from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Reads overrides through `lookup`, starting from the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = lookup("RESOURCE_API_URL").filter(|url| !url.trim().is_empty()) {
            config.api_base_url = Some(url.trim().to_string());
        }
        if let Some(secs) = parse_number(&lookup, "RESOURCE_API_TIMEOUT_SECS")? {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(ms) = parse_number(&lookup, "RESOURCE_NOTICE_MS")? {
            config.notice_dismiss = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_number(&lookup, "RESOURCE_DELETE_NOTICE_MS")? {
            config.delete_notice_dismiss = Duration::from_millis(ms);
        }
        if let Some(buffer) = parse_number(&lookup, "RESOURCE_CHANNEL_BUFFER")? {
            if buffer == 0 {
                return Err(ConfigError::Zero {
                    var: "RESOURCE_CHANNEL_BUFFER",
                });
            }
            config.channel_buffer = buffer as usize;
        }
        if let Some(value) = lookup("RESOURCE_AUTO_CONFIRM") {
            config.auto_confirm = match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => {
                    return Err(ConfigError::InvalidFlag {
                        var: "RESOURCE_AUTO_CONFIRM",
                        value,
                    })
                }
            };
        }

        Ok(config)
    }

    /// Use the REST backend at `url`.
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    /// The URL HTTP transports should use, falling back to [`DEFAULT_API_URL`].
    pub fn api_url_or_default(&self) -> &str {
        self.api_base_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    /// The per-session part of the configuration.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            buffer_size: self.channel_buffer,
            notice_dismiss: self.notice_dismiss,
            delete_notice_dismiss: self.delete_notice_dismiss,
        }
    }
}

fn parse_number(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<u64>, ConfigError> {
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber { var, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.api_base_url, None);
        assert_eq!(config.api_url_or_default(), DEFAULT_API_URL);
        assert_eq!(config.notice_dismiss, Duration::from_millis(1300));
        assert_eq!(config.delete_notice_dismiss, Duration::from_millis(1200));
        assert!(config.auto_confirm);
    }

    #[test]
    fn overrides_from_environment() {
        let config = AppConfig::from_lookup(lookup(&[
            ("RESOURCE_API_URL", "http://localhost:8080/api"),
            ("RESOURCE_API_TIMEOUT_SECS", "5"),
            ("RESOURCE_CHANNEL_BUFFER", "8"),
            ("RESOURCE_AUTO_CONFIRM", "no"),
        ]))
        .unwrap();
        assert_eq!(config.api_url_or_default(), "http://localhost:8080/api");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.session_config().buffer_size, 8);
        assert!(!config.auto_confirm);
    }

    #[test]
    fn rejects_bad_values() {
        let err = AppConfig::from_lookup(lookup(&[("RESOURCE_NOTICE_MS", "soon")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidNumber {
                var: "RESOURCE_NOTICE_MS",
                value: "soon".to_string()
            }
        );

        let err = AppConfig::from_lookup(lookup(&[("RESOURCE_CHANNEL_BUFFER", "0")])).unwrap_err();
        assert_eq!(err, ConfigError::Zero { var: "RESOURCE_CHANNEL_BUFFER" });
    }
}
