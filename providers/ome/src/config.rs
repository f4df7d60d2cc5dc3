//! Provider configuration.
//!
//! Each option is taken from the provider configuration document first, then
//! from its environment variable, then from the default:
//!
//! | Option     | Environment      | Default |
//! |------------|------------------|---------|
//! | `username` | `OME_USERNAME`   | required |
//! | `password` | `OME_PASSWORD`   | required |
//! | `host`     | `OME_HOST`       | required |
//! | `port`     | `OME_PORT`       | 443 |
//! | `protocol` | `OME_PROTOCOL`   | `https` |
//! | `skipssl`  | `OME_SKIP_SSL`   | false |
//! | `timeout`  | `OME_TIMEOUT`    | 30 (seconds) |

use crate::error::ProviderError;
use ome_client::ClientOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_PORT: i64 = 443;
const DEFAULT_PROTOCOL: &str = "https";
const DEFAULT_TIMEOUT_SECS: i64 = 30;

/// Provider configuration as written by the user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ProviderConfig {
    pub username: Option<String>,
    /// Sensitive
    pub password: Option<String>,
    /// OME host name or IP address
    pub host: Option<String>,
    pub port: Option<i64>,
    /// `https` or `http`
    pub protocol: Option<String>,
    /// Accept self-signed certificates
    pub skipssl: Option<bool>,
    /// Per-request timeout in seconds
    pub timeout: Option<i64>,
}

/// Configuration with environment fallbacks and defaults applied
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub username: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub protocol: String,
    pub skipssl: bool,
    pub timeout: Duration,
}

impl std::fmt::Debug for ResolvedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedConfig")
            .field("username", &self.username)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("protocol", &self.protocol)
            .field("skipssl", &self.skipssl)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl ResolvedConfig {
    /// `{protocol}://{host}:{port}`
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.protocol, self.host, self.port)
    }

    pub fn client_options(&self) -> ClientOptions {
        let mut options = ClientOptions::new(self.base_url(), &self.username, &self.password);
        options.skip_ssl = self.skipssl;
        options.timeout = self.timeout;
        options
    }
}

impl ProviderConfig {
    /// Resolve against the process environment
    pub fn resolve(&self) -> Result<ResolvedConfig, ProviderError> {
        self.resolve_with(|key| std::env::var(key).ok())
    }

    /// Resolve against an arbitrary environment lookup
    pub fn resolve_with<F>(&self, env: F) -> Result<ResolvedConfig, ProviderError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |value: &Option<String>, key: &str| -> Option<String> {
            value
                .clone()
                .or_else(|| env(key))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let username = text(&self.username, "OME_USERNAME")
            .ok_or_else(|| ProviderError::Config("username is required (or set OME_USERNAME)".to_string()))?;
        let password = self
            .password
            .clone()
            .or_else(|| env("OME_PASSWORD"))
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ProviderError::Config("password is required (or set OME_PASSWORD)".to_string()))?;
        let host = text(&self.host, "OME_HOST")
            .ok_or_else(|| ProviderError::Config("host is required (or set OME_HOST)".to_string()))?;

        let port = match self.port {
            Some(port) => port,
            None => parse_env(&env, "OME_PORT")?.unwrap_or(DEFAULT_PORT),
        };
        let port = u16::try_from(port)
            .ok()
            .filter(|p| *p > 0)
            .ok_or_else(|| ProviderError::Config(format!("port must be between 1 and 65535, got {}", port)))?;

        let protocol = text(&self.protocol, "OME_PROTOCOL")
            .unwrap_or_else(|| DEFAULT_PROTOCOL.to_string())
            .to_lowercase();
        if protocol != "https" && protocol != "http" {
            return Err(ProviderError::Config(format!(
                "protocol must be https or http, got {}",
                protocol
            )));
        }

        let skipssl = match self.skipssl {
            Some(skip) => skip,
            None => parse_env(&env, "OME_SKIP_SSL")?.unwrap_or(false),
        };

        let timeout = match self.timeout {
            Some(timeout) => timeout,
            None => parse_env(&env, "OME_TIMEOUT")?.unwrap_or(DEFAULT_TIMEOUT_SECS),
        };
        let timeout = u64::try_from(timeout)
            .ok()
            .filter(|t| *t > 0)
            .ok_or_else(|| ProviderError::Config(format!("timeout must be a positive number of seconds, got {}", timeout)))?;

        Ok(ResolvedConfig {
            username,
            password,
            host,
            port,
            protocol,
            skipssl,
            timeout: Duration::from_secs(timeout),
        })
    }
}

fn parse_env<F, T>(env: &F, key: &str) -> Result<Option<T>, ProviderError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match env(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|_| ProviderError::Config(format!("{} has an invalid value: {}", key, raw))),
    }
}
