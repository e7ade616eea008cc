use std::net::IpAddr;
use std::time::Duration;

use reqwest::Url;

use crate::error::ConfigError;

#[derive(Debug, Clone)]
pub struct Config {
    pub store: StoreConfig,
    pub host: IpAddr,
    pub port: u16,
    pub session_ttl: Duration,
    /// How often idle sessions are swept.
    pub session_sweep: Duration,
    pub log_level: String,
}

/// Connection settings for the hosted art store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub endpoint: Url,
    pub access_key: String,
    /// `None` leaves the transport default in place.
    pub timeout: Option<Duration>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let store = StoreConfig::from_env()?;

        let host: IpAddr = env_or("WERISE_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| ConfigError::Invalid(format!("WERISE_HOST: {e}")))?;

        let port: u16 = env_or("WERISE_PORT", "3000")
            .parse()
            .map_err(|e| ConfigError::Invalid(format!("WERISE_PORT: {e}")))?;

        let session_ttl: u64 = env_or("WERISE_SESSION_TTL_SECS", "86400")
            .parse()
            .map_err(|e| ConfigError::Invalid(format!("WERISE_SESSION_TTL_SECS: {e}")))?;

        let session_sweep: u64 = env_or("WERISE_SESSION_SWEEP_SECS", "300")
            .parse()
            .map_err(|e| ConfigError::Invalid(format!("WERISE_SESSION_SWEEP_SECS: {e}")))?;
        if session_sweep == 0 {
            return Err(ConfigError::Invalid(
                "WERISE_SESSION_SWEEP_SECS: must be greater than zero".to_string(),
            ));
        }

        let log_level = env_or("WERISE_LOG_LEVEL", "info");

        Ok(Config {
            store,
            host,
            port,
            session_ttl: Duration::from_secs(session_ttl),
            session_sweep: Duration::from_secs(session_sweep),
            log_level,
        })
    }
}

impl StoreConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let endpoint = env_required("STORE_ENDPOINT_URL")?;
        let access_key = env_required("STORE_ACCESS_KEY")?;

        let timeout = match std::env::var("STORE_TIMEOUT_SECS").ok() {
            Some(raw) => Some(Duration::from_secs(raw.trim().parse().map_err(|e| {
                ConfigError::Invalid(format!("STORE_TIMEOUT_SECS: {e}"))
            })?)),
            None => None,
        };

        Self::new(&endpoint, &access_key, timeout)
    }

    /// Build store settings from explicit values. Blank values count as missing.
    pub fn new(
        endpoint: &str,
        access_key: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, ConfigError> {
        if endpoint.trim().is_empty() {
            return Err(ConfigError::Missing("STORE_ENDPOINT_URL"));
        }
        if access_key.trim().is_empty() {
            return Err(ConfigError::Missing("STORE_ACCESS_KEY"));
        }

        let endpoint = Url::parse(endpoint.trim())
            .map_err(|e| ConfigError::Invalid(format!("STORE_ENDPOINT_URL: {e}")))?;
        if endpoint.cannot_be_a_base() {
            return Err(ConfigError::Invalid(
                "STORE_ENDPOINT_URL: must be an absolute http(s) URL".to_string(),
            ));
        }

        Ok(StoreConfig {
            endpoint,
            access_key: access_key.trim().to_string(),
            timeout,
        })
    }
}

fn env_required(key: &'static str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::Missing(key))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
