//! Process configuration read from the environment.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;

use crate::domain::ConfigError;
use crate::infra::{LogFormat, PostgresConfig};

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Everything the binary needs to start serving.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: SecretString,
    pub api_key: SecretString,
    pub listen_addr: SocketAddr,
    pub database: PostgresConfig,
    pub request_timeout: Duration,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Read the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// `DATABASE_URL` and `API_KEY` are required; everything else has a
    /// default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = required(&lookup, "DATABASE_URL")?;
        let api_key = required(&lookup, "API_KEY")?;

        let defaults = PostgresConfig::default();
        let database = PostgresConfig {
            max_connections: parsed(&lookup, "DB_MAX_CONNECTIONS", defaults.max_connections)?,
            min_connections: parsed(&lookup, "DB_MIN_CONNECTIONS", defaults.min_connections)?,
            acquire_timeout: seconds(&lookup, "DB_ACQUIRE_TIMEOUT_SECS", defaults.acquire_timeout)?,
            idle_timeout: seconds(&lookup, "DB_IDLE_TIMEOUT_SECS", defaults.idle_timeout)?,
            max_lifetime: seconds(&lookup, "DB_MAX_LIFETIME_SECS", defaults.max_lifetime)?,
        };
        if database.min_connections > database.max_connections {
            return Err(ConfigError::InvalidValue {
                key: "DB_MIN_CONNECTIONS".to_string(),
                message: "must not exceed DB_MAX_CONNECTIONS".to_string(),
            });
        }

        let default_addr = SocketAddr::from_str(DEFAULT_LISTEN_ADDR).map_err(|e| {
            ConfigError::InvalidValue {
                key: "LISTEN_ADDR".to_string(),
                message: e.to_string(),
            }
        })?;

        Ok(Self {
            database_url: SecretString::from(database_url),
            api_key: SecretString::from(api_key),
            listen_addr: parsed(&lookup, "LISTEN_ADDR", default_addr)?,
            database,
            request_timeout: seconds(
                &lookup,
                "REQUEST_TIMEOUT_SECS",
                Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            )?,
            log_format: match lookup("LOG_FORMAT") {
                Some(raw) => raw.parse()?,
                None => LogFormat::default(),
            },
        })
    }
}

fn required<F>(lookup: &F, key: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        Some(_) => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: "must not be empty".to_string(),
        }),
        None => Err(ConfigError::MissingEnvVar(key.to_string())),
    }
}

fn parsed<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        }),
        None => Ok(default),
    }
}

fn seconds<F>(lookup: &F, key: &str, default: Duration) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    parsed(lookup, key, default.as_secs()).map(Duration::from_secs)
}
