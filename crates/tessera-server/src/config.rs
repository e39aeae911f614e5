//! Server configuration
//!
//! Loaded once at start-up from the environment (and `.env` via dotenvy),
//! then passed explicitly to whatever needs it.

use anyhow::Result;
use std::net::{Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_DB_TIMEOUT_SECS: u64 = 5;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_LOG_FILTER: &str = "info,tower_http=info";

/// Runtime configuration for the API server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// PostgreSQL URL; in-memory storage when absent
    pub database_url: Option<String>,
    pub bind_addr: SocketAddr,
    /// Deadline for a whole HTTP request
    pub request_timeout: Duration,
    /// Deadline for a single database statement
    pub db_timeout: Duration,
    pub db_max_connections: u32,
    /// Users kept in the id cache (0 disables caching)
    pub cache_capacity: usize,
    /// Fallback tracing filter when RUST_LOG is unset
    pub log_filter: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            bind_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            db_timeout: Duration::from_secs(DEFAULT_DB_TIMEOUT_SECS),
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
            cache_capacity: tessera::adapters::DEFAULT_CACHE_CAPACITY,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl ServerConfig {
    /// Read configuration from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            database_url: get("DATABASE_URL"),
            bind_addr: parse_or(get("TESSERA_BIND_ADDR"), "TESSERA_BIND_ADDR", defaults.bind_addr)?,
            request_timeout: Duration::from_secs(parse_or(
                get("TESSERA_REQUEST_TIMEOUT_SECS"),
                "TESSERA_REQUEST_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )?),
            db_timeout: Duration::from_secs(parse_or(
                get("TESSERA_DB_TIMEOUT_SECS"),
                "TESSERA_DB_TIMEOUT_SECS",
                DEFAULT_DB_TIMEOUT_SECS,
            )?),
            db_max_connections: parse_or(
                get("TESSERA_DB_MAX_CONNECTIONS"),
                "TESSERA_DB_MAX_CONNECTIONS",
                defaults.db_max_connections,
            )?,
            cache_capacity: parse_or(
                get("TESSERA_CACHE_CAPACITY"),
                "TESSERA_CACHE_CAPACITY",
                defaults.cache_capacity,
            )?,
            log_filter: get("TESSERA_LOG").unwrap_or(defaults.log_filter),
        })
    }
}

fn parse_or<T>(raw: Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid value for {key}: {value:?} ({e})")),
    }
}
