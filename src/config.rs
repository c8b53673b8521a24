//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;

/// TTL applied to every response cache entry (15 minutes).
pub const DEFAULT_CACHE_TTL: u64 = 900;

const DEFAULT_SERVER_PORT: u16 = 8000;
const DEFAULT_CLEANUP_INTERVAL: u64 = 60;
const DEFAULT_JWT_SECRET: &str = "insecure-dev-secret";

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// TTL in seconds for list and item cache entries
    pub cache_ttl: u64,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// HS256 secret used to verify bearer tokens
    pub jwt_secret: String,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 8000)
    /// - `CACHE_TTL` - Cache entry TTL in seconds (default: 900)
    /// - `CLEANUP_INTERVAL` - Expired-entry sweep frequency in seconds (default: 60)
    /// - `JWT_SECRET` - Token signing secret (default: development secret)
    pub fn from_env() -> Self {
        Self {
            server_port: parse_var("SERVER_PORT").unwrap_or(DEFAULT_SERVER_PORT),
            cache_ttl: parse_var("CACHE_TTL").unwrap_or(DEFAULT_CACHE_TTL),
            cleanup_interval: parse_var("CLEANUP_INTERVAL").unwrap_or(DEFAULT_CLEANUP_INTERVAL),
            jwt_secret: env::var("JWT_SECRET")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_JWT_SECRET.to_string()),
        }
    }

    /// True when the signing secret was not overridden.
    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_JWT_SECRET
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: DEFAULT_SERVER_PORT,
            cache_ttl: DEFAULT_CACHE_TTL,
            cleanup_interval: DEFAULT_CLEANUP_INTERVAL,
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
        }
    }
}
