//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::time::Duration;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// How long a fetched payload stays servable, in seconds
    pub fetch_ttl: u64,
    /// Upper bound on a single fetch collaborator call, in seconds
    pub fetch_timeout: u64,
    /// Whether `Cache.*` calls are counted and logged
    pub instrumentation: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 1)
    /// - `FETCH_TTL` - Fetch cache TTL in seconds (default: 10)
    /// - `FETCH_TIMEOUT` - Fetch timeout in seconds (default: 30)
    /// - `INSTRUMENTATION` - `true`/`false` (default: true)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            cleanup_interval: parse_var("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
            fetch_ttl: parse_var("FETCH_TTL").unwrap_or(defaults.fetch_ttl),
            fetch_timeout: parse_var("FETCH_TIMEOUT").unwrap_or(defaults.fetch_timeout),
            instrumentation: parse_var("INSTRUMENTATION").unwrap_or(defaults.instrumentation),
        }
    }

    /// Fetch TTL as a `Duration`.
    pub fn fetch_ttl(&self) -> Duration {
        Duration::from_secs(self.fetch_ttl)
    }

    /// Fetch timeout as a `Duration`.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            cleanup_interval: 1,
            fetch_ttl: 10,
            fetch_timeout: 30,
            instrumentation: true,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
