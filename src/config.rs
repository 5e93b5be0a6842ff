//! Process configuration, assembled once at startup from the environment
//! and handed to every component via constructor injection.

use std::path::PathBuf;
use std::time::Duration;

/// Typed configuration for the server. Malformed environment values fall
/// back to their default and are logged, never abort startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_dir: PathBuf,
    pub config_dir: PathBuf,
    pub dispatch_poll_interval: Duration,
    pub dispatch_batch_size: usize,
    pub delivery_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            data_dir: PathBuf::from("./data"),
            config_dir: PathBuf::from("./config"),
            dispatch_poll_interval: Duration::from_millis(500),
            dispatch_batch_size: 100,
            delivery_timeout: Duration::from_secs(30),
        }
    }
}

impl Config {
    /// Load from the environment, logging a warning (and keeping the
    /// default) for any variable that fails to parse.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: parse_env_or("PORT", defaults.port),
            data_dir: std::env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            config_dir: std::env::var("CONFIG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.config_dir),
            dispatch_poll_interval: Duration::from_millis(parse_env_or(
                "DISPATCH_POLL_MS",
                defaults.dispatch_poll_interval.as_millis() as u64,
            )),
            dispatch_batch_size: parse_env_or("DISPATCH_BATCH_SIZE", defaults.dispatch_batch_size),
            delivery_timeout: Duration::from_secs(parse_env_or(
                "DELIVERY_TIMEOUT_SECS",
                defaults.delivery_timeout.as_secs(),
            )),
        }
    }
}

fn parse_env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(key, raw, "invalid environment value, using default");
            default
        }),
        Err(_) => default,
    }
}
