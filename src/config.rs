//! Configuration loading and constants.
//!
//! Configuration comes from an optional TOML file, with the `PORT` environment
//! variable taking precedence over the configured HTTP port. Every section has
//! defaults, so the service runs with no file at all. `AppConfig` is the root
//! configuration struct containing all settings.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

// =============================================================================
// HTTP Response Cache Control
// =============================================================================

/// Greeting and health responses change on every request and must never be
/// served from an intermediate cache.
pub const CACHE_CONTROL_NO_STORE: &str = "no-store";

// =============================================================================
// Hit Counter Constants
// =============================================================================

/// Key of the counter in the cache service
pub const DEFAULT_COUNTER_KEY: &str = "hits";

/// Cache service host (the compose service name)
pub const DEFAULT_COUNTER_HOST: &str = "redis";

/// Cache service port
pub const DEFAULT_COUNTER_PORT: u16 = 6379;

/// Extra attempts after a failed connection before the error is returned
pub const DEFAULT_COUNTER_RETRIES: u32 = 5;

/// Fixed delay in milliseconds between attempts
pub const DEFAULT_COUNTER_RETRY_DELAY_MS: u64 = 500;

// =============================================================================
// Default Paths and Strings
// =============================================================================

/// Environment variable overriding `http.port`
pub const PORT_ENV_VAR: &str = "PORT";

/// Address the HTTP server binds to (all interfaces)
pub const DEFAULT_HTTP_HOST: &str = "0.0.0.0";

/// Port the HTTP server binds to when neither config nor `PORT` set one
pub const DEFAULT_HTTP_PORT: u16 = 5000;

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "hello_counter=debug,tower_http=debug";

/// Default log format (text or json)
pub const DEFAULT_LOG_FORMAT: &str = "text";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub http: HttpServerConfig,
    /// Hit counter and its cache service
    #[serde(default)]
    pub counter: CounterConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "HttpServerConfig::default_host")]
    pub host: String,
    #[serde(default = "HttpServerConfig::default_port")]
    pub port: u16,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
        }
    }
}

impl HttpServerConfig {
    fn default_host() -> String {
        DEFAULT_HTTP_HOST.to_string()
    }

    fn default_port() -> u16 {
        DEFAULT_HTTP_PORT
    }
}

/// Hit counter configuration.
///
/// When `enabled` is false the greeting is served without touching the
/// cache service at all.
#[derive(Debug, Clone, Deserialize)]
pub struct CounterConfig {
    #[serde(default = "CounterConfig::default_enabled")]
    pub enabled: bool,
    /// Cache service hostname
    #[serde(default = "CounterConfig::default_host")]
    pub host: String,
    /// Cache service port
    #[serde(default = "CounterConfig::default_port")]
    pub port: u16,
    /// Key holding the counter
    #[serde(default = "CounterConfig::default_key")]
    pub key: String,
    /// Retry budget for connection failures (default: 5)
    #[serde(default = "CounterConfig::default_retries")]
    pub retries: u32,
    /// Delay between attempts in milliseconds (default: 500)
    #[serde(default = "CounterConfig::default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            enabled: Self::default_enabled(),
            host: Self::default_host(),
            port: Self::default_port(),
            key: Self::default_key(),
            retries: Self::default_retries(),
            retry_delay_ms: Self::default_retry_delay_ms(),
        }
    }
}

impl CounterConfig {
    fn default_enabled() -> bool {
        true
    }

    fn default_host() -> String {
        DEFAULT_COUNTER_HOST.to_string()
    }

    fn default_port() -> u16 {
        DEFAULT_COUNTER_PORT
    }

    fn default_key() -> String {
        DEFAULT_COUNTER_KEY.to_string()
    }

    fn default_retries() -> u32 {
        DEFAULT_COUNTER_RETRIES
    }

    fn default_retry_delay_ms() -> u64 {
        DEFAULT_COUNTER_RETRY_DELAY_MS
    }

    /// Delay between attempts as a `Duration`
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log format: "text" (human-readable, default) or "json" (structured)
    #[serde(default = "LoggingConfig::default_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_LOG_FORMAT.to_string(),
        }
    }
}

impl LoggingConfig {
    fn default_format() -> String {
        DEFAULT_LOG_FORMAT.to_string()
    }

    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl AppConfig {
    /// Load configuration from an optional TOML file, then apply `PORT`.
    pub fn load<P: AsRef<Path>>(path: Option<P>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_port(std::env::var(PORT_ENV_VAR).ok().as_deref())?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Override the HTTP port with the value of `PORT`, if any.
    ///
    /// An unset variable keeps the configured port; a value that is not a
    /// port number is a startup error.
    pub fn apply_port(&mut self, value: Option<&str>) -> Result<(), ConfigError> {
        if let Some(value) = value {
            self.http.port = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::Port(value.to_string()))?;
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid PORT value: {0:?}")]
    Port(String),
}
