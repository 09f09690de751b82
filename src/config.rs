//! Configuration loading and constants.
//!
//! Loads application configuration from an optional TOML file, then applies the
//! `ETSY_API_KEY` environment variable on top. Defines constants for the
//! upstream request shape, HTTP cache headers, logging and default paths.
//! `AppConfig` is the root configuration struct containing all settings.

use const_format::formatcp;
use serde::Deserialize;
use std::path::Path;

// =============================================================================
// HTTP Response Cache Control
// =============================================================================
// Search results are only cached by the requesting client. Nothing is cached
// server-side.

/// Search results - short private cache on the device
pub const HTTP_CACHE_SEARCH_MAX_AGE: u32 = 60;

pub const CACHE_CONTROL_SEARCH: &str =
    formatcp!("private, max-age={}", HTTP_CACHE_SEARCH_MAX_AGE);

/// Liveness probes must always reach the process
pub const CACHE_CONTROL_HEALTH: &str = "no-store";

// =============================================================================
// Search Constants
// =============================================================================

/// Page size used when the client does not send `limit`
pub const DEFAULT_SEARCH_LIMIT: i64 = 24;

/// Smallest page size forwarded upstream
pub const MIN_SEARCH_LIMIT: i64 = 1;

/// Largest page size forwarded upstream
pub const MAX_SEARCH_LIMIT: i64 = 48;

/// Maximum characters of an upstream error body echoed back to the client
pub const UPSTREAM_ERROR_EXCERPT_CHARS: usize = 256;

/// Title used when a listing arrives without one
pub const DEFAULT_LISTING_TITLE: &str = "Etsy listing";

/// Base of the canonical listing page URL
pub const LISTING_PAGE_BASE: &str = "https://www.etsy.com/listing/";

// =============================================================================
// Upstream Defaults
// =============================================================================

/// Etsy Open API v3 active listings search endpoint
pub const DEFAULT_ETSY_ENDPOINT: &str = "https://openapi.etsy.com/v3/application/listings/active";

/// Upstream request timeout in seconds
pub const DEFAULT_ETSY_TIMEOUT_SECS: u64 = 20;

/// Client identifier sent upstream
pub const DEFAULT_USER_AGENT: &str = "UsedFinder/1.0 (+iOS)";

/// Environment variable holding the upstream credential
pub const ETSY_API_KEY_ENV: &str = "ETSY_API_KEY";

// =============================================================================
// Default Paths and Strings
// =============================================================================

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "usedfinder=debug,tower_http=info";

/// Default log format (text or json)
pub const DEFAULT_LOG_FORMAT: &str = "text";

/// Default bind address
pub const DEFAULT_HTTP_HOST: &str = "0.0.0.0";

/// Default bind port
pub const DEFAULT_HTTP_PORT: u16 = 8000;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub http: HttpServerConfig,
    /// Upstream marketplace settings
    #[serde(default)]
    pub etsy: EtsyConfig,
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
    #[serde(default)]
    pub tls: TlsConfig,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            tls: TlsConfig::default(),
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

/// How the listener terminates TLS
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TlsMode {
    /// Plain HTTP, usually behind a reverse proxy
    #[default]
    None,
    /// Certificate and key loaded from PEM files
    Manual,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TlsConfig {
    #[serde(default)]
    pub mode: TlsMode,
    pub cert_path: Option<String>,
    pub key_path: Option<String>,
}

/// Upstream marketplace settings
#[derive(Debug, Clone, Deserialize)]
pub struct EtsyConfig {
    /// API key. Overridden by the `ETSY_API_KEY` environment variable.
    pub api_key: Option<String>,
    #[serde(default = "EtsyConfig::default_endpoint")]
    pub endpoint: String,
    #[serde(default = "EtsyConfig::default_timeout")]
    pub timeout_seconds: u64,
    #[serde(default = "EtsyConfig::default_user_agent")]
    pub user_agent: String,
}

impl Default for EtsyConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: Self::default_endpoint(),
            timeout_seconds: Self::default_timeout(),
            user_agent: Self::default_user_agent(),
        }
    }
}

impl EtsyConfig {
    fn default_endpoint() -> String {
        DEFAULT_ETSY_ENDPOINT.to_string()
    }

    fn default_timeout() -> u64 {
        DEFAULT_ETSY_TIMEOUT_SECS
    }

    fn default_user_agent() -> String {
        DEFAULT_USER_AGENT.to_string()
    }

    /// The configured credential, treating an empty string as absent
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.is_empty())
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
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply the credential from the environment, if set and non-empty.
    ///
    /// The environment wins over any key in the config file.
    pub fn apply_env_credential(&mut self, value: Option<String>) {
        if let Some(key) = value.filter(|key| !key.is_empty()) {
            self.etsy.api_key = Some(key);
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.http.tls.mode == TlsMode::Manual
            && (self.http.tls.cert_path.is_none() || self.http.tls.key_path.is_none())
        {
            return Err(ConfigError::Validation(
                "http.tls.mode = \"manual\" requires both cert_path and key_path".to_string(),
            ));
        }

        if self.etsy.timeout_seconds == 0 {
            return Err(ConfigError::Validation(
                "etsy.timeout_seconds must be greater than zero".to_string(),
            ));
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
    #[error("Configuration error: {0}")]
    Validation(String),
}
