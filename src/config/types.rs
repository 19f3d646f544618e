// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub fixtures: FixturesConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    /// Port 0 requests a dynamically assigned port from the OS.
    #[serde(default)]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: 0,
        }
    }
}

/// Fixture behavior configuration
#[derive(Debug, Deserialize, Clone)]
pub struct FixturesConfig {
    /// Directory that unmatched paths resolve against.
    #[serde(default = "default_asset_dir")]
    pub asset_dir: String,
    /// Artificial delay of the `/long` endpoint, in milliseconds.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

impl Default for FixturesConfig {
    fn default() -> Self {
        Self {
            asset_dir: default_asset_dir(),
            delay_ms: default_delay_ms(),
        }
    }
}

/// Basic-auth configuration for the `/auth` endpoint
#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    #[serde(default = "default_username")]
    pub username: String,
    #[serde(default = "default_password")]
    pub password: String,
    #[serde(default = "default_realm")]
    pub realm: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            username: default_username(),
            password: default_password(),
            realm: default_realm(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct LoggingConfig {
    /// Log every request; errors (status >= 500) are logged regardless.
    #[serde(default)]
    pub access_log: bool,
    /// Error log file path (stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_asset_dir() -> String {
    "assets".to_string()
}

const fn default_delay_ms() -> u64 {
    500
}

fn default_username() -> String {
    "user".to_string()
}

fn default_password() -> String {
    "pass".to_string()
}

fn default_realm() -> String {
    "JSL".to_string()
}
