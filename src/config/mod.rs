// Configuration module entry point
// Loads settings from config.toml (optional) and FIXTURE_* environment variables

mod types;

use std::net::SocketAddr;

pub use types::{AuthConfig, Config, FixturesConfig, LoggingConfig, ServerConfig};

impl Config {
    /// Load configuration from "config.toml" in the working directory.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from the specified file path (without extension).
    /// The file is optional; environment variables with the `FIXTURE` prefix
    /// override it, and built-in defaults fill the rest.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("FIXTURE").separator("__"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 0)?
            .set_default("fixtures.asset_dir", "assets")?
            .set_default("fixtures.delay_ms", 500)?
            .set_default("auth.username", "user")?
            .set_default("auth.password", "pass")?
            .set_default("auth.realm", "JSL")?
            .set_default("logging.access_log", false)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}
