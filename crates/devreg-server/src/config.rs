//! Server configuration.
//!
//! Values come from `DEVREG_*` environment variables, falling back to the
//! defaults below:
//! - `DEVREG_BIND_ADDR`: listen address (default "0.0.0.0:8000")
//! - `DEVREG_STORE_URL`: store URL (default "redis://localhost:6379/0")
//! - `DEVREG_LOG_LEVEL`: log filter when `RUST_LOG` is unset (default "info")

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Key-value store URL (`redis://`, `sqlite://` or `memory://`).
    #[serde(default = "default_store_url")]
    pub store_url: String,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ServerConfig {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(Environment::with_prefix("DEVREG"))
    }

    fn from_source(env: Environment) -> Result<Self, ConfigError> {
        Config::builder().add_source(env).build()?.try_deserialize()
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_store_url() -> String {
    "redis://localhost:6379/0".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(vars: &[(&str, &str)]) -> ServerConfig {
        let source: config::Map<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_source(Environment::with_prefix("DEVREG").source(Some(source))).unwrap()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = load(&[]);
        assert_eq!(config.bind_addr, "0.0.0.0:8000");
        assert_eq!(config.store_url, "redis://localhost:6379/0");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = load(&[
            ("DEVREG_STORE_URL", "memory://"),
            ("DEVREG_BIND_ADDR", "127.0.0.1:9000"),
        ]);
        assert_eq!(config.store_url, "memory://");
        assert_eq!(config.bind_addr, "127.0.0.1:9000");
        assert_eq!(config.log_level, "info");
    }
}
