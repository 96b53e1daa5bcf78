//! Configuration loading and management
//!
//! Settings come from an optional YAML file, then environment variables
//! override individual keys. The result is validated once at startup and
//! passed explicitly to whatever needs it.

use crate::core::error::ConfigError;
use crate::entities::order::DEFAULT_LIST_LIMIT;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable naming the YAML config file
pub const CONFIG_PATH_VAR: &str = "BAKERY_CONFIG";

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Database connection settings; no URL means the in-memory store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrdersConfig {
    /// Maximum number of orders returned by a listing
    pub list_limit: usize,
}

impl Default for OrdersConfig {
    fn default() -> Self {
        Self {
            list_limit: DEFAULT_LIST_LIMIT,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub orders: OrdersConfig,
    /// Default tracing filter, overridden by `RUST_LOG`
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            orders: OrdersConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            message: format!("{}: {}", path.display(), e),
        })?;
        serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.display().to_string()),
            message: e.to_string(),
        })
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError {
            file: None,
            message: e.to_string(),
        })
    }

    /// File named by `BAKERY_CONFIG` (if any), then environment overrides
    pub fn from_env() -> Result<Self, ConfigError> {
        let lookup = |key: &str| std::env::var(key).ok();

        let mut config = match lookup(CONFIG_PATH_VAR) {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Override keys from `lookup` (the process environment in production)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("BAKERY_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("BAKERY_PORT") {
            self.server.port = parse_var("BAKERY_PORT", &port)?;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = Some(url).filter(|u| !u.trim().is_empty());
        }
        if let Some(max) = lookup("BAKERY_MAX_CONNECTIONS") {
            self.database.max_connections = parse_var("BAKERY_MAX_CONNECTIONS", &max)?;
        }
        if let Some(limit) = lookup("BAKERY_ORDER_LIST_LIMIT") {
            self.orders.list_limit = parse_var("BAKERY_ORDER_LIST_LIMIT", &limit)?;
        }
        if let Some(level) = lookup("BAKERY_LOG") {
            self.log_level = level;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(invalid("server.port", "0", "must be greater than 0"));
        }
        if self.orders.list_limit == 0 {
            return Err(invalid("orders.list_limit", "0", "must be greater than 0"));
        }
        if self.database.max_connections == 0 {
            return Err(invalid(
                "database.max_connections",
                "0",
                "must be greater than 0",
            ));
        }
        Ok(())
    }

    /// Address the HTTP listener binds to
    pub fn address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| invalid(name, raw, "not a valid number"))
}

fn invalid(field: &str, value: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.address(), "0.0.0.0:8080");
        assert_eq!(config.orders.list_limit, 100);
        assert!(config.database.url.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = AppConfig::from_yaml_str("server:\n  port: 9000\n").unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "database:\n  url: postgres://bakery@localhost/bakery\n  max_connections: 4\norders:\n  list_limit: 25"
        )
        .unwrap();

        let config = AppConfig::from_yaml_file(file.path()).unwrap();
        assert_eq!(
            config.database.url.as_deref(),
            Some("postgres://bakery@localhost/bakery")
        );
        assert_eq!(config.database.max_connections, 4);
        assert_eq!(config.orders.list_limit, 25);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = AppConfig::from_yaml_file("/nonexistent/bakery.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::IoError { .. }));
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = AppConfig::from_yaml_str("server:\n  port: 9000\n").unwrap();
        config
            .apply_overrides(env(&[
                ("BAKERY_PORT", "7070"),
                ("BAKERY_ORDER_LIST_LIMIT", "10"),
                ("DATABASE_URL", "postgres://localhost/test"),
            ]))
            .unwrap();
        assert_eq!(config.server.port, 7070);
        assert_eq!(config.orders.list_limit, 10);
        assert!(config.database.url.is_some());
    }

    #[test]
    fn test_blank_database_url_means_in_memory() {
        let mut config = AppConfig::default();
        config.apply_overrides(env(&[("DATABASE_URL", "  ")])).unwrap();
        assert!(config.database.url.is_none());
    }

    #[test]
    fn test_invalid_port_override() {
        let mut config = AppConfig::default();
        let err = config
            .apply_overrides(env(&[("BAKERY_PORT", "eighty")]))
            .unwrap_err();
        assert!(err.to_string().contains("BAKERY_PORT"));
    }

    #[test]
    fn test_zero_limit_is_rejected() {
        let mut config = AppConfig::default();
        config.orders.list_limit = 0;
        assert!(config.validate().is_err());
    }
}
