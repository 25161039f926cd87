//! Configuration loading and management
//!
//! Sources, lowest to highest precedence:
//! 1. Built-in defaults
//! 2. A YAML file named by `DRIVEN_CONFIG`
//! 3. Environment variables (`PORT`, `HOST`, `MONGODB_URI`, `DB_USER`,
//!    `DB_PASS`, `DB_NAME`, `DB_COLLECTION`)

use crate::core::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Environment variable naming an optional YAML configuration file
pub const CONFIG_PATH_VAR: &str = "DRIVEN_CONFIG";

/// HTTP listener configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

/// Document store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Full connection string; takes precedence over the credential fields
    pub uri: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    /// Atlas cluster host used with `user` and `password`
    pub cluster_host: String,
    /// Database name
    pub name: String,
    /// Collection holding the toys
    pub collection: String,
    pub max_pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            uri: None,
            user: None,
            password: None,
            cluster_host: "cluster0.sjuvyra.mongodb.net".to_string(),
            name: "drivenDB".to_string(),
            collection: "toys".to_string(),
            max_pool_size: 10,
        }
    }
}

impl DatabaseConfig {
    /// Connection string for the driver
    ///
    /// Uses `uri` when set, otherwise builds an SRV string from the credentials.
    pub fn connection_uri(&self) -> Result<String, ConfigError> {
        if let Some(uri) = &self.uri {
            return Ok(uri.clone());
        }

        match (&self.user, &self.password) {
            (Some(user), Some(password)) => Ok(format!(
                "mongodb+srv://{}:{}@{}/?retryWrites=true&w=majority",
                user, password, self.cluster_host
            )),
            _ => Err(ConfigError::MissingCredentials),
        }
    }
}

/// Complete process configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load from the process environment: defaults, then the optional YAML
    /// file, then variable overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) => {
                tracing::info!(path = %path, "Loading configuration file");
                Self::from_yaml_file(&path)?
            }
            Err(_) => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply variable overrides read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.server.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                key: "PORT".to_string(),
                value: port.clone(),
            })?;
        }
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(uri) = lookup("MONGODB_URI") {
            self.database.uri = Some(uri);
        }
        if let Some(user) = lookup("DB_USER") {
            self.database.user = Some(user);
        }
        if let Some(password) = lookup("DB_PASS") {
            self.database.password = Some(password);
        }
        if let Some(name) = lookup("DB_NAME") {
            self.database.name = name;
        }
        if let Some(collection) = lookup("DB_COLLECTION") {
            self.database.collection = collection;
        }
        Ok(())
    }

    /// Address the HTTP listener binds to
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse().map_err(|_| ConfigError::InvalidValue {
            key: "HOST".to_string(),
            value: self.server.host.clone(),
        })
    }
}
