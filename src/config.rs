// src/config.rs
//! Converter configuration
//!
//! Loaded from TOML. Every key is optional; the defaults describe the
//! standard content package layout:
//!
//! ```toml
//! content_root = "/jcr_root"
//! system_users_root = "/home/users/system"
//! folder_node_type = "rep:AuthorizableFolder"
//! service_suffix = "-service"
//! ```

use crate::naming::{PathError, RepositoryPath};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Default path for the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "/etc/repoinit-sysusers/config.toml";

/// Errors from loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Settings for recognizing system users and rendering their statements
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConverterConfig {
    /// Directory inside a content package that mirrors the repository root
    pub content_root: String,
    /// Repository path under which system users live
    pub system_users_root: String,
    /// Node type hint for intermediate folder creation
    pub folder_node_type: String,
    /// Appended to every generated service user id
    pub service_suffix: String,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            content_root: "/jcr_root".to_string(),
            system_users_root: "/home/users/system".to_string(),
            folder_node_type: "rep:AuthorizableFolder".to_string(),
            service_suffix: "-service".to_string(),
        }
    }
}

impl ConverterConfig {
    /// Parse and validate configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    ///
    /// With no explicit path the default location is tried, and a missing
    /// default file yields the defaults. An explicit path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, explicit) = match path {
            Some(p) => (p, true),
            None => (Path::new(DEFAULT_CONFIG_PATH), false),
        };

        if !explicit && !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        debug!("Loaded config from {}", path.display());
        Self::from_toml(&content)
    }

    /// Repository path of the system users area
    pub fn system_users_path(&self) -> Result<RepositoryPath, ConfigError> {
        RepositoryPath::parse(&self.system_users_root).map_err(|e| invalid_root("system_users_root", e))
    }

    /// Check the values describe a usable layout
    pub fn validate(&self) -> Result<(), ConfigError> {
        let root = self.system_users_path()?;
        if root.is_root() {
            return Err(ConfigError::Invalid {
                key: "system_users_root",
                reason: "must not be the repository root".to_string(),
            });
        }

        let content_root =
            RepositoryPath::parse(&self.content_root).map_err(|e| invalid_root("content_root", e))?;
        if content_root.is_root() {
            return Err(ConfigError::Invalid {
                key: "content_root",
                reason: "must not be '/'".to_string(),
            });
        }

        if self.folder_node_type.is_empty()
            || self.folder_node_type.chars().any(|c| c.is_whitespace() || c == '(' || c == ')')
        {
            return Err(ConfigError::Invalid {
                key: "folder_node_type",
                reason: format!("'{}' is not a node type name", self.folder_node_type),
            });
        }

        if self.service_suffix.chars().any(char::is_whitespace) {
            return Err(ConfigError::Invalid {
                key: "service_suffix",
                reason: "must not contain whitespace".to_string(),
            });
        }

        Ok(())
    }
}

fn invalid_root(key: &'static str, err: PathError) -> ConfigError {
    ConfigError::Invalid {
        key,
        reason: err.to_string(),
    }
}
