//! Configuration for georep replication nodes.
//!
//! Loads configuration from:
//! 1. a TOML file (optional, all sections default when absent)
//! 2. environment variables (highest priority)
//!
//! Collaborators never read global state; callers load a [`ReplicationConfig`]
//! once and hand the relevant sections to each service.

pub mod flags;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use flags::FeatureFlags;

/// Environment variable overriding [`NodeConfig::role`].
pub const ENV_NODE_ROLE: &str = "GEOREP_NODE_ROLE";

/// Environment variable overriding [`NodeConfig::primary_url`].
pub const ENV_PRIMARY_URL: &str = "GEOREP_PRIMARY_URL";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("unknown node role: {0}")]
    InvalidRole(String),
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplicationConfig {
    pub node:     NodeConfig,
    pub http:     HttpConfig,
    pub registry: RegistryConfig,
    pub features: FeatureFlags,
}

impl ReplicationConfig {
    /// Load config from `path` and apply environment overrides.
    ///
    /// A missing file yields the defaults, so a node can run on environment
    /// variables alone.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            debug!("Loading replication config from {:?}", path);
            let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            Self::from_toml_str(&contents)?
        } else {
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Apply overrides from a key lookup, normally the process environment.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(role) = lookup(ENV_NODE_ROLE) {
            self.node.role = role.parse()?;
        }
        if let Some(url) = lookup(ENV_PRIMARY_URL) {
            let url = url.trim();
            self.node.primary_url = (!url.is_empty()).then(|| url.to_string());
        }
        Ok(())
    }

    /// Render the configuration back to TOML.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Role this process plays in a replicated deployment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    Primary,
    Secondary,
    #[default]
    Unconfigured,
}

impl std::str::FromStr for NodeRole {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "primary" => Ok(Self::Primary),
            "secondary" => Ok(Self::Secondary),
            "" | "unconfigured" => Ok(Self::Unconfigured),
            other => Err(ConfigError::InvalidRole(other.to_string())),
        }
    }
}

/// Node identity configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub role:        NodeRole,
    /// Base URL of the primary node, `None` when no primary is known.
    pub primary_url: Option<String>,
}

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub connect_timeout_secs: u64,
    /// Total request timeout; `None` lets large blobs stream without a cap.
    pub timeout_secs:         Option<u64>,
    pub max_redirects:        usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 30,
            timeout_secs:         None,
            max_redirects:        10,
        }
    }
}

/// Container registry configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub delete_tags_service_timeout_secs: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            delete_tags_service_timeout_secs: 250,
        }
    }
}
