//! Configuration Management Module
//!
//! This module handles loading and managing configuration for the wallet registry service.
//! Configuration includes the record store location, the Movement verification policy,
//! and API settings.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Environment variable that overrides the configuration file path.
pub const CONFIG_PATH_ENV: &str = "WALLET_REGISTRY_CONFIG_PATH";

/// Configuration file used when no override is given.
pub const DEFAULT_CONFIG_PATH: &str = "config/wallet-registry.toml";

// ============================================================================
// CONFIGURATION STRUCTURES
// ============================================================================

/// Main configuration structure containing all service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Record store and verification policy
    pub registry: RegistryConfig,
    /// API server configuration (host, port, CORS settings)
    pub api: ApiConfig,
}

/// Which record store implementation backs the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Single JSON file, rewritten on every registration
    #[default]
    File,
    /// Process memory only; lost on restart
    Memory,
}

/// Registry configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Path of the JSON file holding all registration records
    #[serde(default = "default_data_file")]
    pub data_file: String,
    /// Record store backend
    #[serde(default)]
    pub store: StoreBackend,
    /// Accept Movement registrations that carry no ownership proof.
    /// Such records are stored with `verified = false`.
    #[serde(default = "default_allow_unverified_movement")]
    pub allow_unverified_movement: bool,
    /// Maximum accepted request body size in bytes
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: u64,
}

fn default_data_file() -> String {
    "data/registrations.json".to_string()
}

fn default_allow_unverified_movement() -> bool {
    true
}

fn default_max_body_bytes() -> u64 {
    16 * 1024
}

/// API server configuration.
///
/// Controls how the registry exposes its REST API endpoints
/// and handles cross-origin requests from the registration page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host address to bind the API server to
    pub host: String,
    /// Port number to bind the API server to
    pub port: u16,
    /// Allowed CORS origins for cross-origin requests
    pub cors_origins: Vec<String>,
}

// ============================================================================
// CONFIGURATION LOADING AND MANAGEMENT
// ============================================================================

impl Config {
    /// Validates the configuration.
    ///
    /// # Returns
    ///
    /// - `Ok(())` - Configuration is valid
    /// - `Err(anyhow::Error)` - A setting is unusable
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.registry.store == StoreBackend::File && self.registry.data_file.trim().is_empty() {
            return Err(anyhow::anyhow!(
                "Configuration error: registry.data_file must be set when registry.store = \"file\"."
            ));
        }

        if self.registry.max_body_bytes == 0 {
            return Err(anyhow::anyhow!(
                "Configuration error: registry.max_body_bytes must be greater than 0."
            ));
        }

        if self.api.port == 0 {
            return Err(anyhow::anyhow!("Configuration error: api.port must not be 0."));
        }

        if self.api.cors_origins.is_empty() {
            return Err(anyhow::anyhow!(
                "Configuration error: api.cors_origins must list at least one origin (use \"*\" to allow any)."
            ));
        }

        Ok(())
    }

    /// Loads configuration from the TOML file.
    ///
    /// The path comes from `WALLET_REGISTRY_CONFIG_PATH`, falling back to
    /// `config/wallet-registry.toml`. If the file does not exist the user is asked to
    /// copy the template.
    pub fn load() -> anyhow::Result<Self> {
        let config_path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        if Path::new(&config_path).exists() {
            Self::load_from(&config_path)
        } else {
            Err(anyhow::anyhow!(
                "Configuration file '{}' not found. Please copy the template:\n\
                cp config/wallet-registry.template.toml config/wallet-registry.toml\n\
                Then edit config/wallet-registry.toml with your actual values.",
                config_path
            ))
        }
    }

    /// Loads and validates configuration from an explicit path.
    pub fn load_from(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Creates a default configuration suitable for local development.
    #[allow(clippy::should_implement_trait)]
    pub fn default() -> Self {
        Self {
            registry: RegistryConfig {
                data_file: default_data_file(),
                store: StoreBackend::File,
                allow_unverified_movement: default_allow_unverified_movement(),
                max_body_bytes: default_max_body_bytes(),
            },
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
                cors_origins: vec!["http://localhost:3000".to_string()],
            },
        }
    }
}
