//! Configuration management for Oracle.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use pinhash_common::SearchDomain;
use pinhash_common::constants::{
    DEFAULT_LISTEN_ADDR, DEFAULT_NAMESPACE, DEFAULT_REDIS_URL, DEFAULT_STORE_PATH, SECRET_MAX,
    SECRET_MIN,
};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// HTTP listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Where the puzzle digest is persisted
    #[serde(default)]
    pub store: StoreConfig,

    /// Domain secrets are drawn from and searched over
    #[serde(default)]
    pub domain: DomainConfig,
}

/// Which durable backend holds the digest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Redis,
    File,
    /// Process memory only; the puzzle resets on restart
    Memory,
}

/// Store-specific configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_backend")]
    pub backend: StoreBackend,

    /// Redis connection URL
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// JSON file used by the file backend
    #[serde(default = "default_file_path")]
    pub file_path: String,

    /// Key prefix for shared backends
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            redis_url: default_redis_url(),
            file_path: default_file_path(),
            namespace: default_namespace(),
        }
    }
}

/// Secret/search domain bounds (inclusive)
#[derive(Debug, Clone, Deserialize)]
pub struct DomainConfig {
    #[serde(default = "default_min")]
    pub min: u32,

    #[serde(default = "default_max")]
    pub max: u32,
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self {
            min: default_min(),
            max: default_max(),
        }
    }
}

impl DomainConfig {
    pub fn to_domain(&self) -> Result<SearchDomain> {
        SearchDomain::new(self.min, self.max).context("Invalid [domain] section")
    }
}

// Default value functions
fn default_listen_addr() -> String { DEFAULT_LISTEN_ADDR.to_string() }
fn default_backend() -> StoreBackend { StoreBackend::File }
fn default_redis_url() -> String { DEFAULT_REDIS_URL.to_string() }
fn default_file_path() -> String { DEFAULT_STORE_PATH.to_string() }
fn default_namespace() -> String { DEFAULT_NAMESPACE.to_string() }
fn default_min() -> u32 { SECRET_MIN }
fn default_max() -> u32 { SECRET_MAX }

impl AppConfig {
    /// Load configuration from file, with CLI overrides
    pub fn load(config_path: &str, args: &super::Args) -> Result<Self> {
        let mut config = if Path::new(config_path).exists() {
            let settings = config::Config::builder()
                .add_source(config::File::with_name(config_path))
                .build()
                .context("Failed to load config file")?;

            settings
                .try_deserialize()
                .context("Failed to parse config")?
        } else {
            // Use defaults if config file doesn't exist
            tracing::warn!("Config file not found, using defaults");
            Self::default()
        };

        // Apply CLI overrides
        if let Some(ref listen) = args.listen {
            config.listen_addr = listen.clone();
        }
        if let Some(backend) = args.store {
            config.store.backend = backend;
        }
        if let Some(ref redis_url) = args.redis_url {
            config.store.redis_url = redis_url.clone();
        }
        if let Some(ref file) = args.store_file {
            config.store.file_path = file.clone();
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make the puzzle unsolvable
    pub fn validate(&self) -> Result<()> {
        self.domain.to_domain()?;
        if self.store.namespace.is_empty() {
            anyhow::bail!("store.namespace must not be empty");
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            store: StoreConfig::default(),
            domain: DomainConfig::default(),
        }
    }
}
