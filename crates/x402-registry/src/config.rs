//! Registry configuration.

use std::time::Duration;

use x402_registry_cache::DEFAULT_TTL;
use x402_registry_core::TopicId;
use x402_registry_sync::{Network, SyncConfig};

use crate::error::{RegistryError, Result};

pub const DIRECTORY_TOPIC_ENV: &str = "DIRECTORY_TOPIC_ID";
pub const NETWORK_ENV: &str = "HEDERA_NETWORK";
pub const REQUEST_TIMEOUT_ENV: &str = "X402_REQUEST_TIMEOUT_MS";

/// Configuration for a [`Registry`](crate::Registry).
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// The directory topic. Directory operations fail while unset.
    pub directory_topic_id: Option<TopicId>,
    /// Network whose mirror node is read.
    pub network: Network,
    /// Freshness window for cached directory snapshots.
    pub cache_ttl: Duration,
    /// Paging and deadline settings.
    pub sync: SyncConfig,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            directory_topic_id: None,
            network: Network::Testnet,
            cache_ttl: DEFAULT_TTL,
            sync: SyncConfig::default(),
        }
    }
}

impl RegistryConfig {
    /// Configuration for a known directory topic, defaults elsewhere.
    pub fn for_directory(topic: TopicId) -> Self {
        Self {
            directory_topic_id: Some(topic),
            ..Self::default()
        }
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(DIRECTORY_TOPIC_ENV).filter(|s| !s.trim().is_empty()) {
            let topic = TopicId::parse(raw.trim()).map_err(|e| {
                RegistryError::Config(format!("{} is invalid: {}", DIRECTORY_TOPIC_ENV, e))
            })?;
            config.directory_topic_id = Some(topic);
        }

        if let Some(name) = lookup(NETWORK_ENV) {
            config.network = Network::from_name(&name);
        }

        if let Some(raw) = lookup(REQUEST_TIMEOUT_ENV) {
            let ms: u64 = raw.trim().parse().map_err(|_| {
                RegistryError::Config(format!(
                    "{} must be a whole number of milliseconds, got {:?}",
                    REQUEST_TIMEOUT_ENV, raw
                ))
            })?;
            if ms == 0 {
                return Err(RegistryError::Config(format!("{} must be positive", REQUEST_TIMEOUT_ENV)));
            }
            config.sync.request_timeout = Duration::from_millis(ms);
        }

        Ok(config)
    }

    /// The directory topic, or the error every directory operation reports.
    pub fn directory_topic(&self) -> Result<&TopicId> {
        self.directory_topic_id.as_ref().ok_or_else(|| {
            RegistryError::Config(format!("{} environment variable is not configured", DIRECTORY_TOPIC_ENV))
        })
    }
}
