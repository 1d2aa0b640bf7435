//! The Registry: directory listing, schema lookup and pricing updates.
//!
//! A registry owns its log source, its submit capability and its snapshot
//! cache. Nothing is process-global; two registries never share state.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;

use x402_registry_cache::{CacheStats, KeyedLocks, MemoryCache, SnapshotCache};
use x402_registry_core::{
    DirectoryEntry, DirectoryEntryValidator, HttpMethod, PointerMessage, PointerMessageValidator,
    RecordKind, Snapshot, TopicId, UsdcAmount, ValidationError, Validator,
};
use x402_registry_sync::{
    fetch_latest_pointer, publish_price_update, replay_directory, with_deadline, LogSource,
    MirrorNodeClient, PriceUpdate, Submitter, SyncError,
};

use crate::config::RegistryConfig;
use crate::error::{RegistryError, Result};

/// Agent-facing projection of a directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointSummary {
    pub id: String,
    pub description: String,
    pub method: HttpMethod,
    pub url: String,
    pub price_usdc: UsdcAmount,
    pub pointer_topic_id: TopicId,
}

impl From<&DirectoryEntry> for EndpointSummary {
    fn from(entry: &DirectoryEntry) -> Self {
        Self {
            id: entry.id.clone(),
            description: entry.description.clone(),
            method: entry.method,
            url: entry.url.clone(),
            price_usdc: entry.initial_price_usdc,
            pointer_topic_id: entry.pointer_topic_id.clone(),
        }
    }
}

/// A submitter for registries that only read.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadOnly;

#[async_trait]
impl Submitter for ReadOnly {
    async fn submit(&self, topic: &TopicId, _payload: Bytes) -> x402_registry_sync::Result<()> {
        Err(SyncError::Submit(format!(
            "no submit capability configured for topic {}",
            topic
        )))
    }
}

/// The registry.
///
/// Generic over the log source `L`, the submit capability `S` and the
/// snapshot cache `C`.
pub struct Registry<L, S, C = MemoryCache> {
    source: L,
    submitter: S,
    cache: C,
    config: RegistryConfig,
    /// One replay in flight per directory topic.
    replays: KeyedLocks<TopicId>,
    /// One in-process writer per pointer topic.
    writes: KeyedLocks<TopicId>,
}

impl Registry<MirrorNodeClient, ReadOnly> {
    /// A read-only registry over the configured network's mirror node.
    pub fn mirror(config: RegistryConfig) -> Result<Self> {
        let client = MirrorNodeClient::new(config.network, config.sync.request_timeout)
            .map_err(|e| RegistryError::Config(e.to_string()))?;
        Ok(Registry::new(client, ReadOnly, config))
    }
}

impl<L, S> Registry<L, S, MemoryCache>
where
    L: LogSource,
    S: Submitter,
{
    /// Create a registry with an in-memory cache using the configured TTL.
    pub fn new(source: L, submitter: S, config: RegistryConfig) -> Self {
        let cache = MemoryCache::with_ttl(config.cache_ttl);
        Self::with_cache(source, submitter, cache, config)
    }
}

impl<L, S, C> Registry<L, S, C>
where
    L: LogSource,
    S: Submitter,
    C: SnapshotCache,
{
    pub fn with_cache(source: L, submitter: S, cache: C, config: RegistryConfig) -> Self {
        Self {
            source,
            submitter,
            cache,
            config,
            replays: KeyedLocks::new(),
            writes: KeyedLocks::new(),
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Directory
    // ─────────────────────────────────────────────────────────────────────────

    /// Current directory entries, ordered by id.
    ///
    /// Served from cache while fresh. On a miss, concurrent callers share a
    /// single replay; a failed replay is never cached.
    pub async fn list_endpoints(&self) -> Result<Arc<Snapshot>> {
        let topic = self.config.directory_topic()?;

        if let Some(snapshot) = self.cache.get(topic) {
            tracing::debug!(topic = %topic, "cache hit for directory topic");
            return Ok(snapshot);
        }

        let _replay = self.replays.lock(topic).await;
        if let Some(snapshot) = self.cache.get(topic) {
            tracing::debug!(topic = %topic, "directory snapshot filled by concurrent replay");
            return Ok(snapshot);
        }

        tracing::debug!(topic = %topic, "cache miss for directory topic, replaying");
        let (snapshot, _report) =
            replay_directory(&self.source, &DirectoryEntryValidator, topic, &self.config.sync)
                .await
                .map_err(RegistryError::FetchEndpoints)?;

        let snapshot = Arc::new(snapshot);
        self.cache.set(topic, Arc::clone(&snapshot));
        tracing::debug!(topic = %topic, entries = snapshot.len(), "cached directory snapshot");
        Ok(snapshot)
    }

    /// Directory entries projected for agents.
    pub async fn endpoint_summaries(&self) -> Result<Vec<EndpointSummary>> {
        let snapshot = self.list_endpoints().await?;
        Ok(snapshot.iter().map(EndpointSummary::from).collect())
    }

    /// Publish a new directory entry bound to an existing pointer topic.
    ///
    /// The entry's own `pointer_topic_id` is replaced by `pointer_topic`.
    pub async fn add_endpoint(&self, raw: &Value, pointer_topic: TopicId) -> Result<DirectoryEntry> {
        let topic = self.config.directory_topic()?;

        let mut entry = DirectoryEntryValidator.validate_strict(raw)?;
        entry.pointer_topic_id = pointer_topic;
        entry
            .check_shape()
            .map_err(|v| ValidationError::new(RecordKind::DirectoryEntry, v))?;

        let payload = serde_json::to_vec(&entry).map_err(|e| RegistryError::AddEndpoint(e.into()))?;
        with_deadline(
            "submit directory entry",
            self.config.sync.request_timeout,
            self.submitter.submit(topic, Bytes::from(payload)),
        )
        .await
        .map_err(RegistryError::AddEndpoint)?;

        {
            // A replay still in flight may have read the log before the submit.
            let _replay = self.replays.lock(topic).await;
            self.cache.invalidate(topic);
        }
        tracing::info!(
            topic = %topic,
            id = %entry.id,
            pointer_topic = %entry.pointer_topic_id,
            "submitted directory entry"
        );
        Ok(entry)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Pricing
    // ─────────────────────────────────────────────────────────────────────────

    /// The current pricing record of an endpoint.
    pub async fn endpoint_schema(&self, pointer_topic: &TopicId) -> Result<PointerMessage> {
        fetch_latest_pointer(&self.source, &PointerMessageValidator, pointer_topic, &self.config.sync)
            .await
            .map_err(|source| RegistryError::FetchSchema {
                topic: pointer_topic.clone(),
                source,
            })?
            .ok_or_else(|| RegistryError::SchemaNotFound(pointer_topic.clone()))
    }

    /// Append the next version of an endpoint's pricing record.
    ///
    /// In-process updates to the same topic are serialized from the read of
    /// the current record through the append.
    pub async fn update_price(&self, pointer_topic: &TopicId, update: &PriceUpdate) -> Result<PointerMessage> {
        let _lease = self.writes.lock(pointer_topic).await;
        publish_price_update(
            &self.source,
            &self.submitter,
            &PointerMessageValidator,
            pointer_topic,
            update,
            &self.config.sync,
        )
        .await
        .map_err(|source| RegistryError::UpdatePrice {
            topic: pointer_topic.clone(),
            source,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Cache
    // ─────────────────────────────────────────────────────────────────────────

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Drop every cached snapshot; the next listing replays.
    pub fn clear_cache(&self) {
        self.cache.clear();
        tracing::debug!("endpoints cache cleared");
    }
}
