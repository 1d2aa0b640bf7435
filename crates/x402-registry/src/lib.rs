//! # x402 Registry
//!
//! A discovery and pricing registry for pay-per-request HTTP APIs, kept on
//! an append-only, sequence-numbered message log.
//!
//! ## Overview
//!
//! - **Directory topic**: a public log of [`DirectoryEntry`] records. Its
//!   current state is the reduction of the whole log, last writer by
//!   sequence number winning per id.
//! - **Pointer topics**: one single-writer log per endpoint. Only the newest
//!   [`PointerMessage`] is authoritative; updates append the next version.
//!
//! Directory listings are cached for a short TTL. Concurrent cache misses
//! share one replay, and in-process price updates to one pointer topic are
//! serialized.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use x402_registry::{Registry, RegistryConfig};
//!
//! async fn example() -> x402_registry::Result<()> {
//!     let registry = Registry::mirror(RegistryConfig::from_env()?)?;
//!
//!     for endpoint in registry.endpoint_summaries().await? {
//!         println!("{} {} {} USDC", endpoint.method.as_str(), endpoint.url, endpoint.price_usdc);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `x402_registry::core` - Records, validators, snapshots
//! - `x402_registry::cache` - Snapshot cache and keyed locks
//! - `x402_registry::sync` - Topic transports, replay and the versioning protocol

pub mod config;
pub mod error;
pub mod files;
pub mod registry;

pub use x402_registry_cache as cache;
pub use x402_registry_core as core;
pub use x402_registry_sync as sync;

pub use config::RegistryConfig;
pub use error::{RegistryError, Result};
pub use registry::{EndpointSummary, ReadOnly, Registry};

pub use x402_registry_cache::CacheStats;
pub use x402_registry_core::{
    DirectoryEntry, HttpMethod, ObjectSchema, PointerMessage, Snapshot, TopicId, UsdcAmount,
};
pub use x402_registry_sync::{Network, PriceUpdate, ReplayReport, SnapshotDiff};
