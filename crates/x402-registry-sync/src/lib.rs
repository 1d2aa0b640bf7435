//! # x402 Registry Sync
//!
//! Reading and appending the registry's append-only topics.
//!
//! ## Overview
//!
//! The directory topic is replayed from its first message and reduced to a
//! [`Snapshot`](x402_registry_core::Snapshot): one entry per id, the one
//! with the greatest sequence number. Pointer topics are read from the
//! newest message only, and extended by the versioning protocol.
//!
//! ## Key Properties
//!
//! - **Order-independent**: reduction depends only on sequence numbers
//! - **Skip-tolerant**: invalid directory messages are logged and dropped
//! - **All-or-nothing**: a failed page fails the replay, no partial snapshot
//! - **Bounded**: every network step runs under a deadline
//!
//! ## Usage
//!
//! ```rust,no_run
//! use x402_registry_core::{DirectoryEntryValidator, TopicId};
//! use x402_registry_sync::{replay_directory, MirrorNodeClient, Network, SyncConfig};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SyncConfig::default();
//!     let client = MirrorNodeClient::new(Network::Testnet, config.request_timeout)?;
//!     let topic = TopicId::parse("0.0.12345")?;
//!
//!     let (snapshot, report) =
//!         replay_directory(&client, &DirectoryEntryValidator, &topic, &config).await?;
//!     println!("{} endpoints from {} messages", snapshot.len(), report.messages);
//!     Ok(())
//! }
//! ```
//!
//! ## Message Flow
//!
//! ```text
//! LogSource --pages--> PageReader --messages--> decode_entry --entries--> Reducer
//!                                                   |                        |
//!                                              warn + skip               Snapshot
//! ```

pub mod config;
pub mod decoder;
pub mod diff;
pub mod error;
pub mod messages;
pub mod mirror;
pub mod pointer;
pub mod reader;
pub mod reducer;
pub mod replay;
pub mod transport;

pub use config::{with_deadline, SyncConfig};
pub use decoder::{decode_entry, DecodeSkip, SkipReason};
pub use diff::{diff_snapshots, SnapshotDiff};
pub use error::{Result, SyncError};
pub use messages::{MessagePage, Order, PageCursor, PageRequest};
pub use mirror::{MirrorNodeClient, Network};
pub use pointer::{fetch_latest_pointer, next_record, publish_price_update, PriceUpdate};
pub use reader::PageReader;
pub use reducer::{reduce, Reducer};
pub use replay::{replay_directory, ReplayReport};
pub use transport::{LogSource, Submitter};
