//! # x402 Registry Core
//!
//! Pure primitives for the x402 registry: the records carried by the
//! directory and pointer topics, the raw log message envelope, reduced
//! snapshots, and the structural validators.
//!
//! This crate contains no I/O, no caching, no networking.
//!
//! ## Key Types
//!
//! - [`DirectoryEntry`] - A priced, addressable endpoint published to the directory topic
//! - [`PointerMessage`] - The authoritative price and I/O contract for one endpoint
//! - [`LogMessage`] - One raw message of a topic, with its sequence number
//! - [`Snapshot`] - The reduced, id-ordered view of a directory topic
//! - [`TopicId`] - A `shard.realm.num` topic identifier
//! - [`UsdcAmount`] - A non-negative USDC amount with 6-decimal precision
//!
//! ## Validation
//!
//! Records are validated structurally against the published record schemas
//! through the [`Validator`] trait. See the [`validation`] module.

pub mod amount;
pub mod entry;
pub mod error;
pub mod message;
pub mod pointer;
pub mod snapshot;
pub mod types;
pub mod validation;

pub use amount::{UsdcAmount, USDC_DECIMALS};
pub use entry::{DirectoryEntry, HttpMethod};
pub use error::{CoreError, ValidationError, Violation};
pub use message::LogMessage;
pub use pointer::{ObjectSchema, PointerMessage};
pub use snapshot::{Snapshot, SnapshotDigest};
pub use types::TopicId;
pub use validation::{DirectoryEntryValidator, PointerMessageValidator, RecordKind, Validator};
