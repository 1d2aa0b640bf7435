//! Error types for the registry.

use std::path::PathBuf;

use thiserror::Error;
use x402_registry_core::{CoreError, TopicId, ValidationError};
use x402_registry_sync::SyncError;

/// Errors that can occur during registry operations.
///
/// Failures from the sync layer are wrapped with the operation they
/// interrupted, so the message reads as a stage prefix plus cause.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Missing or unusable configuration.
    #[error("{0}")]
    Config(String),

    #[error("failed to fetch endpoints from directory topic: {0}")]
    FetchEndpoints(#[source] SyncError),

    #[error("failed to fetch pointer message from topic {topic}: {source}")]
    FetchSchema {
        topic: TopicId,
        #[source]
        source: SyncError,
    },

    /// The pointer topic holds no pricing record yet.
    #[error("no schema found for pointer topic: {0}")]
    SchemaNotFound(TopicId),

    #[error("failed to update price on topic {topic}: {source}")]
    UpdatePrice {
        topic: TopicId,
        #[source]
        source: SyncError,
    },

    #[error("failed to add endpoint: {0}")]
    AddEndpoint(#[source] SyncError),

    /// A record file could not be read or parsed.
    #[error("cannot read {}: {message}", .path.display())]
    File { path: PathBuf, message: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl RegistryError {
    /// The sync failure underneath a stage-prefixed error, if any.
    pub fn sync_cause(&self) -> Option<&SyncError> {
        match self {
            RegistryError::FetchEndpoints(e) | RegistryError::AddEndpoint(e) => Some(e),
            RegistryError::FetchSchema { source, .. } | RegistryError::UpdatePrice { source, .. } => {
                Some(source)
            }
            _ => None,
        }
    }
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
