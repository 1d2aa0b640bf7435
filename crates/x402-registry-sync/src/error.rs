//! Error types for the sync module.

use std::time::Duration;

use thiserror::Error;
use x402_registry_core::{CoreError, TopicId, ValidationError};

/// Errors that can occur while reading from or appending to topics.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The log API answered with a non-success status.
    #[error("mirror node request failed: {status} {reason}")]
    HttpStatus { status: u16, reason: String },

    /// The request could not be sent or its body not received.
    #[error("mirror node request failed: {0}")]
    Request(String),

    /// The log API answered with a body we could not interpret.
    #[error("malformed mirror node response: {0}")]
    MalformedResponse(String),

    /// A network-bound step exceeded its deadline.
    #[error("{stage} timed out after {after:?}")]
    Timeout { stage: &'static str, after: Duration },

    /// The submit capability rejected an append.
    #[error("message submission failed: {0}")]
    Submit(String),

    /// The latest message of a pointer topic is not a pointer message.
    #[error("latest message of topic {topic} (sequence {sequence_number}) is malformed: {reason}")]
    MalformedPointer {
        topic: TopicId,
        sequence_number: u64,
        reason: String,
    },

    /// A price update request was rejected before reaching the log.
    #[error("invalid price update: {0}")]
    InvalidUpdate(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl SyncError {
    /// Whether this failure came from the log transport rather than from data.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            SyncError::HttpStatus { .. }
                | SyncError::Request(_)
                | SyncError::MalformedResponse(_)
                | SyncError::Timeout { .. }
                | SyncError::Submit(_)
        )
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(e: serde_json::Error) -> Self {
        SyncError::Core(CoreError::Json(e))
    }
}

/// Result type for sync operations.
pub type Result<T> = std::result::Result<T, SyncError>;
