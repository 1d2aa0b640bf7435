//! Sync configuration and deadline handling.

use std::future::Future;
use std::time::Duration;

use crate::error::{Result, SyncError};
use crate::messages::limits;

/// Configuration for topic reads and appends.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Messages requested per page when replaying a topic.
    pub page_limit: u32,
    /// Deadline for each individual network exchange.
    pub request_timeout: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            page_limit: limits::DEFAULT_PAGE_LIMIT,
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Run one network-bound step under a deadline.
pub async fn with_deadline<T, F>(stage: &'static str, after: Duration, step: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(after, step).await {
        Ok(result) => result,
        Err(_) => Err(SyncError::Timeout { stage, after }),
    }
}
