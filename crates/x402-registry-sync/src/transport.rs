//! Transport abstraction for topic reads and appends.
//!
//! Reading goes through [`LogSource`], appending through [`Submitter`].
//! The mirror-node client lives in [`crate::mirror`]; [`memory::MemoryLog`]
//! implements both sides in memory for tests.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use x402_registry_core::TopicId;

use crate::error::Result;
use crate::messages::{MessagePage, PageRequest};

/// Paginated read access to topics.
///
/// Implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait LogSource: Send + Sync {
    /// Fetch one page of messages.
    ///
    /// A page carries a cursor iff more messages follow in the requested order.
    async fn fetch_page(&self, request: &PageRequest) -> Result<MessagePage>;
}

/// Append access to topics.
///
/// The log assigns the sequence number; an append either lands whole or fails.
#[async_trait]
pub trait Submitter: Send + Sync {
    async fn submit(&self, topic: &TopicId, payload: Bytes) -> Result<()>;
}

#[async_trait]
impl<T: LogSource + ?Sized> LogSource for Arc<T> {
    async fn fetch_page(&self, request: &PageRequest) -> Result<MessagePage> {
        (**self).fetch_page(request).await
    }
}

#[async_trait]
impl<T: Submitter + ?Sized> Submitter for Arc<T> {
    async fn submit(&self, topic: &TopicId, payload: Bytes) -> Result<()> {
        (**self).submit(topic, payload).await
    }
}

/// An in-memory log for testing.
///
/// Supports latency and one-shot failure injection so callers can exercise
/// deadlines and mid-replay failures.
pub mod memory {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Mutex, PoisonError};
    use std::time::Duration;

    use serde::Serialize;
    use x402_registry_core::LogMessage;

    use crate::error::SyncError;
    use crate::messages::{Order, PageCursor};

    /// A failure to inject into a transport call.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Fault {
        /// Answer with a non-success HTTP status.
        Status(u16),
        /// Fail before any response arrives.
        Disconnect,
    }

    impl Fault {
        fn into_error(self) -> SyncError {
            match self {
                Fault::Status(status) => SyncError::HttpStatus {
                    status,
                    reason: "injected".into(),
                },
                Fault::Disconnect => SyncError::Request("connection reset".into()),
            }
        }
    }

    #[derive(Default)]
    struct State {
        topics: HashMap<TopicId, Vec<LogMessage>>,
        /// Successful fetches to allow before the fault fires.
        fetch_fault: Option<(usize, Fault)>,
        submit_fault: Option<Fault>,
        latency: Duration,
    }

    /// In-memory topics with mirror-node paging semantics.
    #[derive(Default)]
    pub struct MemoryLog {
        state: Mutex<State>,
        fetches: AtomicUsize,
        submissions: AtomicUsize,
    }

    impl MemoryLog {
        pub fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        fn state(&self) -> std::sync::MutexGuard<'_, State> {
            self.state.lock().unwrap_or_else(PoisonError::into_inner)
        }

        /// Insert a message as-is, keeping its sequence number.
        pub fn push(&self, topic: &TopicId, message: LogMessage) {
            self.state()
                .topics
                .entry(topic.clone())
                .or_default()
                .push(message);
        }

        /// Append raw payload bytes, assigning the next sequence number.
        pub fn append_raw(&self, topic: &TopicId, payload: &[u8]) -> u64 {
            let mut state = self.state();
            let messages = state.topics.entry(topic.clone()).or_default();
            let seq = messages.iter().map(|m| m.sequence_number).max().unwrap_or(0) + 1;
            messages.push(LogMessage::encode(
                seq,
                format!("1700000000.{:09}", seq),
                payload,
            ));
            seq
        }

        /// Append a record serialized as JSON.
        pub fn append_json<T: Serialize>(&self, topic: &TopicId, record: &T) -> Result<u64> {
            let payload = serde_json::to_vec(record)?;
            Ok(self.append_raw(topic, &payload))
        }

        /// All messages of a topic in ascending sequence order.
        pub fn messages(&self, topic: &TopicId) -> Vec<LogMessage> {
            let mut messages = self.state().topics.get(topic).cloned().unwrap_or_default();
            messages.sort_by_key(|m| m.sequence_number);
            messages
        }

        /// Delay every fetch and submit by `latency`.
        pub fn set_latency(&self, latency: Duration) {
            self.state().latency = latency;
        }

        /// Let `ok_fetches` fetches succeed, then fail the next one with `fault`.
        pub fn fail_fetch_after(&self, ok_fetches: usize, fault: Fault) {
            self.state().fetch_fault = Some((ok_fetches, fault));
        }

        /// Fail the next submit with `fault`.
        pub fn fail_next_submit(&self, fault: Fault) {
            self.state().submit_fault = Some(fault);
        }

        /// Number of page fetches served or failed so far.
        pub fn fetch_count(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }

        /// Number of successful appends through [`Submitter`].
        pub fn submit_count(&self) -> usize {
            self.submissions.load(Ordering::SeqCst)
        }

        fn take_fetch_fault(&self) -> Option<Fault> {
            let mut state = self.state();
            match state.fetch_fault.take() {
                Some((0, fault)) => Some(fault),
                Some((n, fault)) => {
                    state.fetch_fault = Some((n - 1, fault));
                    None
                }
                None => None,
            }
        }

        fn latency(&self) -> Duration {
            self.state().latency
        }
    }

    /// Cursor layout: `topic|order|limit|offset`.
    fn encode_cursor(topic: &TopicId, order: Order, limit: u32, offset: usize) -> PageCursor {
        PageCursor::new(format!("{}|{}|{}|{}", topic, order, limit, offset))
    }

    fn decode_cursor(cursor: &PageCursor) -> Result<(TopicId, Order, u32, usize)> {
        let malformed = || SyncError::MalformedResponse(format!("bad cursor: {}", cursor.as_str()));
        let parts: Vec<&str> = cursor.as_str().split('|').collect();
        let [topic, order, limit, offset] = parts[..] else {
            return Err(malformed());
        };
        let topic = TopicId::parse(topic).map_err(|_| malformed())?;
        let order = match order {
            "asc" => Order::Asc,
            "desc" => Order::Desc,
            _ => return Err(malformed()),
        };
        let limit = limit.parse().map_err(|_| malformed())?;
        let offset = offset.parse().map_err(|_| malformed())?;
        Ok((topic, order, limit, offset))
    }

    #[async_trait]
    impl LogSource for MemoryLog {
        async fn fetch_page(&self, request: &PageRequest) -> Result<MessagePage> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            let latency = self.latency();
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            if let Some(fault) = self.take_fetch_fault() {
                return Err(fault.into_error());
            }

            let (topic, order, limit, offset) = match request {
                PageRequest::First { topic, order, limit } => (topic.clone(), *order, *limit, 0),
                PageRequest::Next(cursor) => decode_cursor(cursor)?,
            };

            let mut messages = self.messages(&topic);
            if order == Order::Desc {
                messages.reverse();
            }
            let end = (offset + limit as usize).min(messages.len());
            let page: Vec<LogMessage> = messages.get(offset..end).unwrap_or_default().to_vec();
            let next = (end < messages.len()).then(|| encode_cursor(&topic, order, limit, end));

            Ok(MessagePage { messages: page, next })
        }
    }

    #[async_trait]
    impl Submitter for MemoryLog {
        async fn submit(&self, topic: &TopicId, payload: Bytes) -> Result<()> {
            let latency = self.latency();
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            if let Some(fault) = self.state().submit_fault.take() {
                return Err(match fault {
                    Fault::Status(status) => SyncError::Submit(format!("rejected with status {}", status)),
                    Fault::Disconnect => SyncError::Submit("connection reset".into()),
                });
            }
            self.append_raw(topic, &payload);
            self.submissions.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::memory::{Fault, MemoryLog};
    use super::*;
    use crate::error::SyncError;
    use crate::messages::Order;

    fn topic() -> TopicId {
        TopicId::parse("0.0.42").unwrap()
    }

    #[tokio::test]
    async fn test_memory_log_pages_ascending() {
        let log = MemoryLog::new();
        for i in 0..5 {
            log.append_raw(&topic(), format!("{{\"n\":{}}}", i).as_bytes());
        }

        let first = log
            .fetch_page(&PageRequest::first(topic(), Order::Asc, 2))
            .await
            .unwrap();
        assert_eq!(
            first.messages.iter().map(|m| m.sequence_number).collect::<Vec<_>>(),
            [1, 2]
        );

        let second = log
            .fetch_page(&PageRequest::Next(first.next.unwrap()))
            .await
            .unwrap();
        assert_eq!(second.messages[0].sequence_number, 3);

        let third = log
            .fetch_page(&PageRequest::Next(second.next.unwrap()))
            .await
            .unwrap();
        assert_eq!(third.messages.len(), 1);
        assert!(third.next.is_none());
        assert_eq!(log.fetch_count(), 3);
    }

    #[tokio::test]
    async fn test_memory_log_desc_latest_first() {
        let log = MemoryLog::new();
        log.append_raw(&topic(), b"{}");
        log.append_raw(&topic(), b"[]");

        let page = log
            .fetch_page(&PageRequest::first(topic(), Order::Desc, 1))
            .await
            .unwrap();
        assert_eq!(page.messages.len(), 1);
        assert_eq!(page.messages[0].sequence_number, 2);
    }

    #[tokio::test]
    async fn test_memory_log_unknown_topic_is_empty() {
        let log = MemoryLog::new();
        let page = log
            .fetch_page(&PageRequest::first(topic(), Order::Asc, 10))
            .await
            .unwrap();
        assert!(page.messages.is_empty());
        assert!(page.next.is_none());
    }

    #[tokio::test]
    async fn test_memory_log_faults_are_one_shot() {
        let log = MemoryLog::new();
        log.append_raw(&topic(), b"{}");
        log.fail_fetch_after(1, Fault::Status(503));

        let request = PageRequest::first(topic(), Order::Asc, 10);
        assert!(log.fetch_page(&request).await.is_ok());
        let err = log.fetch_page(&request).await.unwrap_err();
        assert!(matches!(err, SyncError::HttpStatus { status: 503, .. }));
        assert!(err.is_transport());
        assert!(log.fetch_page(&request).await.is_ok());

        log.fail_next_submit(Fault::Disconnect);
        assert!(log.submit(&topic(), Bytes::from_static(b"{}")).await.is_err());
        assert!(log.submit(&topic(), Bytes::from_static(b"{}")).await.is_ok());
        assert_eq!(log.submit_count(), 1);
        assert_eq!(log.messages(&topic()).len(), 2);
    }
}
