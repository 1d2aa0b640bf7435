//! Wire types of the mirror-node topic messages API.
//!
//! Only the fields the registry reads are modelled; everything else the
//! mirror node sends is ignored.

use serde::{Deserialize, Serialize};
use std::fmt;

use x402_registry_core::{LogMessage, TopicId};

/// Page size limits.
pub mod limits {
    /// Page size used when replaying a topic.
    pub const DEFAULT_PAGE_LIMIT: u32 = 100;
    /// Largest page the mirror node will serve.
    pub const MAX_PAGE_LIMIT: u32 = 100;
}

/// Read direction over a topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    Asc,
    Desc,
}

impl Order {
    pub fn as_str(self) -> &'static str {
        match self {
            Order::Asc => "asc",
            Order::Desc => "desc",
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque continuation reference returned with a page.
///
/// For the mirror node this is the `links.next` path. Callers never build
/// one themselves; they pass back whatever the previous page returned.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageCursor(String);

impl PageCursor {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A request for one page of topic messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRequest {
    /// The first page of a topic.
    First {
        topic: TopicId,
        order: Order,
        limit: u32,
    },
    /// The page following a previously returned cursor.
    Next(PageCursor),
}

impl PageRequest {
    /// First page, clamping `limit` to what the mirror node serves.
    pub fn first(topic: TopicId, order: Order, limit: u32) -> Self {
        PageRequest::First {
            topic,
            order,
            limit: limit.clamp(1, limits::MAX_PAGE_LIMIT),
        }
    }
}

/// One page of messages plus its continuation, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessagePage {
    pub messages: Vec<LogMessage>,
    pub next: Option<PageCursor>,
}

/// `GET /api/v1/topics/{id}/messages` response body.
#[derive(Debug, Clone, Deserialize)]
pub struct MirrorPage {
    #[serde(default)]
    pub messages: Vec<MirrorMessage>,
    #[serde(default)]
    pub links: MirrorLinks,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MirrorLinks {
    pub next: Option<String>,
}

/// One topic message as served by the mirror node.
#[derive(Debug, Clone, Deserialize)]
pub struct MirrorMessage {
    pub consensus_timestamp: String,
    pub message: String,
    pub sequence_number: u64,
}

impl From<MirrorMessage> for LogMessage {
    fn from(m: MirrorMessage) -> Self {
        LogMessage {
            sequence_number: m.sequence_number,
            consensus_timestamp: m.consensus_timestamp,
            message: m.message,
        }
    }
}

impl From<MirrorPage> for MessagePage {
    fn from(page: MirrorPage) -> Self {
        MessagePage {
            messages: page.messages.into_iter().map(LogMessage::from).collect(),
            next: page.links.next.filter(|n| !n.is_empty()).map(PageCursor::new),
        }
    }
}
