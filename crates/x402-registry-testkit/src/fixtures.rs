//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::Arc;

use serde_json::{json, Map, Value};
use x402_registry_core::{
    DirectoryEntry, HttpMethod, LogMessage, ObjectSchema, PointerMessage, TopicId, UsdcAmount,
};
use x402_registry_sync::transport::memory::MemoryLog;

/// Directory topic used by [`TestLog`].
pub const DIRECTORY_TOPIC: &str = "0.0.1000";

/// Parse a topic id known to be valid.
pub fn topic(s: &str) -> TopicId {
    TopicId::parse(s).unwrap_or_else(|e| panic!("fixture topic {:?}: {}", s, e))
}

/// The pointer topic [`entry`] assigns to an id.
pub fn pointer_topic_for(id: &str) -> TopicId {
    let n: u64 = id.bytes().map(u64::from).sum();
    topic(&format!("0.0.{}", 5000 + n))
}

/// A valid GET entry priced in micro-USDC.
pub fn entry(id: &str, micros: u64) -> DirectoryEntry {
    DirectoryEntry {
        id: id.to_string(),
        url: format!("https://api.example.com/{}", id),
        method: HttpMethod::Get,
        description: format!("The {} endpoint", id),
        pointer_topic_id: pointer_topic_for(id),
        initial_price_usdc: UsdcAmount::from_micros(micros),
    }
}

/// An object schema with one string property per field.
pub fn schema(fields: &[&str]) -> ObjectSchema {
    let mut properties = Map::new();
    for field in fields {
        properties.insert(field.to_string(), json!({ "type": "string" }));
    }
    ObjectSchema::new(properties)
}

/// A valid pricing record.
pub fn pointer(version: u64, micros: u64) -> PointerMessage {
    PointerMessage {
        price_usdc: UsdcAmount::from_micros(micros),
        version,
        request_schema: None,
        response_schema: schema(&["result"]),
    }
}

/// An in-memory log with a directory topic.
pub struct TestLog {
    pub log: Arc<MemoryLog>,
    pub directory: TopicId,
}

impl TestLog {
    pub fn new() -> Self {
        Self {
            log: MemoryLog::new(),
            directory: topic(DIRECTORY_TOPIC),
        }
    }

    fn append(&self, topic: &TopicId, value: &Value) -> u64 {
        self.log.append_raw(topic, value.to_string().as_bytes())
    }

    /// Append an entry to the directory topic.
    pub fn publish_entry(&self, entry: &DirectoryEntry) -> u64 {
        self.publish_raw_entry(&entry_json(entry))
    }

    /// Append an arbitrary document to the directory topic.
    pub fn publish_raw_entry(&self, doc: &Value) -> u64 {
        self.append(&self.directory, doc)
    }

    /// Append undecodable bytes to the directory topic.
    pub fn publish_garbage(&self, bytes: &[u8]) -> u64 {
        self.log.append_raw(&self.directory, bytes)
    }

    /// Insert an entry at an explicit sequence number.
    pub fn insert_entry_at(&self, sequence_number: u64, entry: &DirectoryEntry) {
        let payload = entry_json(entry).to_string();
        self.log.push(
            &self.directory,
            LogMessage::encode(
                sequence_number,
                format!("1700000000.{:09}", sequence_number),
                payload.as_bytes(),
            ),
        );
    }

    /// Append a pricing record to a pointer topic.
    pub fn publish_pointer(&self, topic: &TopicId, record: &PointerMessage) -> u64 {
        self.append(topic, &pointer_json(record))
    }

    /// The pricing records of a pointer topic in append order.
    pub fn pointer_history(&self, topic: &TopicId) -> Vec<PointerMessage> {
        self.log
            .messages(topic)
            .iter()
            .filter_map(|m| m.json().ok())
            .filter_map(|v| serde_json::from_value(v).ok())
            .collect()
    }
}

impl Default for TestLog {
    fn default() -> Self {
        Self::new()
    }
}

/// JSON document of an entry.
pub fn entry_json(entry: &DirectoryEntry) -> Value {
    serde_json::to_value(entry).unwrap_or_else(|e| panic!("entry {} serializes: {}", entry.id, e))
}

/// JSON document of a pricing record.
pub fn pointer_json(record: &PointerMessage) -> Value {
    serde_json::to_value(record).unwrap_or_else(|e| panic!("pointer serializes: {}", e))
}
