//! LogMessage: the raw transport unit of a topic.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// One message of a topic as served by the mirror node.
///
/// `message` is the base64 encoding of the submitted payload. Records
/// carried by a topic are the decoded payloads of its messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogMessage {
    /// Log-assigned position, unique and increasing within the topic.
    pub sequence_number: u64,

    /// Consensus timestamp as `seconds.nanoseconds`.
    pub consensus_timestamp: String,

    /// Base64-encoded payload.
    pub message: String,
}

impl LogMessage {
    /// Build a message by encoding a raw payload.
    pub fn encode(sequence_number: u64, consensus_timestamp: impl Into<String>, payload: &[u8]) -> Self {
        Self {
            sequence_number,
            consensus_timestamp: consensus_timestamp.into(),
            message: STANDARD.encode(payload),
        }
    }

    /// Decode the base64 payload.
    pub fn payload(&self) -> Result<Bytes, CoreError> {
        STANDARD
            .decode(self.message.as_bytes())
            .map(Bytes::from)
            .map_err(|e| CoreError::PayloadEncoding(e.to_string()))
    }

    /// Decode the payload and parse it as JSON.
    pub fn json(&self) -> Result<serde_json::Value, CoreError> {
        let payload = self.payload()?;
        Ok(serde_json::from_slice(&payload)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode() {
        let msg = LogMessage::encode(7, "1700000000.000000001", br#"{"a":1}"#);
        assert_eq!(msg.message, "eyJhIjoxfQ==");
        assert_eq!(&msg.payload().unwrap()[..], br#"{"a":1}"#);
        assert_eq!(msg.json().unwrap(), serde_json::json!({ "a": 1 }));
    }

    #[test]
    fn test_bad_base64() {
        let msg = LogMessage {
            sequence_number: 1,
            consensus_timestamp: "0.0".into(),
            message: "not base64!".into(),
        };
        assert!(matches!(msg.payload(), Err(CoreError::PayloadEncoding(_))));
    }

    #[test]
    fn test_not_json() {
        let msg = LogMessage::encode(1, "0.0", b"hello world");
        assert!(matches!(msg.json(), Err(CoreError::Json(_))));
    }
}
