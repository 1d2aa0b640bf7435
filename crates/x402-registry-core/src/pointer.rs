//! PointerMessage: the authoritative pricing record of one endpoint.
//!
//! Pointer topics are single-writer logs. Only the most recently appended
//! message is authoritative; earlier ones are history.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::amount::UsdcAmount;

/// The only schema type accepted for request and response bodies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    #[default]
    Object,
}

/// A JSON object schema describing a request or response body.
///
/// Keywords other than `type`, `properties` and `required` are kept
/// verbatim in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectSchema {
    #[serde(rename = "type")]
    pub schema_type: SchemaType,

    pub properties: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ObjectSchema {
    /// An object schema with the given properties.
    pub fn new(properties: Map<String, Value>) -> Self {
        Self {
            schema_type: SchemaType::Object,
            properties,
            required: None,
            extra: Map::new(),
        }
    }
}

/// Current price and I/O contract of an endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PointerMessage {
    /// Current charge per request.
    pub price_usdc: UsdcAmount,

    /// Incremented on every update; starts at 1.
    pub version: u64,

    /// Request body schema, for endpoints whose method carries a body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_schema: Option<ObjectSchema>,

    pub response_schema: ObjectSchema,
}

impl PointerMessage {
    /// The version the next authoritative record must carry.
    ///
    /// `None` if the current version is already `u64::MAX`.
    pub fn next_version(current: Option<&PointerMessage>) -> Option<u64> {
        current.map_or(0, |m| m.version).checked_add(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pointer_message_roundtrip() {
        let raw = json!({
            "price_usdc": 0.02,
            "version": 2,
            "request_schema": {
                "type": "object",
                "properties": { "text": { "type": "string" } }
            },
            "response_schema": {
                "type": "object",
                "properties": { "translated_text": { "type": "string" } },
                "required": ["translated_text"],
                "additionalProperties": false
            }
        });

        let msg: PointerMessage = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(msg.version, 2);
        assert_eq!(msg.price_usdc.micros(), 20_000);
        assert_eq!(
            msg.response_schema.extra.get("additionalProperties"),
            Some(&Value::Bool(false))
        );
        assert_eq!(serde_json::to_value(&msg).unwrap(), raw);
    }

    #[test]
    fn test_request_schema_is_optional() {
        let msg: PointerMessage = serde_json::from_value(json!({
            "price_usdc": 0.01,
            "version": 1,
            "response_schema": { "type": "object", "properties": {} }
        }))
        .unwrap();
        assert!(msg.request_schema.is_none());
        assert!(!serde_json::to_string(&msg).unwrap().contains("request_schema"));
    }

    #[test]
    fn test_next_version() {
        assert_eq!(PointerMessage::next_version(None), Some(1));
        let mut msg = PointerMessage {
            price_usdc: UsdcAmount::ZERO,
            version: 3,
            request_schema: None,
            response_schema: ObjectSchema::new(Map::new()),
        };
        assert_eq!(PointerMessage::next_version(Some(&msg)), Some(4));

        msg.version = u64::MAX;
        assert_eq!(PointerMessage::next_version(Some(&msg)), None);
    }
}
