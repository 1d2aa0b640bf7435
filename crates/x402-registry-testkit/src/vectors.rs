//! Record document vectors.
//!
//! Each vector is a raw document plus the outcome validation must produce.
//! `expect_violation` is a substring of the folded error message, or `None`
//! for documents that must validate.

use serde_json::{json, Value};

/// A known document and its expected validation outcome.
#[derive(Debug, Clone)]
pub struct DocumentVector {
    pub name: &'static str,
    pub document: Value,
    pub expect_violation: Option<&'static str>,
}

impl DocumentVector {
    pub fn is_valid(&self) -> bool {
        self.expect_violation.is_none()
    }
}

fn base_entry() -> Value {
    json!({
        "id": "test-api-1",
        "url": "https://api.example.com/summarize",
        "method": "POST",
        "description": "Summarizes text input using AI",
        "pointer_topic_id": "0.0.123456",
        "initial_price_usdc": 0.05
    })
}

fn entry_with(field: &str, value: Value) -> Value {
    let mut doc = base_entry();
    doc[field] = value;
    doc
}

fn entry_without(field: &str) -> Value {
    let mut doc = base_entry();
    if let Some(obj) = doc.as_object_mut() {
        obj.remove(field);
    }
    doc
}

/// Directory entry documents.
pub fn directory_entry_vectors() -> Vec<DocumentVector> {
    vec![
        DocumentVector {
            name: "complete entry",
            document: base_entry(),
            expect_violation: None,
        },
        DocumentVector {
            name: "minimum length id",
            document: entry_with("id", json!("abc")),
            expect_violation: None,
        },
        DocumentVector {
            name: "maximum length description",
            document: entry_with("description", json!("a".repeat(256))),
            expect_violation: None,
        },
        DocumentVector {
            name: "six decimal price",
            document: entry_with("initial_price_usdc", json!(0.000001)),
            expect_violation: None,
        },
        DocumentVector {
            name: "missing url",
            document: entry_without("url"),
            expect_violation: Some("root: must have required property 'url'"),
        },
        DocumentVector {
            name: "short id",
            document: entry_with("id", json!("ab")),
            expect_violation: Some("/id: must NOT have fewer than 3 characters"),
        },
        DocumentVector {
            name: "long id",
            document: entry_with("id", json!("a".repeat(65))),
            expect_violation: Some("/id: must NOT have more than 64 characters"),
        },
        DocumentVector {
            name: "relative url",
            document: entry_with("url", json!("not-a-url")),
            expect_violation: Some("/url"),
        },
        DocumentVector {
            name: "unknown method",
            document: entry_with("method", json!("INVALID")),
            expect_violation: Some("/method"),
        },
        DocumentVector {
            name: "long description",
            document: entry_with("description", json!("a".repeat(257))),
            expect_violation: Some("/description: must NOT have more than 256 characters"),
        },
        DocumentVector {
            name: "malformed topic id",
            document: entry_with("pointer_topic_id", json!("invalid-topic")),
            expect_violation: Some("/pointer_topic_id"),
        },
        DocumentVector {
            name: "negative price",
            document: entry_with("initial_price_usdc", json!(-0.01)),
            expect_violation: Some("/initial_price_usdc: must be >= 0"),
        },
        DocumentVector {
            name: "additional property",
            document: entry_with("extra_field", json!("nope")),
            expect_violation: Some("root: must NOT have additional property 'extra_field'"),
        },
        DocumentVector {
            name: "not an object",
            document: json!("a string"),
            expect_violation: Some("root: must be object"),
        },
    ]
}

fn base_pointer() -> Value {
    json!({
        "price_usdc": 0.05,
        "version": 1,
        "response_schema": {
            "type": "object",
            "properties": { "summary": { "type": "string" } },
            "required": ["summary"]
        }
    })
}

fn pointer_with(field: &str, value: Value) -> Value {
    let mut doc = base_pointer();
    doc[field] = value;
    doc
}

/// Pricing record documents.
pub fn pointer_message_vectors() -> Vec<DocumentVector> {
    vec![
        DocumentVector {
            name: "basic record",
            document: base_pointer(),
            expect_violation: None,
        },
        DocumentVector {
            name: "with request schema",
            document: pointer_with(
                "request_schema",
                json!({ "type": "object", "properties": { "text": { "type": "string" } } }),
            ),
            expect_violation: None,
        },
        DocumentVector {
            name: "high version",
            document: pointer_with("version", json!(999_999)),
            expect_violation: None,
        },
        DocumentVector {
            name: "fractional version",
            document: pointer_with("version", json!(1.5)),
            expect_violation: Some("/version: must be integer"),
        },
        DocumentVector {
            name: "zero version",
            document: pointer_with("version", json!(0)),
            expect_violation: Some("/version: must be >= 1"),
        },
        DocumentVector {
            name: "negative price",
            document: pointer_with("price_usdc", json!(-1)),
            expect_violation: Some("/price_usdc: must be >= 0"),
        },
        DocumentVector {
            name: "response schema of wrong type",
            document: pointer_with("response_schema", json!({ "type": "array", "properties": {} })),
            expect_violation: Some("/response_schema/type"),
        },
        DocumentVector {
            name: "schema without properties",
            document: pointer_with("response_schema", json!({ "type": "object" })),
            expect_violation: Some("/response_schema: must have required property 'properties'"),
        },
        DocumentVector {
            name: "additional property",
            document: pointer_with("extra", json!(true)),
            expect_violation: Some("root: must NOT have additional property 'extra'"),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use x402_registry_core::{DirectoryEntryValidator, PointerMessageValidator, Validator};

    #[test]
    fn test_directory_vectors() {
        for vector in directory_entry_vectors() {
            let result = DirectoryEntryValidator.validate_strict(&vector.document);
            match vector.expect_violation {
                None => assert!(result.is_ok(), "{}: {:?}", vector.name, result),
                Some(expected) => {
                    let message = result.expect_err(vector.name).to_string();
                    assert!(message.contains(expected), "{}: {}", vector.name, message);
                }
            }
        }
    }

    #[test]
    fn test_pointer_vectors() {
        for vector in pointer_message_vectors() {
            let result = PointerMessageValidator.validate_strict(&vector.document);
            match vector.expect_violation {
                None => assert!(result.is_ok(), "{}: {:?}", vector.name, result),
                Some(expected) => {
                    let message = result.expect_err(vector.name).to_string();
                    assert!(message.contains(expected), "{}: {}", vector.name, message);
                }
            }
        }
    }
}
