//! Structural validation of registry records against their published schemas.
//!
//! A [`Validator`] turns an untyped JSON document into a typed record or a
//! list of field-level [`Violation`]s. Violations use JSON-pointer paths and
//! schema-style messages so they read the same as the schemas' own tooling.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fmt;

use crate::amount::{UsdcAmount, OUT_OF_RANGE};
use crate::entry::{DirectoryEntry, HttpMethod, MAX_DESCRIPTION_LEN, MAX_ID_LEN, MIN_ID_LEN};
use crate::error::{CoreError, ValidationError, Violation};
use crate::pointer::PointerMessage;
use crate::types::is_topic_id;

/// The kind of record a validator produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    DirectoryEntry,
    PointerMessage,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::DirectoryEntry => f.write_str("DirectoryEntry"),
            RecordKind::PointerMessage => f.write_str("PointerMessage"),
        }
    }
}

/// Structural validation capability for one record kind.
pub trait Validator: Send + Sync {
    type Record;

    fn kind(&self) -> RecordKind;

    /// Validate a raw document, returning the typed record or every violation found.
    fn validate(&self, raw: &Value) -> Result<Self::Record, Vec<Violation>>;

    /// Validate, folding violations into a single [`ValidationError`].
    fn validate_strict(&self, raw: &Value) -> Result<Self::Record, ValidationError> {
        self.validate(raw)
            .map_err(|violations| ValidationError::new(self.kind(), violations))
    }
}

/// Validator for [`DirectoryEntry`] documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoryEntryValidator;

const ENTRY_FIELDS: [&str; 6] = [
    "id",
    "url",
    "method",
    "description",
    "pointer_topic_id",
    "initial_price_usdc",
];

impl Validator for DirectoryEntryValidator {
    type Record = DirectoryEntry;

    fn kind(&self) -> RecordKind {
        RecordKind::DirectoryEntry
    }

    fn validate(&self, raw: &Value) -> Result<DirectoryEntry, Vec<Violation>> {
        let obj = raw
            .as_object()
            .ok_or_else(|| vec![Violation::root("must be object")])?;

        let mut check = Checker::default();
        check.fields(obj, &ENTRY_FIELDS, &ENTRY_FIELDS);

        if let Some(id) = check.string(obj, "id") {
            check.length("/id", id, MIN_ID_LEN, MAX_ID_LEN);
        }
        if let Some(url) = check.string(obj, "url") {
            if !is_http_uri(url) {
                check.push("/url", "must match format \"uri\"");
            }
        }
        if let Some(method) = check.string(obj, "method") {
            if HttpMethod::parse(method).is_none() {
                check.push("/method", "must be equal to one of the allowed values");
            }
        }
        if let Some(description) = check.string(obj, "description") {
            check.length("/description", description, 0, MAX_DESCRIPTION_LEN);
        }
        if let Some(topic) = check.string(obj, "pointer_topic_id") {
            if !is_topic_id(topic) {
                check.push("/pointer_topic_id", "must match pattern \"^\\d+\\.\\d+\\.\\d+$\"");
            }
        }
        check.amount(obj, "initial_price_usdc");

        check.finish(raw)
    }
}

/// Validator for [`PointerMessage`] documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerMessageValidator;

const POINTER_REQUIRED: [&str; 3] = ["price_usdc", "version", "response_schema"];
const POINTER_ALLOWED: [&str; 4] = ["price_usdc", "version", "request_schema", "response_schema"];

impl Validator for PointerMessageValidator {
    type Record = PointerMessage;

    fn kind(&self) -> RecordKind {
        RecordKind::PointerMessage
    }

    fn validate(&self, raw: &Value) -> Result<PointerMessage, Vec<Violation>> {
        let obj = raw
            .as_object()
            .ok_or_else(|| vec![Violation::root("must be object")])?;

        let mut check = Checker::default();
        check.fields(obj, &POINTER_REQUIRED, &POINTER_ALLOWED);

        check.amount(obj, "price_usdc");

        if let Some(version) = obj.get("version") {
            match version.as_u64() {
                Some(0) => check.push("/version", "must be >= 1"),
                Some(_) => {}
                None if version.is_i64() => check.push("/version", "must be >= 1"),
                None => check.push("/version", "must be integer"),
            }
        }

        for field in ["request_schema", "response_schema"] {
            if let Some(schema) = obj.get(field) {
                check.object_schema(&format!("/{}", field), schema);
            }
        }

        check.finish(raw)
    }
}

/// `http` or `https` scheme followed by a non-empty authority.
fn is_http_uri(s: &str) -> bool {
    let rest = match s.strip_prefix("https://").or_else(|| s.strip_prefix("http://")) {
        Some(rest) => rest,
        None => return false,
    };
    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    !authority.is_empty() && !s.chars().any(char::is_whitespace)
}

/// Accumulates violations for one document.
#[derive(Default)]
struct Checker {
    violations: Vec<Violation>,
}

impl Checker {
    fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.violations.push(Violation::new(path, message));
    }

    fn fields(&mut self, obj: &Map<String, Value>, required: &[&str], allowed: &[&str]) {
        for field in required {
            if !obj.contains_key(*field) {
                self.push("", format!("must have required property '{}'", field));
            }
        }
        for key in obj.keys() {
            if !allowed.contains(&key.as_str()) {
                self.push("", format!("must NOT have additional property '{}'", key));
            }
        }
    }

    fn string<'a>(&mut self, obj: &'a Map<String, Value>, field: &str) -> Option<&'a str> {
        let value = obj.get(field)?;
        let s = value.as_str();
        if s.is_none() {
            self.push(format!("/{}", field), "must be string");
        }
        s
    }

    fn length(&mut self, path: &str, s: &str, min: usize, max: usize) {
        let len = s.chars().count();
        if len < min {
            self.push(path, format!("must NOT have fewer than {} characters", min));
        } else if len > max {
            self.push(path, format!("must NOT have more than {} characters", max));
        }
    }

    fn amount(&mut self, obj: &Map<String, Value>, field: &str) {
        let Some(value) = obj.get(field) else {
            return;
        };
        let path = format!("/{}", field);
        let Value::Number(n) = value else {
            self.push(path, "must be number");
            return;
        };
        if n.as_f64().is_some_and(|f| f < 0.0) {
            self.push(path, "must be >= 0");
            return;
        }
        let parsed = match n.as_u64() {
            Some(whole) => whole.to_string().parse::<UsdcAmount>(),
            None => UsdcAmount::try_from(n.as_f64().unwrap_or(f64::NAN)),
        };
        match parsed {
            Ok(_) => {}
            Err(CoreError::InvalidAmount { reason: OUT_OF_RANGE, .. }) => {
                self.push(path, format!("must be <= {}", UsdcAmount::MAX));
            }
            Err(_) => self.push(path, "must be a multiple of 0.000001"),
        }
    }

    fn object_schema(&mut self, path: &str, schema: &Value) {
        let Some(obj) = schema.as_object() else {
            self.push(path, "must be object");
            return;
        };
        if obj.get("type").and_then(Value::as_str) != Some("object") {
            self.push(format!("{}/type", path), "must be equal to constant \"object\"");
        }
        match obj.get("properties") {
            None => self.push(path, "must have required property 'properties'"),
            Some(p) if !p.is_object() => self.push(format!("{}/properties", path), "must be object"),
            Some(_) => {}
        }
        if let Some(required) = obj.get("required") {
            let all_strings = required
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string));
            if !all_strings {
                self.push(format!("{}/required", path), "must be array of strings");
            }
        }
    }

    fn finish<T: DeserializeOwned>(self, raw: &Value) -> Result<T, Vec<Violation>> {
        if !self.violations.is_empty() {
            return Err(self.violations);
        }
        serde_json::from_value(raw.clone()).map_err(|e| vec![Violation::root(e.to_string())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_entry() -> Value {
        json!({
            "id": "test-api-1",
            "url": "https://api.example.com/summarize",
            "method": "POST",
            "description": "Summarizes text content using AI",
            "pointer_topic_id": "0.0.12345",
            "initial_price_usdc": 0.01
        })
    }

    fn valid_pointer() -> Value {
        json!({
            "price_usdc": 0.01,
            "version": 1,
            "response_schema": {
                "type": "object",
                "properties": {
                    "result": { "type": "string" },
                    "success": { "type": "boolean" }
                }
            }
        })
    }

    fn with(mut base: Value, field: &str, value: Value) -> Value {
        base[field] = value;
        base
    }

    fn without(mut base: Value, field: &str) -> Value {
        base.as_object_mut().unwrap().remove(field);
        base
    }

    #[test]
    fn test_valid_entry() {
        let entry = DirectoryEntryValidator.validate(&valid_entry()).unwrap();
        assert_eq!(entry.id, "test-api-1");
        assert_eq!(entry.method, HttpMethod::Post);
        assert_eq!(serde_json::to_value(&entry).unwrap(), valid_entry());
    }

    #[test]
    fn test_entry_boundaries() {
        let v = DirectoryEntryValidator;
        assert!(v.validate(&with(valid_entry(), "id", json!("abc"))).is_ok());
        assert!(v.validate(&with(valid_entry(), "id", json!("a".repeat(64)))).is_ok());
        assert!(v.validate(&with(valid_entry(), "description", json!("a".repeat(256)))).is_ok());
        assert!(v.validate(&with(valid_entry(), "initial_price_usdc", json!(123.456789))).is_ok());
        for method in HttpMethod::ALL {
            assert!(v.validate(&with(valid_entry(), "method", json!(method.as_str()))).is_ok());
        }
    }

    #[test]
    fn test_entry_missing_fields() {
        for field in ENTRY_FIELDS {
            let errors = DirectoryEntryValidator
                .validate(&without(valid_entry(), field))
                .unwrap_err();
            assert!(errors
                .iter()
                .any(|e| e.message == format!("must have required property '{}'", field)));
        }
    }

    #[test]
    fn test_entry_invalid_fields() {
        let v = DirectoryEntryValidator;
        let cases = [
            ("id", json!("ab"), "/id"),
            ("id", json!("a".repeat(65)), "/id"),
            ("url", json!("not-a-url"), "/url"),
            ("method", json!("INVALID"), "/method"),
            ("description", json!("a".repeat(257)), "/description"),
            ("pointer_topic_id", json!("invalid-topic-id"), "/pointer_topic_id"),
            ("initial_price_usdc", json!(-0.01), "/initial_price_usdc"),
            ("initial_price_usdc", json!("0.01"), "/initial_price_usdc"),
            ("initial_price_usdc", json!(0.0000001), "/initial_price_usdc"),
        ];
        for (field, value, path) in cases {
            let errors = v.validate(&with(valid_entry(), field, value)).unwrap_err();
            assert_eq!(errors.len(), 1, "{:?}", errors);
            assert_eq!(errors[0].path, path);
        }
    }

    #[test]
    fn test_entry_additional_property() {
        let errors = DirectoryEntryValidator
            .validate(&with(valid_entry(), "extra_field", json!("not allowed")))
            .unwrap_err();
        assert_eq!(errors[0].message, "must NOT have additional property 'extra_field'");
    }

    #[test]
    fn test_non_object_inputs() {
        for input in [Value::Null, json!("string"), json!(123), json!([]), json!(true)] {
            assert!(DirectoryEntryValidator.validate(&input).is_err());
            assert!(PointerMessageValidator.validate(&input).is_err());
        }
    }

    #[test]
    fn test_entry_strict_message() {
        let err = DirectoryEntryValidator
            .validate_strict(&json!({ "id": "ab" }))
            .unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("DirectoryEntry validation failed: "));
        assert!(message.contains("/id: must NOT have fewer than 3 characters"));
        assert!(message.contains("root: must have required property 'url'"));
    }

    #[test]
    fn test_valid_pointer() {
        let msg = PointerMessageValidator.validate(&valid_pointer()).unwrap();
        assert_eq!(msg.version, 1);
        assert!(msg.request_schema.is_none());

        let with_request = with(
            valid_pointer(),
            "request_schema",
            json!({ "type": "object", "properties": { "text": { "type": "string" } } }),
        );
        assert!(PointerMessageValidator.validate(&with_request).unwrap().request_schema.is_some());
        assert!(PointerMessageValidator
            .validate(&with(valid_pointer(), "version", json!(999999)))
            .is_ok());
    }

    #[test]
    fn test_pointer_missing_fields() {
        for field in POINTER_REQUIRED {
            assert!(PointerMessageValidator.validate(&without(valid_pointer(), field)).is_err());
        }
    }

    #[test]
    fn test_pointer_invalid_fields() {
        let v = PointerMessageValidator;
        assert!(v.validate(&with(valid_pointer(), "price_usdc", json!(-0.01))).is_err());
        let errors = v
            .validate(&with(valid_pointer(), "price_usdc", json!(0.0000001)))
            .unwrap_err();
        assert_eq!(errors[0].message, "must be a multiple of 0.000001");
        for huge in [json!(18_446_744_073_710u64), json!(1e20)] {
            let errors = v.validate(&with(valid_pointer(), "price_usdc", huge)).unwrap_err();
            assert_eq!(errors[0].path, "/price_usdc");
            assert_eq!(errors[0].message, "must be <= 18446744073709.551615");
        }
        assert!(v.validate(&with(valid_pointer(), "version", json!(1.5))).is_err());
        for version in [0, -1, -5] {
            let errors = v.validate(&with(valid_pointer(), "version", json!(version))).unwrap_err();
            assert_eq!(errors[0].message, "must be >= 1");
        }
        assert!(v
            .validate(&with(valid_pointer(), "invalid_field", json!("not allowed")))
            .is_err());
    }

    #[test]
    fn test_pointer_schema_structure() {
        let v = PointerMessageValidator;
        let bad_request = with(
            valid_pointer(),
            "request_schema",
            json!({ "type": "string", "properties": {} }),
        );
        assert_eq!(v.validate(&bad_request).unwrap_err()[0].path, "/request_schema/type");

        let bad_response = with(
            valid_pointer(),
            "response_schema",
            json!({ "type": "array", "properties": {} }),
        );
        assert!(v.validate(&bad_response).is_err());

        let no_properties = with(valid_pointer(), "response_schema", json!({ "type": "object" }));
        assert_eq!(
            v.validate(&no_properties).unwrap_err()[0].message,
            "must have required property 'properties'"
        );

        let no_required_array = with(
            valid_pointer(),
            "response_schema",
            json!({ "type": "object", "properties": { "test": { "type": "string" } } }),
        );
        assert!(v.validate(&no_required_array).is_ok());

        let bad_required = with(
            valid_pointer(),
            "response_schema",
            json!({ "type": "object", "properties": {}, "required": [1] }),
        );
        assert!(v.validate(&bad_required).is_err());
    }

    #[test]
    fn test_pointer_strict_message() {
        let err = PointerMessageValidator
            .validate_strict(&json!({ "price_usdc": -1 }))
            .unwrap_err();
        assert!(err.to_string().starts_with("PointerMessage validation failed: "));
        assert_eq!(err.kind, RecordKind::PointerMessage);
    }

    #[test]
    fn test_http_uri() {
        assert!(is_http_uri("https://api.example.com/summarize"));
        assert!(is_http_uri("http://localhost:8080"));
        assert!(!is_http_uri("not-a-url"));
        assert!(!is_http_uri("https://"));
        assert!(!is_http_uri("https:// spaced.example.com"));
        assert!(!is_http_uri("ftp://example.com"));
    }
}
