//! DirectoryEntry: one priced endpoint as published to the directory topic.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::amount::UsdcAmount;
use crate::error::Violation;
use crate::types::TopicId;

/// Minimum length of an entry id.
pub const MIN_ID_LEN: usize = 3;

/// Maximum length of an entry id.
pub const MAX_ID_LEN: usize = 64;

/// Maximum length of an entry description.
pub const MAX_DESCRIPTION_LEN: usize = 256;

/// Standard HTTP verbs an endpoint may be served with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 7] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Patch,
        HttpMethod::Head,
        HttpMethod::Options,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }

    /// Parse the exact upper-case verb.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == s)
    }

    /// Whether requests with this verb carry a body (and so a request schema).
    pub fn has_request_body(self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A priced, addressable endpoint description.
///
/// Entries are never edited in place. A correction is a new directory
/// message with the same `id`; the reduced snapshot keeps the one with the
/// highest sequence number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DirectoryEntry {
    /// Identity key within the directory (3-64 characters).
    pub id: String,

    /// Full endpoint URL, e.g. `https://api.foo.xyz/summarise`.
    pub url: String,

    pub method: HttpMethod,

    /// Human-readable summary (at most 256 characters).
    pub description: String,

    /// Topic holding the authoritative pricing for this endpoint.
    pub pointer_topic_id: TopicId,

    /// Copy of the price at registration time.
    pub initial_price_usdc: UsdcAmount,
}

impl DirectoryEntry {
    /// Code-level shape check on a typed entry.
    ///
    /// Runs after structural validation and does not depend on it: it
    /// re-checks the invariants the rest of the registry relies on.
    pub fn check_shape(&self) -> Result<(), Vec<Violation>> {
        let mut violations = Vec::new();

        let id_len = self.id.trim().chars().count();
        if !(MIN_ID_LEN..=MAX_ID_LEN).contains(&id_len) {
            violations.push(Violation::new(
                "/id",
                format!("trimmed length {} outside {}..={}", id_len, MIN_ID_LEN, MAX_ID_LEN),
            ));
        }

        if !self.url.starts_with("http") {
            violations.push(Violation::new("/url", "must be an http(s) URL"));
        }

        if self.description.chars().count() > MAX_DESCRIPTION_LEN {
            violations.push(Violation::new(
                "/description",
                format!("must NOT have more than {} characters", MAX_DESCRIPTION_LEN),
            ));
        }

        if self.pointer_topic_id.as_str().trim().is_empty() {
            violations.push(Violation::new("/pointer_topic_id", "must not be empty"));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> DirectoryEntry {
        DirectoryEntry {
            id: "test-api-1".into(),
            url: "https://api.example.com/summarize".into(),
            method: HttpMethod::Post,
            description: "Summarizes text content using AI".into(),
            pointer_topic_id: TopicId::parse("0.0.12345").unwrap(),
            initial_price_usdc: "0.01".parse().unwrap(),
        }
    }

    #[test]
    fn test_entry_json_shape() {
        let json = serde_json::to_value(entry()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "test-api-1",
                "url": "https://api.example.com/summarize",
                "method": "POST",
                "description": "Summarizes text content using AI",
                "pointer_topic_id": "0.0.12345",
                "initial_price_usdc": 0.01,
            })
        );
    }

    #[test]
    fn test_method_parse() {
        for m in HttpMethod::ALL {
            assert_eq!(HttpMethod::parse(m.as_str()), Some(m));
        }
        assert_eq!(HttpMethod::parse("INVALID"), None);
        assert_eq!(HttpMethod::parse("get"), None);
        assert!(HttpMethod::Patch.has_request_body());
        assert!(!HttpMethod::Get.has_request_body());
    }

    #[test]
    fn test_shape_accepts_valid() {
        assert!(entry().check_shape().is_ok());
    }

    #[test]
    fn test_shape_rejects_padded_id() {
        let mut e = entry();
        e.id = "  ab  ".into();
        let violations = e.check_shape().unwrap_err();
        assert_eq!(violations[0].path, "/id");
    }

    #[test]
    fn test_shape_rejects_non_http_url_and_long_description() {
        let mut e = entry();
        e.url = "ftp://example.com".into();
        e.description = "a".repeat(257);
        let violations = e.check_shape().unwrap_err();
        assert_eq!(violations.len(), 2);
    }
}
