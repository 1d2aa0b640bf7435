//! Error types for the x402 Registry Core.

use std::fmt;

use thiserror::Error;

use crate::validation::RecordKind;

/// Core errors that can occur while handling registry records.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid topic id: {0:?}")]
    InvalidTopicId(String),

    #[error("invalid USDC amount {input:?}: {reason}")]
    InvalidAmount { input: String, reason: &'static str },

    #[error("payload is not valid base64: {0}")]
    PayloadEncoding(String),

    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A single field-level schema violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON pointer to the offending value; empty for the document root.
    pub path: String,
    pub message: String,
}

impl Violation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }

    /// A violation of the document root.
    pub fn root(message: impl Into<String>) -> Self {
        Self::new("", message)
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "root" } else { &self.path };
        write!(f, "{}: {}", path, self.message)
    }
}

/// A record was rejected by its structural schema.
///
/// Displays as `"<Kind> validation failed: <path>: <message>, ..."`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} validation failed: {}", join_violations(.violations))]
pub struct ValidationError {
    pub kind: RecordKind,
    pub violations: Vec<Violation>,
}

impl ValidationError {
    pub fn new(kind: RecordKind, violations: Vec<Violation>) -> Self {
        Self { kind, violations }
    }
}

fn join_violations(violations: &[Violation]) -> String {
    if violations.is_empty() {
        return "unknown validation error".to_string();
    }
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_message() {
        let err = ValidationError::new(
            RecordKind::DirectoryEntry,
            vec![
                Violation::new("/id", "must NOT have fewer than 3 characters"),
                Violation::root("must have required property 'url'"),
            ],
        );
        assert_eq!(
            err.to_string(),
            "DirectoryEntry validation failed: /id: must NOT have fewer than 3 characters, \
             root: must have required property 'url'"
        );
    }

    #[test]
    fn test_validation_error_without_violations() {
        let err = ValidationError::new(RecordKind::PointerMessage, vec![]);
        assert_eq!(
            err.to_string(),
            "PointerMessage validation failed: unknown validation error"
        );
    }
}
