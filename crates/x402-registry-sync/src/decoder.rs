//! Entry decoder: raw log message to validated directory entry.
//!
//! A message that fails any step is skipped, never fatal. The skip carries
//! the reason so the replay can log it.

use std::fmt;

use x402_registry_core::{CoreError, DirectoryEntry, LogMessage, Validator, Violation};

/// Why a directory message was not turned into an entry.
#[derive(Debug)]
pub enum SkipReason {
    /// Payload is not base64 or not JSON.
    Payload(CoreError),
    /// Document fails structural validation.
    Schema(Vec<Violation>),
    /// Typed entry fails the shape check.
    Shape(Vec<Violation>),
}

/// A message the decoder skipped.
#[derive(Debug)]
pub struct DecodeSkip {
    pub sequence_number: u64,
    pub reason: SkipReason,
}

fn join(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for DecodeSkip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "message {}: ", self.sequence_number)?;
        match &self.reason {
            SkipReason::Payload(e) => write!(f, "undecodable payload: {}", e),
            SkipReason::Schema(v) => write!(f, "invalid directory entry: {}", join(v)),
            SkipReason::Shape(v) => write!(f, "malformed directory entry: {}", join(v)),
        }
    }
}

/// Decode one directory message.
pub fn decode_entry<V>(validator: &V, message: &LogMessage) -> Result<DirectoryEntry, DecodeSkip>
where
    V: Validator<Record = DirectoryEntry> + ?Sized,
{
    let skip = |reason| DecodeSkip {
        sequence_number: message.sequence_number,
        reason,
    };

    let raw = message.json().map_err(|e| skip(SkipReason::Payload(e)))?;
    let entry = validator
        .validate(&raw)
        .map_err(|v| skip(SkipReason::Schema(v)))?;
    entry.check_shape().map_err(|v| skip(SkipReason::Shape(v)))?;
    Ok(entry)
}
