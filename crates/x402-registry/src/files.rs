//! Loading and validating record documents from disk.

use std::fs;
use std::path::Path;

use serde_json::Value;
use x402_registry_core::{
    DirectoryEntry, DirectoryEntryValidator, PointerMessage, PointerMessageValidator, RecordKind,
    ValidationError, Validator,
};

use crate::error::{RegistryError, Result};

/// Read a file and parse it as JSON.
pub fn read_json(path: &Path) -> Result<Value> {
    let file_error = |message: String| RegistryError::File {
        path: path.to_path_buf(),
        message,
    };
    let text = fs::read_to_string(path).map_err(|e| file_error(e.to_string()))?;
    serde_json::from_str(&text).map_err(|e| file_error(format!("invalid JSON: {}", e)))
}

/// Read a directory entry document and validate it strictly.
pub fn read_directory_entry(path: &Path) -> Result<DirectoryEntry> {
    let entry = DirectoryEntryValidator.validate_strict(&read_json(path)?)?;
    entry
        .check_shape()
        .map_err(|v| ValidationError::new(RecordKind::DirectoryEntry, v))?;
    Ok(entry)
}

/// Read a pricing record document and validate it strictly.
pub fn read_pointer_message(path: &Path) -> Result<PointerMessage> {
    Ok(PointerMessageValidator.validate_strict(&read_json(path)?)?)
}
