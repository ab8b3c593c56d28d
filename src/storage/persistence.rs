//! JSON state files shared by the file-backed schema and completion store.

use crate::core::{Result, WizardError};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Reads a JSON document, returning `None` when the file does not exist yet.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path).map_err(|e| {
        WizardError::IoError(format!("Failed to read '{}': {}", path.display(), e))
    })?;
    let value = serde_json::from_str(&content).map_err(|e| {
        WizardError::ParseError(format!("Invalid JSON in '{}': {}", path.display(), e))
    })?;
    Ok(Some(value))
}

/// Replaces `path` atomically: the document is written to a temporary file in
/// the same directory and then renamed over the target.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| {
        WizardError::IoError(format!("Failed to create directory '{}': {}", dir.display(), e))
    })?;

    let json = serde_json::to_vec_pretty(value)
        .map_err(|e| WizardError::IoError(format!("Failed to serialize state: {}", e)))?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(&json)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| {
        WizardError::IoError(format!("Failed to replace '{}': {}", path.display(), e))
    })?;
    Ok(())
}
