use super::CompletionStore;
use crate::core::Result;
use crate::storage::persistence::{read_json, write_json_atomic};
use chrono::{DateTime, Utc};
use log::info;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Completion markers kept in a JSON file.
///
/// The file is re-read on every query so that separate invocations (and
/// separate processes) always see the current markers.
pub struct FileCompletionStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileCompletionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, DateTime<Utc>>> {
        Ok(read_json(&self.path)?.unwrap_or_default())
    }
}

impl CompletionStore for FileCompletionStore {
    fn is_done(&self, identifier: &str) -> Result<bool> {
        Ok(self.load()?.contains_key(identifier))
    }

    fn mark_done(&self, identifier: &str) -> Result<()> {
        let _guard = self.write_lock.lock()?;
        let mut done = self.load()?;
        if done.contains_key(identifier) {
            return Ok(());
        }

        done.insert(identifier.to_string(), Utc::now());
        write_json_atomic(&self.path, &done)?;
        info!("Marked update wizard '{}' as done", identifier);
        Ok(())
    }

    fn completed(&self) -> Result<BTreeMap<String, DateTime<Utc>>> {
        self.load()
    }
}
