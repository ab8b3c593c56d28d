//! Persisted "wizard done" markers.
//!
//! The orchestration engine never reads these itself; wizards consult them from
//! their eligibility checks.

mod file;

pub use file::FileCompletionStore;

use crate::core::Result;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Mutex;

pub trait CompletionStore: Send + Sync {
    fn is_done(&self, identifier: &str) -> Result<bool>;

    /// Records `identifier` as done. Marking twice keeps the first timestamp.
    fn mark_done(&self, identifier: &str) -> Result<()>;

    /// Completed wizards with the time they were marked done.
    fn completed(&self) -> Result<BTreeMap<String, DateTime<Utc>>>;
}

#[derive(Default)]
pub struct MemoryCompletionStore {
    done: Mutex<BTreeMap<String, DateTime<Utc>>>,
}

impl MemoryCompletionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CompletionStore for MemoryCompletionStore {
    fn is_done(&self, identifier: &str) -> Result<bool> {
        Ok(self.done.lock()?.contains_key(identifier))
    }

    fn mark_done(&self, identifier: &str) -> Result<()> {
        self.done
            .lock()?
            .entry(identifier.to_string())
            .or_insert_with(Utc::now);
        Ok(())
    }

    fn completed(&self) -> Result<BTreeMap<String, DateTime<Utc>>> {
        Ok(self.done.lock()?.clone())
    }
}
