use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DebounceError;

/// One operation on the debounced action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Operation {
    Call { arg: Value },
    Flush,
    Cancel,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Call { .. } => "call",
            Operation::Flush => "flush",
            Operation::Cancel => "cancel",
        }
    }
}

/// An operation at a point in time (milliseconds from the start)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub at: u64,
    #[serde(flatten)]
    pub op: Operation,
}

/// Entries in replay order
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    entries: Vec<Entry>,
}

impl Timeline {
    /// Entries are stably sorted by time; same-time entries keep file order.
    pub fn new(mut entries: Vec<Entry>) -> Result<Self, DebounceError> {
        if entries.is_empty() {
            return Err(DebounceError::InvalidTimeline(
                "timeline has no entries".to_string(),
            ));
        }
        entries.sort_by_key(|entry| entry.at);
        Ok(Self { entries })
    }

    pub fn from_json(json: &str) -> Result<Self, DebounceError> {
        let entries: Vec<Entry> = serde_json::from_str(json)?;
        Self::new(entries)
    }

    pub fn load(path: &Path) -> Result<Self, DebounceError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }
}
