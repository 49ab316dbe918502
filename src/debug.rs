//! Bounded transcript of recent script executions.

use std::collections::VecDeque;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::types::{Descriptor, OsaValue};

/// How one execution ended.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionOutcome {
    /// The engine result as the caller received it; raw executions record
    /// the undecoded descriptor behind `OsaValue::Raw`.
    Value(OsaValue),
    /// The engine reported a failure, preserved verbatim.
    EngineError(String),
    /// The engine returned a descriptor the session could not decode.
    DecodeError(String),
}

/// One recorded execution.
#[derive(Debug, Clone)]
pub struct DebugEntry {
    pub id: Uuid,
    pub source: String,
    pub call: Option<String>,
    pub args: Vec<Descriptor>,
    pub outcome: ExecutionOutcome,
    pub elapsed: Duration,
    pub at: Instant,
}

/// Shared in-memory transcript with a fixed capacity.
///
/// Recording past capacity drops the oldest entry. Share it across
/// sessions behind an `Arc`.
pub struct DebugLog {
    entries: RwLock<VecDeque<DebugEntry>>,
    capacity: usize,
}

impl DebugLog {
    /// Creates a transcript retaining at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Appends an entry, evicting the oldest one at capacity.
    pub fn record(&self, entry: DebugEntry) {
        if self.capacity == 0 {
            return;
        }
        let mut entries = self.entries.write().unwrap();
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    /// Returns a snapshot of the retained entries, oldest first.
    pub fn entries(&self) -> Vec<DebugEntry> {
        self.entries.read().unwrap().iter().cloned().collect()
    }

    /// Drops every retained entry.
    pub fn clear(&self) {
        self.entries.write().unwrap().clear();
    }

    /// Returns the number of retained entries.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
