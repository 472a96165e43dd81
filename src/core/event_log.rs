use serde::Serialize;

use super::{event::SimEvent, state::Ticks};

/// A single immutable record of the event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub tick: Ticks,
    pub running: Option<String>,
    pub ready: Vec<String>,
    // Backlog not yet admitted
    pub waiting: Vec<String>,
    pub event: SimEvent,
}

impl LogEntry {
    pub fn event_text(&self) -> String {
        self.event.to_string()
    }
}

/// Append-only event log. Entries are ordered by tick, then by emission order.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    entries: Vec<LogEntry>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: LogEntry) {
        debug_assert!(
            self.entries.last().is_none_or(|last| last.tick <= entry.tick),
            "log entries must be appended in tick order"
        );
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<LogEntry> {
        self.entries
    }
}
