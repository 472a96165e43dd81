use serde::Serialize;

use crate::core::{PRIORITY_LOWEST, Priority, Ticks};

/// Validated input record for one simulated process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessSpec {
    pub id: String,
    pub arrival: Ticks,
    pub burst: Ticks,
    /// `None` means lowest precedence.
    pub priority: Option<Priority>,
}

impl ProcessSpec {
    pub fn new(id: impl Into<String>, arrival: Ticks, burst: Ticks) -> Self {
        Self {
            id: id.into(),
            arrival,
            burst,
            priority: None,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_priority_opt(mut self, priority: Option<Priority>) -> Self {
        self.priority = priority;
        self
    }

    pub fn effective_priority(&self) -> Priority {
        self.priority.unwrap_or(PRIORITY_LOWEST)
    }
}
