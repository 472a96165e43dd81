use serde::Serialize;
use std::fmt;

use crate::core::Ticks;

/// One observable state transition inside a tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SimEvent {
    /// Process moved from the backlog into the ready queue. `running` names the
    /// process occupying the CPU at that moment, if any.
    Admitted {
        process: String,
        running: Option<String>,
    },
    Dispatched {
        process: String,
    },
    Preempted {
        process: String,
        remaining: Ticks,
    },
    Ran {
        process: String,
        remaining: Ticks,
    },
    Completed {
        process: String,
        at: Ticks,
    },
    // CPU idle even after dispatch
    Idle,
}

impl SimEvent {
    pub fn process(&self) -> Option<&str> {
        match self {
            Self::Admitted { process, .. }
            | Self::Dispatched { process }
            | Self::Preempted { process, .. }
            | Self::Ran { process, .. }
            | Self::Completed { process, .. } => Some(process),
            Self::Idle => None,
        }
    }
}

impl fmt::Display for SimEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admitted {
                process,
                running: None,
            } => write!(f, "{process} admitted to ready queue"),
            Self::Admitted {
                process,
                running: Some(running),
            } => write!(f, "{process} admitted to ready queue while {running} is running"),
            Self::Dispatched { process } => write!(f, "{process} dispatched to running"),
            Self::Preempted { process, remaining } => write!(
                f,
                "{process} quantum expired, back to ready queue with {remaining} remaining"
            ),
            Self::Ran { process, remaining } => {
                write!(f, "{process} is running & remaining {remaining}")
            }
            Self::Completed { process, at } => write!(f, "{process} completed at {at}"),
            Self::Idle => write!(f, "CPU idle"),
        }
    }
}
