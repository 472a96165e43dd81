pub mod fcfs;
pub mod priority;
pub mod rr;

use serde::Serialize;
use std::{fmt, str::FromStr};

use crate::core::{
    Ticks,
    state::{EngineState, ProcIdx, QueueId},
};
use crate::error::SimError;
pub use fcfs::FcfsScheduler;
pub use priority::PriorityScheduler;
pub use rr::RoundRobinScheduler;

pub type EnqueueFlags = u64;

// Fresh arrival from the backlog
pub const ENQ_WAKEUP: EnqueueFlags = 1 << 0;
// Returned to the ready queue after its quantum expired
pub const ENQ_PREEMPT: EnqueueFlags = 1 << 1;

/// Round robin quantum.
pub const RR_QUANTUM: Ticks = 2;

/// Selection and preemption policy. The scheduler owns the ready queue; the
/// engine drives it through these callbacks and never inspects policy identity.
pub trait Scheduler {
    fn init(ctx: &mut EngineState) -> Self
    where
        Self: Sized;

    fn algorithm(&self) -> Algorithm;

    /// Queue that holds ready processes for this policy.
    fn ready_queue(&self, ctx: &EngineState) -> QueueId {
        ctx.global_queue()
    }

    fn enqueue(&mut self, ctx: &mut EngineState, proc: ProcIdx, flags: EnqueueFlags);

    /// Pop the next process to run, if any.
    fn dispatch(&mut self, ctx: &mut EngineState) -> Option<ProcIdx>;

    /// Whether the running process must give up the CPU before this tick executes.
    fn should_preempt(&self, _ctx: &EngineState, _proc: ProcIdx) -> bool {
        false
    }

    /// Called after the running process executed one unit.
    fn tick(&mut self, _ctx: &mut EngineState, _proc: ProcIdx) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Algorithm {
    #[default]
    Fcfs,
    RoundRobin,
    Priority,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Algorithm::Fcfs, Algorithm::RoundRobin, Algorithm::Priority];
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Fcfs => "FCFS",
            Self::RoundRobin => "RoundRobin",
            Self::Priority => "Priority",
        };
        f.write_str(name)
    }
}

impl FromStr for Algorithm {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fcfs" | "fifo" => Ok(Self::Fcfs),
            "rr" | "roundrobin" | "round-robin" | "round_robin" => Ok(Self::RoundRobin),
            "priority" | "prio" => Ok(Self::Priority),
            _ => Err(SimError::UnknownAlgorithm(s.to_string())),
        }
    }
}
