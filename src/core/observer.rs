use serde::Serialize;

use super::state::{EngineState, ProcessState, QueueId, Ticks};

/// Read-only view of the engine after a tick, published to renderers and sinks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub tick: Ticks,
    pub running: Option<RunningView>,
    pub ready: Vec<String>,
    pub waiting: Vec<String>,
    pub completed: Vec<String>,
    /// Process that occupied the CPU during this tick.
    pub executed: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunningView {
    pub process: String,
    pub remaining: Ticks,
}

impl Snapshot {
    pub fn capture(ctx: &EngineState, ready: QueueId, executed: Option<String>) -> Self {
        Self {
            tick: ctx.now,
            running: ctx.running.map(|p| {
                let process = ctx.process(p);
                RunningView {
                    process: process.name.clone(),
                    remaining: process.remaining,
                }
            }),
            ready: ctx.queue_names(ready),
            waiting: ctx.queue_names(ctx.backlog()),
            completed: ctx
                .procs
                .iter()
                .filter(|p| p.state == ProcessState::Completed)
                .map(|p| p.name.clone())
                .collect(),
            executed,
        }
    }
}

/// Checks engine invariants once per tick.
#[derive(Debug)]
pub struct Observer {
    step: u64,
}

impl Observer {
    pub fn new() -> Self {
        Self { step: 0 }
    }

    pub fn steps(&self) -> u64 {
        self.step
    }

    pub fn observe(&mut self, ctx: &EngineState) {
        self.step += 1;

        if let Some(proc) = ctx.running {
            let process = ctx.process(proc);
            debug_assert_eq!(
                process.state,
                ProcessState::Running,
                "running process {} must be Running",
                process.name
            );
            debug_assert!(
                process.remaining > 0,
                "process {} occupies the CPU with no work left",
                process.name
            );
        }

        for process in &ctx.procs {
            debug_assert!(
                process.remaining <= process.burst,
                "process {} remaining {} exceeds burst {}",
                process.name,
                process.remaining,
                process.burst
            );
            if process.state == ProcessState::Completed {
                debug_assert!(
                    process.completion.is_some() && process.remaining == 0,
                    "completed process {} lacks completion record",
                    process.name
                );
                debug_assert!(
                    process.completion >= Some(process.arrival),
                    "process {} completed before it arrived",
                    process.name
                );
            }
        }

        for (&proc, &queue_id) in &ctx.proc_to_queue {
            let process = ctx.process(proc);
            debug_assert_ne!(
                process.state,
                ProcessState::Completed,
                "Completed process {} still present in queue {queue_id:?}",
                process.name
            );
            debug_assert_ne!(
                process.state,
                ProcessState::Running,
                "Running process {} must not appear in any queue",
                process.name
            );
            if let Some(queue) = ctx.queues.get(queue_id) {
                debug_assert!(
                    queue.contains(proc),
                    "proc_to_queue claims {} in queue {queue_id:?}, but queue does not contain it",
                    process.name
                );
            } else {
                debug_assert!(false, "proc_to_queue references unknown queue {queue_id:?}");
            }
        }
    }
}

impl Default for Observer {
    fn default() -> Self {
        Self::new()
    }
}
