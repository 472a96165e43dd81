use log::info;
use rustc_hash::FxHashSet;
use serde::Serialize;

use super::{control::StopHandle, metrics::Metrics, pacing::Pacer, process::ProcessSpec};
use crate::{
    core::{EngineState, ProcIdx, SchedCore, SimEvent, Snapshot, Ticks},
    error::SimError,
    scheduler::{Algorithm, Scheduler},
};

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunStatus {
    Completed,
    Stopped { at: Ticks },
}

/// Receives a read-only snapshot after every tick.
pub trait SnapshotSink {
    fn on_tick(&mut self, snapshot: &Snapshot);
}

impl<F: FnMut(&Snapshot)> SnapshotSink for F {
    fn on_tick(&mut self, snapshot: &Snapshot) {
        self(snapshot)
    }
}

/// Reject workloads that cannot be simulated before any state is created.
pub fn validate_workload(specs: &[ProcessSpec]) -> Result<(), SimError> {
    if specs.is_empty() {
        return Err(SimError::EmptyWorkload);
    }

    let mut seen = FxHashSet::default();
    for spec in specs {
        if !seen.insert(spec.id.as_str()) {
            return Err(SimError::DuplicateProcess(spec.id.clone()));
        }
    }
    Ok(())
}

/// Clock and arrival dispatcher around a [`SchedCore`].
pub struct Sim<S: Scheduler> {
    pub core: SchedCore<S>,
    finished: bool,
}

impl<S: Scheduler> Sim<S> {
    pub fn new(specs: &[ProcessSpec]) -> Result<Self, SimError> {
        validate_workload(specs)?;

        let mut ctx = EngineState::new();
        let mut backlog_order: Vec<ProcIdx> =
            specs.iter().map(|spec| ctx.register(spec)).collect();
        // Registry index is the input position, so it breaks arrival ties
        backlog_order.sort_by(|&a, &b| {
            ctx.process(a)
                .arrival
                .cmp(&ctx.process(b).arrival)
                .then_with(|| a.cmp(&b))
        });

        let backlog = ctx.backlog();
        for proc in backlog_order {
            ctx.queue_push_fifo(backlog, proc);
        }

        Ok(Self {
            core: SchedCore::new(ctx),
            finished: false,
        })
    }

    pub fn algorithm(&self) -> Algorithm {
        self.core.scheduler.algorithm()
    }

    /// Run one tick and advance the clock. Returns the events emitted during the tick.
    pub fn step(&mut self) -> Vec<SimEvent> {
        if self.finished {
            return Vec::new();
        }

        let events = self.tick_once();
        if self.core.is_drained() {
            self.finished = true;
        } else {
            self.core.ctx.advance_time(1);
        }
        events
    }

    /// Run until every process completes or `stop` is raised.
    pub fn run(
        &mut self,
        stop: &StopHandle,
        pacer: &mut dyn Pacer,
        sinks: &mut [Box<dyn SnapshotSink>],
    ) -> RunStatus {
        info!(
            "{} run started with {} processes",
            self.algorithm(),
            self.core.ctx.procs.len()
        );

        loop {
            if stop.is_stopped() {
                info!("run stopped at tick {}", self.core.now());
                return RunStatus::Stopped {
                    at: self.core.now(),
                };
            }

            if self.finished {
                return RunStatus::Completed;
            }

            self.tick_once();
            let snapshot = self.core.snapshot();
            for sink in sinks.iter_mut() {
                sink.on_tick(&snapshot);
            }

            if self.core.is_drained() {
                self.finished = true;
                info!("run completed at tick {}", self.core.now() + 1);
                return RunStatus::Completed;
            }

            pacer.pause(self.core.now());
            self.core.ctx.advance_time(1);
        }
    }

    fn tick_once(&mut self) -> Vec<SimEvent> {
        let first = self.core.log().len();
        self.handle_arrivals();
        self.core.tick();

        self.core.log().entries()[first..]
            .iter()
            .map(|entry| entry.event.clone())
            .collect()
    }

    fn handle_arrivals(&mut self) {
        let now = self.core.now();
        let backlog = self.core.ctx.backlog();

        // Arrivals are contiguous at the front, since the backlog is sorted
        while let Some(proc) = self.core.ctx.queue_front(backlog) {
            if self.core.ctx.process(proc).arrival > now {
                break;
            }
            self.core.ctx.queue_pop(backlog);
            self.core.admit(proc);
        }
    }

    pub fn all_processes_completed(&self) -> bool {
        self.core.ctx.all_completed()
    }

    pub fn metrics(&self) -> Result<Metrics, SimError> {
        Metrics::compute(&self.core.ctx.procs)
    }
}
