use log::{info, warn};
use serde::Serialize;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use super::{
    driver::{RunStatus, Sim, SnapshotSink, validate_workload},
    metrics::Metrics,
    pacing::{Pacer, pacer_for},
    process::ProcessSpec,
};
use crate::{
    config::SimConfig,
    core::LogEntry,
    error::SimError,
    scheduler::{Algorithm, FcfsScheduler, PriorityScheduler, RoundRobinScheduler, Scheduler},
};

/// Cooperative cancellation flag, polled once at the top of each tick.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    fn clear(&self) {
        self.flag.store(false, Ordering::Relaxed);
    }
}

/// Whether `start` may discard a previous run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Restart {
    Confirm,
    Decline,
}

/// Everything a run produced. `metrics` is present only for completed runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub algorithm: Algorithm,
    pub status: RunStatus,
    pub log: Vec<LogEntry>,
    pub timeline: Vec<Option<String>>,
    pub metrics: Option<Metrics>,
}

impl RunReport {
    pub fn is_partial(&self) -> bool {
        matches!(self.status, RunStatus::Stopped { .. })
    }
}

/// Control surface for a hosting application.
pub struct Simulator {
    config: SimConfig,
    stop: StopHandle,
    pacer: Box<dyn Pacer>,
    sinks: Vec<Box<dyn SnapshotSink>>,
    report: Option<RunReport>,
}

impl Simulator {
    pub fn new(config: SimConfig) -> Self {
        Self {
            pacer: pacer_for(config.tick_delay),
            config,
            stop: StopHandle::new(),
            sinks: Vec::new(),
            report: None,
        }
    }

    pub fn with_pacer(mut self, pacer: impl Pacer + 'static) -> Self {
        self.pacer = Box::new(pacer);
        self
    }

    pub fn subscribe(&mut self, sink: impl SnapshotSink + 'static) {
        self.sinks.push(Box::new(sink));
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Run `specs` with the configured algorithm.
    pub fn start(
        &mut self,
        specs: &[ProcessSpec],
        restart: Restart,
    ) -> Result<&RunReport, SimError> {
        self.start_with(specs, self.config.algorithm, restart)
    }

    pub fn start_with(
        &mut self,
        specs: &[ProcessSpec],
        algorithm: Algorithm,
        restart: Restart,
    ) -> Result<&RunReport, SimError> {
        if self.report.is_some() && restart == Restart::Decline {
            warn!("start ignored: a run already exists and restart was not confirmed");
            return Err(SimError::RunAlreadyActive);
        }
        validate_workload(specs)?;

        if self.report.is_some() {
            info!("discarding previous run");
            self.reset();
        }
        self.stop.clear();

        let report = match algorithm {
            Algorithm::Fcfs => self.run_policy::<FcfsScheduler>(specs)?,
            Algorithm::RoundRobin => self.run_policy::<RoundRobinScheduler>(specs)?,
            Algorithm::Priority => self.run_policy::<PriorityScheduler>(specs)?,
        };
        Ok(self.report.insert(report))
    }

    fn run_policy<S: Scheduler>(&mut self, specs: &[ProcessSpec]) -> Result<RunReport, SimError> {
        let mut sim = Sim::<S>::new(specs)?;
        let status = sim.run(&self.stop, self.pacer.as_mut(), &mut self.sinks);

        let metrics = match status {
            RunStatus::Completed => Some(sim.metrics()?),
            RunStatus::Stopped { at } => {
                info!("run stopped at tick {at}; metrics withheld");
                None
            }
        };

        Ok(RunReport {
            algorithm: sim.algorithm(),
            status,
            log: sim.core.log().entries().to_vec(),
            timeline: sim.core.timeline(),
            metrics,
        })
    }

    pub fn stop(&self) {
        self.stop.stop();
    }

    /// Clear all run state back to initial. Subscribed sinks and the pacer are
    /// host wiring, not run state, and are kept.
    pub fn reset(&mut self) {
        self.report = None;
        self.stop.clear();
    }

    pub fn report(&self) -> Option<&RunReport> {
        self.report.as_ref()
    }

    pub fn has_run(&self) -> bool {
        self.report.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Ticks;
    use std::{cell::RefCell, rc::Rc};

    struct CountingPacer {
        pauses: Rc<RefCell<Vec<Ticks>>>,
    }

    impl Pacer for CountingPacer {
        fn pause(&mut self, tick: Ticks) {
            self.pauses.borrow_mut().push(tick);
        }
    }

    fn workload() -> Vec<ProcessSpec> {
        vec![
            ProcessSpec::new("P1", 0, 4).with_priority(3),
            ProcessSpec::new("P2", 1, 3).with_priority(1),
            ProcessSpec::new("P3", 2, 2),
        ]
    }

    #[test]
    fn test_second_start_requires_confirmation() {
        let mut sim = Simulator::new(SimConfig::default());
        sim.start(&workload(), Restart::Decline).unwrap();
        let first = sim.report().unwrap().clone();

        assert!(matches!(
            sim.start_with(&workload(), Algorithm::RoundRobin, Restart::Decline),
            Err(SimError::RunAlreadyActive)
        ));
        assert_eq!(sim.report(), Some(&first));
    }

    #[test]
    fn test_confirmed_restart_is_deterministic() {
        for algorithm in Algorithm::ALL {
            let mut sim = Simulator::new(SimConfig::default());
            let first = sim
                .start_with(&workload(), algorithm, Restart::Decline)
                .unwrap()
                .clone();
            let second = sim
                .start_with(&workload(), algorithm, Restart::Confirm)
                .unwrap()
                .clone();

            assert_eq!(first.algorithm, algorithm);
            assert_eq!(first.log, second.log);
            assert_eq!(first.metrics, second.metrics);
            assert!(!second.is_partial());
        }
    }

    #[test]
    fn test_stop_from_sink_yields_partial_report() {
        let mut sim = Simulator::new(SimConfig::default());
        let stop = sim.stop_handle();
        sim.subscribe(move |snapshot: &crate::core::Snapshot| {
            if snapshot.tick == 2 {
                stop.stop();
            }
        });

        let report = sim.start(&workload(), Restart::Decline).unwrap();
        assert_eq!(report.status, RunStatus::Stopped { at: 3 });
        assert!(report.is_partial());
        assert!(report.metrics.is_none());
        assert_eq!(report.log.last().unwrap().tick, 2);
        assert_eq!(report.timeline.len(), 3);
    }

    #[test]
    fn test_restart_after_stop_runs_to_completion() {
        let mut sim = Simulator::new(SimConfig::default());
        sim.stop();
        let first = sim.start(&workload(), Restart::Decline).unwrap();
        // start clears a stale stop request
        assert!(!first.is_partial());

        sim.reset();
        assert!(!sim.has_run());
        let report = sim.start(&workload(), Restart::Decline).unwrap();
        assert!(report.metrics.is_some());
    }

    #[test]
    fn test_invalid_workload_keeps_previous_run() {
        let mut sim = Simulator::new(SimConfig::default());
        sim.start(&workload(), Restart::Decline).unwrap();

        assert!(matches!(
            sim.start(&[], Restart::Confirm),
            Err(SimError::EmptyWorkload)
        ));
        assert!(sim.report().is_some());
    }

    #[test]
    fn test_injected_pacer_runs_between_ticks_only() {
        let pauses = Rc::new(RefCell::new(Vec::new()));
        let mut sim = Simulator::new(SimConfig::default()).with_pacer(CountingPacer {
            pauses: pauses.clone(),
        });

        let report = sim
            .start(&[ProcessSpec::new("P1", 0, 3)], Restart::Decline)
            .unwrap();
        assert_eq!(report.timeline.len(), 3);
        assert_eq!(*pauses.borrow(), vec![0, 1]);

        // kept across reset
        sim.reset();
        sim.start(&[ProcessSpec::new("P1", 0, 2)], Restart::Decline).unwrap();
        assert_eq!(*pauses.borrow(), vec![0, 1, 0]);
    }

    #[test]
    fn test_report_serializes() {
        let mut sim = Simulator::new(SimConfig::default());
        let report = sim.start(&workload(), Restart::Decline).unwrap();
        let json = serde_json::to_value(report).unwrap();
        assert_eq!(json["algorithm"], "Fcfs");
        assert_eq!(json["status"]["status"], "completed");
        assert_eq!(json["log"][0]["event"]["kind"], "admitted");
    }
}
