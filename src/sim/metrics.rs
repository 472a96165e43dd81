use average::{Estimate, Mean};
use serde::Serialize;

use crate::core::{Process, Ticks};
use crate::error::SimError;

/// Per-process outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessMetrics {
    pub process: String,
    pub arrival: Ticks,
    pub burst: Ticks,
    pub first_run: Ticks,
    pub completion: Ticks,
    pub turnaround: Ticks,
    pub wait: Ticks,
    pub response: Ticks,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    /// In input order.
    pub processes: Vec<ProcessMetrics>,
    pub avg_wait: f64,
    pub avg_response: f64,
    pub avg_turnaround: f64,
}

impl Metrics {
    /// Derive metrics from a finished registry. Every process must have completed.
    pub fn compute(procs: &[Process]) -> Result<Self, SimError> {
        if procs.is_empty() {
            return Err(SimError::EmptyWorkload);
        }

        let processes = procs
            .iter()
            .map(ProcessMetrics::from_process)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            avg_wait: avg(processes.iter().map(|p| p.wait as f64)),
            avg_response: avg(processes.iter().map(|p| p.response as f64)),
            avg_turnaround: avg(processes.iter().map(|p| p.turnaround as f64)),
            processes,
        })
    }

    pub fn get(&self, process: &str) -> Option<&ProcessMetrics> {
        self.processes.iter().find(|p| p.process == process)
    }
}

impl ProcessMetrics {
    fn from_process(process: &Process) -> Result<Self, SimError> {
        let (Some(first_run), Some(completion)) = (process.first_run, process.completion) else {
            return Err(SimError::Incomplete(process.name.clone()));
        };

        let turnaround = completion - process.arrival;
        debug_assert!(
            turnaround >= process.burst,
            "process {} turnaround {turnaround} shorter than burst {}",
            process.name,
            process.burst
        );

        Ok(Self {
            process: process.name.clone(),
            arrival: process.arrival,
            burst: process.burst,
            first_run,
            completion,
            turnaround,
            wait: turnaround.saturating_sub(process.burst),
            response: first_run - process.arrival,
        })
    }
}

fn avg(iter: impl Iterator<Item = f64>) -> f64 {
    iter.collect::<Mean>().estimate()
}
