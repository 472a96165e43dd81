//! Discrete-time CPU scheduling simulator.
//!
//! A single-CPU engine advances a logical clock one tick at a time, admits
//! processes as they arrive, and schedules them under FCFS, round robin
//! (quantum 2) or non-preemptive priority. Each run yields an append-only event
//! log and, when it completes, wait/response/turnaround metrics.

pub mod config;
pub mod core;
pub mod error;
pub mod input;
pub mod scheduler;
pub mod sim;

pub use config::SimConfig;
pub use crate::core::{LogEntry, SimEvent, Snapshot};
pub use error::{InputError, SimError};
pub use scheduler::{Algorithm, Scheduler};
pub use sim::{Metrics, ProcessSpec, Restart, RunReport, RunStatus, Sim, Simulator, StopHandle};
