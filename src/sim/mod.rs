pub mod control;
pub mod driver;
pub mod metrics;
pub mod pacing;
pub mod process;
pub mod workload;

pub use control::{Restart, RunReport, Simulator, StopHandle};
pub use driver::{RunStatus, Sim, SnapshotSink};
pub use metrics::{Metrics, ProcessMetrics};
pub use pacing::{FixedDelay, NoDelay, Pacer};
pub use process::ProcessSpec;
pub use workload::bernoulli_workload;
