pub mod driver;
pub mod event;
pub mod event_log;
pub mod observer;
pub mod state;

pub use driver::SchedCore;
pub use event::SimEvent;
pub use event_log::{EventLog, LogEntry};
pub use observer::{Observer, RunningView, Snapshot};
pub use state::{
    EngineState, PRIORITY_LOWEST, Priority, ProcIdx, Process, ProcessState, QueueId, QueueKey,
    RunQueue, Ticks,
};
