use keyed_priority_queue::KeyedPriorityQueue;
use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};
use std::collections::VecDeque;

use crate::sim::ProcessSpec;

// Index into the process Vec
pub type ProcIdx = usize;
pub type Ticks = u64;
pub type Priority = i64;

/// Lower value = higher precedence, so the lowest precedence is the largest value.
pub const PRIORITY_LOWEST: Priority = Priority::MAX;

new_key_type! {
    pub struct QueueId;
}

/// Ordering key for priority queues: priority value first, admission order second.
#[derive(PartialEq, Eq, Hash, Debug, Copy, Clone)]
pub struct QueueKey {
    pub priority: Priority,
    pub seq: u64,
}

// KeyedPriorityQueue is a max-heap, so the smallest (priority, seq) must compare greatest
impl PartialOrd for QueueKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (other.priority, other.seq).cmp(&(self.priority, self.seq))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    New,
    Ready,
    Running,
    Completed,
}

#[derive(Debug, Clone)]
pub struct Process {
    pub name: String,
    pub arrival: Ticks,
    pub burst: Ticks,
    pub remaining: Ticks,
    pub priority: Priority,
    pub state: ProcessState,
    pub quantum_consumed: Ticks,
    pub first_run: Option<Ticks>,
    pub completion: Option<Ticks>,
}

#[derive(Debug)]
pub enum RunQueue {
    Fifo {
        procs: VecDeque<ProcIdx>,
    },
    Priq {
        procs: KeyedPriorityQueue<ProcIdx, QueueKey>,
    },
}

impl RunQueue {
    pub fn new_fifo() -> Self {
        Self::Fifo {
            procs: VecDeque::new(),
        }
    }

    pub fn new_priq() -> Self {
        Self::Priq {
            procs: KeyedPriorityQueue::new(),
        }
    }

    pub fn contains(&self, proc: ProcIdx) -> bool {
        match self {
            Self::Fifo { procs } => procs.contains(&proc),
            Self::Priq { procs } => procs.iter().any(|p| *p.0 == proc),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Fifo { procs } => procs.len(),
            Self::Priq { procs } => procs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Queue contents in the order they would be popped.
    pub fn ordered(&self) -> Vec<ProcIdx> {
        match self {
            Self::Fifo { procs } => procs.iter().copied().collect(),
            Self::Priq { procs } => {
                let mut entries: Vec<(QueueKey, ProcIdx)> =
                    procs.iter().map(|(&p, &key)| (key, p)).collect();
                entries.sort_by(|a, b| b.0.cmp(&a.0));
                entries.into_iter().map(|(_, p)| p).collect()
            }
        }
    }
}

/// Engine-owned simulation state: the process registry, the queues and the
/// running slot. Only the engine loop mutates it.
#[derive(Debug)]
pub struct EngineState {
    pub now: Ticks,
    pub running: Option<ProcIdx>,
    pub procs: Vec<Process>,
    pub queues: SlotMap<QueueId, RunQueue>,
    pub proc_to_queue: FxHashMap<ProcIdx, QueueId>,
    pub backlog_id: QueueId,
    pub global_id: QueueId,
}

impl EngineState {
    pub fn new() -> Self {
        let mut queues = SlotMap::with_capacity_and_key(2);
        let backlog_id = queues.insert(RunQueue::new_fifo());
        let global_id = queues.insert(RunQueue::new_fifo());

        Self {
            now: 0,
            running: None,
            procs: Vec::new(),
            queues,
            proc_to_queue: FxHashMap::default(),
            backlog_id,
            global_id,
        }
    }

    /// Add a process to the registry. It stays `New` until placed in the backlog.
    pub fn register(&mut self, spec: &ProcessSpec) -> ProcIdx {
        let idx = self.procs.len();
        self.procs.push(Process {
            name: spec.id.clone(),
            arrival: spec.arrival,
            burst: spec.burst,
            remaining: spec.burst,
            priority: spec.effective_priority(),
            state: ProcessState::New,
            quantum_consumed: 0,
            first_run: None,
            completion: None,
        });
        idx
    }

    pub fn advance_time(&mut self, delta: Ticks) {
        self.now = self.now.saturating_add(delta);
    }

    pub fn create_queue_priq(&mut self) -> QueueId {
        self.queues.insert(RunQueue::new_priq())
    }

    fn queue_push(&mut self, queue_id: QueueId, proc: ProcIdx, key: Option<QueueKey>) {
        assert!(
            !self.proc_to_queue.contains_key(&proc),
            "Process {proc} already present in some queue"
        );

        let state = self.process(proc).state;
        assert!(
            state != ProcessState::Completed && state != ProcessState::Running,
            "Process {proc} must not be Running or Completed when enqueued"
        );

        let queue = self.queues.get_mut(queue_id).expect("Unknown queue");
        match queue {
            RunQueue::Fifo { procs } => procs.push_back(proc),
            RunQueue::Priq { procs } => {
                procs.push(
                    proc,
                    key.expect("Attempted to push to a priority queue with no key"),
                );
            }
        };

        self.proc_to_queue.insert(proc, queue_id);
    }

    pub fn queue_push_fifo(&mut self, queue_id: QueueId, proc: ProcIdx) {
        self.queue_push(queue_id, proc, None);
    }

    pub fn queue_push_priq(&mut self, queue_id: QueueId, proc: ProcIdx, key: QueueKey) {
        self.queue_push(queue_id, proc, Some(key));
    }

    pub fn queue_pop(&mut self, queue_id: QueueId) -> Option<ProcIdx> {
        let queue = self.queues.get_mut(queue_id)?;
        let proc = match queue {
            RunQueue::Fifo { procs } => procs.pop_front(),
            RunQueue::Priq { procs } => procs.pop().map(|p| p.0),
        }?;

        let removed = self.proc_to_queue.remove(&proc);
        debug_assert!(removed.is_some(), "Process {proc} missing queue membership");

        Some(proc)
    }

    pub fn queue_front(&self, queue_id: QueueId) -> Option<ProcIdx> {
        match self.queues.get(queue_id)? {
            RunQueue::Fifo { procs } => procs.front().copied(),
            RunQueue::Priq { procs } => procs.peek().map(|p| *p.0),
        }
    }

    pub fn queue_is_empty(&self, queue_id: QueueId) -> bool {
        self.queues.get(queue_id).is_none_or(RunQueue::is_empty)
    }

    pub fn queue_names(&self, queue_id: QueueId) -> Vec<String> {
        self.queues
            .get(queue_id)
            .map(|q| {
                q.ordered()
                    .into_iter()
                    .map(|p| self.process(p).name.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn proc_in_any_queue(&self, proc: ProcIdx) -> bool {
        self.proc_to_queue.contains_key(&proc)
    }

    pub fn process(&self, proc: ProcIdx) -> &Process {
        &self.procs[proc]
    }

    pub fn process_mut(&mut self, proc: ProcIdx) -> &mut Process {
        &mut self.procs[proc]
    }

    pub fn backlog(&self) -> QueueId {
        self.backlog_id
    }

    pub fn global_queue(&self) -> QueueId {
        self.global_id
    }

    pub fn cpu_is_idle(&self) -> bool {
        self.running.is_none()
    }

    pub fn running_name(&self) -> Option<String> {
        self.running.map(|p| self.process(p).name.clone())
    }

    pub fn mark_ready(&mut self, proc: ProcIdx) {
        let process = self.process_mut(proc);
        debug_assert!(
            process.state != ProcessState::Completed,
            "Completed process {} cannot become ready",
            process.name
        );
        process.state = ProcessState::Ready;
    }

    pub fn mark_completed(&mut self, proc: ProcIdx, completion: Ticks) {
        debug_assert!(
            !self.proc_to_queue.contains_key(&proc),
            "Completing process {proc} that is still enqueued"
        );
        debug_assert!(
            self.running != Some(proc),
            "Process {proc} must leave the running slot before completing"
        );

        let process = &mut self.procs[proc];
        debug_assert_eq!(process.remaining, 0, "Process {proc} completed with work left");

        process.state = ProcessState::Completed;
        process.quantum_consumed = 0;
        process.completion = Some(completion);
    }

    // Return previous state
    pub fn set_running(&mut self, proc: ProcIdx) -> ProcessState {
        debug_assert!(
            !self.proc_to_queue.contains_key(&proc),
            "Running process {proc} must not be enqueued"
        );
        debug_assert!(self.running.is_none(), "CPU already running a process");

        self.running = Some(proc);
        let process = self.process_mut(proc);
        let prev_state = process.state;
        process.state = ProcessState::Running;
        prev_state
    }

    pub fn clear_running(&mut self) -> Option<ProcIdx> {
        self.running.take()
    }

    pub fn all_completed(&self) -> bool {
        self.procs
            .iter()
            .all(|p| p.state == ProcessState::Completed)
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::new()
    }
}
