use super::{Algorithm, EnqueueFlags, EngineState, ProcIdx, QueueId, Scheduler};
use crate::core::QueueKey;

/// Non-preemptive priority scheduling. Lower priority value runs first; ties
/// keep admission order.
pub struct PriorityScheduler {
    ready_priq: QueueId,
    next_seq: u64,
}

impl Scheduler for PriorityScheduler {
    fn init(ctx: &mut EngineState) -> Self {
        Self {
            ready_priq: ctx.create_queue_priq(),
            next_seq: 0,
        }
    }

    fn algorithm(&self) -> Algorithm {
        Algorithm::Priority
    }

    fn ready_queue(&self, _ctx: &EngineState) -> QueueId {
        self.ready_priq
    }

    fn enqueue(&mut self, ctx: &mut EngineState, proc: ProcIdx, _flags: EnqueueFlags) {
        let key = QueueKey {
            priority: ctx.process(proc).priority,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        ctx.queue_push_priq(self.ready_priq, proc, key);
    }

    fn dispatch(&mut self, ctx: &mut EngineState) -> Option<ProcIdx> {
        ctx.queue_pop(self.ready_priq)
    }
}
