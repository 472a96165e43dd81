use super::{Algorithm, ENQ_PREEMPT, EnqueueFlags, EngineState, ProcIdx, RR_QUANTUM, Scheduler};

/// Single FIFO ready queue shared by fresh arrivals and preempted processes.
pub struct RoundRobinScheduler {
    quantum: u64,
}

impl Scheduler for RoundRobinScheduler {
    fn init(_ctx: &mut EngineState) -> Self {
        Self {
            quantum: RR_QUANTUM,
        }
    }

    fn algorithm(&self) -> Algorithm {
        Algorithm::RoundRobin
    }

    fn enqueue(&mut self, ctx: &mut EngineState, proc: ProcIdx, flags: EnqueueFlags) {
        if flags & ENQ_PREEMPT != 0 {
            ctx.process_mut(proc).quantum_consumed = 0;
        }
        let queue = ctx.global_queue();
        ctx.queue_push_fifo(queue, proc);
    }

    fn dispatch(&mut self, ctx: &mut EngineState) -> Option<ProcIdx> {
        ctx.queue_pop(ctx.global_queue())
    }

    fn should_preempt(&self, ctx: &EngineState, proc: ProcIdx) -> bool {
        let process = ctx.process(proc);
        process.quantum_consumed >= self.quantum && process.remaining > 0
    }

    fn tick(&mut self, ctx: &mut EngineState, proc: ProcIdx) {
        let process = ctx.process_mut(proc);
        process.quantum_consumed = process.quantum_consumed.saturating_add(1);
    }
}
