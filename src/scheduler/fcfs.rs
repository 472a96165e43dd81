use super::{Algorithm, EnqueueFlags, EngineState, ProcIdx, Scheduler};

/// Strict FIFO, run to completion.
pub struct FcfsScheduler;

impl Scheduler for FcfsScheduler {
    fn init(_ctx: &mut EngineState) -> Self {
        Self
    }

    fn algorithm(&self) -> Algorithm {
        Algorithm::Fcfs
    }

    fn enqueue(&mut self, ctx: &mut EngineState, proc: ProcIdx, flags: EnqueueFlags) {
        let _ = flags;
        let queue = ctx.global_queue();
        ctx.queue_push_fifo(queue, proc);
    }

    fn dispatch(&mut self, ctx: &mut EngineState) -> Option<ProcIdx> {
        ctx.queue_pop(ctx.global_queue())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::ENQ_WAKEUP;
    use crate::sim::ProcessSpec;

    #[test]
    fn test_dispatches_in_enqueue_order() {
        let mut ctx = EngineState::new();
        let mut sched = FcfsScheduler::init(&mut ctx);
        let a = ctx.register(&ProcessSpec::new("A", 0, 3).with_priority(9));
        let b = ctx.register(&ProcessSpec::new("B", 0, 1).with_priority(1));

        for p in [a, b] {
            ctx.mark_ready(p);
            sched.enqueue(&mut ctx, p, ENQ_WAKEUP);
        }

        assert_eq!(sched.dispatch(&mut ctx), Some(a));
        assert!(!sched.should_preempt(&ctx, a));
        assert_eq!(sched.dispatch(&mut ctx), Some(b));
        assert_eq!(sched.dispatch(&mut ctx), None);
    }
}
