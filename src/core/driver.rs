use log::debug;

use super::{
    event::SimEvent,
    event_log::{EventLog, LogEntry},
    observer::{Observer, Snapshot},
    state::{EngineState, ProcIdx, ProcessState, Ticks},
};
use crate::scheduler::{ENQ_PREEMPT, ENQ_WAKEUP, Scheduler};

/// Sequences the scheduler and executor within one tick and records every
/// transition in the event log.
pub struct SchedCore<S: Scheduler> {
    pub ctx: EngineState,
    pub scheduler: S,
    observer: Observer,
    log: EventLog,
    // Process that occupied the CPU at each tick, indexed by tick
    timeline: Vec<Option<ProcIdx>>,
}

impl<S: Scheduler> SchedCore<S> {
    pub fn new(mut ctx: EngineState) -> Self {
        let scheduler = S::init(&mut ctx);
        Self {
            ctx,
            scheduler,
            observer: Observer::new(),
            log: EventLog::new(),
            timeline: Vec::new(),
        }
    }

    /// Move an arrived process into the ready queue.
    pub fn admit(&mut self, proc: ProcIdx) {
        debug_assert_eq!(
            self.ctx.process(proc).state,
            ProcessState::New,
            "only new processes can be admitted"
        );
        self.ctx.mark_ready(proc);
        self.scheduler.enqueue(&mut self.ctx, proc, ENQ_WAKEUP);
        let event = SimEvent::Admitted {
            process: self.ctx.process(proc).name.clone(),
            running: self.ctx.running_name(),
        };
        self.record(event);
    }

    /// Scheduler and executor phases for the current tick. Does not advance time.
    pub fn tick(&mut self) {
        self.preempt_if_due();
        let settled = self.ctx.cpu_is_idle() && self.try_dispatch();
        self.execute(settled);
        self.observer.observe(&self.ctx);
    }

    fn preempt_if_due(&mut self) {
        let Some(current) = self.ctx.running else {
            return;
        };
        if !self.scheduler.should_preempt(&self.ctx, current) {
            return;
        }

        self.ctx.clear_running();
        self.ctx.mark_ready(current);
        self.scheduler.enqueue(&mut self.ctx, current, ENQ_PREEMPT);
        let process = self.ctx.process(current);
        let event = SimEvent::Preempted {
            process: process.name.clone(),
            remaining: process.remaining,
        };
        self.record(event);
    }

    /// Returns whether a zero-burst process completed during selection.
    fn try_dispatch(&mut self) -> bool {
        let now = self.ctx.now;
        let mut settled = false;
        while let Some(proc) = self.scheduler.dispatch(&mut self.ctx) {
            if self.ctx.process(proc).remaining == 0 {
                // Nothing to execute: completes the moment it is selected.
                self.ctx.process_mut(proc).first_run.get_or_insert(now);
                self.ctx.mark_completed(proc, now);
                let event = SimEvent::Completed {
                    process: self.ctx.process(proc).name.clone(),
                    at: now,
                };
                self.record(event);
                settled = true;
                continue;
            }

            self.ctx.set_running(proc);
            let event = SimEvent::Dispatched {
                process: self.ctx.process(proc).name.clone(),
            };
            self.record(event);
            break;
        }
        settled
    }

    fn execute(&mut self, settled: bool) {
        let now = self.ctx.now;
        let Some(current) = self.ctx.running else {
            // Zero-burst completions make the tick non-idle; the last such tick gets no slot
            if !settled {
                self.timeline.push(None);
                self.record(SimEvent::Idle);
            } else if !self.is_drained() {
                self.timeline.push(None);
            }
            return;
        };

        // In its own block to avoid double-mutable-borrow
        {
            let process = self.ctx.process_mut(current);
            assert!(
                process.remaining > 0,
                "process {} scheduled with no remaining burst",
                process.name
            );
            process.remaining -= 1;
            process.first_run.get_or_insert(now);
        }

        self.scheduler.tick(&mut self.ctx, current);
        self.timeline.push(Some(current));

        let remaining = self.ctx.process(current).remaining;
        let name = self.ctx.process(current).name.clone();
        if remaining == 0 {
            self.ctx.clear_running();
            self.ctx.mark_completed(current, now + 1);
            self.record(SimEvent::Completed {
                process: name,
                at: now + 1,
            });
        } else {
            self.record(SimEvent::Ran {
                process: name,
                remaining,
            });
        }
    }

    fn record(&mut self, event: SimEvent) {
        debug!("t={} {}", self.ctx.now, event);
        let ready = self.scheduler.ready_queue(&self.ctx);
        self.log.append(LogEntry {
            tick: self.ctx.now,
            running: self.ctx.running_name(),
            ready: self.ctx.queue_names(ready),
            waiting: self.ctx.queue_names(self.ctx.backlog()),
            event,
        });
    }

    /// Backlog, ready queue and running slot are all empty.
    pub fn is_drained(&self) -> bool {
        let ready = self.scheduler.ready_queue(&self.ctx);
        self.ctx.cpu_is_idle()
            && self.ctx.queue_is_empty(ready)
            && self.ctx.queue_is_empty(self.ctx.backlog())
    }

    pub fn snapshot(&self) -> Snapshot {
        let executed = self
            .timeline
            .get(self.ctx.now as usize)
            .copied()
            .flatten()
            .map(|p| self.ctx.process(p).name.clone());
        Snapshot::capture(&self.ctx, self.scheduler.ready_queue(&self.ctx), executed)
    }

    pub fn now(&self) -> Ticks {
        self.ctx.now
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn timeline(&self) -> Vec<Option<String>> {
        self.timeline
            .iter()
            .map(|slot| slot.map(|p| self.ctx.process(p).name.clone()))
            .collect()
    }

    pub fn observer(&self) -> &Observer {
        &self.observer
    }
}
