use log::trace;
use std::{thread, time::Duration};

use crate::core::Ticks;

/// Wall-clock pacing between ticks. Purely presentational: simulation results
/// never depend on it.
pub trait Pacer {
    fn pause(&mut self, tick: Ticks);
}

/// Headless runs: every tick executes back to back.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDelay;

impl Pacer for NoDelay {
    fn pause(&mut self, _tick: Ticks) {}
}

/// Sleep a fixed interval after each tick, for animated playback.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay {
    interval: Duration,
}

impl FixedDelay {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Pacer for FixedDelay {
    fn pause(&mut self, tick: Ticks) {
        trace!("tick {tick}: pausing {:?}", self.interval);
        thread::sleep(self.interval);
    }
}

pub fn pacer_for(delay: Duration) -> Box<dyn Pacer> {
    if delay.is_zero() {
        Box::new(NoDelay)
    } else {
        Box::new(FixedDelay::new(delay))
    }
}
