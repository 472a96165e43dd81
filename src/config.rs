//! Configuration for a simulation session.

use std::time::Duration;

use crate::scheduler::Algorithm;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimConfig {
    /// Policy used by `Simulator::start`
    pub algorithm: Algorithm,
    /// Wall-clock pause between ticks; zero runs headless
    pub tick_delay: Duration,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Fcfs,
            tick_delay: Duration::ZERO,
        }
    }
}

impl SimConfig {
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            ..Self::default()
        }
    }

    pub fn with_tick_delay(mut self, tick_delay: Duration) -> Self {
        self.tick_delay = tick_delay;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_headless_fcfs() {
        let config = SimConfig::default();
        assert_eq!(config.algorithm, Algorithm::Fcfs);
        assert!(config.tick_delay.is_zero());

        let paced = SimConfig::new(Algorithm::Priority).with_tick_delay(Duration::from_millis(250));
        assert_eq!(paced.algorithm, Algorithm::Priority);
        assert_eq!(paced.tick_delay, Duration::from_millis(250));
    }
}
