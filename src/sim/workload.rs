use rand::prelude::*;

use super::process::ProcessSpec;
use crate::core::{Priority, Ticks};

const PRIORITY_LEVELS: Priority = 5;

/// Synthetic workload: at every tick in `0..ticks` a process arrives with
/// probability `p_arrival`; it is short with probability `p_short`. Priorities
/// are drawn uniformly from `1..=5`. The same seed yields the same workload.
pub fn bernoulli_workload(
    ticks: Ticks,
    p_arrival: f64,
    p_short: f64,
    short_ticks: Ticks,
    long_ticks: Ticks,
    seed: u64,
) -> Vec<ProcessSpec> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut specs = Vec::new();

    for t in 0..ticks {
        if rng.random::<f64>() < p_arrival {
            let burst = if rng.random::<f64>() < p_short {
                short_ticks
            } else {
                long_ticks
            };
            let priority = rng.random_range(1..=PRIORITY_LEVELS);

            specs.push(
                ProcessSpec::new(format!("P{}", specs.len() + 1), t, burst).with_priority(priority),
            );
        }
    }

    specs
}
