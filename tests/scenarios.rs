// End-to-end scheduling properties over hand-written and seeded synthetic workloads.

use std::collections::HashMap;

use cpusim::{
    Algorithm, ProcessSpec, Restart, RunReport, RunStatus, SimConfig, SimEvent, Simulator,
    sim::bernoulli_workload,
};

fn run(specs: &[ProcessSpec], algorithm: Algorithm) -> RunReport {
    let mut sim = Simulator::new(SimConfig::new(algorithm));
    let report = sim.start(specs, Restart::Decline).unwrap().clone();
    assert_eq!(report.status, RunStatus::Completed);
    report
}

fn workloads() -> Vec<Vec<ProcessSpec>> {
    (0..8)
        .map(|seed| bernoulli_workload(60, 0.3, 0.3, 2, 6, seed))
        .filter(|specs| !specs.is_empty())
        .collect()
}

fn dispatch_order(report: &RunReport) -> Vec<String> {
    report
        .log
        .iter()
        .filter_map(|e| match &e.event {
            SimEvent::Dispatched { process } => Some(process.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn scenario_a_fcfs() {
    let report = run(
        &[ProcessSpec::new("P1", 0, 4), ProcessSpec::new("P2", 1, 3)],
        Algorithm::Fcfs,
    );
    let metrics = report.metrics.unwrap();

    let p1 = metrics.get("P1").unwrap();
    assert_eq!((p1.completion, p1.wait, p1.turnaround, p1.response), (4, 0, 4, 0));
    let p2 = metrics.get("P2").unwrap();
    assert_eq!((p2.completion, p2.wait, p2.turnaround, p2.response), (7, 3, 6, 3));
    assert!((metrics.avg_wait - 1.5).abs() < 1e-9);
}

#[test]
fn scenario_b_round_robin() {
    let report = run(
        &[ProcessSpec::new("P1", 0, 4), ProcessSpec::new("P2", 0, 4)],
        Algorithm::RoundRobin,
    );
    assert_eq!(dispatch_order(&report), vec!["P1", "P2", "P1", "P2"]);

    let metrics = report.metrics.unwrap();
    assert_eq!(metrics.get("P1").unwrap().turnaround, 6);
    assert_eq!(metrics.get("P2").unwrap().turnaround, 8);
    assert_eq!(metrics.get("P1").unwrap().wait, 2);
    assert_eq!(metrics.get("P2").unwrap().wait, 4);
}

#[test]
fn scenario_c_priority() {
    let report = run(
        &[
            ProcessSpec::new("P1", 0, 3).with_priority(5),
            ProcessSpec::new("P2", 0, 2).with_priority(1),
        ],
        Algorithm::Priority,
    );
    assert_eq!(dispatch_order(&report), vec!["P2", "P1"]);

    let metrics = report.metrics.unwrap();
    assert_eq!(metrics.get("P2").unwrap().first_run, 0);
    assert_eq!(metrics.get("P2").unwrap().completion, 2);
    assert_eq!(metrics.get("P1").unwrap().first_run, 2);
    assert_eq!(metrics.get("P1").unwrap().completion, 5);
}

#[test]
fn occupancy_matches_burst_and_turnaround_identity_holds() {
    for specs in workloads() {
        for algorithm in Algorithm::ALL {
            let report = run(&specs, algorithm);
            let metrics = report.metrics.as_ref().unwrap();

            let mut occupancy: HashMap<&str, u64> = HashMap::new();
            for name in report.timeline.iter().flatten() {
                *occupancy.entry(name).or_default() += 1;
            }

            for spec in &specs {
                let m = metrics.get(&spec.id).unwrap();
                assert_eq!(occupancy.get(spec.id.as_str()).copied().unwrap_or(0), spec.burst);
                assert!(m.completion >= spec.arrival);
                assert!(m.first_run >= spec.arrival);
            }

            let turnaround: u64 = metrics.processes.iter().map(|p| p.turnaround).sum();
            let wait: u64 = metrics.processes.iter().map(|p| p.wait).sum();
            let burst: u64 = specs.iter().map(|s| s.burst).sum();
            assert_eq!(turnaround, wait + burst, "{algorithm}");
        }
    }
}

#[test]
fn fcfs_dispatches_by_arrival_without_preemption() {
    for specs in workloads() {
        let report = run(&specs, Algorithm::Fcfs);

        let mut expected: Vec<&ProcessSpec> = specs.iter().collect();
        expected.sort_by_key(|s| s.arrival);
        let expected: Vec<String> = expected.iter().map(|s| s.id.clone()).collect();

        assert_eq!(dispatch_order(&report), expected);
        assert!(
            !report
                .log
                .iter()
                .any(|e| matches!(e.event, SimEvent::Preempted { .. }))
        );
    }
}

#[test]
fn round_robin_preempts_exactly_at_quantum() {
    for specs in workloads() {
        let report = run(&specs, Algorithm::RoundRobin);

        // (process, consecutive units since dispatch)
        let mut current: Option<(String, u64)> = None;
        for entry in &report.log {
            match &entry.event {
                SimEvent::Dispatched { process } => {
                    assert!(current.is_none());
                    current = Some((process.clone(), 0));
                }
                SimEvent::Ran { process, remaining } => {
                    let (name, units) = current.as_mut().unwrap();
                    assert_eq!(name, process);
                    *units += 1;
                    assert!(*units <= 2);
                    assert!(*remaining > 0);
                }
                SimEvent::Completed { process, .. } => {
                    let (name, units) = current.take().unwrap();
                    assert_eq!(&name, process);
                    assert!(units < 2);
                }
                SimEvent::Preempted { process, remaining } => {
                    let (name, units) = current.take().unwrap();
                    assert_eq!(&name, process);
                    assert_eq!(units, 2);
                    assert!(*remaining > 0);
                }
                SimEvent::Admitted { .. } => {}
                SimEvent::Idle => assert!(current.is_none()),
            }
        }
    }
}

#[test]
fn priority_dispatches_most_urgent_ready_process() {
    for specs in workloads() {
        let report = run(&specs, Algorithm::Priority);
        let priority: HashMap<&str, i64> = specs
            .iter()
            .map(|s| (s.id.as_str(), s.effective_priority()))
            .collect();

        let mut dispatches = 0;
        for entry in &report.log {
            let SimEvent::Dispatched { process } = &entry.event else {
                continue;
            };
            dispatches += 1;
            let chosen = priority[process.as_str()];
            for other in &entry.ready {
                assert!(chosen <= priority[other.as_str()]);
            }
            // ready list is kept sorted by priority
            for pair in entry.ready.windows(2) {
                assert!(priority[pair[0].as_str()] <= priority[pair[1].as_str()]);
            }
        }
        assert_eq!(dispatches, specs.len());
    }
}

#[test]
fn identical_input_after_reset_is_deterministic() {
    let specs = bernoulli_workload(80, 0.4, 0.5, 1, 5, 42);
    for algorithm in Algorithm::ALL {
        let mut sim = Simulator::new(SimConfig::new(algorithm));
        let first = sim.start(&specs, Restart::Decline).unwrap().clone();
        sim.reset();
        let second = sim.start(&specs, Restart::Decline).unwrap().clone();
        assert_eq!(first, second);
    }
}

#[test]
fn log_is_ordered_and_completed_processes_never_reappear() {
    for specs in workloads() {
        for algorithm in Algorithm::ALL {
            let report = run(&specs, algorithm);
            let mut completed: Vec<String> = Vec::new();
            let mut last_tick = 0;

            for entry in &report.log {
                assert!(entry.tick >= last_tick);
                last_tick = entry.tick;

                for name in entry.ready.iter().chain(&entry.waiting).chain(&entry.running) {
                    assert!(!completed.contains(name), "{name} reappeared after completion");
                }
                if let SimEvent::Completed { process, .. } = &entry.event {
                    completed.push(process.clone());
                }
            }
            assert_eq!(completed.len(), specs.len());
        }
    }
}
