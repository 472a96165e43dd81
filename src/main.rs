use anyhow::{Context, Result, bail};
use clap::Parser;
use cpusim::{
    Algorithm, Restart, RunReport, SimConfig, Simulator, Snapshot, input::load_workload,
    sim::bernoulli_workload,
};
use log::{info, warn};
use std::{path::PathBuf, time::Duration};

/// Discrete-time CPU scheduling simulator.
///
/// Reads a CSV workload (index, arrival, burst, io_duration, io_period,
/// priority; first line is a header) or generates a random one, runs it under
/// the chosen policy and prints the event log and metrics.
#[derive(Debug, Parser)]
struct Opts {
    /// CSV workload file.
    workload: Option<PathBuf>,

    /// Scheduling policy: fcfs, rr or priority.
    #[clap(short = 'a', long, default_value = "fcfs")]
    algorithm: Algorithm,

    /// Pause between ticks in milliseconds, for following a run live.
    #[clap(short = 'd', long, default_value = "0")]
    delay_ms: u64,

    /// Generate a random workload over this many ticks instead of reading a file.
    #[clap(short = 'r', long, conflicts_with = "workload")]
    random: Option<u64>,

    /// Seed for --random.
    #[clap(short = 's', long, default_value = "0")]
    seed: u64,

    /// Print per-tick queue state while the simulation runs.
    #[clap(long)]
    live: bool,

    /// Emit the run report as JSON.
    #[clap(long)]
    json: bool,

    /// Enable verbose output. Specify multiple times to increase verbosity.
    #[clap(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let opts = Opts::parse();

    let llv = match opts.verbose {
        0 => simplelog::LevelFilter::Info,
        1 => simplelog::LevelFilter::Debug,
        _ => simplelog::LevelFilter::Trace,
    };
    let mut lcfg = simplelog::ConfigBuilder::new();
    lcfg.set_time_level(simplelog::LevelFilter::Error)
        .set_location_level(simplelog::LevelFilter::Off)
        .set_target_level(simplelog::LevelFilter::Off)
        .set_thread_level(simplelog::LevelFilter::Off);
    simplelog::TermLogger::init(
        llv,
        lcfg.build(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )?;

    let specs = match (&opts.workload, opts.random) {
        (Some(path), _) => load_workload(path)
            .with_context(|| format!("Failed to load workload {}", path.display()))?,
        (None, Some(ticks)) => bernoulli_workload(ticks, 0.3, 0.3, 2, 6, opts.seed),
        (None, None) => bail!("No workload: pass a CSV file or --random <TICKS>"),
    };
    info!("loaded {} processes", specs.len());

    let config =
        SimConfig::new(opts.algorithm).with_tick_delay(Duration::from_millis(opts.delay_ms));
    let mut sim = Simulator::new(config);

    let stop = sim.stop_handle();
    ctrlc::set_handler(move || {
        stop.stop();
    })
    .context("Error setting Ctrl-C handler")?;

    if opts.live {
        sim.subscribe(print_snapshot);
    }

    let report = sim
        .start(&specs, Restart::Decline)
        .context("Simulation failed")?;

    if opts.json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print_report(report);
    }

    Ok(())
}

fn print_snapshot(snapshot: &Snapshot) {
    let running = snapshot
        .running
        .as_ref()
        .map(|r| format!("{}({})", r.process, r.remaining))
        .unwrap_or_else(|| "idle".to_string());
    eprintln!(
        "t={:<4} running={:<10} ready=[{}] waiting=[{}]",
        snapshot.tick,
        running,
        snapshot.ready.join(", "),
        snapshot.waiting.join(", ")
    );
}

fn print_report(report: &RunReport) {
    println!("{} simulation log", report.algorithm);
    println!(
        "{:>5}  {:<55} {:<8} {:<20} {}",
        "time", "event", "running", "ready", "waiting"
    );
    for entry in &report.log {
        println!(
            "{:>5}  {:<55} {:<8} {:<20} {}",
            entry.tick,
            entry.event_text(),
            entry.running.as_deref().unwrap_or("-"),
            dash_if_empty(&entry.ready),
            dash_if_empty(&entry.waiting),
        );
    }

    let gantt: Vec<&str> = report
        .timeline
        .iter()
        .map(|slot| slot.as_deref().unwrap_or("."))
        .collect();
    println!("\ntimeline: {}", gantt.join(" "));

    let Some(metrics) = &report.metrics else {
        warn!("run was stopped early; metrics are not available for a partial run");
        return;
    };

    println!(
        "\n{:<8} {:>8} {:>6} {:>10} {:>11} {:>11} {:>5} {:>9}",
        "process", "arrival", "burst", "first run", "completion", "turnaround", "wait", "response"
    );
    for p in &metrics.processes {
        println!(
            "{:<8} {:>8} {:>6} {:>10} {:>11} {:>11} {:>5} {:>9}",
            p.process, p.arrival, p.burst, p.first_run, p.completion, p.turnaround, p.wait, p.response
        );
    }

    println!("\nAverage wait time: {:.2} ticks", metrics.avg_wait);
    println!("Average response time: {:.2} ticks", metrics.avg_response);
    println!("Average turnaround time: {:.2} ticks", metrics.avg_turnaround);
}

fn dash_if_empty(ids: &[String]) -> String {
    if ids.is_empty() {
        "-".to_string()
    } else {
        ids.join(", ")
    }
}
