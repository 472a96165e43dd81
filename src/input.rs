//! Tabular workload ingestion.
//!
//! Columns are positional: `index, arrival, burst, io_duration, io_period, priority`.
//! The first line is a header. The I/O columns are reserved and ignored.
//! Malformed numbers never abort a load: time fields fall back to 0 and the
//! priority falls back to lowest precedence.

use log::{debug, warn};
use std::{fs, path::Path};

use crate::core::{Priority, Ticks};
use crate::error::InputError;
use crate::sim::ProcessSpec;

const COL_INDEX: usize = 0;
const COL_ARRIVAL: usize = 1;
const COL_BURST: usize = 2;
const COL_PRIORITY: usize = 5;

pub fn load_workload(path: impl AsRef<Path>) -> Result<Vec<ProcessSpec>, InputError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    debug!("read {} bytes from {}", text.len(), path.display());
    parse_workload(&text)
}

pub fn parse_workload(text: &str) -> Result<Vec<ProcessSpec>, InputError> {
    let specs: Vec<ProcessSpec> = text
        .lines()
        .enumerate()
        .skip(1)
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(line_no, line)| parse_row(line_no, line))
        .collect();

    if specs.is_empty() {
        return Err(InputError::NoRows);
    }
    Ok(specs)
}

fn parse_row(line_no: usize, line: &str) -> ProcessSpec {
    let cols: Vec<&str> = line.split(',').map(str::trim).collect();
    let col = |i: usize| cols.get(i).copied().unwrap_or("");

    let id = match col(COL_INDEX) {
        "" => format!("P{line_no}"),
        index => format!("P{index}"),
    };
    let arrival = parse_ticks(&id, "arrival", col(COL_ARRIVAL));
    let burst = parse_ticks(&id, "burst", col(COL_BURST));
    let priority = parse_priority(&id, col(COL_PRIORITY));

    ProcessSpec::new(id, arrival, burst).with_priority_opt(priority)
}

fn parse_ticks(id: &str, field: &str, raw: &str) -> Ticks {
    raw.parse().unwrap_or_else(|_| {
        warn!("{id}: unparsable {field} {raw:?}, using 0");
        0
    })
}

fn parse_priority(id: &str, raw: &str) -> Option<Priority> {
    if raw.is_empty() {
        return None;
    }
    match raw.parse() {
        Ok(priority) => Some(priority),
        Err(_) => {
            warn!("{id}: unparsable priority {raw:?}, using lowest precedence");
            None
        }
    }
}
