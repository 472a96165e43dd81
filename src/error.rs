use thiserror::Error;

/// Errors surfaced by the simulation engine and its control surface.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("No processes to simulate")]
    EmptyWorkload,
    #[error("Duplicate process id: {0}")]
    DuplicateProcess(String),
    #[error("A simulation has already run; confirm a restart to discard it")]
    RunAlreadyActive,
    #[error("Process {0} has not completed; metrics are only defined for finished runs")]
    Incomplete(String),
    #[error("Unknown scheduling algorithm: {0}")]
    UnknownAlgorithm(String),
}

/// Errors while ingesting a tabular workload.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("Failed to read workload: {0}")]
    Io(#[from] std::io::Error),
    #[error("Workload has no process rows")]
    NoRows,
}
