//! CLI error types

use streamwatch_detector::DetectorError;
use streamwatch_io::IoError;
use streamwatch_simulation::SimulationError;
use thiserror::Error;

/// CLI error type
#[derive(Error, Debug)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config file error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config render error: {0}")]
    ConfigRender(#[from] toml::ser::Error),

    #[error("Detector error: {0}")]
    Detector(#[from] DetectorError),

    #[error("Simulation error: {0}")]
    Simulation(#[from] SimulationError),

    #[error("Output error: {0}")]
    Output(#[from] IoError),

    #[error("Background task failed: {0}")]
    Task(String),
}

impl From<tokio::task::JoinError> for CliError {
    fn from(e: tokio::task::JoinError) -> Self {
        CliError::Task(e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
