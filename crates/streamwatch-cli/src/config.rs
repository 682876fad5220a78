//! CLI configuration
//!
//! Loaded from an optional TOML file; every section falls back to its
//! defaults when absent. Command-line flags are applied on top by the
//! individual commands.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use streamwatch_detector::DetectorConfig;
use streamwatch_simulation::SimulationConfig;

use crate::error::CliResult;

/// Default directory for written files.
pub const DEFAULT_OUTPUT_DIR: &str = "streamwatch-out";

/// Where and how often results are written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving the text files.
    pub dir: PathBuf,
    /// Optional JSON snapshot file for display tools.
    pub snapshot: Option<PathBuf>,
    /// Log a progress frame (and refresh the snapshot) every N samples.
    pub frame_every: Option<u64>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            snapshot: None,
            frame_every: None,
        }
    }
}

/// Full CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub detector: DetectorConfig,
    pub simulation: SimulationConfig,
    pub output: OutputConfig,
}

impl CliConfig {
    /// Load from `path`, or defaults when no path is given.
    pub fn load(path: Option<&str>) -> CliResult<Self> {
        match path {
            Some(p) => Self::from_file(Path::new(p)),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> CliResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> CliResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn to_toml_string(&self) -> CliResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
