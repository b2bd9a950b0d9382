//! Configuration settings for the chain puzzle solver

use crate::sat::SolverOptions;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub puzzle: PuzzleConfig,
    pub solver: SolverConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PuzzleConfig {
    /// Highest pip value; the piece set is every distinct pair
    /// `0..=piece_size`.
    pub piece_size: u8,
    pub region_file: PathBuf,
}

/// Explicit per-solve engine configuration. There is no global mutable
/// solver state anywhere; this struct travels into the solve call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    pub time_budget_seconds: u64,
    pub worker_hint: usize,
}

impl SolverConfig {
    pub fn options(&self) -> SolverOptions {
        SolverOptions {
            time_budget: Duration::from_secs(self.time_budget_seconds),
            worker_hint: self.worker_hint,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub save_solutions: bool,
    pub output_directory: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Text,
    Json,
    Visual,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            puzzle: PuzzleConfig {
                piece_size: 6,
                region_file: PathBuf::from("input/regions/open_7x8.txt"),
            },
            solver: SolverConfig {
                time_budget_seconds: 300,
                worker_hint: 1,
            },
            output: OutputConfig {
                format: OutputFormat::Text,
                save_solutions: false,
                output_directory: PathBuf::from("output/solutions"),
            },
        }
    }
}

impl Settings {
    /// Load settings from a YAML file.
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a YAML file.
    pub fn to_file(&self, path: &PathBuf) -> Result<()> {
        let content = serde_yaml::to_string(self).context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings.
    pub fn validate(&self) -> Result<()> {
        if self.solver.time_budget_seconds == 0 {
            anyhow::bail!("Solver time budget must be positive");
        }

        if self.solver.worker_hint == 0 {
            anyhow::bail!("Worker hint must be at least 1");
        }

        if !self.puzzle.region_file.exists() {
            anyhow::bail!(
                "Region file does not exist: {}",
                self.puzzle.region_file.display()
            );
        }

        Ok(())
    }

    /// Merge settings with command line overrides.
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(piece_size) = cli_overrides.piece_size {
            self.puzzle.piece_size = piece_size;
        }
        if let Some(ref region_file) = cli_overrides.region_file {
            self.puzzle.region_file = region_file.clone();
        }
        if let Some(time_budget) = cli_overrides.time_budget_seconds {
            self.solver.time_budget_seconds = time_budget;
        }
        if let Some(ref output_dir) = cli_overrides.output_dir {
            self.output.output_directory = output_dir.clone();
        }
    }
}

/// Command line overrides for settings.
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub piece_size: Option<u8>,
    pub region_file: Option<PathBuf>,
    pub time_budget_seconds: Option<u64>,
    pub output_dir: Option<PathBuf>,
}
