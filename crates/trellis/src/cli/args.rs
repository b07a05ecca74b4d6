//! CLI argument structs for all commands.
//!
//! Each command has its own argument struct with clap derive attributes
//! for parsing and validation.

use clap::Parser;
use std::path::PathBuf;

use super::validators::{validate_max_tasks, validate_threshold};
use crate::config::AnalysisConfig;

/// Arguments for the `analyze` command
#[derive(Parser, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Task file (JSON array or JSON Lines)
    pub file: PathBuf,

    /// Minimum confidence for inferred dependencies (0.0-1.0)
    #[arg(short, long, value_parser = validate_threshold)]
    pub threshold: Option<f64>,

    /// Use explicit dependencies only
    #[arg(long)]
    pub no_detect: bool,

    /// Skip implicit detection above this many tasks
    #[arg(long, value_parser = validate_max_tasks)]
    pub max_tasks: Option<usize>,
}

impl AnalyzeArgs {
    /// Apply command-line overrides on top of file configuration.
    pub fn apply(&self, config: &mut AnalysisConfig) {
        if let Some(threshold) = self.threshold {
            config.detection.threshold = threshold;
        }
        if let Some(max_tasks) = self.max_tasks {
            config.detection.max_tasks = max_tasks;
        }
        if self.no_detect {
            config.detection.enabled = false;
        }
    }
}

/// Arguments for the `detect` command
#[derive(Parser, Debug, Clone)]
pub struct DetectArgs {
    /// Task file (JSON array or JSON Lines)
    pub file: PathBuf,

    /// Minimum confidence for inferred dependencies (0.0-1.0)
    #[arg(short, long, value_parser = validate_threshold)]
    pub threshold: Option<f64>,
}

impl DetectArgs {
    /// Apply command-line overrides on top of file configuration.
    ///
    /// Detection always runs for this command, whatever the file says.
    pub fn apply(&self, config: &mut AnalysisConfig) {
        if let Some(threshold) = self.threshold {
            config.detection.threshold = threshold;
        }
        config.detection.enabled = true;
    }
}

/// Arguments for the `export` command
#[derive(Parser, Debug, Clone)]
pub struct ExportArgs {
    /// Task file (JSON array or JSON Lines)
    pub file: PathBuf,

    /// Export explicit dependencies only
    #[arg(long)]
    pub no_detect: bool,
}

impl ExportArgs {
    /// Apply command-line overrides on top of file configuration.
    pub fn apply(&self, config: &mut AnalysisConfig) {
        if self.no_detect {
            config.detection.enabled = false;
        }
    }
}

/// Arguments for the `cycles` command
#[derive(Parser, Debug, Clone)]
pub struct CyclesArgs {
    /// Task file (JSON array or JSON Lines)
    pub file: PathBuf,
}
