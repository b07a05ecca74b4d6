//! CLI argument parsing and command dispatch.
//!
//! This module provides the command-line interface for trellis using clap's derive API.
//! Each command has its own argument struct with validation and helpful error messages.
//!
//! # Commands
//!
//! - `analyze`: Full analysis of a task file
//! - `detect`: Inferred dependencies only
//! - `export`: Visualization payload as JSON
//! - `cycles`: Cycle check on explicit dependencies (non-zero exit when found)
//!
//! # Global Flags
//!
//! - `--json`: Output in JSON format (applies to all commands)
//! - `--config <PATH>`: Configuration file (defaults to `./trellis.yaml` when present)
//!
//! # Example
//!
//! ```bash
//! trellis analyze tasks.json --threshold 0.4
//! trellis --json detect tasks.jsonl
//! trellis cycles tasks.json
//! ```

mod args;
mod execute;
mod validators;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::AnalysisConfig;

// Re-export argument structs
pub use args::{AnalyzeArgs, CyclesArgs, DetectArgs, ExportArgs};

// Re-export validators for external use
pub use validators::{validate_max_tasks, validate_threshold};

/// Trellis - task dependency graph analysis
///
/// Infers implicit dependencies between tasks from their text, then reports
/// cycles, execution order, the critical path and parallel batches.
#[derive(Parser, Debug)]
#[command(name = "trellis")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output in JSON format for programmatic use
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to ./trellis.yaml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Analyze a task file
    ///
    /// Infers implicit dependencies, then reports execution order, critical
    /// path, parallel groups, orphan and leaf tasks. Cycles are reported in
    /// place of the ordering sections.
    Analyze(AnalyzeArgs),

    /// Show inferred dependencies
    ///
    /// Lists the dependencies the keyword patterns infer between tasks,
    /// with confidence and reasoning.
    Detect(DetectArgs),

    /// Export the dependency graph for visualization
    ///
    /// Writes nodes and edges as JSON regardless of `--json`.
    Export(ExportArgs),

    /// Check explicit dependencies for cycles
    ///
    /// Exits with a non-zero status when any cycle is found.
    Cycles(CyclesArgs),
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse CLI arguments from an iterator (for testing)
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Execute the CLI command
    pub async fn execute(&self) -> Result<()> {
        use crate::output::OutputMode;

        let output_mode = if self.json {
            OutputMode::Json
        } else {
            OutputMode::Text
        };

        match &self.command {
            Some(Commands::Analyze(args)) => {
                execute::execute_analyze(args, self.load_config().await?, output_mode).await
            }
            Some(Commands::Detect(args)) => {
                execute::execute_detect(args, self.load_config().await?, output_mode).await
            }
            Some(Commands::Export(args)) => {
                execute::execute_export(args, self.load_config().await?).await
            }
            Some(Commands::Cycles(args)) => execute::execute_cycles(args, output_mode).await,
            None => {
                println!("Trellis task dependency analysis");
                println!("Use --help for more information");
                Ok(())
            }
        }
    }

    /// Load `--config` if given, otherwise discover `trellis.yaml` in the
    /// working directory.
    async fn load_config(&self) -> Result<AnalysisConfig> {
        let config = match &self.config {
            Some(path) => AnalysisConfig::load(path).await?,
            None => AnalysisConfig::discover(&std::env::current_dir()?).await?,
        };
        Ok(config)
    }
}
