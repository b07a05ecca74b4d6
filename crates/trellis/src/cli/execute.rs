//! Command execution logic.
//!
//! This module contains the implementation of all CLI commands.

use anyhow::Result;

use super::args::{AnalyzeArgs, CyclesArgs, DetectArgs, ExportArgs};
use crate::analysis::{analyze_tasks, build_graph};
use crate::config::AnalysisConfig;
use crate::error::Error;
use crate::graph::TaskGraph;
use crate::loader::load_tasks;
use crate::output::{self, OutputMode};

/// Execute the analyze command
pub async fn execute_analyze(
    args: &AnalyzeArgs,
    mut config: AnalysisConfig,
    output_mode: OutputMode,
) -> Result<()> {
    args.apply(&mut config);
    let tasks = load_tasks(&args.file).await?;

    let report = analyze_tasks(&tasks, &config);
    output::print_report(&report, output_mode)?;

    Ok(())
}

/// Execute the detect command
pub async fn execute_detect(
    args: &DetectArgs,
    mut config: AnalysisConfig,
    output_mode: OutputMode,
) -> Result<()> {
    args.apply(&mut config);
    let tasks = load_tasks(&args.file).await?;

    let (_, detected, skipped) = build_graph(&tasks, &config);
    if skipped && output_mode == OutputMode::Text {
        println!(
            "{}",
            output::warning(
                &format!(
                    "Skipped detection: {} tasks exceeds detection.max-tasks ({})",
                    tasks.len(),
                    config.detection.max_tasks
                ),
                &output::OutputConfig::from_env()
            )
        );
    }
    output::print_detected(&detected, output_mode)?;

    Ok(())
}

/// Execute the export command
///
/// The visualization payload is always written as JSON.
pub async fn execute_export(args: &ExportArgs, mut config: AnalysisConfig) -> Result<()> {
    args.apply(&mut config);
    let tasks = load_tasks(&args.file).await?;

    let (graph, _, _) = build_graph(&tasks, &config);
    output::print_json(&graph.export_for_visualization())?;

    Ok(())
}

/// Execute the cycles command
///
/// Only explicit dependencies are considered. Returns an error after
/// printing when any cycle exists, so the process exits non-zero.
pub async fn execute_cycles(args: &CyclesArgs, output_mode: OutputMode) -> Result<()> {
    let tasks = load_tasks(&args.file).await?;

    let graph = TaskGraph::from_tasks(&tasks);
    let cycles = graph.detect_cycles();
    output::print_cycles(&cycles, output_mode)?;

    if cycles.is_empty() {
        Ok(())
    } else {
        Err(Error::CycleDetected {
            count: cycles.len(),
        }
        .into())
    }
}
