//! End-to-end analysis of a task snapshot.
//!
//! [`analyze_tasks`] runs the usual sequence for one request: build a fresh
//! [`TaskGraph`], optionally infer implicit dependencies, analyze the graph
//! and export it for rendering. The graph is dropped afterwards.

use crate::config::AnalysisConfig;
use crate::domain::{DetectedDependency, GraphAnalysisResult, Task, VisualizationPayload};
use crate::graph::TaskGraph;
use crate::inference::ImplicitDependencyDetector;
use serde::{Deserialize, Serialize};

/// Everything produced by one analysis request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// Graph analysis results
    pub analysis: GraphAnalysisResult,

    /// Implicit dependencies inferred for this request
    pub detected: Vec<DetectedDependency>,

    /// Flat graph for rendering
    pub visualization: VisualizationPayload,

    /// Number of graph nodes, placeholders included
    pub task_count: usize,

    /// Total weight of the critical path
    pub critical_path_weight: u32,

    /// Whether detection was enabled but skipped because of the task cap
    pub detection_skipped: bool,
}

impl AnalysisReport {
    /// Number of tasks that landed in a parallel group.
    ///
    /// Lower than `task_count` only when the graph is cyclic.
    pub fn grouped_task_count(&self) -> usize {
        self.analysis.parallel_groups.iter().map(Vec::len).sum()
    }
}

/// Build the graph for `tasks`, run detection per `config` and analyze it.
pub fn analyze_tasks(tasks: &[Task], config: &AnalysisConfig) -> AnalysisReport {
    let (graph, detected, detection_skipped) = build_graph(tasks, config);

    let analysis = graph.analyze();
    let critical_path_weight = graph.get_critical_path_weight();

    tracing::info!(
        tasks = graph.task_count(),
        edges = graph.edge_count(),
        cycles = analysis.cycles.len(),
        critical_path_weight,
        "Analysis complete"
    );

    AnalysisReport {
        analysis,
        detected,
        visualization: graph.export_for_visualization(),
        task_count: graph.task_count(),
        critical_path_weight,
        detection_skipped,
    }
}

/// Build the graph for `tasks` and run detection per `config`.
///
/// Returns the graph, the inferred dependencies, and whether detection was
/// skipped because the snapshot exceeded `detection.max-tasks`.
pub fn build_graph(
    tasks: &[Task],
    config: &AnalysisConfig,
) -> (TaskGraph, Vec<DetectedDependency>, bool) {
    let mut graph = TaskGraph::from_tasks(tasks);
    let detection = &config.detection;

    if !detection.enabled {
        return (graph, Vec::new(), false);
    }

    if tasks.len() > detection.max_tasks {
        tracing::warn!(
            tasks = tasks.len(),
            max_tasks = detection.max_tasks,
            "Too many tasks for implicit detection; using explicit dependencies only"
        );
        return (graph, Vec::new(), true);
    }

    let detected =
        ImplicitDependencyDetector::default().detect(&mut graph, tasks, detection.threshold);
    (graph, detected, false)
}
