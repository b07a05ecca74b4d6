//! Implicit dependency detection over task pairs.

use super::keywords::extract_keywords;
use super::patterns::PatternMatcher;
use crate::domain::{DependencyEdge, DependencyMeta, DetectedDependency, Task};
use crate::graph::TaskGraph;
use std::collections::HashSet;

/// Minimum confidence for an inferred dependency unless configured otherwise.
pub const DEFAULT_DETECTION_THRESHOLD: f64 = 0.5;

/// Infers likely prerequisite relationships from task text.
///
/// Every ordered pair `(a, b)` with `a != b` is evaluated, so the sweep is
/// O(n²) in the number of tasks and dominates analysis cost for large task
/// sets. Callers should bound the task count before detecting (see
/// [`DetectionConfig::max_tasks`]).
///
/// Both orientations of a pair are checked independently. If each task's
/// keywords satisfy the other's pattern, edges are added in both directions
/// and the graph becomes cyclic; cycle detection reports it like any other.
///
/// [`DetectionConfig::max_tasks`]: crate::config::DetectionConfig::max_tasks
#[derive(Debug, Clone, Copy, Default)]
pub struct ImplicitDependencyDetector {
    matcher: PatternMatcher,
}

impl ImplicitDependencyDetector {
    /// Create a detector using the given pattern matcher.
    pub fn new(matcher: PatternMatcher) -> Self {
        Self { matcher }
    }

    /// Detect implicit dependencies among `tasks` and register them on `graph`.
    ///
    /// Pairs already joined by an explicit edge (in either direction) are
    /// skipped. A dependency `a -> b` is emitted when `b`'s pattern finds
    /// prerequisite keywords in `a` with confidence at least `threshold`.
    ///
    /// Returns the dependencies found by this call, in pair order. The graph's
    /// detection log also receives them; running detection twice over the
    /// same tasks logs every inferred edge twice.
    pub fn detect(
        &self,
        graph: &mut TaskGraph,
        tasks: &[Task],
        threshold: f64,
    ) -> Vec<DetectedDependency> {
        let keywords: Vec<HashSet<String>> = tasks
            .iter()
            .map(|task| extract_keywords(&task.searchable_text()))
            .collect();

        let mut detected = Vec::new();

        for (i, task_a) in tasks.iter().enumerate() {
            for (j, task_b) in tasks.iter().enumerate() {
                if i == j || graph.has_explicit_edge_between(&task_a.id, &task_b.id) {
                    continue;
                }

                let likelihood = self.matcher.check_dependency(&keywords[i], &keywords[j]);
                if !likelihood.likely || likelihood.confidence < threshold {
                    continue;
                }

                tracing::debug!(
                    from = %task_a.id,
                    to = %task_b.id,
                    confidence = likelihood.confidence,
                    "Inferred implicit dependency"
                );

                let meta = DependencyMeta::implicit(likelihood.confidence, likelihood.reason);
                graph.add_dependency(&task_a.id, &task_b.id, meta.clone());
                detected.push(DependencyEdge::from_meta(
                    task_a.id.clone(),
                    task_b.id.clone(),
                    meta,
                ));
            }
        }

        tracing::info!(
            tasks = tasks.len(),
            detected = detected.len(),
            threshold,
            "Implicit dependency detection complete"
        );

        detected
    }
}
