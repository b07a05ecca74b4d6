//! Domain types for dependency analysis.
//!
//! This module contains the task records the engine consumes and the result
//! records it produces. Serialized field names follow the camelCase contract
//! of the calling service (`targetTaskId`, `executionOrder`, ...).

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowest valid task complexity.
pub const MIN_COMPLEXITY: u8 = 1;

/// Highest valid task complexity.
pub const MAX_COMPLEXITY: u8 = 10;

/// Weight used for nodes whose complexity is unknown (placeholder nodes).
pub const DEFAULT_NODE_WEIGHT: u32 = 1;

/// Unique identifier for a task
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl TaskId {
    /// Create a new task ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

fn default_complexity() -> u8 {
    MIN_COMPLEXITY
}

/// A unit of work with descriptive text and a complexity weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier for the task
    pub id: TaskId,

    /// Task title
    pub title: String,

    /// Task description
    #[serde(default)]
    pub description: String,

    /// Complexity (1-10), used as the node weight for critical path analysis
    #[serde(default = "default_complexity")]
    pub complexity: u8,

    /// Explicitly declared prerequisites
    #[serde(default)]
    pub dependencies: Vec<DependencyDeclaration>,
}

impl Task {
    /// Create a task with an empty description and no declared dependencies.
    pub fn new(id: impl Into<TaskId>, title: impl Into<String>, complexity: u8) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            complexity,
            dependencies: Vec::new(),
        }
    }

    /// Set the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Declare an explicit prerequisite.
    #[must_use]
    pub fn with_dependency(mut self, dependency: DependencyDeclaration) -> Self {
        self.dependencies.push(dependency);
        self
    }

    /// Text used for keyword extraction (title followed by description).
    pub fn searchable_text(&self) -> String {
        format!("{} {}", self.title, self.description)
    }

    /// Validate the task against the input contract.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidTask` if the id or title is blank, or the
    /// complexity is outside `MIN_COMPLEXITY..=MAX_COMPLEXITY`.
    pub fn validate(&self) -> Result<()> {
        if self.id.as_str().trim().is_empty() {
            return Err(Error::InvalidTask("task id cannot be empty".to_string()));
        }

        if self.title.trim().is_empty() {
            return Err(Error::InvalidTask(format!(
                "task '{}' has an empty title",
                self.id
            )));
        }

        if !(MIN_COMPLEXITY..=MAX_COMPLEXITY).contains(&self.complexity) {
            return Err(Error::InvalidTask(format!(
                "task '{}' has complexity {} (expected {}-{})",
                self.id, self.complexity, MIN_COMPLEXITY, MAX_COMPLEXITY
            )));
        }

        Ok(())
    }
}

/// An explicit prerequisite declared on a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyDeclaration {
    /// ID of the task this one depends on
    pub target_task_id: TaskId,

    /// Type of dependency
    #[serde(rename = "type")]
    pub dep_type: DependencyType,

    /// Optional free-text note about the relationship
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl DependencyDeclaration {
    /// Create a declaration without a description.
    pub fn new(target: impl Into<TaskId>, dep_type: DependencyType) -> Self {
        Self {
            target_task_id: target.into(),
            dep_type,
            description: None,
        }
    }
}

/// Type of dependency relationship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyType {
    /// Prerequisite blocks the dependent
    Blocks,

    /// Dependent requires the prerequisite
    DependsOn,

    /// Informational link
    RelatedTo,
}

impl fmt::Display for DependencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DependencyType::Blocks => "blocks",
            DependencyType::DependsOn => "depends_on",
            DependencyType::RelatedTo => "related_to",
        };
        write!(f, "{s}")
    }
}

/// Metadata attached to a graph edge.
#[derive(Debug, Clone, PartialEq)]
pub struct DependencyMeta {
    /// Type of dependency
    pub dep_type: DependencyType,

    /// Confidence in the relationship (0.0-1.0)
    pub confidence: f64,

    /// Why the edge exists
    pub reasoning: String,

    /// Whether the edge was inferred rather than declared
    pub is_implicit: bool,
}

impl DependencyMeta {
    /// Metadata for a user-declared edge (confidence 1.0).
    pub fn explicit(dep_type: DependencyType, reasoning: impl Into<String>) -> Self {
        Self {
            dep_type,
            confidence: 1.0,
            reasoning: reasoning.into(),
            is_implicit: false,
        }
    }

    /// Metadata for an inferred `depends_on` edge.
    pub fn implicit(confidence: f64, reasoning: impl Into<String>) -> Self {
        Self {
            dep_type: DependencyType::DependsOn,
            confidence,
            reasoning: reasoning.into(),
            is_implicit: true,
        }
    }
}

/// A directed dependency edge: prerequisite (`from`) -> dependent (`to`).
///
/// This is also the record the implicit detector reports for each
/// dependency it infers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyEdge {
    /// Prerequisite task
    pub from_task_id: TaskId,

    /// Dependent task
    pub to_task_id: TaskId,

    /// Type of dependency
    #[serde(rename = "type")]
    pub dep_type: DependencyType,

    /// Confidence in the relationship (0.0-1.0)
    pub confidence: f64,

    /// Why the edge exists
    pub reasoning: String,

    /// Whether the edge was inferred rather than declared
    pub is_implicit: bool,
}

impl DependencyEdge {
    /// Combine endpoints with edge metadata.
    pub fn from_meta(from: TaskId, to: TaskId, meta: DependencyMeta) -> Self {
        Self {
            from_task_id: from,
            to_task_id: to,
            dep_type: meta.dep_type,
            confidence: meta.confidence,
            reasoning: meta.reasoning,
            is_implicit: meta.is_implicit,
        }
    }
}

/// An implicit dependency discovered by keyword inference.
pub type DetectedDependency = DependencyEdge;

/// Result of a full graph analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphAnalysisResult {
    /// Topological order (empty when cycles exist)
    pub execution_order: Vec<TaskId>,

    /// Longest weighted path (empty when cycles exist)
    pub critical_path: Vec<TaskId>,

    /// Batches of tasks that can run concurrently (empty when cycles exist)
    pub parallel_groups: Vec<Vec<TaskId>>,

    /// Every cycle found in the graph
    pub cycles: Vec<Vec<TaskId>>,

    /// Tasks without prerequisites
    pub orphan_tasks: Vec<TaskId>,

    /// Tasks nothing depends on
    pub leaf_tasks: Vec<TaskId>,
}

impl GraphAnalysisResult {
    /// Whether the analyzed graph contained at least one cycle.
    pub fn has_cycles(&self) -> bool {
        !self.cycles.is_empty()
    }
}

/// Flat graph materialization for external rendering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisualizationPayload {
    /// Graph nodes in insertion order
    pub nodes: Vec<VisualNode>,

    /// Graph edges
    pub edges: Vec<VisualEdge>,
}

/// A node in the visualization payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualNode {
    /// Task ID
    pub id: TaskId,

    /// Display label (the task title; empty for placeholder nodes)
    pub label: String,

    /// Task complexity (absent for placeholder nodes)
    pub complexity: Option<u8>,
}

/// An edge in the visualization payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualEdge {
    /// Prerequisite task
    pub from: TaskId,

    /// Dependent task
    pub to: TaskId,

    /// Type of dependency
    #[serde(rename = "type")]
    pub dep_type: DependencyType,

    /// Confidence in the relationship
    pub confidence: f64,
}
