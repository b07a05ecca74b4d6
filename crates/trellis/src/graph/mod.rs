//! Task dependency graph and its analysis algorithms.
//!
//! # Graph Representation and Edge Direction Convention
//!
//! Edges point from **prerequisite -> dependent**: if T2 depends on T1 the
//! edge is `T1 -> T2`, so a topological order lists prerequisites first.
//!
//! Nodes live in a `Vec` in insertion order and are addressed by index.
//! `node_map` resolves task IDs to indices, and each node owns a forward
//! (`successors`) and backward (`predecessors`) adjacency set for O(1)
//! neighbour lookup in both directions. Edge metadata is keyed by the
//! `(from, to)` index pair; at most one edge exists per ordered pair.
//!
//! # Placeholder Nodes
//!
//! Adding an edge to an ID that was never registered with
//! [`TaskGraph::add_task`] creates an empty placeholder node (empty title,
//! unknown complexity, weight 1). Registering the task later fills it in.
//!
//! # Calling Convention
//!
//! **Check [`TaskGraph::detect_cycles`] or call [`TaskGraph::analyze`]
//! before trusting any individual algorithm on untrusted input.** Only
//! [`TaskGraph::get_execution_order`] fails on a cyclic graph. On the same
//! input [`TaskGraph::get_critical_path`] silently returns an empty path and
//! [`TaskGraph::get_parallel_groups`] returns a truncated layering that
//! covers fewer nodes than the graph holds.
//!
//! # Ordering
//!
//! All results are deterministic: nodes are visited in insertion order,
//! neighbours in the insertion order of their endpoints.
//!
//! # Thread Safety
//!
//! `TaskGraph` has no internal synchronization. It is built per analysis
//! request and discarded afterwards; share it across threads only behind an
//! external lock. Mutating the graph after analysis invalidates previously
//! returned results, and nothing is cached between calls.

mod algorithms;
mod export;

use crate::domain::{
    DEFAULT_NODE_WEIGHT, DependencyEdge, DependencyMeta, DetectedDependency, GraphAnalysisResult,
    Task, TaskId,
};
use std::collections::{BTreeSet, HashMap};

/// Position of a node in insertion order.
pub(crate) type NodeIndex = usize;

/// Node attributes kept for each task in the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskNode {
    /// Task ID
    pub id: TaskId,

    /// Task title (empty for placeholder nodes)
    pub title: String,

    /// Task complexity (`None` for placeholder nodes)
    pub complexity: Option<u8>,
}

impl TaskNode {
    fn placeholder(id: TaskId) -> Self {
        Self {
            id,
            title: String::new(),
            complexity: None,
        }
    }

    /// Weight used by critical path analysis.
    pub fn weight(&self) -> u32 {
        self.complexity.map_or(DEFAULT_NODE_WEIGHT, u32::from)
    }

    /// Whether this node was created implicitly by an edge endpoint.
    pub fn is_placeholder(&self) -> bool {
        self.complexity.is_none()
    }
}

/// Directed graph of tasks and their dependencies.
///
/// See the [module documentation](self) for edge direction, placeholder
/// nodes and the required calling convention.
#[derive(Debug, Clone, Default)]
pub struct TaskGraph {
    /// Node attributes in insertion order
    nodes: Vec<TaskNode>,

    /// Mapping from TaskId to node index.
    ///
    /// Every node in `self.nodes` has exactly one entry here.
    node_map: HashMap<TaskId, NodeIndex>,

    /// Forward adjacency: prerequisite -> dependents
    successors: Vec<BTreeSet<NodeIndex>>,

    /// Backward adjacency: dependent -> prerequisites
    predecessors: Vec<BTreeSet<NodeIndex>>,

    /// Edge metadata keyed by (from, to)
    edges: HashMap<(NodeIndex, NodeIndex), DependencyMeta>,

    /// Append-only log of implicit edges registered on this graph
    detected: Vec<DetectedDependency>,
}

impl TaskGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from a task snapshot, registering every task in order.
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let mut graph = Self::new();
        for task in tasks {
            graph.add_task(task);
        }
        graph
    }

    /// Register a task and its explicit dependencies.
    ///
    /// Each declaration adds an edge from the declared target to this task
    /// with confidence 1.0. Re-adding an existing ID (or a placeholder)
    /// updates its title and complexity in place.
    pub fn add_task(&mut self, task: &Task) {
        let index = self.ensure_node(&task.id);
        let node = &mut self.nodes[index];
        node.title.clone_from(&task.title);
        node.complexity = Some(task.complexity);

        for declaration in &task.dependencies {
            let reasoning = declaration
                .description
                .clone()
                .unwrap_or_else(|| format!("Explicit {} dependency", declaration.dep_type));
            self.add_dependency(
                &declaration.target_task_id,
                &task.id,
                DependencyMeta::explicit(declaration.dep_type, reasoning),
            );
        }
    }

    /// Insert or overwrite the edge `from -> to`.
    ///
    /// Missing endpoints become placeholder nodes. Implicit edges are also
    /// appended to the detection log, which is never deduplicated.
    pub fn add_dependency(&mut self, from: &TaskId, to: &TaskId, meta: DependencyMeta) {
        let from_index = self.ensure_node(from);
        let to_index = self.ensure_node(to);

        if meta.is_implicit {
            self.detected.push(DependencyEdge::from_meta(
                from.clone(),
                to.clone(),
                meta.clone(),
            ));
        }

        self.successors[from_index].insert(to_index);
        self.predecessors[to_index].insert(from_index);
        self.edges.insert((from_index, to_index), meta);
    }

    /// Number of nodes, placeholders included.
    pub fn task_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of distinct edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Whether a node with this ID exists.
    pub fn contains_task(&self, id: &TaskId) -> bool {
        self.node_map.contains_key(id)
    }

    /// Node attributes for a task.
    pub fn task(&self, id: &TaskId) -> Option<&TaskNode> {
        self.node_map.get(id).map(|&index| &self.nodes[index])
    }

    /// All nodes in insertion order.
    pub fn tasks(&self) -> impl Iterator<Item = &TaskNode> {
        self.nodes.iter()
    }

    /// Metadata of the edge `from -> to`, if present.
    pub fn dependency(&self, from: &TaskId, to: &TaskId) -> Option<&DependencyMeta> {
        let from_index = self.node_map.get(from)?;
        let to_index = self.node_map.get(to)?;
        self.edges.get(&(*from_index, *to_index))
    }

    /// Whether an explicit edge joins the two tasks in either direction.
    pub fn has_explicit_edge_between(&self, a: &TaskId, b: &TaskId) -> bool {
        let is_explicit = |meta: Option<&DependencyMeta>| meta.is_some_and(|m| !m.is_implicit);
        is_explicit(self.dependency(a, b)) || is_explicit(self.dependency(b, a))
    }

    /// Implicit edges registered so far, in registration order.
    pub fn detected_dependencies(&self) -> &[DetectedDependency] {
        &self.detected
    }

    /// Direct prerequisites of a task (empty for unknown IDs).
    pub fn predecessors(&self, id: &TaskId) -> Vec<TaskId> {
        self.node_map
            .get(id)
            .map(|&index| self.ids(self.predecessors[index].iter().copied()))
            .unwrap_or_default()
    }

    /// Direct dependents of a task (empty for unknown IDs).
    pub fn successors(&self, id: &TaskId) -> Vec<TaskId> {
        self.node_map
            .get(id)
            .map(|&index| self.ids(self.successors[index].iter().copied()))
            .unwrap_or_default()
    }

    /// Tasks with no prerequisites (entry points).
    pub fn get_orphan_tasks(&self) -> Vec<TaskId> {
        self.ids((0..self.nodes.len()).filter(|&i| self.predecessors[i].is_empty()))
    }

    /// Tasks nothing depends on (exit points).
    pub fn get_leaf_tasks(&self) -> Vec<TaskId> {
        self.ids((0..self.nodes.len()).filter(|&i| self.successors[i].is_empty()))
    }

    /// Run every analysis over the current graph.
    ///
    /// Cycles are detected first. When any exist, `execution_order`,
    /// `critical_path` and `parallel_groups` are empty, while `cycles`,
    /// `orphan_tasks` and `leaf_tasks` are still populated since they only
    /// depend on local degree.
    pub fn analyze(&self) -> GraphAnalysisResult {
        let cycles = self.detect_cycles();
        let orphan_tasks = self.get_orphan_tasks();
        let leaf_tasks = self.get_leaf_tasks();

        if !cycles.is_empty() {
            tracing::warn!(
                cycles = cycles.len(),
                tasks = self.task_count(),
                "Dependency graph is cyclic; skipping ordering analyses"
            );
            return GraphAnalysisResult {
                cycles,
                orphan_tasks,
                leaf_tasks,
                ..GraphAnalysisResult::default()
            };
        }

        GraphAnalysisResult {
            execution_order: self.get_execution_order().unwrap_or_default(),
            critical_path: self.get_critical_path(),
            parallel_groups: self.get_parallel_groups(),
            cycles,
            orphan_tasks,
            leaf_tasks,
        }
    }

    /// Look up or create the node for `id`.
    fn ensure_node(&mut self, id: &TaskId) -> NodeIndex {
        if let Some(&index) = self.node_map.get(id) {
            return index;
        }

        let index = self.nodes.len();
        self.nodes.push(TaskNode::placeholder(id.clone()));
        self.successors.push(BTreeSet::new());
        self.predecessors.push(BTreeSet::new());
        self.node_map.insert(id.clone(), index);
        index
    }

    /// Map node indices to task IDs.
    fn ids(&self, indices: impl IntoIterator<Item = NodeIndex>) -> Vec<TaskId> {
        indices
            .into_iter()
            .map(|index| self.nodes[index].id.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DependencyDeclaration, DependencyType};

    fn id(s: &str) -> TaskId {
        TaskId::new(s)
    }

    fn ids(values: &[&str]) -> Vec<TaskId> {
        values.iter().map(|s| id(s)).collect()
    }

    #[test]
    fn test_add_task_registers_explicit_edge_from_target() {
        let mut graph = TaskGraph::new();
        graph.add_task(&Task::new("T1", "Setup infrastructure", 2));
        graph.add_task(
            &Task::new("T2", "Create database schema", 3)
                .with_dependency(DependencyDeclaration::new("T1", DependencyType::DependsOn)),
        );

        let edge = graph.dependency(&id("T1"), &id("T2")).unwrap();
        assert!((edge.confidence - 1.0).abs() < f64::EPSILON);
        assert!(!edge.is_implicit);
        assert_eq!(edge.dep_type, DependencyType::DependsOn);
        assert!(graph.dependency(&id("T2"), &id("T1")).is_none());
        assert!(graph.detected_dependencies().is_empty());
    }

    #[test]
    fn test_declaration_description_becomes_reasoning() {
        let mut declaration = DependencyDeclaration::new("T1", DependencyType::Blocks);
        declaration.description = Some("needs the cluster".to_string());

        let mut graph = TaskGraph::new();
        graph.add_task(&Task::new("T2", "Deploy", 2).with_dependency(declaration));

        let edge = graph.dependency(&id("T1"), &id("T2")).unwrap();
        assert_eq!(edge.reasoning, "needs the cluster");
    }

    #[test]
    fn test_unknown_endpoint_creates_placeholder() {
        let mut graph = TaskGraph::new();
        graph.add_task(
            &Task::new("T2", "Create database schema", 3)
                .with_dependency(DependencyDeclaration::new("T9", DependencyType::DependsOn)),
        );

        assert_eq!(graph.task_count(), 2);
        assert!(graph.contains_task(&id("T2")));
        assert!(graph.contains_task(&id("T9")));
        assert!(!graph.contains_task(&id("T3")));
        let placeholder = graph.task(&id("T9")).unwrap();
        assert!(placeholder.is_placeholder());
        assert_eq!(placeholder.title, "");
        assert_eq!(placeholder.weight(), DEFAULT_NODE_WEIGHT);
    }

    #[test]
    fn test_registering_placeholder_fills_attributes() {
        let mut graph = TaskGraph::new();
        graph.add_dependency(
            &id("A"),
            &id("B"),
            DependencyMeta::explicit(DependencyType::Blocks, "manual"),
        );
        graph.add_task(&Task::new("A", "Setup", 7));

        let node = graph.task(&id("A")).unwrap();
        assert_eq!(node.title, "Setup");
        assert_eq!(node.weight(), 7);
        assert_eq!(graph.task_count(), 2);
        // Node order is unchanged by re-registration
        let order: Vec<&str> = graph.tasks().map(|n| n.id.as_str()).collect();
        assert_eq!(order, vec!["A", "B"]);
    }

    #[test]
    fn test_add_dependency_overwrites_metadata() {
        let mut graph = TaskGraph::new();
        graph.add_dependency(&id("A"), &id("B"), DependencyMeta::implicit(0.6, "first"));
        graph.add_dependency(
            &id("A"),
            &id("B"),
            DependencyMeta::explicit(DependencyType::Blocks, "second"),
        );

        assert_eq!(graph.edge_count(), 1);
        let edge = graph.dependency(&id("A"), &id("B")).unwrap();
        assert_eq!(edge.reasoning, "second");
        assert!(!edge.is_implicit);
        // The log keeps the earlier implicit registration
        assert_eq!(graph.detected_dependencies().len(), 1);
    }

    #[test]
    fn test_implicit_log_is_append_only() {
        let mut graph = TaskGraph::new();
        graph.add_dependency(&id("A"), &id("B"), DependencyMeta::implicit(0.6, "x"));
        graph.add_dependency(&id("A"), &id("B"), DependencyMeta::implicit(0.7, "y"));

        let log = graph.detected_dependencies();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].reasoning, "x");
        assert_eq!(log[1].reasoning, "y");
    }

    #[test]
    fn test_has_explicit_edge_between_either_direction() {
        let mut graph = TaskGraph::new();
        graph.add_dependency(
            &id("A"),
            &id("B"),
            DependencyMeta::explicit(DependencyType::RelatedTo, "link"),
        );
        graph.add_dependency(&id("B"), &id("C"), DependencyMeta::implicit(0.9, "inferred"));

        assert!(graph.has_explicit_edge_between(&id("A"), &id("B")));
        assert!(graph.has_explicit_edge_between(&id("B"), &id("A")));
        assert!(!graph.has_explicit_edge_between(&id("B"), &id("C")));
        assert!(!graph.has_explicit_edge_between(&id("A"), &id("Z")));
    }

    #[test]
    fn test_neighbours() {
        let mut graph = TaskGraph::new();
        graph.add_task(&Task::new("A", "a", 1));
        graph.add_task(&Task::new("B", "b", 1));
        graph.add_task(&Task::new("C", "c", 1));
        graph.add_dependency(&id("A"), &id("C"), DependencyMeta::implicit(0.6, ""));
        graph.add_dependency(&id("B"), &id("C"), DependencyMeta::implicit(0.6, ""));

        assert_eq!(graph.predecessors(&id("C")), ids(&["A", "B"]));
        assert_eq!(graph.successors(&id("A")), ids(&["C"]));
        assert!(graph.successors(&id("missing")).is_empty());
    }

    #[test]
    fn test_orphans_and_leaves() {
        let mut graph = TaskGraph::new();
        graph.add_task(&Task::new("A", "a", 1));
        graph.add_task(
            &Task::new("B", "b", 1)
                .with_dependency(DependencyDeclaration::new("A", DependencyType::DependsOn)),
        );
        graph.add_task(&Task::new("C", "isolated", 1));

        assert_eq!(graph.get_orphan_tasks(), ids(&["A", "C"]));
        assert_eq!(graph.get_leaf_tasks(), ids(&["B", "C"]));
    }

    #[test]
    fn test_analyze_empty_graph() {
        let result = TaskGraph::new().analyze();
        assert_eq!(result, GraphAnalysisResult::default());
    }

    #[test]
    fn test_analyze_cyclic_graph_keeps_local_results() {
        let mut graph = TaskGraph::new();
        graph.add_task(
            &Task::new("T1", "a", 1)
                .with_dependency(DependencyDeclaration::new("T2", DependencyType::DependsOn)),
        );
        graph.add_task(
            &Task::new("T2", "b", 1)
                .with_dependency(DependencyDeclaration::new("T1", DependencyType::DependsOn)),
        );
        graph.add_task(
            &Task::new("T3", "c", 1)
                .with_dependency(DependencyDeclaration::new("T2", DependencyType::DependsOn)),
        );

        let result = graph.analyze();
        assert_eq!(result.cycles, vec![ids(&["T1", "T2"])]);
        assert!(result.execution_order.is_empty());
        assert!(result.critical_path.is_empty());
        assert!(result.parallel_groups.is_empty());
        assert!(result.orphan_tasks.is_empty());
        assert_eq!(result.leaf_tasks, ids(&["T3"]));
    }
}
