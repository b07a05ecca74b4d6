//! Cycle detection, ordering and scheduling algorithms.
//!
//! | Operation | Algorithm |
//! |-----------|-----------|
//! | Cycle detection | Tarjan's SCC (iterative) |
//! | Execution order | Kahn's algorithm, insertion-order FIFO |
//! | Critical path | Longest path relaxation over the topological order |
//! | Parallel groups | Layered Kahn's algorithm |
//!
//! Internal faults (an adjacency entry pointing outside the node list, or
//! forward/backward adjacency disagreeing) are reported as [`GraphFault`]
//! and absorbed by the public methods into degraded values. They cannot be
//! produced through the public mutation API.

use super::{NodeIndex, TaskGraph};
use crate::domain::TaskId;
use crate::error::{Error, Result};
use std::collections::{BTreeSet, VecDeque};

/// Internal algorithm failure. Never leaves the graph module.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub(crate) enum GraphFault {
    /// Adjacency refers to a node that does not exist
    #[error("adjacency refers to missing node index {index}")]
    DanglingIndex {
        /// The offending index
        index: NodeIndex,
    },

    /// Forward and backward adjacency disagree
    #[error("forward and backward adjacency disagree at node index {index}")]
    Inconsistent {
        /// Node whose in-degree could not be reconciled
        index: NodeIndex,
    },

    /// Nodes remained with unresolved prerequisites after sorting
    #[error("{remaining} node(s) could not be ordered")]
    Unordered {
        /// Number of nodes left out of the order
        remaining: usize,
    },
}

type FaultResult<T> = std::result::Result<T, GraphFault>;

impl TaskGraph {
    /// Find every cycle in the graph.
    ///
    /// A cycle is a strongly connected component with more than one node, or
    /// a single node with an edge to itself. Members of each cycle are listed
    /// in insertion order and cycles are ordered by their first member.
    ///
    /// Never fails: an internal fault is logged and yields an empty list.
    pub fn detect_cycles(&self) -> Vec<Vec<TaskId>> {
        match self.cycle_components() {
            Ok(cycles) => cycles
                .into_iter()
                .map(|component| self.ids(component))
                .collect(),
            Err(fault) => {
                tracing::warn!(error = %fault, "Cycle detection failed; reporting no cycles");
                Vec::new()
            }
        }
    }

    /// Compute an order in which every prerequisite precedes its dependents.
    ///
    /// Ties are broken by insertion order, so a serial chain has exactly one
    /// result and independent tasks keep the order they were added in.
    ///
    /// If sorting fails for a reason other than a cycle the nodes are
    /// returned in insertion order instead.
    ///
    /// # Errors
    ///
    /// Returns `Error::CycleDetected` carrying the number of cycles when the
    /// graph is cyclic.
    pub fn get_execution_order(&self) -> Result<Vec<TaskId>> {
        let cycles = self.detect_cycles();
        if !cycles.is_empty() {
            return Err(Error::CycleDetected {
                count: cycles.len(),
            });
        }

        match self.topological_sort() {
            Ok(order) => Ok(self.ids(order)),
            Err(fault) => {
                tracing::warn!(
                    error = %fault,
                    "Topological sort failed; falling back to insertion order"
                );
                Ok(self.nodes.iter().map(|node| node.id.clone()).collect())
            }
        }
    }

    /// Compute the longest weighted chain of dependent tasks.
    ///
    /// Node weight is the task complexity (1 for placeholders). The endpoint
    /// is the first node in topological order whose accumulated weight,
    /// including its own, is strictly the largest; the path is rebuilt by
    /// following the best predecessor of each node.
    ///
    /// Ties are broken by topological order, not insertion order: with
    /// `X(1)`, `Y(3)`, `Z(2)` and an edge `Z -> X`, both `[Y]` and `[Z, X]`
    /// weigh 3 and `[Y]` is returned because `Y` is sorted first. The
    /// scan reuses the order the distances were relaxed in.
    ///
    /// Conventions: an empty graph yields an empty path; a graph whose
    /// weights are all zero yields the first node of the topological order
    /// (the first zero in-degree node by insertion) as a one-node path.
    ///
    /// Returns an empty path on a cyclic graph. See the calling convention
    /// in the [module documentation](super).
    pub fn get_critical_path(&self) -> Vec<TaskId> {
        self.critical_path()
            .map(|(path, _)| self.ids(path))
            .unwrap_or_default()
    }

    /// Total weight of [`get_critical_path`](Self::get_critical_path).
    ///
    /// Zero for an empty or cyclic graph.
    pub fn get_critical_path_weight(&self) -> u32 {
        self.critical_path().map_or(0, |(_, weight)| weight)
    }

    /// Partition tasks into batches that can run concurrently.
    ///
    /// Each group holds every remaining task whose prerequisites all sit in
    /// earlier groups, so for every edge `u -> v` the group of `u` comes
    /// strictly before the group of `v`. Tasks within a group are listed in
    /// insertion order.
    ///
    /// On a cyclic graph layering stops as soon as no remaining task is free
    /// and the truncated result is returned as is: compare the number of
    /// grouped tasks with [`task_count`](Self::task_count) or check
    /// [`detect_cycles`](Self::detect_cycles) first.
    pub fn get_parallel_groups(&self) -> Vec<Vec<TaskId>> {
        let node_count = self.nodes.len();
        let mut in_degree: Vec<usize> = self.predecessors.iter().map(BTreeSet::len).collect();
        let mut frontier: Vec<NodeIndex> =
            (0..node_count).filter(|&index| in_degree[index] == 0).collect();
        let mut grouped = 0usize;
        let mut groups = Vec::new();

        while !frontier.is_empty() {
            frontier.sort_unstable();
            grouped += frontier.len();

            let mut next = Vec::new();
            for &index in &frontier {
                for &successor in &self.successors[index] {
                    if let Some(degree) = in_degree.get_mut(successor) {
                        if *degree == 0 {
                            continue;
                        }
                        *degree -= 1;
                        if *degree == 0 {
                            next.push(successor);
                        }
                    }
                }
            }

            groups.push(self.ids(std::mem::replace(&mut frontier, next)));
        }

        if grouped < node_count {
            tracing::debug!(
                remaining = node_count - grouped,
                "Parallel grouping stopped early; remaining tasks form or follow a cycle"
            );
        }

        groups
    }

    fn successor_set(&self, index: NodeIndex) -> FaultResult<&BTreeSet<NodeIndex>> {
        self.successors
            .get(index)
            .ok_or(GraphFault::DanglingIndex { index })
    }

    /// Tarjan's strongly connected components, keeping only cycles.
    fn cycle_components(&self) -> FaultResult<Vec<Vec<NodeIndex>>> {
        let node_count = self.nodes.len();
        let mut index_of: Vec<Option<usize>> = vec![None; node_count];
        let mut lowlink = vec![0usize; node_count];
        let mut on_stack = vec![false; node_count];
        let mut stack: Vec<NodeIndex> = Vec::new();
        let mut next_index = 0usize;
        let mut cycles = Vec::new();

        for root in 0..node_count {
            if index_of[root].is_some() {
                continue;
            }

            index_of[root] = Some(next_index);
            lowlink[root] = next_index;
            next_index += 1;
            stack.push(root);
            on_stack[root] = true;

            let mut call_stack = vec![(root, self.successor_set(root)?.iter())];

            while let Some((node, successors)) = call_stack.last_mut() {
                let node = *node;

                if let Some(&successor) = successors.next() {
                    if successor >= node_count {
                        return Err(GraphFault::DanglingIndex { index: successor });
                    }

                    match index_of[successor] {
                        None => {
                            index_of[successor] = Some(next_index);
                            lowlink[successor] = next_index;
                            next_index += 1;
                            stack.push(successor);
                            on_stack[successor] = true;
                            call_stack.push((successor, self.successor_set(successor)?.iter()));
                        }
                        Some(successor_index) if on_stack[successor] => {
                            lowlink[node] = lowlink[node].min(successor_index);
                        }
                        Some(_) => {}
                    }
                    continue;
                }

                call_stack.pop();
                if let Some((parent, _)) = call_stack.last() {
                    lowlink[*parent] = lowlink[*parent].min(lowlink[node]);
                }

                if index_of[node] == Some(lowlink[node]) {
                    let mut component = Vec::new();
                    loop {
                        let member = stack.pop().ok_or(GraphFault::Inconsistent { index: node })?;
                        on_stack[member] = false;
                        component.push(member);
                        if member == node {
                            break;
                        }
                    }

                    let self_loop = self.successors[node].contains(&node);
                    if component.len() > 1 || self_loop {
                        component.sort_unstable();
                        cycles.push(component);
                    }
                }
            }
        }

        cycles.sort_unstable_by_key(|component| component[0]);
        Ok(cycles)
    }

    /// Kahn's algorithm with an insertion-order FIFO queue.
    fn topological_sort(&self) -> FaultResult<Vec<NodeIndex>> {
        let node_count = self.nodes.len();
        let mut in_degree: Vec<usize> = self.predecessors.iter().map(BTreeSet::len).collect();
        let mut queue: VecDeque<NodeIndex> =
            (0..node_count).filter(|&index| in_degree[index] == 0).collect();
        let mut order = Vec::with_capacity(node_count);

        while let Some(index) = queue.pop_front() {
            order.push(index);

            for &successor in self.successor_set(index)? {
                let degree = in_degree
                    .get_mut(successor)
                    .ok_or(GraphFault::DanglingIndex { index: successor })?;
                *degree = degree
                    .checked_sub(1)
                    .ok_or(GraphFault::Inconsistent { index: successor })?;
                if *degree == 0 {
                    queue.push_back(successor);
                }
            }
        }

        if order.len() < node_count {
            return Err(GraphFault::Unordered {
                remaining: node_count - order.len(),
            });
        }

        Ok(order)
    }

    /// Longest weighted path as (node indices, total weight).
    ///
    /// `None` when the graph is empty or cannot be topologically sorted.
    fn critical_path(&self) -> Option<(Vec<NodeIndex>, u32)> {
        let order = match self.topological_sort() {
            Ok(order) => order,
            Err(fault) => {
                tracing::debug!(error = %fault, "No topological order; critical path is empty");
                return None;
            }
        };

        let node_count = self.nodes.len();
        let mut distance = vec![0u32; node_count];
        let mut predecessor: Vec<Option<NodeIndex>> = vec![None; node_count];

        for &node in &order {
            let reach = distance[node].saturating_add(self.nodes[node].weight());
            for &successor in &self.successors[node] {
                if reach > distance[successor] {
                    distance[successor] = reach;
                    predecessor[successor] = Some(node);
                }
            }
        }

        // First node in topological order with a strictly larger finish wins
        let mut best: Option<(NodeIndex, u32)> = None;
        for &node in &order {
            let finish = distance[node].saturating_add(self.nodes[node].weight());
            if best.is_none_or(|(_, best_finish)| finish > best_finish) {
                best = Some((node, finish));
            }
        }
        let (end, total) = best?;

        let mut path = vec![end];
        let mut current = end;
        while let Some(previous) = predecessor[current] {
            path.push(previous);
            current = previous;
        }
        path.reverse();

        Some((path, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DependencyMeta, DependencyType, Task};

    fn id(s: &str) -> TaskId {
        TaskId::new(s)
    }

    fn ids(values: &[&str]) -> Vec<TaskId> {
        values.iter().map(|s| id(s)).collect()
    }

    fn link(graph: &mut TaskGraph, from: &str, to: &str) {
        graph.add_dependency(
            &id(from),
            &id(to),
            DependencyMeta::explicit(DependencyType::DependsOn, "test"),
        );
    }

    fn chain_graph() -> TaskGraph {
        let mut graph = TaskGraph::new();
        graph.add_task(&Task::new("T1", "Setup infrastructure", 2));
        graph.add_task(&Task::new("T2", "Create database schema", 3));
        graph.add_task(&Task::new("T3", "Build API endpoints", 5));
        graph.add_task(&Task::new("T4", "Build UI components", 3));
        link(&mut graph, "T1", "T2");
        link(&mut graph, "T2", "T3");
        link(&mut graph, "T3", "T4");
        graph
    }

    // ========== Cycle Detection ==========

    #[test]
    fn test_detect_cycles_none_on_dag() {
        assert!(chain_graph().detect_cycles().is_empty());
    }

    #[test]
    fn test_detect_two_node_cycle() {
        let mut graph = TaskGraph::new();
        link(&mut graph, "T1", "T2");
        link(&mut graph, "T2", "T1");

        assert_eq!(graph.detect_cycles(), vec![ids(&["T1", "T2"])]);
    }

    #[test]
    fn test_detect_self_loop() {
        let mut graph = TaskGraph::new();
        graph.add_task(&Task::new("A", "a", 1));
        link(&mut graph, "A", "A");

        assert_eq!(graph.detect_cycles(), vec![ids(&["A"])]);
    }

    #[test]
    fn test_detect_multiple_disjoint_cycles() {
        let mut graph = TaskGraph::new();
        for name in ["A", "B", "C", "D", "E"] {
            graph.add_task(&Task::new(name, name, 1));
        }
        link(&mut graph, "C", "D");
        link(&mut graph, "D", "C");
        link(&mut graph, "A", "B");
        link(&mut graph, "B", "E");
        link(&mut graph, "E", "A");

        assert_eq!(
            graph.detect_cycles(),
            vec![ids(&["A", "B", "E"]), ids(&["C", "D"])]
        );
    }

    #[test]
    fn test_detect_cycles_dangling_index_degrades_to_empty() {
        let mut graph = chain_graph();
        graph.successors[0].insert(99);

        assert!(graph.detect_cycles().is_empty());
    }

    // ========== Execution Order ==========

    #[test]
    fn test_execution_order_chain() {
        assert_eq!(
            chain_graph().get_execution_order().unwrap(),
            ids(&["T1", "T2", "T3", "T4"])
        );
    }

    #[test]
    fn test_execution_order_independent_tasks_keep_insertion_order() {
        let mut graph = TaskGraph::new();
        graph.add_task(&Task::new("B", "b", 1));
        graph.add_task(&Task::new("A", "a", 1));
        graph.add_task(&Task::new("C", "c", 1));

        assert_eq!(graph.get_execution_order().unwrap(), ids(&["B", "A", "C"]));
    }

    #[test]
    fn test_execution_order_fails_with_cycle_count() {
        let mut graph = TaskGraph::new();
        link(&mut graph, "A", "B");
        link(&mut graph, "B", "A");
        link(&mut graph, "C", "D");
        link(&mut graph, "D", "C");

        let err = graph.get_execution_order().unwrap_err();
        assert!(matches!(err, Error::CycleDetected { count: 2 }));
    }

    #[test]
    fn test_execution_order_falls_back_to_insertion_order() {
        // Backward adjacency claims a prerequisite the forward side never releases
        let mut graph = TaskGraph::new();
        graph.add_task(&Task::new("A", "a", 1));
        graph.add_task(&Task::new("B", "b", 1));
        graph.add_task(&Task::new("C", "c", 1));
        link(&mut graph, "C", "A");
        graph.predecessors[1].insert(2);

        assert!(graph.detect_cycles().is_empty());
        assert_eq!(graph.topological_sort(), Err(GraphFault::Unordered { remaining: 1 }));
        assert_eq!(graph.get_execution_order().unwrap(), ids(&["A", "B", "C"]));
    }

    #[test]
    fn test_topological_sort_reports_dangling_successor() {
        let mut graph = chain_graph();
        graph.successors[3].insert(42);

        assert_eq!(
            graph.topological_sort(),
            Err(GraphFault::DanglingIndex { index: 42 })
        );
    }

    // ========== Critical Path ==========

    #[test]
    fn test_critical_path_chain() {
        let graph = chain_graph();
        assert_eq!(graph.get_critical_path(), ids(&["T1", "T2", "T3", "T4"]));
        assert_eq!(graph.get_critical_path_weight(), 13);
    }

    #[test]
    fn test_critical_path_prefers_heavier_branch() {
        let mut graph = TaskGraph::new();
        graph.add_task(&Task::new("start", "s", 1));
        graph.add_task(&Task::new("light", "l", 2));
        graph.add_task(&Task::new("heavy", "h", 8));
        graph.add_task(&Task::new("end", "e", 1));
        link(&mut graph, "start", "light");
        link(&mut graph, "start", "heavy");
        link(&mut graph, "light", "end");
        link(&mut graph, "heavy", "end");

        assert_eq!(graph.get_critical_path(), ids(&["start", "heavy", "end"]));
        assert_eq!(graph.get_critical_path_weight(), 10);
    }

    #[test]
    fn test_critical_path_isolated_heavy_node() {
        let mut graph = TaskGraph::new();
        graph.add_task(&Task::new("A", "a", 2));
        graph.add_task(&Task::new("B", "b", 2));
        graph.add_task(&Task::new("solo", "big", 9));
        link(&mut graph, "A", "B");

        assert_eq!(graph.get_critical_path(), ids(&["solo"]));
        assert_eq!(graph.get_critical_path_weight(), 9);
    }

    #[test]
    fn test_critical_path_tie_goes_to_first_in_order() {
        let mut graph = TaskGraph::new();
        graph.add_task(&Task::new("A", "a", 3));
        graph.add_task(&Task::new("B", "b", 3));

        assert_eq!(graph.get_critical_path(), ids(&["A"]));
    }

    #[test]
    fn test_critical_path_tie_broken_by_topological_order() {
        let mut graph = TaskGraph::new();
        graph.add_task(&Task::new("X", "x", 1));
        graph.add_task(&Task::new("Y", "y", 3));
        graph.add_task(&Task::new("Z", "z", 2));
        link(&mut graph, "Z", "X");

        assert_eq!(graph.get_critical_path(), ids(&["Y"]));
        assert_eq!(graph.get_critical_path_weight(), 3);
    }

    #[test]
    fn test_critical_path_empty_graph() {
        let graph = TaskGraph::new();
        assert!(graph.get_critical_path().is_empty());
        assert_eq!(graph.get_critical_path_weight(), 0);
    }

    #[test]
    fn test_critical_path_all_zero_weights() {
        let mut graph = TaskGraph::new();
        graph.add_task(&Task::new("Z", "z", 0));
        graph.add_task(&Task::new("Y", "y", 0));
        graph.add_task(&Task::new("X", "x", 0));
        link(&mut graph, "Z", "X");

        assert_eq!(graph.get_critical_path(), ids(&["Z"]));
        assert_eq!(graph.get_critical_path_weight(), 0);
    }

    #[test]
    fn test_critical_path_placeholder_weighs_one() {
        let mut graph = TaskGraph::new();
        graph.add_task(&Task::new("B", "b", 4));
        link(&mut graph, "ghost", "B");

        assert_eq!(graph.get_critical_path(), ids(&["ghost", "B"]));
        assert_eq!(graph.get_critical_path_weight(), 5);
    }

    #[test]
    fn test_critical_path_empty_on_cycle() {
        let mut graph = TaskGraph::new();
        link(&mut graph, "A", "B");
        link(&mut graph, "B", "A");

        assert!(graph.get_critical_path().is_empty());
    }

    // ========== Parallel Groups ==========

    #[test]
    fn test_parallel_groups_chain() {
        assert_eq!(
            chain_graph().get_parallel_groups(),
            vec![ids(&["T1"]), ids(&["T2"]), ids(&["T3"]), ids(&["T4"])]
        );
    }

    #[test]
    fn test_parallel_groups_diamond() {
        let mut graph = TaskGraph::new();
        for name in ["A", "B", "C", "D"] {
            graph.add_task(&Task::new(name, name, 1));
        }
        link(&mut graph, "A", "B");
        link(&mut graph, "A", "C");
        link(&mut graph, "B", "D");
        link(&mut graph, "C", "D");

        assert_eq!(
            graph.get_parallel_groups(),
            vec![ids(&["A"]), ids(&["B", "C"]), ids(&["D"])]
        );
    }

    #[test]
    fn test_parallel_groups_layer_keeps_insertion_order() {
        let mut graph = TaskGraph::new();
        for name in ["A", "B", "P", "Q"] {
            graph.add_task(&Task::new(name, name, 1));
        }
        link(&mut graph, "P", "B");
        link(&mut graph, "Q", "A");

        assert_eq!(
            graph.get_parallel_groups(),
            vec![ids(&["P", "Q"]), ids(&["A", "B"])]
        );
    }

    #[test]
    fn test_parallel_groups_long_chain() {
        let mut graph = TaskGraph::new();
        for i in 1..500 {
            link(&mut graph, &format!("n{}", i - 1), &format!("n{i}"));
        }

        let groups = graph.get_parallel_groups();
        assert_eq!(groups.len(), 500);
        assert!(groups.iter().all(|group| group.len() == 1));
        assert_eq!(groups[499], ids(&["n499"]));
    }

    #[test]
    fn test_parallel_groups_self_loop_is_never_free() {
        let mut graph = TaskGraph::new();
        graph.add_task(&Task::new("A", "a", 1));
        graph.add_task(&Task::new("B", "b", 1));
        link(&mut graph, "A", "A");

        assert_eq!(graph.get_parallel_groups(), vec![ids(&["B"])]);
    }

    #[test]
    fn test_parallel_groups_truncated_on_cycle() {
        let mut graph = TaskGraph::new();
        graph.add_task(&Task::new("root", "r", 1));
        link(&mut graph, "root", "A");
        link(&mut graph, "A", "B");
        link(&mut graph, "B", "A");

        let groups = graph.get_parallel_groups();
        assert_eq!(groups, vec![ids(&["root"])]);
        let grouped: usize = groups.iter().map(Vec::len).sum();
        assert!(grouped < graph.task_count());
    }

    #[test]
    fn test_parallel_groups_empty_graph() {
        assert!(TaskGraph::new().get_parallel_groups().is_empty());
    }
}
