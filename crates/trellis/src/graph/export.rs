//! Flat graph export for external renderers.

use super::TaskGraph;
use crate::domain::{VisualEdge, VisualNode, VisualizationPayload};

impl TaskGraph {
    /// Materialize node attributes and edge metadata for rendering.
    ///
    /// Nodes are listed in insertion order. Edges are grouped by their
    /// prerequisite in node order, then by dependent in node order.
    pub fn export_for_visualization(&self) -> VisualizationPayload {
        let nodes = self
            .nodes
            .iter()
            .map(|node| VisualNode {
                id: node.id.clone(),
                label: node.title.clone(),
                complexity: node.complexity,
            })
            .collect();

        let edges = self
            .successors
            .iter()
            .enumerate()
            .flat_map(|(from, successors)| successors.iter().map(move |&to| (from, to)))
            .filter_map(|(from, to)| {
                let meta = self.edges.get(&(from, to))?;
                Some(VisualEdge {
                    from: self.nodes[from].id.clone(),
                    to: self.nodes[to].id.clone(),
                    dep_type: meta.dep_type,
                    confidence: meta.confidence,
                })
            })
            .collect();

        VisualizationPayload { nodes, edges }
    }
}
