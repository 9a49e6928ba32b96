use std::collections::{HashMap, HashSet};

use super::model::{Edge, Node, ValidatedGraph};

/// O(1) lookups over a [`ValidatedGraph`].
///
/// Stores positions into the graph's node and edge vectors rather than
/// borrowing them, so the index can live next to the graph it was built from.
/// Built once per graph and never patched; load a new graph, build a new index.
///
/// Edges are keyed by the `(source, target)` pair through a nested map, so ids
/// containing any delimiter cannot collide. Duplicate edges keep the last one.
#[derive(Clone, Debug, Default)]
pub struct GraphIndex {
    node_by_id: HashMap<String, usize>,
    edge_by_endpoints: HashMap<String, HashMap<String, usize>>,
    incident: Vec<Vec<usize>>,
    invalid_edges: Vec<usize>,
}

/// Counts plus every edge whose endpoints do not both resolve to a node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub invalid_edges: Vec<Edge>,
}

impl GraphStats {
    pub fn resolvable_edge_count(&self) -> usize {
        self.edge_count - self.invalid_edges.len()
    }
}

pub fn build_index(graph: &ValidatedGraph) -> GraphIndex {
    GraphIndex::build(graph)
}

/// Standalone statistics pass. [`GraphIndex::stats`] gives the same result
/// without walking the edges again when an index already exists.
pub fn compute_stats(graph: &ValidatedGraph) -> GraphStats {
    let known = graph
        .nodes
        .iter()
        .map(|node| node.id.as_str())
        .collect::<HashSet<_>>();

    let invalid_edges = graph
        .edges
        .iter()
        .filter(|edge| {
            !known.contains(edge.source_id.as_str()) || !known.contains(edge.target_id.as_str())
        })
        .cloned()
        .collect();

    GraphStats {
        node_count: graph.node_count(),
        edge_count: graph.edge_count(),
        invalid_edges,
    }
}

impl GraphIndex {
    pub fn build(graph: &ValidatedGraph) -> Self {
        let mut node_by_id = HashMap::with_capacity(graph.nodes.len());
        for (position, node) in graph.nodes.iter().enumerate() {
            node_by_id.insert(node.id.clone(), position);
        }

        let mut edge_by_endpoints: HashMap<String, HashMap<String, usize>> = HashMap::new();
        let mut incident = vec![Vec::new(); graph.nodes.len()];
        let mut invalid_edges = Vec::new();

        for (position, edge) in graph.edges.iter().enumerate() {
            edge_by_endpoints
                .entry(edge.source_id.clone())
                .or_default()
                .insert(edge.target_id.clone(), position);

            match (
                node_by_id.get(&edge.source_id),
                node_by_id.get(&edge.target_id),
            ) {
                (Some(&source), Some(&target)) => {
                    incident[source].push(position);
                    if source != target {
                        incident[target].push(position);
                    }
                }
                _ => invalid_edges.push(position),
            }
        }

        Self {
            node_by_id,
            edge_by_endpoints,
            incident,
            invalid_edges,
        }
    }

    pub fn node_position(&self, id: &str) -> Option<usize> {
        self.node_by_id.get(id).copied()
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node_by_id.contains_key(id)
    }

    pub fn node<'g>(&self, graph: &'g ValidatedGraph, id: &str) -> Option<&'g Node> {
        self.node_position(id).and_then(|position| graph.nodes.get(position))
    }

    pub fn edge_position(&self, source_id: &str, target_id: &str) -> Option<usize> {
        self.edge_by_endpoints
            .get(source_id)
            .and_then(|targets| targets.get(target_id))
            .copied()
    }

    pub fn edge<'g>(
        &self,
        graph: &'g ValidatedGraph,
        source_id: &str,
        target_id: &str,
    ) -> Option<&'g Edge> {
        self.edge_position(source_id, target_id)
            .and_then(|position| graph.edges.get(position))
    }

    /// Positions of the edges whose endpoints do not resolve, in document order.
    pub fn invalid_edge_positions(&self) -> &[usize] {
        &self.invalid_edges
    }

    /// Resolvable edges touching `id`, in either direction.
    pub fn incident_edges(&self, id: &str) -> &[usize] {
        self.node_position(id)
            .and_then(|position| self.incident.get(position))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Positions of the nodes adjacent to `id`, following edges both ways.
    /// A node appears once per connecting edge.
    pub fn neighbors<'a>(
        &'a self,
        graph: &'a ValidatedGraph,
        id: &'a str,
    ) -> impl Iterator<Item = usize> + 'a {
        self.incident_edges(id).iter().filter_map(move |&position| {
            let edge = graph.edges.get(position)?;
            let other = if edge.source_id == id {
                &edge.target_id
            } else {
                &edge.source_id
            };
            self.node_position(other)
        })
    }

    pub fn stats(&self, graph: &ValidatedGraph) -> GraphStats {
        GraphStats {
            node_count: graph.node_count(),
            edge_count: graph.edge_count(),
            invalid_edges: self
                .invalid_edges
                .iter()
                .filter_map(|&position| graph.edges.get(position).cloned())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::graph::validate;

    fn sample() -> ValidatedGraph {
        validate(&json!({
            "nodes": [
                {"id": "a", "name": "A"},
                {"id": "b", "name": "B"},
                {"id": "c", "name": "C"}
            ],
            "edges": [
                {"sourceId": "a", "targetId": "b"},
                {"sourceId": "b", "targetId": "c"},
                {"sourceId": "a", "targetId": "missing"},
                {"sourceId": "ghost", "targetId": "c"}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn node_lookup_returns_the_graph_entry() {
        let graph = sample();
        let index = build_index(&graph);

        for node in &graph.nodes {
            let found = index.node(&graph, &node.id).unwrap();
            assert!(std::ptr::eq(found, node));
        }
        assert!(index.node(&graph, "missing").is_none());
    }

    #[test]
    fn edge_lookup_by_endpoint_pair() {
        let graph = sample();
        let index = build_index(&graph);

        let edge = index.edge(&graph, "b", "c").unwrap();
        assert!(std::ptr::eq(edge, &graph.edges[1]));
        assert!(index.edge(&graph, "c", "b").is_none());
        assert_eq!(index.edge_position("a", "missing"), Some(2));
    }

    #[test]
    fn pair_keys_do_not_collide_on_delimiters() {
        let graph = validate(&json!({
            "nodes": [
                {"id": "a->b", "name": ""},
                {"id": "c", "name": ""},
                {"id": "a", "name": ""},
                {"id": "b->c", "name": ""}
            ],
            "edges": [
                {"sourceId": "a->b", "targetId": "c"},
                {"sourceId": "a", "targetId": "b->c"}
            ]
        }))
        .unwrap();
        let index = build_index(&graph);

        assert_eq!(index.edge_position("a->b", "c"), Some(0));
        assert_eq!(index.edge_position("a", "b->c"), Some(1));
    }

    #[test]
    fn stats_partition_edges() {
        let graph = sample();
        let index = build_index(&graph);
        let stats = index.stats(&graph);

        assert_eq!(stats.node_count, 3);
        assert_eq!(stats.edge_count, 4);
        assert_eq!(
            stats.invalid_edges,
            vec![Edge::new("a", "missing"), Edge::new("ghost", "c")]
        );
        assert_eq!(stats.resolvable_edge_count(), 2);
        assert_eq!(
            stats.invalid_edges.len() + stats.resolvable_edge_count(),
            graph.edges.len()
        );
        assert_eq!(compute_stats(&graph), stats);

        assert_eq!(index.invalid_edge_positions(), &[2, 3]);
    }

    #[test]
    fn adjacency_skips_unresolved_edges() {
        let graph = sample();
        let index = build_index(&graph);

        assert_eq!(index.incident_edges("a"), &[0]);
        assert_eq!(index.incident_edges("b"), &[0, 1]);
        assert_eq!(index.neighbors(&graph, "b").collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(index.neighbors(&graph, "c").collect::<Vec<_>>(), vec![1]);
        assert!(index.incident_edges("missing").is_empty());
    }

    #[test]
    fn self_loops_are_listed_once() {
        let graph = validate(&json!({
            "nodes": [{"id": "a", "name": "A"}],
            "edges": [{"sourceId": "a", "targetId": "a"}]
        }))
        .unwrap();
        let index = build_index(&graph);
        assert_eq!(index.incident_edges("a"), &[0]);
        assert_eq!(index.neighbors(&graph, "a").collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn empty_graph_has_empty_stats() {
        let stats = compute_stats(&ValidatedGraph::default());
        assert_eq!(stats, GraphStats::default());
    }
}
