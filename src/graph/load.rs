use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{info, warn};

use super::categories::CategoryPalette;
use super::index::{GraphIndex, GraphStats};
use super::model::{Edge, Node, ValidatedGraph};
use super::validate::validate;

/// A validated graph with the index, statistics and category palette derived
/// from it. Always built and replaced as one unit.
#[derive(Clone, Debug)]
pub struct LoadedGraph {
    pub graph: ValidatedGraph,
    pub index: GraphIndex,
    pub stats: GraphStats,
    pub palette: CategoryPalette,
}

impl LoadedGraph {
    pub fn new(graph: ValidatedGraph) -> Self {
        let index = GraphIndex::build(&graph);
        let stats = index.stats(&graph);
        let palette = CategoryPalette::from_nodes(&graph.nodes);

        if !stats.invalid_edges.is_empty() {
            warn!(
                invalid = stats.invalid_edges.len(),
                total = stats.edge_count,
                "graph has edges with unresolved endpoints"
            );
        }

        Self {
            graph,
            index,
            stats,
            palette,
        }
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index.node(&self.graph, id)
    }

    pub fn edge(&self, source_id: &str, target_id: &str) -> Option<&Edge> {
        self.index.edge(&self.graph, source_id, target_id)
    }
}

/// Parses and validates document text. Nothing is returned unless the whole
/// document validates.
pub fn parse_graph_document(text: &str) -> Result<LoadedGraph> {
    let value: Value = serde_json::from_str(text).context("document is not valid JSON")?;
    let graph = validate(&value).context("document is not a valid graph")?;
    Ok(LoadedGraph::new(graph))
}

pub fn load_graph_file(path: &Path) -> Result<LoadedGraph> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let loaded = parse_graph_document(&text)
        .with_context(|| format!("failed to load graph from {}", path.display()))?;

    info!(
        path = %path.display(),
        nodes = loaded.stats.node_count,
        edges = loaded.stats.edge_count,
        "loaded graph"
    );
    Ok(loaded)
}
