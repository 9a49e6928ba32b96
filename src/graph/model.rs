use serde_json::{Map, Value};

/// Opaque key-value data attached to nodes and edges; never interpreted.
pub type Properties = Map<String, Value>;

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub id: String,
    pub name: String,
    pub categories: Vec<String>,
    /// Hierarchy level, only consulted by the radial layout.
    pub level: Option<u32>,
    /// Raw color override as written in the document. Resolved lazily so an
    /// unparsable value can fall back to the category color.
    pub color: Option<String>,
    pub properties: Option<Properties>,
}

impl Node {
    pub fn first_category(&self) -> Option<&str> {
        self.categories.first().map(String::as_str)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    pub source_id: String,
    pub target_id: String,
    pub properties: Option<Properties>,
}

impl Edge {
    pub fn new(source_id: impl Into<String>, target_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            target_id: target_id.into(),
            properties: None,
        }
    }
}

/// Output of [`crate::graph::validate`]. Node ids are unique; edge endpoints
/// may still name nodes that do not exist.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValidatedGraph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl ValidatedGraph {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
