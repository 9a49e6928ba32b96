/// Structural failure while validating a graph document.
///
/// Validation stops at the first failing check, so a document only ever
/// reports one of these.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("graph document must be a JSON object")]
    NotAnObject,

    #[error("graph document is missing a `nodes` array")]
    MissingNodes,

    #[error("graph document is missing an `edges` array")]
    MissingEdges,

    #[error("node at index {index} is not an object")]
    NodeNotObject { index: usize },

    #[error("node at index {index} must have a non-empty string `id`")]
    InvalidNodeId { index: usize },

    #[error("node at index {index} must have a string `name`")]
    InvalidNodeName { index: usize },

    #[error("duplicate node id `{id}` at index {index}")]
    DuplicateNodeId { id: String, index: usize },

    #[error("edge at index {index} is not an object")]
    EdgeNotObject { index: usize },

    #[error("edge at index {index} must have a non-empty string `sourceId`")]
    InvalidEdgeSource { index: usize },

    #[error("edge at index {index} must have a non-empty string `targetId`")]
    InvalidEdgeTarget { index: usize },
}

impl ValidationError {
    /// Path of the offending field, e.g. `nodes[2].id`.
    pub fn field(&self) -> Option<String> {
        match self {
            Self::NotAnObject => None,
            Self::MissingNodes => Some("nodes".to_owned()),
            Self::MissingEdges => Some("edges".to_owned()),
            Self::NodeNotObject { index } => Some(format!("nodes[{index}]")),
            Self::InvalidNodeId { index } | Self::DuplicateNodeId { index, .. } => {
                Some(format!("nodes[{index}].id"))
            }
            Self::InvalidNodeName { index } => Some(format!("nodes[{index}].name")),
            Self::EdgeNotObject { index } => Some(format!("edges[{index}]")),
            Self::InvalidEdgeSource { index } => Some(format!("edges[{index}].sourceId")),
            Self::InvalidEdgeTarget { index } => Some(format!("edges[{index}].targetId")),
        }
    }
}
