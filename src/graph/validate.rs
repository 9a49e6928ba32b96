use std::collections::HashSet;

use serde_json::{Map, Value};

use super::error::ValidationError;
use super::model::{Edge, Node, Properties, ValidatedGraph};

/// Checks an untyped document and converts it into a [`ValidatedGraph`].
///
/// Checks run in a fixed order and stop at the first failure: document shape,
/// `nodes` array, `edges` array, per-node fields, duplicate ids, then per-edge
/// fields. Edges pointing at unknown node ids are accepted here.
pub fn validate(input: &Value) -> Result<ValidatedGraph, ValidationError> {
    let object = input.as_object().ok_or(ValidationError::NotAnObject)?;

    let raw_nodes = object
        .get("nodes")
        .and_then(Value::as_array)
        .ok_or(ValidationError::MissingNodes)?;
    let raw_edges = object
        .get("edges")
        .and_then(Value::as_array)
        .ok_or(ValidationError::MissingEdges)?;

    let nodes = raw_nodes
        .iter()
        .enumerate()
        .map(|(index, value)| parse_node(index, value))
        .collect::<Result<Vec<_>, _>>()?;

    let mut seen = HashSet::with_capacity(nodes.len());
    for (index, node) in nodes.iter().enumerate() {
        if !seen.insert(node.id.as_str()) {
            return Err(ValidationError::DuplicateNodeId {
                id: node.id.clone(),
                index,
            });
        }
    }

    let edges = raw_edges
        .iter()
        .enumerate()
        .map(|(index, value)| parse_edge(index, value))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ValidatedGraph { nodes, edges })
}

fn non_empty_str<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    object
        .get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
}

fn parse_node(index: usize, value: &Value) -> Result<Node, ValidationError> {
    let object = value
        .as_object()
        .ok_or(ValidationError::NodeNotObject { index })?;

    let id = non_empty_str(object, "id").ok_or(ValidationError::InvalidNodeId { index })?;
    let name = object
        .get("name")
        .and_then(Value::as_str)
        .ok_or(ValidationError::InvalidNodeName { index })?;

    let categories = object
        .get("categories")
        .and_then(Value::as_array)
        .map(|labels| {
            labels
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    let color = non_empty_str(object, "color").map(str::to_owned);

    Ok(Node {
        id: id.to_owned(),
        name: name.to_owned(),
        categories,
        level: object.get("level").and_then(parse_level),
        color,
        properties: parse_properties(object),
    })
}

fn parse_edge(index: usize, value: &Value) -> Result<Edge, ValidationError> {
    let object = value
        .as_object()
        .ok_or(ValidationError::EdgeNotObject { index })?;

    let source_id =
        non_empty_str(object, "sourceId").ok_or(ValidationError::InvalidEdgeSource { index })?;
    let target_id =
        non_empty_str(object, "targetId").ok_or(ValidationError::InvalidEdgeTarget { index })?;

    Ok(Edge {
        source_id: source_id.to_owned(),
        target_id: target_id.to_owned(),
        properties: parse_properties(object),
    })
}

// Levels are optional hints; anything that is not a non-negative whole number
// is dropped instead of failing the document.
fn parse_level(value: &Value) -> Option<u32> {
    if let Some(level) = value.as_u64() {
        return u32::try_from(level).ok();
    }

    let level = value.as_f64()?;
    if level.is_finite() && level >= 0.0 && level.fract() == 0.0 && level <= u32::MAX as f64 {
        Some(level as u32)
    } else {
        None
    }
}

fn parse_properties(object: &Map<String, Value>) -> Option<Properties> {
    object.get("properties").and_then(Value::as_object).cloned()
}
