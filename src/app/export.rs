use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use nodescope::graph::LoadedGraph;
use nodescope::layout::{LayoutMode, LayoutSnapshot};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportedLayout<'a> {
    mode: &'static str,
    is_stable: bool,
    tick: u64,
    nodes: Vec<ExportedNode<'a>>,
    links: Vec<ExportedLink<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportedNode<'a> {
    id: &'a str,
    name: &'a str,
    x: f32,
    y: f32,
    pinned: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportedLink<'a> {
    source_id: &'a str,
    target_id: &'a str,
}

fn exported_layout<'a>(
    loaded: &'a LoadedGraph,
    snapshot: &LayoutSnapshot,
    mode: LayoutMode,
) -> ExportedLayout<'a> {
    let nodes = snapshot
        .nodes
        .iter()
        .filter_map(|entry| {
            let node = loaded.graph.nodes.get(entry.node)?;
            Some(ExportedNode {
                id: &node.id,
                name: &node.name,
                x: entry.position.x,
                y: entry.position.y,
                pinned: entry.pinned,
            })
        })
        .collect();

    let links = snapshot
        .links
        .iter()
        .filter_map(|link| {
            let edge = loaded.graph.edges.get(link.edge)?;
            Some(ExportedLink {
                source_id: &edge.source_id,
                target_id: &edge.target_id,
            })
        })
        .collect();

    ExportedLayout {
        mode: mode.label(),
        is_stable: snapshot.is_stable,
        tick: snapshot.tick,
        nodes,
        links,
    }
}

/// Writes the snapshot's node coordinates and laid-out links as pretty JSON.
pub(super) fn export_layout(
    path: &Path,
    loaded: &LoadedGraph,
    snapshot: &LayoutSnapshot,
    mode: LayoutMode,
) -> Result<()> {
    let document = exported_layout(loaded, snapshot, mode);
    let json = serde_json::to_string_pretty(&document).context("failed to serialize layout")?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;

    info!(path = %path.display(), nodes = document.nodes.len(), "layout exported");
    Ok(())
}
