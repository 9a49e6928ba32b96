use std::collections::HashMap;

use eframe::egui::{Vec2, vec2};
use tracing::debug;

use crate::graph::ValidatedGraph;

use super::forces::{
    Collision, Spring, apply_centering, apply_charge, apply_collisions, apply_radial, apply_springs,
};
use super::params::{LayoutConfig, LayoutMode, LayoutParameters, ParameterUpdate};
use super::quadtree::QuadTree;
use super::seed::{initial_spread, seeded_position};

/// The run is considered settled once alpha drops below this.
pub const ALPHA_MIN: f32 = 0.001;
/// Alpha after a live parameter change.
pub const REHEAT_ALPHA: f32 = 0.3;
/// Alpha the simulation is held toward while any node is pinned.
pub const DRAG_ALPHA_TARGET: f32 = 0.3;
/// Cooling reaches [`ALPHA_MIN`] from 1 in this many ticks.
const COOLING_TICKS: f32 = 300.0;
const VELOCITY_DECAY: f32 = 0.4;
const COLLISION_STRENGTH: f32 = 1.0;
const RADIAL_STRENGTH: f32 = 0.3;
const MAX_SPEED: f32 = 200.0;

#[derive(Clone, Debug, PartialEq)]
pub struct LayoutNode {
    /// Position of the node in [`ValidatedGraph::nodes`].
    pub index: usize,
    pub id: String,
    pub position: Vec2,
    pub velocity: Vec2,
    /// While set, the node sits here and ignores forces.
    pub pinned: Option<Vec2>,
    pub level: Option<u32>,
}

impl LayoutNode {
    pub(super) fn new_at(index: usize, id: String, position: Vec2, level: Option<u32>) -> Self {
        Self {
            index,
            id,
            position,
            velocity: Vec2::ZERO,
            pinned: None,
            level,
        }
    }
}

/// Edge with both endpoints resolved to slots in [`LayoutEngine::nodes`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutEdge {
    /// Position of the edge in [`ValidatedGraph::edges`].
    pub index: usize,
    pub source: usize,
    pub target: usize,
}

/// Force simulation over one graph, viewport and mode.
///
/// Each [`tick`](Self::tick) cools `alpha` toward its target, accumulates
/// forces into velocities, then integrates positions. Once alpha falls below
/// [`ALPHA_MIN`] the engine stops moving nodes until it is re-heated by a
/// parameter change or a pin.
pub struct LayoutEngine {
    mode: LayoutMode,
    params: LayoutParameters,
    center: Vec2,
    nodes: Vec<LayoutNode>,
    edges: Vec<LayoutEdge>,
    springs: Vec<Spring>,
    slot_by_id: HashMap<String, usize>,
    radial_targets: Vec<f32>,
    alpha: f32,
    alpha_target: f32,
    alpha_decay: f32,
    running: bool,
    ticks: u64,
    positions: Vec<Vec2>,
    predicted: Vec<Vec2>,
}

impl LayoutEngine {
    pub fn new(graph: &ValidatedGraph, config: &LayoutConfig) -> Self {
        let center = vec2(config.width * 0.5, config.height * 0.5);
        let params = config.effective_params();

        let mut engine = Self {
            mode: config.mode,
            params,
            center,
            nodes: Vec::new(),
            edges: Vec::new(),
            springs: Vec::new(),
            slot_by_id: HashMap::new(),
            radial_targets: Vec::new(),
            alpha: 1.0,
            alpha_target: 0.0,
            alpha_decay: 1.0 - ALPHA_MIN.powf(1.0 / COOLING_TICKS),
            running: false,
            ticks: 0,
            positions: Vec::new(),
            predicted: Vec::new(),
        };

        if !config.has_area() {
            debug!(
                width = config.width,
                height = config.height,
                "viewport has no area, layout stays empty"
            );
            return engine;
        }

        let spread = initial_spread(config.width, config.height);
        engine.nodes = graph
            .nodes
            .iter()
            .enumerate()
            .map(|(index, node)| {
                LayoutNode::new_at(
                    index,
                    node.id.clone(),
                    seeded_position(&node.id, center, spread),
                    node.level,
                )
            })
            .collect();
        engine.slot_by_id = engine
            .nodes
            .iter()
            .enumerate()
            .map(|(slot, node)| (node.id.clone(), slot))
            .collect();

        engine.edges = graph
            .edges
            .iter()
            .enumerate()
            .filter_map(|(index, edge)| {
                Some(LayoutEdge {
                    index,
                    source: *engine.slot_by_id.get(&edge.source_id)?,
                    target: *engine.slot_by_id.get(&edge.target_id)?,
                })
            })
            .collect();

        let mut degrees = vec![0usize; engine.nodes.len()];
        for edge in engine.edges.iter().filter(|edge| edge.source != edge.target) {
            degrees[edge.source] += 1;
            degrees[edge.target] += 1;
        }
        engine.springs = engine
            .edges
            .iter()
            .filter(|edge| edge.source != edge.target)
            .map(|edge| Spring::between(edge.source, edge.target, &degrees))
            .collect();

        if engine.mode == LayoutMode::Radial {
            engine.radial_targets = radial_targets(&engine.nodes);
        }

        engine.running = !engine.nodes.is_empty();
        debug!(
            nodes = engine.nodes.len(),
            edges = engine.edges.len(),
            skipped_edges = graph.edges.len() - engine.edges.len(),
            mode = engine.mode.label(),
            "layout engine built"
        );
        engine
    }

    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    pub fn params(&self) -> LayoutParameters {
        self.params
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn nodes(&self) -> &[LayoutNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[LayoutEdge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&LayoutNode> {
        self.slot_by_id.get(id).and_then(|&slot| self.nodes.get(slot))
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_stable(&self) -> bool {
        !self.running
    }

    /// Advances one step. Returns whether the engine is still running; a
    /// stable engine does nothing.
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }

        self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;
        self.apply_forces();
        self.integrate();
        self.ticks += 1;

        if self.alpha < ALPHA_MIN {
            self.running = false;
            debug!(ticks = self.ticks, "layout settled");
        }
        self.running
    }

    fn apply_forces(&mut self) {
        let alpha = self.alpha;

        apply_springs(
            &mut self.nodes,
            &self.springs,
            self.params.link_distance,
            alpha,
        );

        if self.nodes.len() > 1 {
            self.positions.clear();
            self.positions
                .extend(self.nodes.iter().map(|node| node.position));
            if let Some(tree) = QuadTree::build(&self.positions) {
                apply_charge(
                    &mut self.nodes,
                    &tree,
                    &self.positions,
                    self.params.charge_strength,
                    alpha,
                );
            }

            self.predicted.clear();
            self.predicted
                .extend(self.nodes.iter().map(|node| node.position + node.velocity));
            if let Some(tree) = QuadTree::build(&self.predicted) {
                apply_collisions(
                    &mut self.nodes,
                    &tree,
                    &self.predicted,
                    Collision {
                        min_distance: self.params.collision_radius,
                        strength: COLLISION_STRENGTH,
                    },
                );
            }
        }

        apply_centering(&mut self.nodes, self.center);

        if self.mode == LayoutMode::Radial {
            apply_radial(
                &mut self.nodes,
                &self.radial_targets,
                self.center,
                RADIAL_STRENGTH,
                alpha,
            );
        }
    }

    fn integrate(&mut self) {
        let center = self.center;
        for node in &mut self.nodes {
            if let Some(pin) = node.pinned {
                node.position = pin;
                node.velocity = Vec2::ZERO;
                continue;
            }

            node.velocity *= 1.0 - VELOCITY_DECAY;
            let speed_sq = node.velocity.length_sq();
            if speed_sq > MAX_SPEED * MAX_SPEED {
                node.velocity *= MAX_SPEED / speed_sq.sqrt();
            }
            node.position += node.velocity;

            if !node.position.is_finite() {
                node.position = center;
                node.velocity = Vec2::ZERO;
            }
        }
    }

    /// Raises alpha to at least `alpha` and resumes ticking.
    pub fn reheat(&mut self, alpha: f32) {
        self.alpha = self.alpha.max(alpha);
        self.running = !self.nodes.is_empty();
    }

    /// Applies a live parameter change in place, keeping positions.
    ///
    /// Returns `false` without re-heating when nothing changed or when the
    /// engine runs in radial mode, whose constants are fixed.
    pub fn set_params(&mut self, update: ParameterUpdate) -> bool {
        if self.mode == LayoutMode::Radial {
            debug!("radial layout ignores parameter updates");
            return false;
        }

        let params = self.params.with_update(update);
        if params == self.params {
            return false;
        }

        debug!(
            link_distance = params.link_distance,
            charge_strength = params.charge_strength,
            collision_radius = params.collision_radius,
            "layout parameters changed"
        );
        self.params = params;
        self.reheat(REHEAT_ALPHA);
        true
    }

    /// Holds a node at `(x, y)` and keeps the simulation warm while any node
    /// is pinned.
    pub fn pin_node(&mut self, id: &str, x: f32, y: f32) -> bool {
        let Some(&slot) = self.slot_by_id.get(id) else {
            return false;
        };

        let pin = vec2(x, y);
        if !pin.is_finite() {
            return false;
        }

        let node = &mut self.nodes[slot];
        node.pinned = Some(pin);
        node.position = pin;
        node.velocity = Vec2::ZERO;

        self.alpha_target = DRAG_ALPHA_TARGET;
        self.running = true;
        true
    }

    pub fn unpin_node(&mut self, id: &str) -> bool {
        let Some(&slot) = self.slot_by_id.get(id) else {
            return false;
        };

        if self.nodes[slot].pinned.take().is_none() {
            return false;
        }

        if self.nodes.iter().all(|node| node.pinned.is_none()) {
            self.alpha_target = 0.0;
        }
        debug!(id, "node released");
        true
    }

    /// Stops the run for good; later ticks are no-ops until re-heated.
    pub fn stop(&mut self) {
        self.running = false;
        self.alpha_target = 0.0;
    }
}

/// Target ring radius per node. Level `k` sits on ring `k`; nodes without a
/// level go one ring past the deepest observed level.
fn radial_targets(nodes: &[LayoutNode]) -> Vec<f32> {
    let unleveled_ring = nodes
        .iter()
        .filter_map(|node| node.level)
        .max()
        .unwrap_or(0)
        .saturating_add(1);

    nodes
        .iter()
        .map(|node| node.level.unwrap_or(unleveled_ring) as f32 * LayoutParameters::RING_SPACING)
        .collect()
}
