use eframe::egui::{Vec2, vec2};

use super::engine::LayoutNode;
use super::quadtree::QuadTree;

const BARNES_HUT_THETA_SQ: f32 = 0.9 * 0.9;
/// Charge is capped below this squared distance so close pairs do not explode.
const CHARGE_DISTANCE_MIN_SQ: f32 = 1.0;
const COINCIDENT_EPSILON: f32 = 1e-6;

/// Link spring with strength and bias precomputed from endpoint degrees, so
/// hubs move less than leaves.
#[derive(Clone, Copy, Debug)]
pub(super) struct Spring {
    pub(super) source: usize,
    pub(super) target: usize,
    pub(super) strength: f32,
    pub(super) bias: f32,
}

impl Spring {
    pub(super) fn between(source: usize, target: usize, degrees: &[usize]) -> Self {
        let source_degree = degrees[source].max(1) as f32;
        let target_degree = degrees[target].max(1) as f32;
        Self {
            source,
            target,
            strength: 1.0 / source_degree.min(target_degree),
            bias: source_degree / (source_degree + target_degree),
        }
    }
}

/// Unit vector used when two points coincide. Antisymmetric in its arguments
/// so the pair is pushed in opposite directions.
fn separation_direction(from: usize, to: usize) -> Vec2 {
    let (low, high) = (from.min(to), from.max(to));
    let angle = ((low as f32) * 0.618_034 + (high as f32) * 0.414_214) * std::f32::consts::TAU;
    let direction = vec2(angle.cos(), angle.sin());
    if from < to { direction } else { -direction }
}

pub(super) fn apply_springs(nodes: &mut [LayoutNode], springs: &[Spring], distance: f32, alpha: f32) {
    for spring in springs {
        let (source, target) = (spring.source, spring.target);
        if source == target {
            continue;
        }

        let mut delta = (nodes[target].position + nodes[target].velocity)
            - (nodes[source].position + nodes[source].velocity);
        let mut length = delta.length();
        if length < COINCIDENT_EPSILON {
            delta = separation_direction(source, target) * 1e-3;
            length = 1e-3;
        }

        let correction = delta * ((length - distance) / length * alpha * spring.strength);
        nodes[target].velocity -= correction * spring.bias;
        nodes[source].velocity += correction * (1.0 - spring.bias);
    }
}

/// Many-body charge with the Barnes-Hut approximation. Negative `strength`
/// repels.
pub(super) fn apply_charge(
    nodes: &mut [LayoutNode],
    tree: &QuadTree,
    positions: &[Vec2],
    strength: f32,
    alpha: f32,
) {
    let scale = strength * alpha;
    for (index, node) in nodes.iter_mut().enumerate() {
        node.velocity += charge_on(tree, index, positions, scale);
    }
}

fn charge_between(delta: Vec2, weight: f32) -> Vec2 {
    let mut distance_sq = delta.length_sq();
    if distance_sq < CHARGE_DISTANCE_MIN_SQ {
        distance_sq = (CHARGE_DISTANCE_MIN_SQ * distance_sq).sqrt();
    }
    delta * (weight / distance_sq)
}

fn charge_on(cell: &QuadTree, index: usize, positions: &[Vec2], scale: f32) -> Vec2 {
    if cell.count == 0 {
        return Vec2::ZERO;
    }

    let point = positions[index];

    if cell.is_leaf() {
        let mut velocity = Vec2::ZERO;
        for &other in &cell.points {
            if other == index {
                continue;
            }
            let mut delta = positions[other] - point;
            if delta.length_sq() < COINCIDENT_EPSILON {
                delta = separation_direction(index, other) * 1e-3;
            }
            velocity += charge_between(delta, scale);
        }
        return velocity;
    }

    let delta = cell.centroid - point;
    let width = cell.bounds.width();
    let far_enough = (width * width) / BARNES_HUT_THETA_SQ < delta.length_sq();
    if far_enough && !cell.bounds.contains(point) {
        return charge_between(delta, scale * cell.count as f32);
    }

    cell.children()
        .map(|child| charge_on(child, index, positions, scale))
        .fold(Vec2::ZERO, |sum, velocity| sum + velocity)
}

#[derive(Clone, Copy)]
pub(super) struct Collision {
    pub(super) min_distance: f32,
    pub(super) strength: f32,
}

/// Pushes apart every pair whose predicted centers are closer than
/// `min_distance`. `predicted` holds position plus velocity, and `tree` must be
/// built over it.
pub(super) fn apply_collisions(
    nodes: &mut [LayoutNode],
    tree: &QuadTree,
    predicted: &[Vec2],
    collision: Collision,
) {
    if collision.min_distance <= 0.0 {
        return;
    }
    collide_cells(tree, tree, true, predicted, collision, nodes);
}

fn collide_pair(
    from: usize,
    to: usize,
    predicted: &[Vec2],
    collision: Collision,
    nodes: &mut [LayoutNode],
) {
    let mut delta = predicted[from] - predicted[to];
    let distance_sq = delta.length_sq();
    let min_distance = collision.min_distance;
    if distance_sq >= min_distance * min_distance {
        return;
    }

    let mut distance = distance_sq.sqrt();
    if distance < COINCIDENT_EPSILON {
        delta = separation_direction(from, to) * 1e-3;
        distance = 1e-3;
    }

    let push = delta * ((min_distance - distance) / distance * collision.strength * 0.5);
    nodes[from].velocity += push;
    nodes[to].velocity -= push;
}

fn collide_cells(
    cell_a: &QuadTree,
    cell_b: &QuadTree,
    same_cell: bool,
    predicted: &[Vec2],
    collision: Collision,
    nodes: &mut [LayoutNode],
) {
    if cell_a.bounds.gap_sq(cell_b.bounds) > collision.min_distance * collision.min_distance {
        return;
    }

    if cell_a.is_leaf() && cell_b.is_leaf() {
        if same_cell {
            for (offset, &from) in cell_a.points.iter().enumerate() {
                for &to in &cell_a.points[offset + 1..] {
                    collide_pair(from, to, predicted, collision, nodes);
                }
            }
        } else {
            for &from in &cell_a.points {
                for &to in &cell_b.points {
                    collide_pair(from, to, predicted, collision, nodes);
                }
            }
        }
        return;
    }

    if same_cell {
        let children = cell_a.children().collect::<Vec<_>>();
        for (offset, first) in children.iter().enumerate() {
            collide_cells(first, first, true, predicted, collision, nodes);
            for second in &children[offset + 1..] {
                collide_cells(first, second, false, predicted, collision, nodes);
            }
        }
        return;
    }

    let split_a = if cell_a.is_leaf() {
        false
    } else if cell_b.is_leaf() {
        true
    } else {
        cell_a.bounds.half_extent >= cell_b.bounds.half_extent
    };

    if split_a {
        for child in cell_a.children() {
            collide_cells(child, cell_b, false, predicted, collision, nodes);
        }
    } else {
        for child in cell_b.children() {
            collide_cells(cell_a, child, false, predicted, collision, nodes);
        }
    }
}

/// Translates every node so their mean position sits on `center`.
pub(super) fn apply_centering(nodes: &mut [LayoutNode], center: Vec2) {
    if nodes.is_empty() {
        return;
    }

    let mean = nodes
        .iter()
        .fold(Vec2::ZERO, |sum, node| sum + node.position)
        / nodes.len() as f32;
    let shift = center - mean;
    for node in nodes {
        node.position += shift;
    }
}

/// Pulls each node toward its target distance from `center`.
pub(super) fn apply_radial(
    nodes: &mut [LayoutNode],
    targets: &[f32],
    center: Vec2,
    strength: f32,
    alpha: f32,
) {
    for (node, &target) in nodes.iter_mut().zip(targets) {
        let delta = (node.position + node.velocity) - center;
        let radius = delta.length();
        if radius < COINCIDENT_EPSILON {
            continue;
        }
        node.velocity += delta * ((target - radius) * strength * alpha / radius);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_at(x: f32, y: f32) -> LayoutNode {
        LayoutNode::new_at(0, String::new(), vec2(x, y), None)
    }

    #[test]
    fn spring_pulls_stretched_pair_together() {
        let mut nodes = vec![node_at(0.0, 0.0), node_at(200.0, 0.0)];
        let springs = [Spring::between(0, 1, &[1, 1])];
        apply_springs(&mut nodes, &springs, 100.0, 1.0);

        assert!(nodes[0].velocity.x > 0.0);
        assert!(nodes[1].velocity.x < 0.0);
        assert!((nodes[0].velocity.x + nodes[1].velocity.x).abs() < 1e-4);
    }

    #[test]
    fn spring_strength_follows_degree() {
        let spring = Spring::between(0, 1, &[4, 1]);
        assert_eq!(spring.strength, 1.0);
        assert_eq!(spring.bias, 0.8);
    }

    #[test]
    fn negative_charge_repels() {
        let positions = vec![vec2(0.0, 0.0), vec2(10.0, 0.0)];
        let mut nodes = positions.iter().map(|p| node_at(p.x, p.y)).collect::<Vec<_>>();
        let tree = QuadTree::build(&positions).unwrap();
        apply_charge(&mut nodes, &tree, &positions, -30.0, 1.0);

        assert!(nodes[0].velocity.x < 0.0);
        assert!(nodes[1].velocity.x > 0.0);
    }

    #[test]
    fn distant_cluster_is_approximated_closely() {
        let mut positions = vec![vec2(0.0, 0.0)];
        positions.extend((0..20).map(|index| {
            vec2(1000.0 + (index % 5) as f32 * 0.5, (index / 5) as f32 * 0.5)
        }));
        let tree = QuadTree::build(&positions).unwrap();
        assert!(!tree.is_leaf());

        let approximate = charge_on(&tree, 0, &positions, -30.0);
        let exact = (1..positions.len())
            .map(|other| charge_between(positions[other] - positions[0], -30.0))
            .fold(Vec2::ZERO, |sum, velocity| sum + velocity);

        assert!((approximate - exact).length() <= exact.length() * 0.01);
    }

    #[test]
    fn collision_separates_overlapping_nodes() {
        let predicted = vec![vec2(0.0, 0.0), vec2(4.0, 0.0), vec2(500.0, 500.0)];
        let mut nodes = predicted.iter().map(|p| node_at(p.x, p.y)).collect::<Vec<_>>();
        let tree = QuadTree::build(&predicted).unwrap();
        apply_collisions(
            &mut nodes,
            &tree,
            &predicted,
            Collision {
                min_distance: 10.0,
                strength: 1.0,
            },
        );

        assert!(nodes[0].velocity.x < 0.0);
        assert!(nodes[1].velocity.x > 0.0);
        assert_eq!(nodes[2].velocity, Vec2::ZERO);
    }

    #[test]
    fn coincident_nodes_get_opposite_pushes() {
        let predicted = vec![vec2(1.0, 1.0), vec2(1.0, 1.0)];
        let mut nodes = predicted.iter().map(|p| node_at(p.x, p.y)).collect::<Vec<_>>();
        let tree = QuadTree::build(&predicted).unwrap();
        apply_collisions(
            &mut nodes,
            &tree,
            &predicted,
            Collision {
                min_distance: 10.0,
                strength: 1.0,
            },
        );

        assert!(nodes[0].velocity.length() > 0.0);
        assert!((nodes[0].velocity + nodes[1].velocity).length() < 1e-3);
    }

    #[test]
    fn centering_moves_mean_onto_center() {
        let mut nodes = vec![node_at(0.0, 0.0), node_at(10.0, 20.0)];
        apply_centering(&mut nodes, vec2(100.0, 100.0));
        let mean = (nodes[0].position + nodes[1].position) / 2.0;
        assert!((mean - vec2(100.0, 100.0)).length() < 1e-4);
    }

    #[test]
    fn radial_pulls_toward_ring() {
        let mut nodes = vec![node_at(10.0, 0.0), node_at(300.0, 0.0)];
        apply_radial(&mut nodes, &[100.0, 100.0], Vec2::ZERO, 0.5, 1.0);
        assert!(nodes[0].velocity.x > 0.0);
        assert!(nodes[1].velocity.x < 0.0);
    }
}
