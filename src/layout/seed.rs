use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use eframe::egui::{Vec2, vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const LAYOUT_SEED: u64 = 0x9e37_79b9_7f4a_7c15;

/// Generator whose stream depends only on the node id.
fn rng_for_id(id: &str) -> StdRng {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    StdRng::seed_from_u64(hasher.finish() ^ LAYOUT_SEED)
}

/// Radius of the disc initial positions are scattered over.
pub(super) fn initial_spread(width: f32, height: f32) -> f32 {
    (width.min(height) * 0.3).max(1.0)
}

/// Starting position for a node, a pure function of its id, the center and
/// the spread. Points are uniform over the disc so dense graphs do not start
/// stacked on the center.
pub(super) fn seeded_position(id: &str, center: Vec2, spread: f32) -> Vec2 {
    let mut rng = rng_for_id(id);
    let angle = rng.gen_range(0.0..std::f32::consts::TAU);
    let radius = rng.gen_range(0.0f32..1.0).sqrt() * spread;
    center + vec2(angle.cos(), angle.sin()) * radius
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_id_same_position() {
        let center = vec2(400.0, 300.0);
        assert_eq!(
            seeded_position("node-a", center, 120.0),
            seeded_position("node-a", center, 120.0)
        );
        assert_ne!(
            seeded_position("node-a", center, 120.0),
            seeded_position("node-b", center, 120.0)
        );
    }

    #[test]
    fn stays_inside_the_spread() {
        let center = vec2(50.0, 50.0);
        for index in 0..200 {
            let position = seeded_position(&format!("n{index}"), center, 30.0);
            assert!((position - center).length() <= 30.0 + 1e-3);
        }
    }

    #[test]
    fn unit_samples_are_in_range() {
        let mut first = rng_for_id("x");
        let mut second = rng_for_id("x");
        for _ in 0..1000 {
            let value = first.gen_range(0.0f32..1.0);
            assert!((0.0..1.0).contains(&value));
            assert_eq!(value, second.gen_range(0.0f32..1.0));
        }
    }
}
