use eframe::egui::{Vec2, vec2};

const LEAF_CAPACITY: usize = 8;
const MAX_DEPTH: usize = 12;

/// Axis-aligned square cell.
#[derive(Clone, Copy, Debug)]
pub(super) struct Square {
    pub(super) center: Vec2,
    pub(super) half_extent: f32,
}

impl Square {
    fn enclosing(points: &[Vec2]) -> Option<Self> {
        let mut min = vec2(f32::INFINITY, f32::INFINITY);
        let mut max = vec2(f32::NEG_INFINITY, f32::NEG_INFINITY);
        for point in points {
            min = min.min(*point);
            max = max.max(*point);
        }

        if !min.x.is_finite() || !min.y.is_finite() || !max.x.is_finite() || !max.y.is_finite() {
            return None;
        }

        let span = (max - min).max_elem().max(1.0);
        Some(Self {
            center: (min + max) * 0.5,
            half_extent: span * 0.5 + 1.0,
        })
    }

    pub(super) fn contains(self, point: Vec2) -> bool {
        let offset = (point - self.center).abs();
        offset.x <= self.half_extent && offset.y <= self.half_extent
    }

    pub(super) fn width(self) -> f32 {
        self.half_extent * 2.0
    }

    /// Squared gap between two squares; zero when they touch or overlap.
    pub(super) fn gap_sq(self, other: Self) -> f32 {
        let reach = self.half_extent + other.half_extent;
        let gap = ((self.center - other.center).abs() - vec2(reach, reach)).max(Vec2::ZERO);
        gap.length_sq()
    }

    fn quadrant_of(self, point: Vec2) -> usize {
        usize::from(point.x >= self.center.x) | (usize::from(point.y >= self.center.y) << 1)
    }

    fn quadrant(self, quadrant: usize) -> Self {
        let quarter = self.half_extent * 0.5;
        let sign = |bit: usize| if quadrant & bit == 0 { -1.0 } else { 1.0 };
        Self {
            center: self.center + vec2(sign(1) * quarter, sign(2) * quarter),
            half_extent: quarter,
        }
    }
}

/// Region quadtree over a point set. Every cell knows how many points it
/// holds and their centroid; only leaves keep point indices.
pub(super) struct QuadTree {
    pub(super) bounds: Square,
    pub(super) centroid: Vec2,
    pub(super) count: usize,
    pub(super) points: Vec<usize>,
    pub(super) children: [Option<Box<QuadTree>>; 4],
}

impl QuadTree {
    pub(super) fn build(points: &[Vec2]) -> Option<Self> {
        let bounds = Square::enclosing(points)?;
        Some(Self::build_cell(
            bounds,
            (0..points.len()).collect(),
            points,
            0,
        ))
    }

    fn build_cell(bounds: Square, members: Vec<usize>, points: &[Vec2], depth: usize) -> Self {
        let count = members.len();
        let centroid = if count > 0 {
            members
                .iter()
                .fold(Vec2::ZERO, |sum, &index| sum + points[index])
                / count as f32
        } else {
            Vec2::ZERO
        };

        let mut cell = Self {
            bounds,
            centroid,
            count,
            points: members,
            children: std::array::from_fn(|_| None),
        };

        if depth >= MAX_DEPTH || cell.points.len() <= LEAF_CAPACITY {
            return cell;
        }

        let mut buckets: [Vec<usize>; 4] = std::array::from_fn(|_| Vec::new());
        for &index in &cell.points {
            buckets[bounds.quadrant_of(points[index])].push(index);
        }

        // Coincident points would otherwise recurse to MAX_DEPTH for nothing.
        if buckets.iter().filter(|bucket| !bucket.is_empty()).count() <= 1 {
            return cell;
        }

        for (quadrant, bucket) in buckets.into_iter().enumerate() {
            if !bucket.is_empty() {
                cell.children[quadrant] = Some(Box::new(Self::build_cell(
                    bounds.quadrant(quadrant),
                    bucket,
                    points,
                    depth + 1,
                )));
            }
        }
        cell.points.clear();
        cell
    }

    pub(super) fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }

    pub(super) fn children(&self) -> impl Iterator<Item = &QuadTree> {
        self.children.iter().filter_map(|child| child.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf_points(tree: &QuadTree, out: &mut Vec<usize>) {
        out.extend(&tree.points);
        for child in tree.children() {
            leaf_points(child, out);
        }
    }

    #[test]
    fn every_point_lands_in_exactly_one_leaf() {
        let points = (0..200)
            .map(|index| {
                let t = index as f32 * 0.37;
                vec2(t.cos() * index as f32, t.sin() * index as f32)
            })
            .collect::<Vec<_>>();
        let tree = QuadTree::build(&points).unwrap();

        let mut collected = Vec::new();
        leaf_points(&tree, &mut collected);
        collected.sort_unstable();
        assert_eq!(collected, (0..200).collect::<Vec<_>>());
        assert_eq!(tree.count, 200);
        assert!(!tree.is_leaf());
    }

    #[test]
    fn coincident_points_stay_in_one_leaf() {
        let points = vec![vec2(3.0, 3.0); 40];
        let tree = QuadTree::build(&points).unwrap();
        assert!(tree.is_leaf());
        assert_eq!(tree.points.len(), 40);
        assert_eq!(tree.centroid, vec2(3.0, 3.0));
    }

    #[test]
    fn empty_or_non_finite_input_has_no_tree() {
        assert!(QuadTree::build(&[]).is_none());
        assert!(QuadTree::build(&[vec2(f32::NAN, 0.0)]).is_none());
    }

    #[test]
    fn square_gap() {
        let a = Square {
            center: vec2(0.0, 0.0),
            half_extent: 1.0,
        };
        let b = Square {
            center: vec2(5.0, 0.0),
            half_extent: 1.0,
        };
        assert_eq!(a.gap_sq(b), 9.0);
        assert_eq!(a.gap_sq(a), 0.0);
        assert!(a.contains(vec2(1.0, -1.0)));
        assert!(!a.contains(vec2(1.5, 0.0)));
    }
}
