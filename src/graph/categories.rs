use std::collections::{BTreeSet, HashMap, HashSet};

use eframe::egui::Color32;

use super::color::parse_color;
use super::model::Node;

/// Synthetic group for nodes without any category label.
pub const UNCATEGORIZED: &str = "(uncategorized)";

pub const DEFAULT_NODE_COLOR: Color32 = Color32::from_rgb(148, 163, 184);

pub const CATEGORY_PALETTE: [Color32; 10] = [
    Color32::from_rgb(31, 119, 180),
    Color32::from_rgb(255, 127, 14),
    Color32::from_rgb(44, 160, 44),
    Color32::from_rgb(214, 39, 40),
    Color32::from_rgb(148, 103, 189),
    Color32::from_rgb(140, 86, 75),
    Color32::from_rgb(227, 119, 194),
    Color32::from_rgb(127, 127, 127),
    Color32::from_rgb(188, 189, 34),
    Color32::from_rgb(23, 190, 207),
];

/// Category labels of a node, or [`UNCATEGORIZED`] when it has none.
pub fn node_groups(node: &Node) -> impl Iterator<Item = &str> {
    let fallback = node.categories.is_empty().then_some(UNCATEGORIZED);
    node.categories.iter().map(String::as_str).chain(fallback)
}

/// Sorted category list with a palette color per category.
///
/// Colors are assigned by position in the sorted list, so the same set of
/// labels always gets the same colors regardless of document order.
#[derive(Clone, Debug, Default)]
pub struct CategoryPalette {
    categories: Vec<String>,
    colors: HashMap<String, Color32>,
    counts: HashMap<String, usize>,
}

impl CategoryPalette {
    pub fn from_nodes(nodes: &[Node]) -> Self {
        let mut labels = BTreeSet::new();
        let mut counts: HashMap<String, usize> = HashMap::new();

        for node in nodes {
            let mut seen = HashSet::new();
            for group in node_groups(node) {
                if !seen.insert(group) {
                    continue;
                }
                *counts.entry(group.to_owned()).or_default() += 1;
            }
            labels.extend(node.categories.iter().map(String::as_str));
        }

        let categories = labels.into_iter().map(str::to_owned).collect::<Vec<_>>();
        let colors = categories
            .iter()
            .enumerate()
            .map(|(index, label)| {
                (
                    label.clone(),
                    CATEGORY_PALETTE[index % CATEGORY_PALETTE.len()],
                )
            })
            .collect();

        Self {
            categories,
            colors,
            counts,
        }
    }

    /// Distinct real category labels, sorted.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Groups to offer in a filter: every category, then [`UNCATEGORIZED`]
    /// when at least one node has no category.
    pub fn filter_groups(&self) -> impl Iterator<Item = &str> {
        let uncategorized = self
            .counts
            .contains_key(UNCATEGORIZED)
            .then_some(UNCATEGORIZED);
        self.categories.iter().map(String::as_str).chain(uncategorized)
    }

    pub fn category_color(&self, category: &str) -> Option<Color32> {
        self.colors.get(category).copied()
    }

    /// Number of nodes in a group; a node with repeated labels counts once.
    pub fn count(&self, group: &str) -> usize {
        self.counts.get(group).copied().unwrap_or(0)
    }

    /// Valid explicit override, then first category color, then the default.
    pub fn node_color(&self, node: &Node) -> Color32 {
        node.color
            .as_deref()
            .and_then(parse_color)
            .or_else(|| {
                node.first_category()
                    .and_then(|category| self.category_color(category))
            })
            .unwrap_or(DEFAULT_NODE_COLOR)
    }
}

/// Hidden-group set. A node is hidden as soon as any one of its groups is
/// hidden, even when its other categories are visible.
#[derive(Clone, Debug, Default)]
pub struct CategoryFilter {
    hidden: HashSet<String>,
}

impl CategoryFilter {
    pub fn is_hidden(&self, group: &str) -> bool {
        self.hidden.contains(group)
    }

    pub fn set_hidden(&mut self, group: &str, hidden: bool) {
        if hidden {
            self.hidden.insert(group.to_owned());
        } else {
            self.hidden.remove(group);
        }
    }

    pub fn toggle(&mut self, group: &str) {
        let hidden = self.is_hidden(group);
        self.set_hidden(group, !hidden);
    }

    pub fn show_all(&mut self) {
        self.hidden.clear();
    }

    pub fn has_hidden(&self) -> bool {
        !self.hidden.is_empty()
    }

    pub fn is_node_visible(&self, node: &Node) -> bool {
        !node_groups(node).any(|group| self.hidden.contains(group))
    }
}
