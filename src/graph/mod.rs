mod categories;
mod color;
mod error;
mod index;
mod load;
mod model;
mod validate;

pub use categories::{
    CATEGORY_PALETTE, CategoryFilter, CategoryPalette, DEFAULT_NODE_COLOR, UNCATEGORIZED,
    node_groups,
};
pub use color::parse_color;
pub use error::ValidationError;
pub use index::{GraphIndex, GraphStats, build_index, compute_stats};
pub use load::{LoadedGraph, load_graph_file, parse_graph_document};
pub use model::{Edge, Node, Properties, ValidatedGraph};
pub use validate::validate;
