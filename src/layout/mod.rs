mod engine;
mod feed;
mod forces;
mod handle;
mod params;
mod quadtree;
mod seed;

pub use engine::{ALPHA_MIN, DRAG_ALPHA_TARGET, LayoutEdge, LayoutEngine, LayoutNode, REHEAT_ALPHA};
pub use feed::{
    FrameScheduler, LayoutSnapshot, LinkPosition, NodePosition, RenderFeed, RepaintScheduler,
};
pub use handle::{LayoutHandle, MAX_TICKS_PER_ADVANCE, TICK_INTERVAL, create_layout};
pub use params::{LayoutConfig, LayoutMode, LayoutParameters, ParameterUpdate};
