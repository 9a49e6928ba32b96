use std::sync::Arc;

use eframe::egui::Vec2;

use super::engine::LayoutEngine;

/// Host primitive that runs a callback on the next display frame.
///
/// The feed keeps at most one request outstanding, so implementations do not
/// need to deduplicate.
pub trait FrameScheduler {
    fn request_frame(&mut self);

    /// Withdraws the outstanding request, if the host supports it.
    fn cancel_frame(&mut self) {}
}

/// Repaints an egui context on the next frame.
#[derive(Clone)]
pub struct RepaintScheduler {
    ctx: eframe::egui::Context,
}

impl RepaintScheduler {
    pub fn new(ctx: eframe::egui::Context) -> Self {
        Self { ctx }
    }
}

impl FrameScheduler for RepaintScheduler {
    fn request_frame(&mut self) {
        self.ctx.request_repaint();
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodePosition {
    /// Position of the node in the graph's node list.
    pub node: usize,
    pub position: Vec2,
    pub pinned: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinkPosition {
    /// Position of the edge in the graph's edge list.
    pub edge: usize,
    pub source: usize,
    pub target: usize,
    pub from: Vec2,
    pub to: Vec2,
}

/// Positions as of one engine tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayoutSnapshot {
    pub nodes: Vec<NodePosition>,
    pub links: Vec<LinkPosition>,
    pub is_stable: bool,
    /// Engine tick the snapshot was taken at.
    pub tick: u64,
}

impl LayoutSnapshot {
    fn capture(&mut self, engine: &LayoutEngine) {
        let nodes = engine.nodes();

        self.nodes.clear();
        self.nodes.extend(nodes.iter().map(|node| NodePosition {
            node: node.index,
            position: node.position,
            pinned: node.pinned.is_some(),
        }));

        self.links.clear();
        self.links.extend(engine.edges().iter().map(|edge| LinkPosition {
            edge: edge.index,
            source: nodes[edge.source].index,
            target: nodes[edge.target].index,
            from: nodes[edge.source].position,
            to: nodes[edge.target].position,
        }));

        self.is_stable = engine.is_stable();
        self.tick = engine.ticks();
    }
}

/// Throttled publication of engine state.
///
/// The engine mutates its node buffer on every tick; consumers only ever see
/// the snapshot this feed last committed. Ticks arriving while a frame is
/// already requested fold into that request, and the frame captures whatever
/// the engine holds when it fires. The tick that settles the engine publishes
/// straight away.
pub struct RenderFeed {
    snapshot: Arc<LayoutSnapshot>,
    frame_pending: bool,
    closed: bool,
    revision: u64,
}

impl RenderFeed {
    /// Starts with a snapshot of the engine's current (seeded) positions.
    pub fn new(engine: &LayoutEngine) -> Self {
        let mut snapshot = LayoutSnapshot::default();
        snapshot.capture(engine);
        Self {
            snapshot: Arc::new(snapshot),
            frame_pending: false,
            closed: false,
            revision: 0,
        }
    }

    /// Latest committed snapshot; shared, never mutated once handed out.
    pub fn snapshot(&self) -> Arc<LayoutSnapshot> {
        Arc::clone(&self.snapshot)
    }

    pub fn is_stable(&self) -> bool {
        self.snapshot.is_stable
    }

    pub fn is_frame_pending(&self) -> bool {
        self.frame_pending
    }

    /// Number of snapshots published after the initial one.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Requests a frame unless one is already outstanding.
    pub fn request_refresh(&mut self, scheduler: &mut dyn FrameScheduler) {
        if self.closed || self.frame_pending {
            return;
        }
        self.frame_pending = true;
        scheduler.request_frame();
    }

    /// Called after every engine tick.
    pub fn on_tick(&mut self, engine: &LayoutEngine, scheduler: &mut dyn FrameScheduler) {
        if self.closed {
            return;
        }

        if engine.is_stable() {
            if self.frame_pending {
                self.frame_pending = false;
                scheduler.cancel_frame();
            }
            self.publish(engine);
            return;
        }

        self.request_refresh(scheduler);
    }

    /// Called when the requested frame fires. Returns whether a new snapshot
    /// was published.
    pub fn on_frame(&mut self, engine: &LayoutEngine) -> bool {
        if self.closed || !self.frame_pending {
            return false;
        }
        self.frame_pending = false;
        self.publish(engine);
        true
    }

    /// Cancels any outstanding frame and ignores all later calls.
    pub fn close(&mut self, scheduler: &mut dyn FrameScheduler) {
        if self.frame_pending {
            scheduler.cancel_frame();
        }
        self.frame_pending = false;
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn publish(&mut self, engine: &LayoutEngine) {
        // Reuses the buffer when no consumer still holds the previous snapshot.
        Arc::make_mut(&mut self.snapshot).capture(engine);
        self.revision += 1;
    }
}
