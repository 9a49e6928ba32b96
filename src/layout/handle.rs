use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::graph::ValidatedGraph;

use super::engine::LayoutEngine;
use super::feed::{FrameScheduler, LayoutSnapshot, RenderFeed};
use super::params::{LayoutConfig, ParameterUpdate};

/// Engine cadence, independent of the display refresh rate.
pub const TICK_INTERVAL: Duration = Duration::from_micros(8_333);
/// Host frames that arrive late run at most this many ticks to catch up.
pub const MAX_TICKS_PER_ADVANCE: usize = 8;

/// One layout run: engine, render feed and tick clock for a single graph,
/// viewport and mode. Any of those changing means destroying the handle and
/// creating a new one.
pub struct LayoutHandle<S: FrameScheduler> {
    engine: LayoutEngine,
    feed: RenderFeed,
    scheduler: S,
    config: LayoutConfig,
    backlog: Duration,
}

pub fn create_layout<S: FrameScheduler>(
    graph: &ValidatedGraph,
    config: LayoutConfig,
    scheduler: S,
) -> LayoutHandle<S> {
    LayoutHandle::new(graph, config, scheduler)
}

impl<S: FrameScheduler> LayoutHandle<S> {
    pub fn new(graph: &ValidatedGraph, config: LayoutConfig, mut scheduler: S) -> Self {
        let engine = LayoutEngine::new(graph, &config);
        let mut feed = RenderFeed::new(&engine);
        if engine.is_running() {
            feed.request_refresh(&mut scheduler);
        }

        Self {
            engine,
            feed,
            scheduler,
            config,
            backlog: Duration::ZERO,
        }
    }

    /// Runs as many ticks as `elapsed` covers at [`TICK_INTERVAL`], capped at
    /// [`MAX_TICKS_PER_ADVANCE`]. Returns the number of ticks run.
    pub fn advance(&mut self, elapsed: Duration) -> usize {
        if self.feed.is_closed() || self.engine.is_stable() {
            self.backlog = Duration::ZERO;
            return 0;
        }

        self.backlog += elapsed;
        let mut ticks = 0;
        while self.backlog >= TICK_INTERVAL && ticks < MAX_TICKS_PER_ADVANCE {
            self.backlog -= TICK_INTERVAL;
            ticks += 1;
            if !self.tick() {
                break;
            }
        }

        if ticks == MAX_TICKS_PER_ADVANCE || self.engine.is_stable() {
            self.backlog = Duration::ZERO;
        }

        // Keeps the clock going on frames too short to run a tick.
        if self.engine.is_running() {
            self.feed.request_refresh(&mut self.scheduler);
        }
        ticks
    }

    /// Runs one engine tick and notifies the feed. Returns whether the
    /// engine is still running.
    pub fn tick(&mut self) -> bool {
        if self.feed.is_closed() || self.engine.is_stable() {
            return false;
        }

        let running = self.engine.tick();
        self.feed.on_tick(&self.engine, &mut self.scheduler);
        running
    }

    /// Host frame callback. Returns whether a new snapshot was published.
    pub fn on_frame(&mut self) -> bool {
        self.feed.on_frame(&self.engine)
    }

    pub fn snapshot(&self) -> Arc<LayoutSnapshot> {
        self.feed.snapshot()
    }

    pub fn is_stable(&self) -> bool {
        self.feed.is_stable()
    }

    pub fn set_params(&mut self, update: ParameterUpdate) -> bool {
        if self.feed.is_closed() || !self.engine.set_params(update) {
            return false;
        }
        self.config.params = self.engine.params();
        self.feed.request_refresh(&mut self.scheduler);
        true
    }

    pub fn pin_node(&mut self, id: &str, x: f32, y: f32) -> bool {
        if self.feed.is_closed() || !self.engine.pin_node(id, x, y) {
            return false;
        }
        debug!(id, x, y, "node pinned");
        self.feed.request_refresh(&mut self.scheduler);
        true
    }

    pub fn unpin_node(&mut self, id: &str) -> bool {
        if self.feed.is_closed() || !self.engine.unpin_node(id) {
            return false;
        }
        self.feed.request_refresh(&mut self.scheduler);
        true
    }

    /// Stops the engine and cancels any pending frame. Safe to call twice.
    pub fn destroy(&mut self) {
        if self.feed.is_closed() {
            return;
        }
        self.engine.stop();
        self.feed.close(&mut self.scheduler);
        self.backlog = Duration::ZERO;
        debug!(ticks = self.engine.ticks(), "layout destroyed");
    }

    pub fn is_destroyed(&self) -> bool {
        self.feed.is_closed()
    }

    pub fn engine(&self) -> &LayoutEngine {
        &self.engine
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }
}

impl<S: FrameScheduler> Drop for LayoutHandle<S> {
    fn drop(&mut self) {
        self.destroy();
    }
}
