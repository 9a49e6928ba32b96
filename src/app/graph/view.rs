use std::collections::HashSet;
use std::time::Duration;

use eframe::egui::{self, Align2, Color32, Context, FontId, Rect, Sense, Stroke, Ui, vec2};

use nodescope::layout::{LayoutConfig, RepaintScheduler, create_layout};

use super::super::render_utils::{
    ViewTransform, blend_color, circle_visible, dim_color, draw_background, node_screen_radius,
    segment_visible,
};
use super::super::{LayoutKey, ViewModel};

/// Longest wall-clock gap fed to the tick clock in one frame.
const MAX_FRAME_GAP_SECS: f64 = 0.25;

impl ViewModel {
    /// Rebuilds the layout run when the canvas size or mode changed.
    fn ensure_layout(&mut self, ctx: &Context, rect: Rect) {
        let key = LayoutKey {
            width: rect.width().round(),
            height: rect.height().round(),
            mode: self.mode,
        };
        if self.layout.is_some() && self.layout_key == Some(key) {
            return;
        }

        self.discard_layout();
        let config = LayoutConfig::new(key.width, key.height)
            .with_mode(key.mode)
            .with_params(self.params);
        self.layout = Some(create_layout(
            &self.loaded.graph,
            config,
            RepaintScheduler::new(ctx.clone()),
        ));
        self.layout_key = Some(key);
    }

    fn advance_layout(&mut self, ui: &Ui) {
        let now = ui.input(|input| input.time);
        let elapsed = self
            .last_frame_secs
            .map_or(0.0, |last| (now - last).clamp(0.0, MAX_FRAME_GAP_SECS));
        self.last_frame_secs = Some(now);

        if let Some(layout) = self.layout.as_mut() {
            layout.advance(Duration::from_secs_f64(elapsed));
            layout.on_frame();
        }
    }

    /// Selected node plus its neighbors, as graph positions.
    fn highlight_set(&self) -> Option<(usize, HashSet<usize>)> {
        let selected_id = self.selected.as_deref()?;
        let selected = self.loaded.index.node_position(selected_id)?;
        let neighbors = self
            .loaded
            .index
            .neighbors(&self.loaded.graph, selected_id)
            .collect();
        Some((selected, neighbors))
    }

    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        self.ensure_layout(ui.ctx(), rect);
        self.advance_layout(ui);

        let origin = self
            .layout
            .as_ref()
            .map_or(rect.size() * 0.5, |layout| layout.engine().center());
        let view = ViewTransform {
            rect,
            pan: self.pan,
            zoom: self.zoom,
            origin,
        };
        draw_background(&painter, view);

        let Some(snapshot) = self.layout.as_ref().map(|layout| layout.snapshot()) else {
            return;
        };
        if snapshot.nodes.is_empty() {
            self.visible_node_count = 0;
            self.visible_edge_count = 0;
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "Nothing to lay out",
                FontId::proportional(16.0),
                Color32::from_gray(170),
            );
            return;
        }

        let mut shown = vec![false; self.loaded.graph.nodes.len()];
        for entry in &snapshot.nodes {
            if let Some(node) = self.loaded.graph.nodes.get(entry.node) {
                shown[entry.node] = self.filter.is_node_visible(node);
            }
        }

        let radius = node_screen_radius(self.zoom);
        let drawn = snapshot
            .nodes
            .iter()
            .filter(|entry| shown[entry.node])
            .map(|entry| (entry.node, view.to_screen(entry.position)))
            .filter(|&(_, position)| circle_visible(rect, position, radius))
            .collect::<Vec<_>>();

        let hovered = if self.drag.is_some() {
            None
        } else {
            Self::hovered_index(ui, &drawn, radius)
        };
        if hovered.is_some() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
        }

        self.handle_node_drag(&response, hovered, view);
        self.handle_graph_pan(&response);
        self.handle_graph_zoom(ui, view, &response);

        if response.clicked_by(egui::PointerButton::Primary) {
            let selected = hovered
                .and_then(|node| self.loaded.graph.nodes.get(node))
                .map(|node| node.id.clone());
            self.set_selected(selected);
        }

        let highlight = self.highlight_set();
        let search = self.search_matches().map(|(_, matched)| matched);
        let nodes = &self.loaded.graph.nodes;
        let search_active = search.as_ref().is_some_and(|matched| !matched.is_empty());
        let zoom_sqrt = self.zoom.sqrt();

        let mut visible_edge_count = 0;
        for link in &snapshot.links {
            if !shown[link.source] || !shown[link.target] {
                continue;
            }
            let start = view.to_screen(link.from);
            let end = view.to_screen(link.to);
            if !segment_visible(rect, start, end, 2.0) {
                continue;
            }

            let touches_selection = highlight.as_ref().is_some_and(|(selected, _)| {
                link.source == *selected || link.target == *selected
            });
            let stroke = if touches_selection {
                Stroke::new(
                    (2.2 * zoom_sqrt).clamp(1.2, 4.0),
                    Color32::from_rgb(241, 146, 94),
                )
            } else if highlight.is_some() {
                Stroke::new(
                    (0.8 * zoom_sqrt).clamp(0.4, 2.0),
                    Color32::from_rgba_unmultiplied(80, 90, 104, 110),
                )
            } else {
                Stroke::new(
                    (1.1 * zoom_sqrt).clamp(0.6, 3.0),
                    Color32::from_rgba_unmultiplied(110, 120, 134, 170),
                )
            };
            painter.line_segment([start, end], stroke);
            visible_edge_count += 1;
        }
        self.visible_edge_count = visible_edge_count;
        self.visible_node_count = drawn.len();

        let selected_color = Color32::from_rgb(245, 206, 93);
        for &(index, position) in &drawn {
            let node = &nodes[index];
            let base_color = self.loaded.palette.node_color(node);

            let is_selected = highlight.as_ref().is_some_and(|(selected, _)| *selected == index);
            let is_neighbor = highlight
                .as_ref()
                .is_some_and(|(_, neighbors)| neighbors.contains(&index));
            let is_match = search.as_ref().is_some_and(|matched| matched.contains(&index));
            let is_hovered = hovered == Some(index);
            let is_pinned = snapshot
                .nodes
                .get(index)
                .is_some_and(|entry| entry.node == index && entry.pinned);

            let color = if is_selected {
                blend_color(base_color, selected_color, 0.55)
            } else if is_hovered {
                blend_color(base_color, Color32::WHITE, 0.35)
            } else if is_neighbor || is_match {
                base_color
            } else if highlight.is_some() {
                dim_color(base_color, 0.45)
            } else if search_active {
                dim_color(base_color, 0.35)
            } else {
                base_color
            };

            painter.circle_filled(position, radius, color);
            let outline = if is_selected {
                Stroke::new(2.4, selected_color)
            } else if is_match {
                Stroke::new(1.8, Color32::from_rgb(103, 196, 255))
            } else if is_pinned {
                Stroke::new(1.8, Color32::from_gray(235))
            } else {
                Stroke::new(1.0, Color32::from_rgba_unmultiplied(15, 15, 15, 190))
            };
            painter.circle_stroke(position, radius, outline);

            let should_draw_label = is_selected
                || is_hovered
                || is_neighbor
                || (is_match && self.zoom > 0.35)
                || self.zoom > 1.4;
            if should_draw_label {
                painter.text(
                    position + vec2(radius + 5.0, 0.0),
                    Align2::LEFT_CENTER,
                    node.name.as_str(),
                    FontId::proportional(12.0),
                    Color32::from_gray(238),
                );
            }
        }

        if let Some(node) = hovered.and_then(|index| nodes.get(index)) {
            let degree = self.loaded.index.incident_edges(&node.id).len();
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                format!("{}  |  {}  |  edges {degree}", node.name, node.id),
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }
    }
}
