use eframe::egui::{self, Pos2, Ui};

use super::super::render_utils::ViewTransform;
use super::super::{DragState, ViewModel};

const MIN_ZOOM: f32 = 0.05;
const MAX_ZOOM: f32 = 6.0;

impl ViewModel {
    /// Scroll zoom anchored on the pointer.
    pub(in crate::app) fn handle_graph_zoom(
        &mut self,
        ui: &Ui,
        view: ViewTransform,
        response: &egui::Response,
    ) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| view.rect.center());
        let world_before = view.to_world(pointer);

        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.zoom = (self.zoom * zoom_factor).clamp(MIN_ZOOM, MAX_ZOOM);
        self.pan = pointer - view.rect.center() - (world_before - view.origin) * self.zoom;
    }

    /// Secondary or middle drag always pans; primary drag pans when it did
    /// not start on a node.
    pub(in crate::app) fn handle_graph_pan(&mut self, response: &egui::Response) {
        let primary_on_canvas =
            self.drag.is_none() && response.dragged_by(egui::PointerButton::Primary);
        if primary_on_canvas
            || response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            self.pan += response.drag_delta();
        }
    }

    /// Pins the grabbed node under the pointer while the primary button is
    /// held and releases it when the drag ends.
    pub(in crate::app) fn handle_node_drag(
        &mut self,
        response: &egui::Response,
        hovered: Option<usize>,
        view: ViewTransform,
    ) {
        let pointer = response.interact_pointer_pos();

        if response.drag_started_by(egui::PointerButton::Primary)
            && let Some(node) = hovered
            && let Some(pointer) = pointer
            && let Some(id) = self.loaded.graph.nodes.get(node).map(|node| node.id.clone())
            && let Some(layout) = &self.layout
            && let Some(layout_node) = layout.engine().node(&id)
        {
            self.drag = Some(DragState {
                grab_offset: layout_node.position - view.to_world(pointer),
                id,
            });
        }

        let Some(drag) = &self.drag else {
            return;
        };
        let Some(layout) = self.layout.as_mut() else {
            self.drag = None;
            return;
        };

        if response.drag_stopped() || !response.dragged() {
            layout.unpin_node(&drag.id);
            self.drag = None;
            return;
        }

        if let Some(pointer) = pointer {
            let target = view.to_world(pointer) + drag.grab_offset;
            layout.pin_node(&drag.id, target.x, target.y);
        }
    }

    /// Closest drawn node under the pointer, if any.
    pub(in crate::app) fn hovered_index(
        ui: &Ui,
        drawn: &[(usize, Pos2)],
        radius: f32,
    ) -> Option<usize> {
        let pointer = ui.input(|input| input.pointer.hover_pos())?;
        drawn
            .iter()
            .filter_map(|&(node, position)| {
                let distance = position.distance(pointer);
                (distance <= radius + 2.0).then_some((node, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(node, _)| node)
    }
}
