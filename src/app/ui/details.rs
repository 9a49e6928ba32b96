use eframe::egui::{self, RichText, Sense, Ui, vec2};

use nodescope::graph::node_groups;

use super::super::ViewModel;

const INVALID_EDGE_ROW_HEIGHT: f32 = 20.0;

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Selection Details");
        ui.add_space(6.0);
        self.draw_selection(ui);

        ui.separator();
        self.draw_statistics(ui);
    }

    fn draw_selection(&mut self, ui: &mut Ui) {
        let Some(selected_id) = self.selected.clone() else {
            ui.label("Click a node in the graph or a search result.");
            return;
        };

        let Some(node) = self.loaded.node(&selected_id) else {
            ui.label("Selected node no longer exists in the graph.");
            return;
        };

        ui.label(RichText::new(node.name.as_str()).strong());
        ui.small(node.id.as_str());
        ui.add_space(6.0);

        ui.horizontal(|ui| {
            let (swatch, _) = ui.allocate_exact_size(vec2(12.0, 12.0), Sense::hover());
            ui.painter()
                .circle_filled(swatch.center(), 6.0, self.loaded.palette.node_color(node));
            ui.label(match &node.color {
                Some(color) => format!("color override: {color}"),
                None => "color from category".to_owned(),
            });
        });

        let groups = node_groups(node).collect::<Vec<_>>().join(", ");
        ui.label(format!("Categories: {groups}"));
        match node.level {
            Some(level) => ui.label(format!("Level: {level}")),
            None => ui.label("Level: none"),
        };

        if let Some(layout) = &self.layout
            && let Some(layout_node) = layout.engine().node(&selected_id)
        {
            ui.label(format!(
                "Position: ({:.1}, {:.1}){}",
                layout_node.position.x,
                layout_node.position.y,
                if layout_node.pinned.is_some() {
                    " pinned"
                } else {
                    ""
                }
            ));
        }

        if let Some(properties) = &node.properties {
            ui.collapsing("Properties", |ui| {
                let text = serde_json::to_string_pretty(properties)
                    .unwrap_or_else(|error| format!("<unprintable: {error}>"));
                ui.monospace(text);
            });
        }

        ui.separator();
        let neighbors = self
            .loaded
            .index
            .neighbors(&self.loaded.graph, &selected_id)
            .filter_map(|position| self.loaded.graph.nodes.get(position))
            .map(|neighbor| (neighbor.id.clone(), neighbor.name.clone()))
            .collect::<Vec<_>>();

        ui.label(RichText::new(format!("Neighbors ({})", neighbors.len())).strong());
        if neighbors.is_empty() {
            ui.label("No resolvable edges touch this node.");
            return;
        }

        let mut clicked = None;
        egui::ScrollArea::vertical()
            .id_salt("neighbors_scroll")
            .max_height(240.0)
            .auto_shrink([false, true])
            .show(ui, |ui| {
                for (id, name) in &neighbors {
                    if ui.link(name.as_str()).on_hover_text(id.as_str()).clicked() {
                        clicked = Some(id.clone());
                    }
                }
            });
        if clicked.is_some() {
            self.set_selected(clicked);
        }
    }

    fn draw_statistics(&self, ui: &mut Ui) {
        let stats = &self.loaded.stats;
        ui.label(RichText::new("Statistics").strong());
        ui.label(format!("Nodes: {}", stats.node_count));
        ui.label(format!("Edges: {}", stats.edge_count));
        ui.label(format!("Resolvable edges: {}", stats.resolvable_edge_count()));
        ui.label(format!("Unresolved edges: {}", stats.invalid_edges.len()));
        ui.label(format!("Categories: {}", self.loaded.palette.categories().len()));

        if stats.invalid_edges.is_empty() {
            return;
        }

        ui.add_space(4.0);
        ui.label(RichText::new("Unresolved edges").strong())
            .on_hover_text("Edges whose source or target id matches no node. They are not laid out.");
        let graph = &self.loaded;
        let positions = graph.index.invalid_edge_positions();
        egui::ScrollArea::vertical()
            .id_salt("invalid_edges_scroll")
            .max_height(260.0)
            .auto_shrink([false, true])
            .show_rows(
                ui,
                INVALID_EDGE_ROW_HEIGHT,
                positions.len(),
                |ui, row_range| {
                    for &position in &positions[row_range] {
                        let Some(edge) = graph.graph.edges.get(position) else {
                            continue;
                        };
                        let mark = |id: &str| {
                            if graph.index.contains_node(id) {
                                id.to_owned()
                            } else {
                                format!("{id} (missing)")
                            }
                        };
                        ui.label(format!(
                            "#{position}  {} -> {}",
                            mark(&edge.source_id),
                            mark(&edge.target_id)
                        ));
                    }
                },
            );
    }
}
