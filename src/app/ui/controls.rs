use std::path::PathBuf;

use eframe::egui::{self, Color32, RichText, Sense, Ui, vec2};

use nodescope::layout::{LayoutMode, LayoutParameters, ParameterUpdate};

use super::super::ViewModel;
use super::super::export::export_layout;

const SEARCH_RESULT_ROWS: usize = 12;

impl ViewModel {
    /// Returns a path when the user asked to open a document.
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui, is_loading: bool) -> Option<PathBuf> {
        ui.heading("Graph Controls");
        ui.separator();
        ui.add_space(4.0);

        let requested = self.draw_document_controls(ui, is_loading);
        ui.separator();
        self.draw_layout_controls(ui);
        ui.separator();
        self.draw_search_controls(ui);
        ui.separator();
        self.draw_category_controls(ui);
        ui.separator();
        self.draw_export_controls(ui);
        ui.separator();

        ui.checkbox(&mut self.show_fps_bar, "FPS Display")
            .on_hover_text("Show a live FPS readout in the header.");

        requested
    }

    fn draw_document_controls(&mut self, ui: &mut Ui, is_loading: bool) -> Option<PathBuf> {
        ui.label("Document");
        let mut requested = None;
        ui.horizontal(|ui| {
            ui.add(
                egui::TextEdit::singleline(&mut self.path_input)
                    .hint_text("path/to/graph.json")
                    .desired_width(200.0),
            );
            let can_open = !is_loading && !self.path_input.trim().is_empty();
            if ui.add_enabled(can_open, egui::Button::new("Open")).clicked() {
                requested = Some(PathBuf::from(self.path_input.trim()));
            }
        });

        if is_loading {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading...");
            });
        }
        if let Some(error) = &self.load_error {
            ui.label(RichText::new(error.as_str()).color(Color32::from_rgb(235, 110, 100)));
        }
        requested
    }

    fn draw_layout_controls(&mut self, ui: &mut Ui) {
        ui.label("Layout");
        ui.horizontal(|ui| {
            for mode in [LayoutMode::Force, LayoutMode::Radial] {
                ui.selectable_value(&mut self.mode, mode, mode.label())
                    .on_hover_text(match mode {
                        LayoutMode::Force => "Free spring-electrical layout.",
                        LayoutMode::Radial => "Rings by hierarchy level around the center.",
                    });
            }
        });

        if let Some(layout) = &self.layout {
            let engine = layout.engine();
            let status = if layout.is_stable() {
                "stable"
            } else {
                "running"
            };
            ui.small(format!(
                "{status} | tick {} | alpha {:.3}",
                engine.ticks(),
                engine.alpha()
            ));
        }

        let radial = self.mode == LayoutMode::Radial;
        if radial {
            ui.small("Radial mode uses fixed force constants.");
        }

        let mut update = ParameterUpdate::default();
        ui.add_enabled_ui(!radial, |ui| {
            let shown = if radial {
                LayoutParameters::RADIAL
            } else {
                self.params
            };
            let mut link_distance = shown.link_distance;
            let mut charge_strength = shown.charge_strength;
            let mut collision_radius = shown.collision_radius;

            if ui
                .add(
                    egui::Slider::new(&mut link_distance, LayoutParameters::LINK_DISTANCE_RANGE)
                        .text("Link distance"),
                )
                .on_hover_text("Resting length of every edge spring.")
                .changed()
            {
                update.link_distance = Some(link_distance);
            }

            if ui
                .add(
                    egui::Slider::new(
                        &mut charge_strength,
                        LayoutParameters::CHARGE_STRENGTH_RANGE,
                    )
                    .text("Charge strength"),
                )
                .on_hover_text("How strongly every node pushes the others away.")
                .changed()
            {
                update.charge_strength = Some(charge_strength);
            }

            if ui
                .add(
                    egui::Slider::new(
                        &mut collision_radius,
                        LayoutParameters::COLLISION_RADIUS_RANGE,
                    )
                    .text("Collision radius"),
                )
                .on_hover_text("Smallest distance kept between two node centers.")
                .changed()
            {
                update.collision_radius = Some(collision_radius);
            }

            if ui.button("Reset to defaults").clicked() {
                update = LayoutParameters::default().into();
            }
        });

        if !radial && update != ParameterUpdate::default() {
            self.params = self.params.with_update(update);
            if let Some(layout) = self.layout.as_mut() {
                layout.set_params(update);
            }
        }
    }

    fn draw_search_controls(&mut self, ui: &mut Ui) {
        ui.label("Search (name or id)")
            .on_hover_text("Fuzzy-highlight matching nodes without changing the layout.");
        ui.text_edit_singleline(&mut self.search)
            .on_hover_text("Type to highlight matching nodes, then click a result to select it.");

        let Some((matches, _)) = self.search_matches() else {
            return;
        };

        if matches.is_empty() {
            ui.small("No matching nodes.");
            return;
        }

        ui.small(format!("{} matches", matches.len()));
        let mut clicked = None;
        for entry in matches.iter().take(SEARCH_RESULT_ROWS) {
            let Some(node) = self.loaded.graph.nodes.get(entry.node) else {
                continue;
            };
            if ui
                .link(format!("{}  ({})", node.name, node.id))
                .on_hover_text(format!("score {}", entry.score))
                .clicked()
            {
                clicked = Some(node.id.clone());
            }
        }
        if clicked.is_some() {
            self.set_selected(clicked);
        }
    }

    fn draw_category_controls(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.label("Categories");
            if ui
                .add_enabled(self.filter.has_hidden(), egui::Button::new("Show all"))
                .clicked()
            {
                self.filter.show_all();
            }
        });

        let palette = &self.loaded.palette;
        let groups = palette
            .filter_groups()
            .map(|group| {
                (
                    group.to_owned(),
                    palette.count(group),
                    palette.category_color(group),
                )
            })
            .collect::<Vec<_>>();

        if groups.is_empty() {
            ui.small("No nodes.");
            return;
        }

        for (group, count, color) in groups {
            ui.horizontal(|ui| {
                let (swatch, _) = ui.allocate_exact_size(vec2(10.0, 10.0), Sense::hover());
                ui.painter().circle_filled(
                    swatch.center(),
                    5.0,
                    color.unwrap_or(nodescope::graph::DEFAULT_NODE_COLOR),
                );

                let mut visible = !self.filter.is_hidden(&group);
                if ui
                    .checkbox(&mut visible, format!("{group} ({count})"))
                    .changed()
                {
                    self.filter.set_hidden(&group, !visible);
                }
            });
        }
    }

    fn draw_export_controls(&mut self, ui: &mut Ui) {
        ui.label("Export layout");
        ui.horizontal(|ui| {
            ui.add(egui::TextEdit::singleline(&mut self.export_path).desired_width(200.0));
            let can_export = self.layout.is_some() && !self.export_path.trim().is_empty();
            if ui
                .add_enabled(can_export, egui::Button::new("Export"))
                .on_hover_text("Write the current node coordinates as JSON.")
                .clicked()
                && let Some(layout) = &self.layout
            {
                let path = PathBuf::from(self.export_path.trim());
                self.export_status = Some(
                    export_layout(&path, &self.loaded, &layout.snapshot(), self.mode)
                        .map(|()| format!("Wrote {}", path.display()))
                        .map_err(|error| format!("{error:#}")),
                );
            }
        });

        match &self.export_status {
            Some(Ok(message)) => {
                ui.small(message.as_str());
            }
            Some(Err(error)) => {
                ui.label(RichText::new(error.as_str()).color(Color32::from_rgb(235, 110, 100)));
            }
            None => {}
        }
    }
}
