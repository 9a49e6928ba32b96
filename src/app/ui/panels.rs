use std::path::PathBuf;

use eframe::egui::{self, Align, Context, Layout, RichText, Vec2};

use nodescope::graph::{CategoryFilter, LoadedGraph};

use super::super::{LayoutDefaults, ViewModel};
use super::fps::FpsMeter;

impl ViewModel {
    pub(in crate::app) fn new(loaded: LoadedGraph, source: PathBuf, defaults: LayoutDefaults) -> Self {
        let export_path = source.with_extension("layout.json").display().to_string();

        Self {
            path_input: source.display().to_string(),
            source,
            loaded,
            mode: defaults.mode,
            params: defaults.params.sanitized(),
            layout: None,
            layout_key: None,
            last_frame_secs: None,
            filter: CategoryFilter::default(),
            search: String::new(),
            search_match_cache: None,
            selected: None,
            drag: None,
            pan: Vec2::ZERO,
            zoom: 1.0,
            export_path,
            export_status: None,
            load_error: None,
            show_fps_bar: true,
            fps: FpsMeter::default(),
            visible_node_count: 0,
            visible_edge_count: 0,
        }
    }

    pub(in crate::app) fn layout_settings(&self) -> LayoutDefaults {
        LayoutDefaults {
            mode: self.mode,
            params: self.params,
        }
    }

    /// Draws one frame. Returns a document path when the user asked to open
    /// or reload one.
    pub(in crate::app) fn show(&mut self, ctx: &Context, is_loading: bool) -> Option<PathBuf> {
        self.fps.record(ctx.input(|input| input.stable_dt));
        let mut requested = None;

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("nodescope");
                    ui.separator();
                    ui.label(format!("file: {}", self.source.display()));
                    ui.label(format!("nodes: {}", self.loaded.stats.node_count));
                    ui.label(format!("edges: {}", self.loaded.stats.edge_count));
                    let invalid = self.loaded.stats.invalid_edges.len();
                    if invalid > 0 {
                        ui.label(
                            RichText::new(format!("unresolved edges: {invalid}"))
                                .color(egui::Color32::from_rgb(240, 170, 90)),
                        );
                    }
                    let reload_button = ui.add_enabled(!is_loading, egui::Button::new("Reload"));
                    if reload_button.clicked() {
                        requested = Some(self.source.clone());
                    }
                    if ui.button("Restart layout").clicked() {
                        self.discard_layout();
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(format!(
                            "visible: {} nodes / {} edges",
                            self.visible_node_count, self.visible_edge_count
                        ));
                        if self.show_fps_bar
                            && let Some(fps_text) = self.fps.summary()
                        {
                            ui.label(fps_text);
                        }
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .id_salt("controls_scroll")
                    .show(ui, |ui| {
                        if let Some(path) = self.draw_controls(ui, is_loading) {
                            requested = Some(path);
                        }
                    });
            });

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .id_salt("details_scroll")
                    .show(ui, |ui| self.draw_details(ui));
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.draw_graph(ui));

        requested
    }

    pub(in crate::app) fn set_selected(&mut self, selected: Option<String>) {
        if self.selected == selected {
            return;
        }
        self.selected = selected;
    }

    /// Drops the current run; the next frame builds a fresh one.
    pub(in crate::app) fn discard_layout(&mut self) {
        if let Some(mut layout) = self.layout.take() {
            layout.destroy();
        }
        self.layout_key = None;
        self.drag = None;
        self.last_frame_secs = None;
    }
}
