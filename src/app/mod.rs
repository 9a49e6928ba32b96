use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context, Vec2};
use tracing::warn;

use nodescope::graph::{CategoryFilter, LoadedGraph, load_graph_file};
use nodescope::layout::{LayoutHandle, LayoutMode, LayoutParameters, RepaintScheduler};

mod export;
mod graph;
mod render_utils;
mod ui;

use ui::fps::FpsMeter;

/// Layout settings the app starts with; the UI changes them afterwards.
#[derive(Clone, Copy, Debug)]
pub struct LayoutDefaults {
    pub mode: LayoutMode,
    pub params: LayoutParameters,
}

type LoadResult = Result<LoadedGraph, String>;

pub struct NodescopeApp {
    path: String,
    defaults: LayoutDefaults,
    state: AppState,
    reload_rx: Option<Receiver<LoadResult>>,
}

enum AppState {
    Empty,
    Loading { rx: Receiver<LoadResult> },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    loaded: LoadedGraph,
    source: PathBuf,
    path_input: String,
    mode: LayoutMode,
    params: LayoutParameters,
    layout: Option<LayoutHandle<RepaintScheduler>>,
    layout_key: Option<LayoutKey>,
    last_frame_secs: Option<f64>,
    filter: CategoryFilter,
    search: String,
    search_match_cache: Option<SearchMatchCache>,
    selected: Option<String>,
    drag: Option<DragState>,
    pan: Vec2,
    zoom: f32,
    export_path: String,
    export_status: Option<Result<String, String>>,
    load_error: Option<String>,
    show_fps_bar: bool,
    fps: FpsMeter,
    visible_node_count: usize,
    visible_edge_count: usize,
}

/// Everything whose change discards the layout run.
#[derive(Clone, Copy, Debug, PartialEq)]
struct LayoutKey {
    width: f32,
    height: f32,
    mode: LayoutMode,
}

struct SearchMatchCache {
    query: String,
    matches: Arc<Vec<SearchMatch>>,
    matched: Arc<HashSet<usize>>,
}

#[derive(Clone, Debug)]
struct SearchMatch {
    node: usize,
    score: i64,
}

#[derive(Clone, Debug)]
struct DragState {
    id: String,
    /// Offset from the pointer to the node center in world space.
    grab_offset: Vec2,
}

impl NodescopeApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        path: Option<PathBuf>,
        defaults: LayoutDefaults,
    ) -> Self {
        let (path, state) = match path {
            Some(path) => {
                let display = path.display().to_string();
                (display, Self::start_load(path))
            }
            None => (String::new(), AppState::Empty),
        };

        Self {
            path,
            defaults,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(path: PathBuf) -> Receiver<LoadResult> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_graph_file(&path).map_err(|error| {
                warn!(path = %path.display(), "{error:#}");
                format!("{error:#}")
            });
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(path: PathBuf) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(path),
        }
    }

    fn ready(loaded: LoadedGraph, path: &str, defaults: LayoutDefaults) -> AppState {
        AppState::Ready(Box::new(ViewModel::new(
            loaded,
            PathBuf::from(path.trim()),
            defaults,
        )))
    }

    fn show_open_prompt(ui: &mut egui::Ui, path: &mut String) -> bool {
        let mut open = false;
        ui.horizontal(|ui| {
            ui.label("Graph document");
            let response = ui.add(
                egui::TextEdit::singleline(path)
                    .hint_text("path/to/graph.json")
                    .desired_width(360.0),
            );
            let submitted =
                response.lost_focus() && ui.input(|input| input.key_pressed(egui::Key::Enter));
            open = ui
                .add_enabled(!path.trim().is_empty(), egui::Button::new("Open"))
                .clicked()
                || (submitted && !path.trim().is_empty());
        });
        open
    }
}

impl eframe::App for NodescopeApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Empty => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("nodescope");
                        ui.add_space(8.0);
                        ui.label("Open a JSON graph document to start.");
                        ui.add_space(8.0);
                    });
                    if Self::show_open_prompt(ui, &mut self.path) {
                        transition = Some(Self::start_load(PathBuf::from(self.path.trim())));
                    }
                });
            }
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(Ok(loaded)) => {
                        transition = Some(Self::ready(loaded, &self.path, self.defaults));
                    }
                    Ok(Err(error)) => transition = Some(AppState::Error(error)),
                    Err(TryRecvError::Empty) => ctx.request_repaint(),
                    Err(TryRecvError::Disconnected) => {
                        transition =
                            Some(AppState::Error("Background load worker disconnected".to_owned()));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading graph document...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load graph document");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if Self::show_open_prompt(ui, &mut self.path) {
                        transition = Some(Self::start_load(PathBuf::from(self.path.trim())));
                    }
                });
            }
            AppState::Ready(model) => {
                let is_loading = self.reload_rx.is_some();
                let requested = model.show(ctx, is_loading);

                if let Some(path) = requested
                    && self.reload_rx.is_none()
                {
                    self.path = path.display().to_string();
                    model.load_error = None;
                    self.reload_rx = Some(Self::spawn_load(path));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(Ok(loaded)) => {
                            let settings = model.layout_settings();
                            transition = Some(Self::ready(loaded, &self.path, settings));
                        }
                        Ok(Err(error)) => {
                            // The current graph stays on screen; only the error is shown.
                            model.load_error = Some(error);
                        }
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint();
                        }
                        Err(TryRecvError::Disconnected) => {
                            model.load_error = Some("Background load worker disconnected".to_owned());
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}
