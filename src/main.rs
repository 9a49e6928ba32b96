mod app;

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing::debug;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use nodescope::layout::{LayoutMode, LayoutParameters};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    Force,
    Radial,
}

impl From<ModeArg> for LayoutMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Force => Self::Force,
            ModeArg::Radial => Self::Radial,
        }
    }
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Graph document to open on startup.
    path: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = ModeArg::Force)]
    mode: ModeArg,

    #[arg(long)]
    link_distance: Option<f32>,

    /// Negative values repel.
    #[arg(long, allow_hyphen_values = true)]
    charge_strength: Option<f32>,

    #[arg(long)]
    collision_radius: Option<f32>,

    /// Log at info level.
    #[arg(short, long)]
    verbose: bool,

    /// Log at debug level.
    #[arg(long)]
    debug: bool,
}

impl Args {
    fn layout_defaults(&self) -> app::LayoutDefaults {
        let defaults = LayoutParameters::default();
        app::LayoutDefaults {
            mode: self.mode.into(),
            params: LayoutParameters {
                link_distance: self.link_distance.unwrap_or(defaults.link_distance),
                charge_strength: self.charge_strength.unwrap_or(defaults.charge_strength),
                collision_radius: self.collision_radius.unwrap_or(defaults.collision_radius),
            }
            .sanitized(),
        }
    }
}

fn init_tracing(args: &Args) {
    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if args.debug {
            tracing_subscriber::EnvFilter::new("debug")
        } else if args.verbose {
            tracing_subscriber::EnvFilter::new("info")
        } else {
            tracing_subscriber::EnvFilter::new("warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn main() -> eframe::Result<()> {
    let args = Args::parse();
    init_tracing(&args);

    let defaults = args.layout_defaults();
    debug!(?defaults, "starting");

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    let path = args.path;
    eframe::run_native(
        "nodescope",
        options,
        Box::new(move |cc| Ok(Box::new(app::NodescopeApp::new(cc, path, defaults)))),
    )
}
