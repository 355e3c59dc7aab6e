//! nv-viewer - annotation and image viewer
//!
//! Shows frames from a synthetic source or an image file with live
//! annotations, per-window zoom/pan and a pixel inspector.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use eframe::egui;
use nv_core::ViewerSettings;
use nv_egui::app::DemoApp;
use nv_egui::source::{FrameSource, ImageFileSource, SyntheticSource};

#[derive(Parser, Debug)]
#[command(name = "nv-viewer", version, about = "Annotation and image viewer")]
struct Args {
    /// Show this image file instead of synthetic frames
    #[arg(long)]
    image: Option<PathBuf>,

    /// Settings file (defaults to the platform config directory)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Visibility state file, overriding the settings
    #[arg(long)]
    state: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut settings = match args.settings.clone().or_else(ViewerSettings::default_path) {
        Some(path) => ViewerSettings::load_or_default(&path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => ViewerSettings::default(),
    };
    if let Some(state) = args.state {
        settings.visibility_file = state;
    }

    let level = args
        .log_level
        .as_deref()
        .unwrap_or(settings.logging.level.as_str())
        .parse::<tracing::Level>()
        .context("Invalid log level")?;

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    let source: Box<dyn FrameSource> = match &args.image {
        Some(path) => Box::new(ImageFileSource::open(path)?),
        None => Box::new(SyntheticSource::new(320, 240)),
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([640.0, 480.0])
            .with_title("nv-viewer"),
        ..Default::default()
    };

    eframe::run_native(
        "nv-viewer",
        options,
        Box::new(move |_cc| Ok(Box::new(DemoApp::new(&settings, source)))),
    )
    .map_err(|e| anyhow::anyhow!("Viewer exited with error: {e}"))
}
