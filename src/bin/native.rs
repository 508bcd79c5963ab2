//! Native window for the particle canvas
//!
//! Run with: cargo run --features native --bin sparks-native [-- --use-cpu] [--on-demand]

use touch_sparks::app::SparksApp;
use touch_sparks::core::{RenderMode, SparksConfig};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,touch_sparks=debug"));
    fmt().with_env_filter(filter).with_target(true).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let use_cpu = args.iter().any(|a| a == "--use-cpu");

    let mut config = match std::env::var("SPARKS_CONFIG") {
        Ok(path) => SparksConfig::load(&path)?,
        Err(_) => SparksConfig::default(),
    };
    if args.iter().any(|a| a == "--on-demand") {
        config.render_mode = RenderMode::WhenDirty;
    }
    info!(use_cpu, mode = ?config.render_mode, "Starting native window");

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_title("Touch sparks")
            .with_inner_size([480.0, 800.0]),
        ..Default::default()
    };

    eframe::run_native(
        "touch-sparks",
        options,
        Box::new(move |cc| Ok(Box::new(SparksApp::new(cc, config, use_cpu)))),
    )?;
    Ok(())
}
