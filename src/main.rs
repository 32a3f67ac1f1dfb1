//! Frame Stepper
//!
//! A desktop viewer for stepping through a video frame by frame, playing it
//! back at a fixed rate and exporting single frames as images.

mod app;
mod config;
mod error;
mod playback;
mod render;
mod video;

use anyhow::Result;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use app::ViewerApp;
use config::ViewerConfig;

fn main() -> Result<()> {
    // Initialize logging
    let level = if cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Frame Stepper starting...");

    let config = ViewerConfig::default();

    // Create native options for eframe
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size())
            .with_title("Video Player"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Frame Stepper",
        native_options,
        Box::new(move |cc| Ok(Box::new(ViewerApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {}", e))?;

    info!("Frame Stepper exited");
    Ok(())
}
