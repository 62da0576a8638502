mod app;
mod encoder;
mod engine;
mod error;
mod quality;
mod types;

use app::AvifConverterApp;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), eframe::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([420.0, 480.0])
            .with_min_inner_size([360.0, 320.0]),
        ..Default::default()
    };

    eframe::run_native(
        "AVIF Converter",
        options,
        Box::new(|_cc| Ok(Box::new(AvifConverterApp::new()))),
    )
}
