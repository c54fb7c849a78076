//! Chartify Studio - Interactive chart dashboard for CSV data
//!
//! A welcome gate collects the user's details, then a dashboard builds any of
//! seventeen chart types from an uploaded CSV or a generated sample.

mod charts;
mod config;
mod data;
mod gui;
mod session;
mod stats;

use config::AppConfig;
use eframe::egui;
use gui::ChartifyApp;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::load_or_default();
    let [width, height] = config.window_size;

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([width, height])
            .with_min_inner_size([1000.0, 650.0])
            .with_title("Chartify Studio"),
        ..Default::default()
    };

    eframe::run_native(
        "Chartify Studio",
        options,
        Box::new(move |cc| Ok(Box::new(ChartifyApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!(e.to_string()))
}
