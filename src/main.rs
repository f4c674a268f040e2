//! PM10 Dashboard - Air Quality Analysis Dashboard
//!
//! Loads PM10 measurements from CSV, cleans them and charts annual, monthly
//! and seasonal concentrations against WHO and South African limits.

mod charts;
mod config;
mod dashboard;
mod data;
mod gui;
mod stats;

use config::{DashboardConfig, CONFIG_FILE_NAME};
use eframe::egui;
use gui::DashboardApp;
use std::path::Path;

fn main() -> eframe::Result<()> {
    env_logger::init();

    let config = DashboardConfig::load_or_default(Path::new(CONFIG_FILE_NAME));

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1000.0, 700.0])
            .with_title("PM10 Analysis Dashboard"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "PM10 Analysis Dashboard",
        options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, config)))),
    )
}
