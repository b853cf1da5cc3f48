mod app;
mod color;
mod config;
mod data;
mod export;
mod state;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use eframe::egui;

use app::SpaceXDashApp;
use config::Config;
use state::AppState;

fn main() -> Result<()> {
    env_logger::init();
    let config = Config::parse();

    // No partial dataset is ever served: a bad file stops us here.
    let report = data::loader::load_file(&config.data)
        .with_context(|| format!("loading launch records from {}", config.data.display()))
        .inspect_err(|e| log::error!("{e:#}"))?;

    let dataset = report.dataset;
    let payload = config.payload_range(&dataset);
    let bounds = config.slider_bounds(&dataset);
    let state = AppState::new(dataset, config.site_selector(), payload)
        .with_slider(bounds, config.slider_step);

    if let Some(path) = &config.export {
        return export::write_chart_specs(path, &state.chart_specs());
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 900.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "SpaceX Launch Records Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(SpaceXDashApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running dashboard window: {e}"))
}
