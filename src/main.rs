mod app;
mod color;
mod data;
mod settings;
mod state;
mod ui;

use anyhow::Context;
use app::DashboardApp;
use eframe::egui;
use settings::DashboardConfig;
use state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = DashboardConfig::from_env().context("reading dashboard configuration")?;
    log::info!("Starting dashboard with {config:?}");

    // The record set is loaded once here and owned by the app state for the
    // lifetime of the window.
    let mut state = AppState::new(config);
    let dataset_path = state.config.dataset_path.clone();
    state
        .load(&dataset_path)
        .with_context(|| format!("loading {}", dataset_path.display()))?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Saudi Job Market Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running dashboard window: {e}"))
}
