//! EEG Dashboard - patient roster, live EEG recording and emotion analysis

mod app;
mod config;
mod notifications;
mod ui;

use app::EegDashboardApp;
use config::DashboardConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = DashboardConfig::load()?;
    info!(
        rate_hz = config.session.sampling_rate_hz,
        duration_secs = config.session.duration_secs,
        "Starting EEG dashboard"
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window.width, config.window.height])
            .with_min_inner_size([1000.0, 700.0]),
        ..Default::default()
    };

    let app = EegDashboardApp::new(config)?;

    eframe::run_native(
        "EEG Emotion Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run native app: {}", e))?;

    Ok(())
}
