use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use eframe::egui;

use progress_dashboard::app::DashboardApp;
use progress_dashboard::config::DashboardConfig;
use progress_dashboard::state::initial_state;

/// Progress dashboard for route completion workbooks.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Workbook (.xlsx / .xls) to import at startup
    file: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    };
    let state = initial_state(config, args.file.as_deref());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Progress Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(DashboardApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
