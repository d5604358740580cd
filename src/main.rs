mod app;
mod color;
mod state;
mod ui;

use app::LsRsViewerApp;
use eframe::egui;
use lsrs_viewer::settings::SettingsFile;

fn main() -> eframe::Result {
    env_logger::init();

    let settings_file = SettingsFile::default_location();
    log::info!("Using settings file {}", settings_file.path().display());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 850.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Ls/Rs Viewer",
        options,
        Box::new(|_cc| Ok(Box::new(LsRsViewerApp::new(settings_file)))),
    )
}
