use eframe::egui;
use lsrs_viewer::settings::SettingsFile;

use crate::state::AppState;
use crate::ui::{panels, plot, settings, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct LsRsViewerApp {
    pub state: AppState,
}

impl LsRsViewerApp {
    pub fn new(settings_file: SettingsFile) -> Self {
        Self {
            state: AppState::new(settings_file),
        }
    }
}

impl eframe::App for LsRsViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.handle_screenshot(ctx);

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: series and analysis controls ----
        egui::SidePanel::left("series_panel")
            .default_width(280.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::measurement_plot(ui, &mut self.state);
        });

        // ---- Floating windows ----
        settings::settings_window(ctx, &mut self.state);
        table::comparison_window(ctx, &mut self.state);

        if self.state.request_screenshot {
            self.state.request_screenshot = false;
            ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(egui::UserData::default()));
        }
    }
}
