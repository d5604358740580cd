use eframe::egui::{self, Color32, Context, RichText, Ui};

use crate::state::AppState;

/// Frequency-range settings window. Values are edited in kHz.
pub fn settings_window(ctx: &Context, state: &mut AppState) {
    let Some(draft) = state.settings_draft.as_mut() else {
        return;
    };

    let mut open = true;
    let mut save = false;

    egui::Window::new("Settings")
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .show(ctx, |ui: &mut Ui| {
            ui.label("Frequency ranges used when loading CSV files (kHz).");
            ui.add_space(4.0);

            egui::Grid::new("frequency_ranges")
                .num_columns(3)
                .spacing([12.0, 6.0])
                .show(ui, |ui: &mut Ui| {
                    ui.label("");
                    ui.strong("Min");
                    ui.strong("Max");
                    ui.end_row();

                    ui.label("Ls");
                    ui.text_edit_singleline(&mut draft.min_ls_khz);
                    ui.text_edit_singleline(&mut draft.max_ls_khz);
                    ui.end_row();

                    ui.label("Rs");
                    ui.text_edit_singleline(&mut draft.min_rs_khz);
                    ui.text_edit_singleline(&mut draft.max_rs_khz);
                    ui.end_row();
                });

            if let Some(error) = &draft.error {
                ui.label(RichText::new(error).color(Color32::RED));
            }

            ui.add_space(4.0);
            if ui.button("Save").clicked() {
                save = true;
            }
        });

    if save {
        state.save_settings();
    } else if !open {
        state.settings_draft = None;
    }
}
