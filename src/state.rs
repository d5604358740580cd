use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use eframe::egui;
use lsrs_viewer::data::model::Kind;
use lsrs_viewer::settings::{FrequencyRange, FrequencyRanges, SettingsFile};
use lsrs_viewer::{units, Session};

use crate::color::LineColor;

// ---------------------------------------------------------------------------
// Settings window draft
// ---------------------------------------------------------------------------

/// Text being edited in the settings window, in kHz.
#[derive(Debug, Clone, Default)]
pub struct SettingsDraft {
    pub min_ls_khz: String,
    pub max_ls_khz: String,
    pub min_rs_khz: String,
    pub max_rs_khz: String,
    pub error: Option<String>,
}

impl SettingsDraft {
    pub fn from_ranges(ranges: Option<&FrequencyRanges>) -> Self {
        let Some(ranges) = ranges else {
            return Self::default();
        };
        let (min_ls, max_ls) = ranges.ls.to_khz();
        let (min_rs, max_rs) = ranges.rs.to_khz();
        Self {
            min_ls_khz: min_ls.to_string(),
            max_ls_khz: max_ls.to_string(),
            min_rs_khz: min_rs.to_string(),
            max_rs_khz: max_rs.to_string(),
            error: None,
        }
    }

    pub fn parse(&self) -> Result<FrequencyRanges> {
        fn field(text: &str, label: &str) -> Result<f64> {
            text.trim()
                .parse::<f64>()
                .with_context(|| format!("{label}: '{text}' is not a number"))
        }
        let ranges = FrequencyRanges {
            ls: FrequencyRange::from_khz(
                field(&self.min_ls_khz, "Min Ls")?,
                field(&self.max_ls_khz, "Max Ls")?,
            ),
            rs: FrequencyRange::from_khz(
                field(&self.min_rs_khz, "Min Rs")?,
                field(&self.max_rs_khz, "Max Rs")?,
            ),
        };
        ranges.validate()?;
        Ok(ranges)
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Series, averages and recorded points.
    pub session: Session,

    pub settings_file: SettingsFile,

    /// Which kind is plotted and analysed.
    pub kind: Kind,

    /// Series indices (of `kind`) selected in the side panel.
    pub selected: BTreeSet<usize>,

    /// Highlight threshold in percent.
    pub threshold_percent: f64,

    /// Hover readout of the first selected series.
    pub tracer_enabled: bool,

    pub show_legend: bool,

    /// User-entered horizontal value lines.
    pub reference_lines: Vec<f64>,
    pub lines_visible: bool,
    pub line_color: LineColor,
    pub line_min_input: String,
    pub line_max_input: String,

    /// Open settings window, if any.
    pub settings_draft: Option<SettingsDraft>,

    pub show_table: bool,

    /// Frequency under the pointer when the plot context menu was opened.
    pub context_frequency: Option<f64>,

    /// Screen area of the plot, for cropping PNG exports.
    pub plot_rect: Option<egui::Rect>,
    pub request_screenshot: bool,
    pub screenshot_path: Option<PathBuf>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(settings_file: SettingsFile) -> Self {
        let mut status_message = None;
        let ranges = match settings_file.load() {
            Ok(ranges) => ranges,
            Err(e) => {
                log::error!("Failed to read {}: {e:#}", settings_file.path().display());
                status_message = Some(format!("Error: settings: {e}"));
                None
            }
        };
        // No stored ranges yet: ask for them first.
        let settings_draft = ranges.is_none().then(|| SettingsDraft::from_ranges(None));

        Self {
            session: Session::new(ranges),
            settings_file,
            kind: Kind::Ls,
            selected: BTreeSet::new(),
            threshold_percent: 50.0,
            tracer_enabled: false,
            show_legend: true,
            reference_lines: Vec::new(),
            lines_visible: true,
            line_color: LineColor::default(),
            line_min_input: String::new(),
            line_max_input: String::new(),
            settings_draft,
            show_table: false,
            context_frequency: None,
            plot_rect: None,
            request_screenshot: false,
            screenshot_path: None,
            status_message,
        }
    }

    /// Log and show a failed action; clear the status on success.
    fn report<T>(&mut self, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => {
                self.status_message = None;
                Some(value)
            }
            Err(e) => {
                log::error!("{e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
                None
            }
        }
    }

    fn info(&mut self, message: String) {
        log::info!("{message}");
        self.status_message = Some(message);
    }

    // ---- data ----

    pub fn open_files_dialog(&mut self) {
        if self.session.ranges().is_none() {
            self.status_message = Some("Please set frequency range values in Settings first.".into());
            self.open_settings();
            return;
        }

        let Some(paths) = rfd::FileDialog::new()
            .set_title("Select CSV files")
            .add_filter("CSV", &["csv"])
            .pick_files()
        else {
            return;
        };

        let result = self
            .session
            .load_files(paths.as_slice())
            .context("CSV files should be in this format: FREQUENCY,Ls,Rs");
        if let Some(count) = self.report(result) {
            self.selected.clear();
            self.info(format!("Loaded {count} files"));
        }
    }

    pub fn clear(&mut self) {
        self.session.clear();
        self.selected.clear();
        self.reference_lines.clear();
        self.show_table = false;
        self.status_message = None;
    }

    /// Switch the plotted kind. Every series of the new kind is shown again.
    pub fn set_kind(&mut self, kind: Kind) {
        if self.kind != kind {
            self.kind = kind;
            self.selected.clear();
            self.session.show_all(kind);
        }
    }

    // ---- visibility ----

    pub fn set_visibility(&mut self, index: usize, visible: bool) {
        let result = self.session.set_visibility(self.kind, index, visible);
        self.report(result.map_err(Into::into));
    }

    pub fn show_all(&mut self) {
        if self.session.store().is_empty() {
            self.status_message = Some("No CSV data loaded. Load CSV files first.".into());
            return;
        }
        self.session.show_all(self.kind);
    }

    pub fn hide_selected(&mut self) {
        let indices: Vec<usize> = self.selected.iter().copied().collect();
        let result = self.session.hide_series(self.kind, &indices);
        self.report(result.map_err(Into::into));
    }

    pub fn show_only_selected(&mut self) {
        let indices: Vec<usize> = self.selected.iter().copied().collect();
        let result = self.session.show_only(self.kind, &indices);
        self.report(result.map_err(Into::into));
    }

    pub fn toggle_selected(&mut self, index: usize) {
        if !self.selected.remove(&index) {
            self.selected.insert(index);
        }
    }

    // ---- analysis ----

    /// Compute both averages; only a failure for the plotted kind is reported.
    pub fn calculate_average(&mut self) {
        let other = match self.kind {
            Kind::Ls => Kind::Rs,
            Kind::Rs => Kind::Ls,
        };
        if let Err(e) = self.session.compute_average(other) {
            log::debug!("{other} average not computed: {e}");
        }
        let result = self.session.compute_average(self.kind).map(|_| ());
        self.report(result.map_err(Into::into));
    }

    pub fn highlight(&mut self) {
        let result = self.session.apply_threshold(self.kind, self.threshold_percent);
        if self.report(result.map_err(Into::into)).is_some() {
            self.selected.clear();
        }
    }

    pub fn compare_at(&mut self, frequency: f64) {
        let result = self.session.record_comparison(self.kind, frequency);
        if let Some(points) = self.report(result.map_err(Into::into)) {
            self.info(format!(
                "Recorded {} points at {}",
                points.len(),
                units::format_frequency(frequency)
            ));
        }
    }

    pub fn open_table(&mut self) {
        if self.session.average(self.kind).is_none() {
            self.status_message = Some("Please calculate the average first.".into());
        } else if self.session.recorded_points().is_empty() {
            self.status_message = Some("Please compare points first.".into());
        } else {
            self.show_table = true;
        }
    }

    /// Nearest sample of the first selected series, for the hover readout.
    pub fn tracer_readout(&self, frequency: f64) -> Option<(String, String, String)> {
        if !self.tracer_enabled {
            return None;
        }
        let index = *self.selected.first()?;
        let (f, v) = self.session.probe(self.kind, index, frequency).ok()?;
        let name = self.session.series(self.kind).get(index)?.name.clone();
        Some((name, units::format_frequency(f), units::format_value(self.kind, v)))
    }

    // ---- reference lines ----

    pub fn add_reference_lines(&mut self) {
        if !self.lines_visible {
            self.status_message = Some("Turn lines on before adding new ones.".into());
            return;
        }
        let parse = |text: &str, label: &str| -> Result<f64> {
            text.trim()
                .parse::<f64>()
                .with_context(|| format!("{label} line: '{text}' is not a number"))
        };
        let result = parse(&self.line_min_input, "Min")
            .and_then(|min| Ok((min, parse(&self.line_max_input, "Max")?)));
        if let Some((min, max)) = self.report(result) {
            self.reference_lines.push(min);
            self.reference_lines.push(max);
        }
    }

    // ---- export ----

    pub fn export_average_dialog(&mut self) {
        if self.session.average(self.kind).is_none() {
            self.status_message = Some("There is no average. Calculate the average first.".into());
            return;
        }
        let Some(path) = rfd::FileDialog::new()
            .set_title("Save average data")
            .set_file_name("average_data.csv")
            .add_filter("CSV", &["csv"])
            .save_file()
        else {
            return;
        };
        let result = self
            .session
            .export_average(self.kind, &path)
            .with_context(|| format!("exporting average to {}", path.display()));
        if self.report(result).is_some() {
            self.info(format!("Average exported to {}", path.display()));
        }
    }

    pub fn export_table_dialog(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .set_title("Save comparison table")
            .set_file_name("comparison.csv")
            .add_filter("CSV", &["csv"])
            .save_file()
        else {
            return;
        };
        let result = self
            .session
            .export_comparison(&path)
            .with_context(|| format!("exporting comparison table to {}", path.display()));
        self.report(result);
    }

    pub fn save_plot_dialog(&mut self) {
        if self.session.store().is_empty() {
            self.status_message = Some("No CSV data loaded. Load CSV files first.".into());
            return;
        }
        if let Some(path) = rfd::FileDialog::new()
            .set_title("Save plot image")
            .set_file_name("plot.png")
            .add_filter("PNG", &["png"])
            .save_file()
        {
            self.screenshot_path = Some(path);
            self.request_screenshot = true;
        }
    }

    /// Save a screenshot delivered by the viewport, cropped to the plot.
    pub fn handle_screenshot(&mut self, ctx: &egui::Context) {
        let image = ctx.input(|i| {
            i.raw.events.iter().find_map(|e| match e {
                egui::Event::Screenshot { image, .. } => Some(image.clone()),
                _ => None,
            })
        });
        let Some(image) = image else { return };
        let Some(path) = self.screenshot_path.take() else { return };

        let image = match self.plot_rect {
            Some(rect) => image.region(&rect, Some(ctx.pixels_per_point())),
            None => (*image).clone(),
        };
        let result = save_png(&path, &image);
        if self.report(result).is_some() {
            self.info(format!("Plot saved to {}", path.display()));
        }
    }

    // ---- settings ----

    pub fn open_settings(&mut self) {
        if self.settings_draft.is_none() {
            self.settings_draft = Some(SettingsDraft::from_ranges(self.session.ranges()));
        }
    }

    /// Validate and persist the draft; the window stays open on error.
    pub fn save_settings(&mut self) {
        let Some(draft) = self.settings_draft.as_mut() else {
            return;
        };
        let result = draft.parse().and_then(|ranges| {
            self.settings_file
                .save(&ranges)
                .with_context(|| format!("saving {}", self.settings_file.path().display()))?;
            Ok(ranges)
        });
        match result {
            Ok(ranges) => {
                if let Err(e) = self.session.set_ranges(ranges) {
                    draft.error = Some(e.to_string());
                    return;
                }
                self.settings_draft = None;
                self.info("Frequency ranges saved".to_string());
            }
            Err(e) => {
                log::error!("Settings rejected: {e:#}");
                draft.error = Some(format!("{e:#}"));
            }
        }
    }
}

fn save_png(path: &Path, image: &egui::ColorImage) -> Result<()> {
    let [width, height] = image.size;
    let bytes: Vec<u8> = image.pixels.iter().flat_map(|c| c.to_array()).collect();
    image::save_buffer(path, &bytes, width as u32, height as u32, image::ColorType::Rgba8)
        .with_context(|| format!("writing {}", path.display()))
}
