use std::path::{Path, PathBuf};

use crate::data::average::{self, Alignment, AverageSeries};
use crate::data::compare::{ComparisonRecorder, ComparisonRow};
use crate::data::export;
use crate::data::loader::{self, LoadedFile};
use crate::data::locate::nearest_index;
use crate::data::model::{Kind, PerKind, RecordedPoint, Series, SeriesStore};
use crate::data::ranking::{self, Ranking};
use crate::error::{AnalysisError, Result};
use crate::settings::FrequencyRanges;

// ---------------------------------------------------------------------------
// Session – one document's analysis state
// ---------------------------------------------------------------------------

/// All mutable state of one document, driven by explicit commands.
///
/// Not synchronised: callers sharing a session across threads must
/// serialise access themselves.
#[derive(Debug, Default)]
pub struct Session {
    store: SeriesStore,
    /// `Some` once an average was requested for the kind; kept current on
    /// every store change until [`clear`](Self::clear).
    averages: PerKind<Option<AverageSeries>>,
    recorder: ComparisonRecorder,
    ranges: Option<FrequencyRanges>,
    alignment: Alignment,
}

impl Session {
    pub fn new(ranges: Option<FrequencyRanges>) -> Self {
        Session {
            ranges,
            ..Default::default()
        }
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    pub fn store(&self) -> &SeriesStore {
        &self.store
    }

    pub fn series(&self, kind: Kind) -> &[Series] {
        self.store.series(kind)
    }

    // ---- configuration ----

    pub fn ranges(&self) -> Option<&FrequencyRanges> {
        self.ranges.as_ref()
    }

    /// Replace the ingestion filter. Already loaded series are not re-filtered.
    pub fn set_ranges(&mut self, ranges: FrequencyRanges) -> Result<()> {
        ranges.validate()?;
        self.ranges = Some(ranges);
        Ok(())
    }

    // ---- ingestion ----

    /// Admit parsed files. Each file yields one Ls and one Rs series,
    /// filtered by the configured ranges. Previously loaded series stay.
    pub fn load_batch(&mut self, files: Vec<LoadedFile>) -> Result<usize> {
        let ranges = self.ranges.ok_or(AnalysisError::RangesNotConfigured)?;

        for file in &files {
            for kind in Kind::ALL {
                let series = Series::from_rows(&file.name, &file.rows, kind, ranges.get(kind));
                if let Some(reference) = self.store.series(kind).first() {
                    if !series.same_grid(reference) {
                        log::warn!(
                            "{kind} series '{}' does not share the frequency grid of '{}'",
                            series.name,
                            reference.name
                        );
                    }
                }
                self.store.push(kind, series);
            }
        }

        log::info!("Loaded {} files", files.len());
        self.refresh_averages();
        Ok(files.len())
    }

    /// Parse every file first; if any fails nothing is admitted.
    pub fn load_files<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<usize> {
        if self.ranges.is_none() {
            return Err(AnalysisError::RangesNotConfigured);
        }
        let files = paths
            .iter()
            .map(|p| loader::load_file(p.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        self.load_batch(files)
    }

    /// Drop all series, averages and recorded points.
    pub fn clear(&mut self) {
        self.store.clear();
        self.averages = PerKind::default();
        self.recorder.clear();
        log::info!("Session cleared");
    }

    // ---- visibility ----

    pub fn set_visibility(&mut self, kind: Kind, index: usize, visible: bool) -> Result<()> {
        let series = self
            .store
            .get_mut(kind, index)
            .ok_or(AnalysisError::UnknownSeries { index })?;
        series.visible = visible;
        self.refresh_average(kind);
        Ok(())
    }

    pub fn show_all(&mut self, kind: Kind) {
        self.store.iter_mut(kind).for_each(|s| s.visible = true);
        self.refresh_average(kind);
    }

    /// Hide the series at `indices`; others keep their state.
    pub fn hide_series(&mut self, kind: Kind, indices: &[usize]) -> Result<()> {
        self.check_indices(kind, indices)?;
        for (i, series) in self.store.iter_mut(kind).enumerate() {
            if indices.contains(&i) {
                series.visible = false;
            }
        }
        self.refresh_average(kind);
        Ok(())
    }

    /// Hide every series not in `indices`. The listed ones keep their state.
    pub fn show_only(&mut self, kind: Kind, indices: &[usize]) -> Result<()> {
        self.check_indices(kind, indices)?;
        for (i, series) in self.store.iter_mut(kind).enumerate() {
            if !indices.contains(&i) {
                series.visible = false;
            }
        }
        self.refresh_average(kind);
        Ok(())
    }

    fn check_indices(&self, kind: Kind, indices: &[usize]) -> Result<()> {
        let len = self.store.len(kind);
        match indices.iter().find(|&&i| i >= len) {
            Some(&index) => Err(AnalysisError::UnknownSeries { index }),
            None => Ok(()),
        }
    }

    // ---- averaging ----

    /// Average the visible `kind` series and keep it current from now on.
    pub fn compute_average(&mut self, kind: Kind) -> Result<&AverageSeries> {
        if self.store.len(kind) == 0 {
            return Err(AnalysisError::NoSeries { kind });
        }
        let avg = average::average(&self.store, kind, true, self.alignment);
        if !avg.is_available() {
            return Err(AnalysisError::NoAverage { kind });
        }
        log::info!("{kind} average computed from {} series", avg.contributors.len());
        Ok(&*self.averages.get_mut(kind).insert(avg))
    }

    /// The current average, if one was computed and something is visible.
    pub fn average(&self, kind: Kind) -> Option<&AverageSeries> {
        self.averages
            .get(kind)
            .as_ref()
            .filter(|avg| avg.is_available())
    }

    fn refresh_averages(&mut self) {
        for kind in Kind::ALL {
            self.refresh_average(kind);
        }
    }

    fn refresh_average(&mut self, kind: Kind) {
        if self.averages.get(kind).is_some() {
            let avg = average::average(&self.store, kind, true, self.alignment);
            *self.averages.get_mut(kind) = Some(avg);
        }
    }

    /// Recompute from current visibility; fails if no average was requested.
    fn fresh_average(&self, kind: Kind) -> Result<AverageSeries> {
        if self.averages.get(kind).is_none() {
            return Err(AnalysisError::NoAverage { kind });
        }
        let avg = average::average(&self.store, kind, true, self.alignment);
        if avg.is_available() {
            Ok(avg)
        } else {
            Err(AnalysisError::NoAverage { kind })
        }
    }

    // ---- ranking ----

    /// Distance ratios against an average of the current visible set.
    pub fn rank_series(&self, kind: Kind) -> Result<Ranking> {
        let avg = self.fresh_average(kind)?;
        Ok(ranking::rank_series(&self.store, &avg, self.alignment))
    }

    /// Keep visible only the series whose ratio is at most `percent` / 100.
    /// Hidden series stay hidden. Returns the ranking that was applied.
    pub fn apply_threshold(&mut self, kind: Kind, percent: f64) -> Result<Ranking> {
        let ranking = self.rank_series(kind)?;
        let threshold = ranking::threshold_fraction(percent);
        for (series, keep) in self.store.iter_mut(kind).zip(ranking.passing(threshold)) {
            series.visible = keep;
        }
        log::info!(
            "{kind} threshold {threshold}: {} of {} series visible",
            self.store.visible(kind).count(),
            self.store.len(kind)
        );
        self.refresh_average(kind);
        Ok(ranking)
    }

    // ---- comparison ----

    /// Record every visible series at `frequency`. Returns the new points.
    pub fn record_comparison(&mut self, kind: Kind, frequency: f64) -> Result<Vec<RecordedPoint>> {
        let avg = self.fresh_average(kind)?;
        let points = self.recorder.record(&self.store, &avg, frequency)?;
        Ok(points.to_vec())
    }

    pub fn recorded_points(&self) -> &[RecordedPoint] {
        self.recorder.points()
    }

    pub fn clear_recorded_points(&mut self) {
        self.recorder.clear();
    }

    pub fn comparison_rows(&self) -> Vec<ComparisonRow> {
        self.recorder
            .points()
            .iter()
            .map(|p| ComparisonRow::from_point(p, self.ranges.as_ref()))
            .collect()
    }

    // ---- point lookup ----

    /// Nearest `(frequency, value)` of one series to `frequency`.
    pub fn probe(&self, kind: Kind, index: usize, frequency: f64) -> Result<(f64, f64)> {
        let series = self
            .store
            .get(kind, index)
            .ok_or(AnalysisError::UnknownSeries { index })?;
        let i = nearest_index(series.frequencies(), frequency).ok_or(AnalysisError::EmptyInput)?;
        Ok((series.frequencies()[i], series.values()[i]))
    }

    // ---- export ----

    /// Export the current average and its contributor list.
    pub fn export_average(&self, kind: Kind, path: &Path) -> Result<PathBuf> {
        let avg = self.fresh_average(kind)?;
        export::export_average(path, &avg)
    }

    pub fn export_comparison(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)?;
        export::write_comparison_csv(file, &self.comparison_rows())?;
        log::info!("Exported {} comparison rows to {}", self.recorder.points().len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::MeasurementRow;
    use crate::settings::FrequencyRange;

    fn ranges() -> FrequencyRanges {
        FrequencyRanges {
            ls: FrequencyRange::new(0.0, 1_000.0),
            rs: FrequencyRange::new(15.0, 1_000.0),
        }
    }

    fn file(name: &str, ls: [f64; 3]) -> LoadedFile {
        LoadedFile {
            name: name.into(),
            rows: [10.0, 20.0, 30.0]
                .iter()
                .zip(ls)
                .map(|(&frequency, ls)| MeasurementRow { frequency, ls, rs: ls * 10.0 })
                .collect(),
        }
    }

    fn loaded() -> Session {
        let mut session = Session::new(Some(ranges()));
        session
            .load_batch(vec![
                file("a", [1.0, 2.0, 3.0]),
                file("b", [2.0, 2.0, 2.0]),
                file("c", [3.0, 2.0, 1.0]),
            ])
            .unwrap();
        session
    }

    #[test]
    fn load_requires_ranges() {
        let mut session = Session::new(None);
        assert!(matches!(
            session.load_batch(vec![file("a", [1.0, 2.0, 3.0])]),
            Err(AnalysisError::RangesNotConfigured)
        ));
        assert!(session.store().is_empty());
    }

    #[test]
    fn each_file_yields_filtered_ls_and_rs() {
        let session = loaded();
        assert_eq!(session.series(Kind::Ls).len(), 3);
        assert_eq!(session.series(Kind::Ls)[0].len(), 3);
        assert_eq!(session.series(Kind::Rs)[0].frequencies(), &[20.0, 30.0]);
    }

    #[test]
    fn rank_before_average_fails() {
        let session = loaded();
        assert!(matches!(
            session.rank_series(Kind::Ls),
            Err(AnalysisError::NoAverage { kind: Kind::Ls })
        ));
    }

    #[test]
    fn average_follows_visibility() {
        let mut session = loaded();
        session.compute_average(Kind::Ls).unwrap();
        session.set_visibility(Kind::Ls, 0, false).unwrap();
        assert_eq!(session.average(Kind::Ls).unwrap().values, vec![2.5, 2.0, 1.5]);

        session.hide_series(Kind::Ls, &[1, 2]).unwrap();
        assert!(session.average(Kind::Ls).is_none());
        assert!(session.rank_series(Kind::Ls).is_err());

        session.show_all(Kind::Ls);
        assert_eq!(session.average(Kind::Ls).unwrap().values, vec![2.0, 2.0, 2.0]);
    }

    #[test]
    fn leading_out_of_range_file_does_not_block_average() {
        let mut session = Session::new(Some(FrequencyRanges {
            ls: FrequencyRange::new(1_000.0, 10_000.0),
            rs: FrequencyRange::new(1_000.0, 10_000.0),
        }));
        let sweep = |name: &str, points: &[(f64, f64)]| LoadedFile {
            name: name.into(),
            rows: points
                .iter()
                .map(|&(frequency, ls)| MeasurementRow { frequency, ls, rs: ls })
                .collect(),
        };
        session
            .load_batch(vec![
                sweep("low", &[(10.0, 9.0), (20.0, 9.0)]),
                sweep("a", &[(1_000.0, 1.0), (2_000.0, 2.0)]),
                sweep("b", &[(1_000.0, 3.0), (2_000.0, 4.0)]),
            ])
            .unwrap();
        assert!(session.series(Kind::Ls)[0].is_empty());

        let avg = session.compute_average(Kind::Ls).unwrap();
        assert_eq!(avg.values, vec![2.0, 3.0]);
        assert_eq!(avg.frequencies, vec![1_000.0, 2_000.0]);
        assert_eq!(avg.contributors, vec!["a", "b"]);
    }

    #[test]
    fn unknown_index_is_rejected() {
        let mut session = loaded();
        assert!(matches!(
            session.set_visibility(Kind::Ls, 9, false),
            Err(AnalysisError::UnknownSeries { index: 9 })
        ));
        assert!(session.show_only(Kind::Ls, &[0, 7]).is_err());
        assert!(session.series(Kind::Ls).iter().all(|s| s.visible));
    }

    #[test]
    fn show_only_hides_the_rest() {
        let mut session = loaded();
        session.show_only(Kind::Rs, &[1]).unwrap();
        let visible: Vec<bool> = session.series(Kind::Rs).iter().map(|s| s.visible).collect();
        assert_eq!(visible, vec![false, true, false]);
        assert!(session.series(Kind::Ls).iter().all(|s| s.visible));
    }

    #[test]
    fn threshold_hides_outliers() {
        let mut session = loaded();
        session.compute_average(Kind::Ls).unwrap();
        let ranking = session.apply_threshold(Kind::Ls, 50.0).unwrap();
        assert_eq!(ranking.entries[1].ratio, 0.0);
        let visible: Vec<bool> = session.series(Kind::Ls).iter().map(|s| s.visible).collect();
        assert_eq!(visible, vec![false, true, false]);
        assert_eq!(session.average(Kind::Ls).unwrap().contributors, vec!["b"]);
    }

    #[test]
    fn probe_finds_nearest_sample() {
        let session = loaded();
        assert_eq!(session.probe(Kind::Ls, 2, 24.0).unwrap(), (20.0, 2.0));
        assert!(matches!(
            session.probe(Kind::Ls, 5, 24.0),
            Err(AnalysisError::UnknownSeries { .. })
        ));
    }

    #[test]
    fn probe_on_empty_series() {
        let mut session = Session::new(Some(FrequencyRanges {
            ls: FrequencyRange::new(500.0, 600.0),
            rs: FrequencyRange::new(0.0, 100.0),
        }));
        session.load_batch(vec![file("a", [1.0, 2.0, 3.0])]).unwrap();
        assert!(matches!(session.probe(Kind::Ls, 0, 10.0), Err(AnalysisError::EmptyInput)));
    }

    #[test]
    fn clear_resets_everything() {
        let mut session = loaded();
        session.compute_average(Kind::Ls).unwrap();
        session.record_comparison(Kind::Ls, 20.0).unwrap();
        session.clear();
        assert!(session.store().is_empty());
        assert!(session.recorded_points().is_empty());
        assert!(session.average(Kind::Ls).is_none());
        assert!(session.record_comparison(Kind::Ls, 20.0).is_err());
    }
}
