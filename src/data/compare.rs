use crate::error::{AnalysisError, Result};
use crate::settings::FrequencyRanges;
use crate::units;

use super::average::AverageSeries;
use super::locate::nearest_index;
use super::model::{RecordedPoint, SeriesStore};

/// Column headers of the comparison table.
pub const COMPARISON_HEADERS: [&str; 7] = [
    "Frequency",
    "Value",
    "Max bound",
    "Min bound",
    "Series name",
    "Distance Ratio (%)",
    "Absolute Distance",
];

// ---------------------------------------------------------------------------
// Comparison recorder
// ---------------------------------------------------------------------------

/// Session log of point comparisons. Append-only until [`clear`](Self::clear).
#[derive(Debug, Clone, Default)]
pub struct ComparisonRecorder {
    points: Vec<RecordedPoint>,
}

impl ComparisonRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare every visible series of `average.kind` at `target` and append
    /// one point per series. Repeated calls append again, even at the same
    /// frequency. Returns the points added by this call.
    pub fn record(
        &mut self,
        store: &SeriesStore,
        average: &AverageSeries,
        target: f64,
    ) -> Result<&[RecordedPoint]> {
        let new_points = compare_at(store, average, target)?;
        let start = self.points.len();
        self.points.extend(new_points);
        Ok(&self.points[start..])
    }

    pub fn points(&self) -> &[RecordedPoint] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}

/// Points for every visible series at the sample nearest `target`.
///
/// Each series is located on its own frequency axis. Distances are taken
/// against the average value nearest `target` and normalised by the largest
/// distance in this comparison (all zero if that largest distance is zero).
/// Series without samples are skipped.
pub fn compare_at(store: &SeriesStore, average: &AverageSeries, target: f64) -> Result<Vec<RecordedPoint>> {
    let kind = average.kind;
    if !average.is_available() {
        return Err(AnalysisError::NoAverage { kind });
    }
    let avg_index =
        nearest_index(&average.frequencies, target).ok_or(AnalysisError::NoAverage { kind })?;
    let avg_y = average.values[avg_index];

    let samples: Vec<(&str, f64, f64)> = store
        .visible(kind)
        .filter_map(|series| {
            let i = nearest_index(series.frequencies(), target)?;
            Some((series.name.as_str(), series.frequencies()[i], series.values()[i]))
        })
        .collect();

    let max_difference = samples
        .iter()
        .map(|(_, _, y)| (y - avg_y).abs())
        .fold(0.0, f64::max);

    let points = samples
        .into_iter()
        .map(|(name, frequency, value)| {
            let distance_to_average = (value - avg_y).abs();
            let distance_ratio = if max_difference > 0.0 {
                distance_to_average / max_difference
            } else {
                0.0
            };
            RecordedPoint {
                frequency,
                value,
                series: name.to_string(),
                distance_ratio,
                distance_to_average,
                kind,
            }
        })
        .collect::<Vec<_>>();

    log::info!(
        "Compared {} {kind} series at {} (average {avg_y})",
        points.len(),
        units::format_frequency(target)
    );
    Ok(points)
}

// ---------------------------------------------------------------------------
// Table rows
// ---------------------------------------------------------------------------

/// One display row of the comparison table, already unit-formatted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonRow {
    pub frequency: String,
    pub value: String,
    pub max_bound: String,
    pub min_bound: String,
    pub series: String,
    pub distance_ratio: String,
    pub absolute_distance: String,
}

impl ComparisonRow {
    /// Format `point`; bounds come from the range of the point's kind.
    pub fn from_point(point: &RecordedPoint, ranges: Option<&FrequencyRanges>) -> Self {
        let (max_bound, min_bound) = match ranges.map(|r| r.get(point.kind)) {
            Some(range) => (
                units::format_frequency(range.max_hz),
                units::format_frequency(range.min_hz),
            ),
            None => ("-".to_string(), "-".to_string()),
        };
        ComparisonRow {
            frequency: units::format_frequency(point.frequency),
            value: units::format_value(point.kind, point.value),
            max_bound,
            min_bound,
            series: point.series.clone(),
            distance_ratio: units::format_ratio_percent(point.distance_ratio),
            absolute_distance: units::format_distance(point.distance_to_average),
        }
    }

    pub fn cells(&self) -> [&str; 7] {
        [
            &self.frequency,
            &self.value,
            &self.max_bound,
            &self.min_bound,
            &self.series,
            &self.distance_ratio,
            &self.absolute_distance,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::average::{average, Alignment};
    use crate::data::model::{Kind, Series};
    use crate::settings::FrequencyRange;

    fn store() -> SeriesStore {
        let mut store = SeriesStore::new();
        store.push(Kind::Ls, Series::new("a", vec![10.0, 20.0, 30.0], vec![1.0, 2.0, 3.0]).unwrap());
        store.push(Kind::Ls, Series::new("b", vec![10.0, 20.0, 30.0], vec![2.0, 2.0, 2.0]).unwrap());
        store.push(Kind::Ls, Series::new("c", vec![11.0, 21.0, 31.0], vec![3.0, 4.0, 1.0]).unwrap());
        store
    }

    #[test]
    fn records_each_visible_series() {
        let store = store();
        let avg = average(&store, Kind::Ls, true, Alignment::ByFrequency);
        // avg on a's grid: [2, 8/3, 2]
        let points = compare_at(&store, &avg, 29.0).unwrap();
        assert_eq!(points.len(), 3);

        assert_eq!(points[0].frequency, 30.0);
        assert_eq!(points[2].frequency, 31.0);
        assert_eq!(points[2].series, "c");
        assert_eq!(points[0].distance_to_average, 1.0);
        assert_eq!(points[2].distance_to_average, 1.0);
        assert_eq!(points[0].distance_ratio, 1.0);
        assert_eq!(points[1].distance_ratio, 0.0);
    }

    #[test]
    fn requires_an_average() {
        let store = store();
        let avg = average(&SeriesStore::new(), Kind::Ls, true, Alignment::ByFrequency);
        assert!(matches!(
            compare_at(&store, &avg, 20.0),
            Err(AnalysisError::NoAverage { kind: Kind::Ls })
        ));
    }

    #[test]
    fn skips_hidden_and_empty_series() {
        let mut store = store();
        store.get_mut(Kind::Ls, 2).unwrap().visible = false;
        store.push(Kind::Ls, Series::new("empty", Vec::new(), Vec::new()).unwrap());
        let avg = average(&store, Kind::Ls, true, Alignment::ByFrequency);
        let points = compare_at(&store, &avg, 10.0).unwrap();
        let names: Vec<_> = points.iter().map(|p| p.series.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn zero_spread_gives_zero_ratio() {
        let mut store = SeriesStore::new();
        for name in ["x", "y"] {
            store.push(Kind::Rs, Series::new(name, vec![1.0], vec![4.0]).unwrap());
        }
        let avg = average(&store, Kind::Rs, true, Alignment::ByFrequency);
        let points = compare_at(&store, &avg, 1.0).unwrap();
        assert!(points.iter().all(|p| p.distance_ratio == 0.0 && p.distance_to_average == 0.0));
    }

    #[test]
    fn recorder_appends_duplicates() {
        let store = store();
        let avg = average(&store, Kind::Ls, true, Alignment::ByFrequency);
        let mut recorder = ComparisonRecorder::new();
        let first = recorder.record(&store, &avg, 20.0).unwrap().to_vec();
        let second = recorder.record(&store, &avg, 20.0).unwrap().to_vec();
        assert_eq!(first, second);
        assert_eq!(recorder.points().len(), 6);

        recorder.clear();
        assert!(recorder.is_empty());
    }

    #[test]
    fn row_formats_units_and_bounds() {
        let point = RecordedPoint {
            frequency: 20_000.0,
            value: 0.0015,
            series: "core_1".into(),
            distance_ratio: 0.5,
            distance_to_average: 0.00025,
            kind: Kind::Ls,
        };
        let ranges = FrequencyRanges {
            ls: FrequencyRange::new(1_000.0, 100_000.0),
            rs: FrequencyRange::new(0.0, 1.0),
        };
        let row = ComparisonRow::from_point(&point, Some(&ranges));
        assert_eq!(row.frequency, "20.00 kHz");
        assert_eq!(row.value, "1.50 mH");
        assert_eq!(row.max_bound, "100.00 kHz");
        assert_eq!(row.min_bound, "1.00 kHz");
        assert_eq!(row.distance_ratio, "50.00%");
        assert_eq!(row.cells()[4], "core_1");

        let bare = ComparisonRow::from_point(&point, None);
        assert_eq!(bare.max_bound, "-");
    }
}
