use super::average::{Alignment, AverageSeries};
use super::model::{Kind, Series, SeriesStore};

/// Ratio given to hidden series. Larger than any real ratio, so a hidden
/// series never passes a threshold in `[0, 1]`.
pub const EXCLUDED_RATIO: f64 = 101.10;

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct RankEntry {
    pub name: String,
    pub visible: bool,
    /// Mean absolute deviation from the average; `None` for hidden series.
    pub mean_abs_deviation: Option<f64>,
    /// In `[0, 1]` for visible series, [`EXCLUDED_RATIO`] for hidden ones.
    pub ratio: f64,
}

/// Distance ratio of every series of one kind, in store order.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    pub kind: Kind,
    pub entries: Vec<RankEntry>,
    /// Largest mean absolute deviation among visible series.
    pub worst_deviation: f64,
}

impl Ranking {
    /// Ratio of the first series called `name`.
    pub fn ratio_of(&self, name: &str) -> Option<f64> {
        self.entries.iter().find(|e| e.name == name).map(|e| e.ratio)
    }

    /// Which series pass `threshold` (a fraction in `[0, 1]`), in store order.
    pub fn passing(&self, threshold: f64) -> Vec<bool> {
        self.entries.iter().map(|e| e.ratio <= threshold).collect()
    }
}

/// Convert a user-facing percentage into a threshold fraction in `[0, 1]`.
pub fn threshold_fraction(percent: f64) -> f64 {
    (percent / 100.0).clamp(0.0, 1.0)
}

/// Mean of `|value - average|` over the samples of `series` that pair with
/// an average slot (see [`AverageSeries::paired_value`]). Zero when nothing
/// pairs.
pub fn mean_abs_deviation(series: &Series, average: &AverageSeries, alignment: Alignment) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for (i, value) in series.values().iter().enumerate() {
        if let Some(avg) = average.paired_value(series, i, alignment) {
            sum += (value - avg).abs();
            count += 1;
        }
    }
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Rank every series of `average.kind` by its deviation from `average`.
///
/// Visible series get `mean_abs_deviation / worst_deviation`, so the worst
/// offender scores exactly `1.0`; if every deviation is zero they all get
/// `0.0`. Hidden series get [`EXCLUDED_RATIO`].
pub fn rank_series(store: &SeriesStore, average: &AverageSeries, alignment: Alignment) -> Ranking {
    let kind = average.kind;

    let deviations: Vec<Option<f64>> = store
        .series(kind)
        .iter()
        .map(|s| s.visible.then(|| mean_abs_deviation(s, average, alignment)))
        .collect();

    let worst_deviation = deviations
        .iter()
        .flatten()
        .copied()
        .fold(0.0, f64::max);

    let entries = store
        .series(kind)
        .iter()
        .zip(deviations)
        .map(|(series, deviation)| {
            let ratio = match deviation {
                None => EXCLUDED_RATIO,
                Some(_) if worst_deviation == 0.0 => 0.0,
                Some(d) => d / worst_deviation,
            };
            log::debug!(
                "{kind} '{}': deviation {:?}, ratio {ratio}",
                series.name,
                deviation
            );
            RankEntry {
                name: series.name.clone(),
                visible: series.visible,
                mean_abs_deviation: deviation,
                ratio,
            }
        })
        .collect();

    Ranking {
        kind,
        entries,
        worst_deviation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::average::average;

    const F: &[f64] = &[10.0, 20.0, 30.0];

    fn three_series() -> SeriesStore {
        let mut store = SeriesStore::new();
        for (name, v) in [
            ("a", [1.0, 2.0, 3.0]),
            ("b", [2.0, 2.0, 2.0]),
            ("c", [3.0, 2.0, 1.0]),
        ] {
            store.push(Kind::Ls, Series::new(name, F.to_vec(), v.to_vec()).unwrap());
        }
        store
    }

    #[test]
    fn worst_series_scores_one() {
        let mut store = three_series();
        store.get_mut(Kind::Ls, 2).unwrap().visible = false;
        let avg = average(&store, Kind::Ls, true, Alignment::ByFrequency);
        // avg = [1.5, 2.0, 2.5]; a deviates by 0.5 on two of three samples, b likewise.
        let ranking = rank_series(&store, &avg, Alignment::ByFrequency);
        assert_eq!(ranking.entries[0].ratio, 1.0);
        assert_eq!(ranking.entries[1].ratio, 1.0);
        assert_eq!(ranking.entries[2].ratio, EXCLUDED_RATIO);
        assert_eq!(ranking.entries[2].mean_abs_deviation, None);
    }

    #[test]
    fn identical_series_rank_zero() {
        let mut store = SeriesStore::new();
        for name in ["x", "y"] {
            store.push(Kind::Rs, Series::new(name, F.to_vec(), vec![5.0, 5.0, 5.0]).unwrap());
        }
        let avg = average(&store, Kind::Rs, true, Alignment::ByFrequency);
        let ranking = rank_series(&store, &avg, Alignment::ByFrequency);
        assert_eq!(ranking.worst_deviation, 0.0);
        assert!(ranking.entries.iter().all(|e| e.ratio == 0.0));
    }

    #[test]
    fn threshold_keeps_hidden_series_hidden() {
        let mut store = three_series();
        store.get_mut(Kind::Ls, 1).unwrap().visible = false;
        let avg = average(&store, Kind::Ls, true, Alignment::ByFrequency);
        let ranking = rank_series(&store, &avg, Alignment::ByFrequency);
        assert_eq!(ranking.passing(1.0), vec![true, false, true]);
        assert_eq!(ranking.passing(0.5), vec![false, false, false]);
    }

    #[test]
    fn threshold_fraction_clamps() {
        assert_eq!(threshold_fraction(50.0), 0.5);
        assert_eq!(threshold_fraction(250.0), 1.0);
        assert_eq!(threshold_fraction(-3.0), 0.0);
    }

    #[test]
    fn samples_beyond_the_average_span_are_not_scored() {
        let mut store = SeriesStore::new();
        store.push(Kind::Ls, Series::new("ref", vec![10.0, 20.0], vec![1.0, 1.0]).unwrap());
        store.push(
            Kind::Ls,
            Series::new("long", vec![10.0, 20.0, 30.0, 40.0], vec![1.0, 1.0, 9.0, 9.0]).unwrap(),
        );
        let avg = average(&store, Kind::Ls, true, Alignment::ByFrequency);
        assert_eq!(avg.values, vec![1.0, 1.0]);

        let ranking = rank_series(&store, &avg, Alignment::ByFrequency);
        assert_eq!(ranking.entries[1].mean_abs_deviation, Some(0.0));
        assert_eq!(ranking.worst_deviation, 0.0);
        assert!(ranking.entries.iter().all(|e| e.ratio == 0.0));
    }

    #[test]
    fn empty_series_has_zero_deviation() {
        let avg = AverageSeries {
            kind: Kind::Ls,
            frequencies: F.to_vec(),
            values: vec![1.0, 1.0, 1.0],
            contributors: vec!["a".into()],
        };
        let empty = Series::new("e", Vec::new(), Vec::new()).unwrap();
        assert_eq!(mean_abs_deviation(&empty, &avg, Alignment::ByFrequency), 0.0);
    }
}
