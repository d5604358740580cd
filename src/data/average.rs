use serde::{Deserialize, Serialize};

use super::locate::nearest_index;
use super::model::{Kind, Series, SeriesStore};

// ---------------------------------------------------------------------------
// Alignment – how samples of different series are paired
// ---------------------------------------------------------------------------

/// How a sample of one series is matched to a slot of the average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Alignment {
    /// Pair each average slot with the nearest-frequency sample of the series.
    /// Identical to `Positional` when every series shares one grid.
    #[default]
    ByFrequency,
    /// Pair sample `i` with slot `i`, over the overlapping index range only.
    Positional,
}

// ---------------------------------------------------------------------------
// AverageSeries
// ---------------------------------------------------------------------------

/// Per-slot mean of the included series, on the reference series' grid.
#[derive(Debug, Clone, PartialEq)]
pub struct AverageSeries {
    pub kind: Kind,
    /// Frequency axis of the reference series.
    pub frequencies: Vec<f64>,
    pub values: Vec<f64>,
    /// Names of the series that were summed, in store order.
    pub contributors: Vec<String>,
}

impl AverageSeries {
    fn empty(kind: Kind) -> Self {
        AverageSeries {
            kind,
            frequencies: Vec::new(),
            values: Vec::new(),
            contributors: Vec::new(),
        }
    }

    /// False when nothing was averaged; the values are then all zero and
    /// must not be read as a real curve.
    pub fn is_available(&self) -> bool {
        !self.contributors.is_empty() && !self.values.is_empty()
    }

    /// Average value paired with sample `index` of `series`.
    ///
    /// By frequency, a sample outside the average's frequency span has no
    /// slot and yields `None`.
    pub fn paired_value(&self, series: &Series, index: usize, alignment: Alignment) -> Option<f64> {
        match alignment {
            Alignment::Positional => self.values.get(index).copied(),
            Alignment::ByFrequency => {
                let frequency = *series.frequencies().get(index)?;
                let (first, last) = (*self.frequencies.first()?, *self.frequencies.last()?);
                if frequency < first || frequency > last {
                    return None;
                }
                nearest_index(&self.frequencies, frequency).map(|slot| self.values[slot])
            }
        }
    }
}

/// Average the `kind` series of `store`.
///
/// The reference grid is the first series of `kind` (visible or not); by
/// frequency it is the first one with samples, since an empty grid has no
/// slots to fill. Positional sums are always divided by the number of
/// contributors, so slots past a short series' end are diluted rather than
/// averaged over the series that reach them. With `only_visible` set,
/// hidden series are skipped. Series with no samples never contribute. If
/// nothing contributes the zero accumulator is returned and
/// [`AverageSeries::is_available`] is false.
pub fn average(
    store: &SeriesStore,
    kind: Kind,
    only_visible: bool,
    alignment: Alignment,
) -> AverageSeries {
    let all = store.series(kind);
    let reference = match alignment {
        Alignment::Positional => all.first(),
        Alignment::ByFrequency => all.iter().find(|s| !s.is_empty()).or(all.first()),
    };
    let Some(reference) = reference else {
        return AverageSeries::empty(kind);
    };

    let mut sums = vec![0.0; reference.len()];
    let mut contributors = Vec::new();

    for series in store.series(kind) {
        if (only_visible && !series.visible) || series.is_empty() {
            continue;
        }
        match alignment {
            Alignment::Positional => {
                for (slot, value) in sums.iter_mut().zip(series.values()) {
                    *slot += value;
                }
            }
            Alignment::ByFrequency => {
                for (slot, frequency) in sums.iter_mut().zip(reference.frequencies()) {
                    if let Some(i) = nearest_index(series.frequencies(), *frequency) {
                        *slot += series.values()[i];
                    }
                }
            }
        }
        log::debug!("{kind} average includes '{}'", series.name);
        contributors.push(series.name.clone());
    }

    if !contributors.is_empty() {
        let count = contributors.len() as f64;
        for slot in &mut sums {
            *slot /= count;
        }
    }

    AverageSeries {
        kind,
        frequencies: reference.frequencies().to_vec(),
        values: sums,
        contributors,
    }
}
