use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};
use crate::settings::FrequencyRange;

// ---------------------------------------------------------------------------
// Kind – which measurement axis an operation applies to
// ---------------------------------------------------------------------------

/// The two measured quantities in every sweep file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    /// Series inductance (henries).
    Ls,
    /// Series resistance (ohms).
    Rs,
}

impl Kind {
    pub const ALL: [Kind; 2] = [Kind::Ls, Kind::Rs];

    /// Legend name of the averaged curve.
    pub fn average_name(self) -> &'static str {
        match self {
            Kind::Ls => "Average LS",
            Kind::Rs => "Average RS",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Ls => write!(f, "Ls"),
            Kind::Rs => write!(f, "Rs"),
        }
    }
}

/// A value stored once per [`Kind`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerKind<T> {
    pub ls: T,
    pub rs: T,
}

impl<T> PerKind<T> {
    pub fn get(&self, kind: Kind) -> &T {
        match kind {
            Kind::Ls => &self.ls,
            Kind::Rs => &self.rs,
        }
    }

    pub fn get_mut(&mut self, kind: Kind) -> &mut T {
        match kind {
            Kind::Ls => &mut self.ls,
            Kind::Rs => &mut self.rs,
        }
    }
}

// ---------------------------------------------------------------------------
// MeasurementRow – one parsed `FREQUENCY,Ls,Rs` line
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasurementRow {
    pub frequency: f64,
    pub ls: f64,
    pub rs: f64,
}

impl MeasurementRow {
    pub fn value(&self, kind: Kind) -> f64 {
        match kind {
            Kind::Ls => self.ls,
            Kind::Rs => self.rs,
        }
    }
}

// ---------------------------------------------------------------------------
// Series – one file's samples for one kind
// ---------------------------------------------------------------------------

/// One loaded file's frequency/value samples for a single [`Kind`].
///
/// `frequencies` and `values` always have the same length; the frequency
/// order is the file order and is never re-sorted.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    /// Display name, taken from the source file stem.
    pub name: String,
    /// Included in averaging, ranking and comparison when set.
    pub visible: bool,
    frequencies: Vec<f64>,
    values: Vec<f64>,
}

impl Series {
    /// Build a visible series. Fails if the two axes differ in length.
    pub fn new(name: impl Into<String>, frequencies: Vec<f64>, values: Vec<f64>) -> Result<Self> {
        if frequencies.len() != values.len() {
            return Err(AnalysisError::Format {
                line: 0,
                reason: format!(
                    "{} frequencies but {} values",
                    frequencies.len(),
                    values.len()
                ),
            });
        }
        Ok(Series {
            name: name.into(),
            visible: true,
            frequencies,
            values,
        })
    }

    /// Keep the rows whose frequency lies inside `range` and take the
    /// `kind` column as values.
    pub fn from_rows(
        name: impl Into<String>,
        rows: &[MeasurementRow],
        kind: Kind,
        range: FrequencyRange,
    ) -> Self {
        let (frequencies, values) = rows
            .iter()
            .filter(|row| range.contains(row.frequency))
            .map(|row| (row.frequency, row.value(kind)))
            .unzip();
        Series {
            name: name.into(),
            visible: true,
            frequencies,
            values,
        }
    }

    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether both series sample exactly the same frequencies.
    pub fn same_grid(&self, other: &Series) -> bool {
        self.frequencies == other.frequencies
    }
}

// ---------------------------------------------------------------------------
// SeriesStore – every loaded series, one collection per kind
// ---------------------------------------------------------------------------

/// Holds the Ls and Rs series of every loaded file, in load order.
#[derive(Debug, Clone, Default)]
pub struct SeriesStore {
    series: PerKind<Vec<Series>>,
}

impl SeriesStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn series(&self, kind: Kind) -> &[Series] {
        self.series.get(kind)
    }

    pub fn get(&self, kind: Kind, index: usize) -> Option<&Series> {
        self.series.get(kind).get(index)
    }

    pub fn get_mut(&mut self, kind: Kind, index: usize) -> Option<&mut Series> {
        self.series.get_mut(kind).get_mut(index)
    }

    pub fn iter_mut(&mut self, kind: Kind) -> std::slice::IterMut<'_, Series> {
        self.series.get_mut(kind).iter_mut()
    }

    pub fn push(&mut self, kind: Kind, series: Series) {
        self.series.get_mut(kind).push(series);
    }

    /// Currently visible series of `kind`, evaluated at call time.
    pub fn visible(&self, kind: Kind) -> impl Iterator<Item = &Series> + '_ {
        self.series.get(kind).iter().filter(|s| s.visible)
    }

    pub fn len(&self, kind: Kind) -> usize {
        self.series.get(kind).len()
    }

    /// True when neither kind holds any series.
    pub fn is_empty(&self) -> bool {
        self.series.ls.is_empty() && self.series.rs.is_empty()
    }

    pub fn clear(&mut self) {
        self.series.ls.clear();
        self.series.rs.clear();
    }
}

// ---------------------------------------------------------------------------
// RecordedPoint – one row of a point comparison
// ---------------------------------------------------------------------------

/// One series' sample recorded by a comparison at a target frequency.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedPoint {
    /// Frequency of the nearest sample actually used.
    pub frequency: f64,
    pub value: f64,
    pub series: String,
    /// `distance_to_average` divided by the largest distance in the same comparison.
    pub distance_ratio: f64,
    pub distance_to_average: f64,
    pub kind: Kind,
}
