use thiserror::Error;

use crate::data::model::Kind;

/// Errors surfaced by the analysis core.
///
/// Degenerate divisions (all deviations zero) are not errors: the engines
/// substitute `0.0` and carry on.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A malformed row in a `FREQUENCY,Ls,Rs` file. The whole batch is rejected.
    #[error("line {line}: {reason} (expected FREQUENCY,Ls,Rs)")]
    Format { line: u64, reason: String },

    /// Nearest-point lookup against a series with no samples.
    #[error("series has no samples")]
    EmptyInput,

    /// Ranking or comparison requested before an average exists.
    #[error("no {kind} average available, calculate the average first")]
    NoAverage { kind: Kind },

    #[error("frequency ranges are not configured, set them in Settings first")]
    RangesNotConfigured,

    #[error("no {kind} series loaded")]
    NoSeries { kind: Kind },

    #[error("no series at index {index}")]
    UnknownSeries { index: usize },

    /// Rejected frequency range; nothing is persisted.
    #[error("{kind} frequency range is invalid: max ({max}) must be greater than min ({min})")]
    InvalidRange { kind: Kind, min: f64, max: f64 },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = AnalysisError> = std::result::Result<T, E>;
