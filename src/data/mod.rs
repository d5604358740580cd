/// Data layer: series storage, ingestion and the analysis engines.
///
/// Architecture:
/// ```text
///  FREQUENCY,Ls,Rs  .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse rows → MeasurementRow batch
///   └──────────┘
///        │  frequency-range filter
///        ▼
///   ┌─────────────┐
///   │ SeriesStore  │  Ls series + Rs series, visibility flags
///   └─────────────┘
///        │
///        ▼
///   ┌──────────┐     ┌──────────┐     ┌──────────┐
///   │ average   │ ──▶ │ ranking   │     │ compare   │ ──▶ RecordedPoint log
///   └──────────┘     └──────────┘     └──────────┘
///        ▲                                  │
///        └──────────── locate ◀─────────────┘
/// ```

pub mod average;
pub mod compare;
pub mod export;
pub mod loader;
pub mod locate;
pub mod model;
pub mod ranking;
