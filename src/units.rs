//! Unit formatting for display and table export.
//!
//! Band boundaries follow the lab's existing reports. Note the frequency
//! bands overlap: values from 100 kHz up to 1 MHz satisfy both the kHz and
//! the MHz condition, and the kHz band is checked first, so MHz is only
//! reached at 1 MHz and above.

use crate::data::model::Kind;

/// Frequency in Hz, kHz or MHz with two decimals. Negative or NaN input
/// renders as `0.00 Hz`.
pub fn format_frequency(hz: f64) -> String {
    if (0.0..1_000.0).contains(&hz) {
        format!("{hz:.2} Hz")
    } else if (1_000.0..1_000_000.0).contains(&hz) {
        format!("{:.2} kHz", hz / 1_000.0)
    } else if hz >= 100_000.0 {
        format!("{:.2} MHz", hz / 1_000_000.0)
    } else {
        "0.00 Hz".to_string()
    }
}

/// Inductance in henries, shown in mH.
pub fn format_ls(henries: f64) -> String {
    format!("{:.2} mH", henries * 1_000.0)
}

/// Resistance in ohms.
///
/// Negative readings are shown in mΩ; non-negative values band into Ω, kΩ
/// and MΩ.
pub fn format_rs(ohms: f64) -> String {
    if ohms < 0.0 {
        format!("{:.2} mΩ", ohms * 1_000.0)
    } else if (0.0..1_000.0).contains(&ohms) {
        format!("{ohms:.2} Ω")
    } else if (1_000.0..1_000_000.0).contains(&ohms) {
        format!("{:.2} kΩ", ohms / 1_000.0)
    } else if ohms >= 1_000_000.0 {
        format!("{:.4} MΩ", ohms / 1_000_000.0)
    } else {
        "0.00 Ω".to_string()
    }
}

pub fn format_value(kind: Kind, value: f64) -> String {
    match kind {
        Kind::Ls => format_ls(value),
        Kind::Rs => format_rs(value),
    }
}

/// Ratio in `[0, 1]` as a percentage.
pub fn format_ratio_percent(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}

/// Absolute distance in the raw unit of the series.
pub fn format_distance(distance: f64) -> String {
    format!("{distance:.6}")
}
