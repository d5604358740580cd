//! Frequency-range configuration: the ingestion filter for each kind.
//!
//! Ranges are stored in Hz as pretty JSON. A missing file means "not
//! configured yet"; the viewer asks for ranges before loading any data.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::model::Kind;
use crate::error::{AnalysisError, Result};

/// File name inside the config directory.
pub const SETTINGS_FILE_NAME: &str = "frequency_range.json";

/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV: &str = "LSRS_VIEWER_CONFIG_DIR";

// ---------------------------------------------------------------------------
// FrequencyRange
// ---------------------------------------------------------------------------

/// Inclusive `[min_hz, max_hz]` interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrequencyRange {
    pub min_hz: f64,
    pub max_hz: f64,
}

impl FrequencyRange {
    pub fn new(min_hz: f64, max_hz: f64) -> Self {
        FrequencyRange { min_hz, max_hz }
    }

    /// Build from kHz, the unit the settings window edits in.
    pub fn from_khz(min_khz: f64, max_khz: f64) -> Self {
        FrequencyRange::new(min_khz * 1000.0, max_khz * 1000.0)
    }

    pub fn to_khz(self) -> (f64, f64) {
        (self.min_hz / 1000.0, self.max_hz / 1000.0)
    }

    pub fn contains(self, frequency: f64) -> bool {
        frequency >= self.min_hz && frequency <= self.max_hz
    }

    pub fn validate(self, kind: Kind) -> Result<()> {
        if self.min_hz.is_finite() && self.max_hz.is_finite() && self.max_hz > self.min_hz {
            Ok(())
        } else {
            Err(AnalysisError::InvalidRange {
                kind,
                min: self.min_hz,
                max: self.max_hz,
            })
        }
    }
}

/// One range per kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrequencyRanges {
    pub ls: FrequencyRange,
    pub rs: FrequencyRange,
}

impl FrequencyRanges {
    pub fn get(&self, kind: Kind) -> FrequencyRange {
        match kind {
            Kind::Ls => self.ls,
            Kind::Rs => self.rs,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.ls.validate(Kind::Ls)?;
        self.rs.validate(Kind::Rs)
    }
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

/// JSON file holding the persisted [`FrequencyRanges`].
#[derive(Debug, Clone)]
pub struct SettingsFile {
    path: PathBuf,
}

impl SettingsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SettingsFile { path: path.into() }
    }

    /// `$LSRS_VIEWER_CONFIG_DIR`, then `$HOME/.config/lsrs-viewer`, then
    /// the working directory.
    pub fn default_location() -> Self {
        let dir = std::env::var_os(CONFIG_DIR_ENV)
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var_os("HOME")
                    .map(|home| PathBuf::from(home).join(".config").join("lsrs-viewer"))
            })
            .unwrap_or_else(|| PathBuf::from("."));
        SettingsFile::new(dir.join(SETTINGS_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Ok(None)` if nothing has been saved yet. Stored ranges that fail
    /// validation are an error.
    pub fn load(&self) -> Result<Option<FrequencyRanges>> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let ranges: FrequencyRanges = serde_json::from_str(&text)?;
        ranges.validate()?;
        Ok(Some(ranges))
    }

    /// Validate, then write. Invalid ranges never reach the disk.
    pub fn save(&self, ranges: &FrequencyRanges) -> Result<()> {
        ranges.validate()?;
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(ranges)?)?;
        log::info!("Saved frequency ranges to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_settings(tag: &str) -> SettingsFile {
        let dir = std::env::temp_dir().join(format!("lsrs-settings-{tag}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        SettingsFile::new(dir.join(SETTINGS_FILE_NAME))
    }

    fn sample() -> FrequencyRanges {
        FrequencyRanges {
            ls: FrequencyRange::from_khz(1.0, 100.0),
            rs: FrequencyRange::from_khz(0.5, 2_000.0),
        }
    }

    #[test]
    fn contains_is_inclusive() {
        let r = FrequencyRange::new(10.0, 20.0);
        assert!(r.contains(10.0));
        assert!(r.contains(20.0));
        assert!(!r.contains(20.000_001));
        assert!(!r.contains(9.9));
    }

    #[test]
    fn rejects_inverted_or_empty_ranges() {
        assert!(FrequencyRange::new(5.0, 5.0).validate(Kind::Ls).is_err());
        assert!(FrequencyRange::new(6.0, 5.0).validate(Kind::Rs).is_err());
        assert!(FrequencyRange::new(0.0, f64::INFINITY).validate(Kind::Rs).is_err());
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn khz_conversion() {
        let r = FrequencyRange::from_khz(1.5, 20.0);
        assert_eq!(r, FrequencyRange::new(1_500.0, 20_000.0));
        assert_eq!(r.to_khz(), (1.5, 20.0));
    }

    #[test]
    fn missing_file_is_unconfigured() {
        let file = temp_settings("missing");
        assert_eq!(file.load().unwrap(), None);
    }

    #[test]
    fn save_then_load() {
        let file = temp_settings("roundtrip");
        file.save(&sample()).unwrap();
        assert_eq!(file.load().unwrap(), Some(sample()));
    }

    #[test]
    fn invalid_ranges_are_not_persisted() {
        let file = temp_settings("invalid");
        let mut bad = sample();
        bad.rs = FrequencyRange::new(10.0, 1.0);
        assert!(matches!(
            file.save(&bad),
            Err(AnalysisError::InvalidRange { kind: Kind::Rs, .. })
        ));
        assert!(!file.path().exists());
    }
}
