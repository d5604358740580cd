use std::io::Read;
use std::path::Path;

use crate::error::{AnalysisError, Result};

use super::model::MeasurementRow;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// A parsed sweep file, not yet admitted to a store.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedFile {
    /// Series name, the file stem.
    pub name: String,
    pub rows: Vec<MeasurementRow>,
}

/// Load a `FREQUENCY,Ls,Rs` file.
///
/// Any malformed line fails the whole file; nothing is returned partially.
pub fn load_file(path: &Path) -> Result<LoadedFile> {
    let file = std::fs::File::open(path)?;
    let rows = read_rows(file)?;
    log::info!("Parsed {} rows from {}", rows.len(), path.display());
    Ok(LoadedFile {
        name: series_name(path),
        rows,
    })
}

/// Display name for a file: its stem, or the whole path when it has none.
pub fn series_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ---------------------------------------------------------------------------
// CSV parsing
// ---------------------------------------------------------------------------

/// CSV layout: one header line (its content is ignored), then
/// `frequency,ls,rs` per line. Extra trailing columns are ignored;
/// fewer than three fields or any non-numeric field is an error.
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<MeasurementRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| AnalysisError::Format {
            line: e.position().map(|p| p.line()).unwrap_or(0),
            reason: e.to_string(),
        })?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        if record.len() < 3 {
            return Err(AnalysisError::Format {
                line,
                reason: format!("expected 3 fields, found {}", record.len()),
            });
        }

        rows.push(MeasurementRow {
            frequency: parse_field(&record[0], line, "FREQUENCY")?,
            ls: parse_field(&record[1], line, "Ls")?,
            rs: parse_field(&record[2], line, "Rs")?,
        });
    }

    Ok(rows)
}

fn parse_field(text: &str, line: u64, column: &str) -> Result<f64> {
    match text.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(AnalysisError::Format {
            line,
            reason: format!("{column} value '{text}' is not a number"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rows_after_header() {
        let text = "FREQUENCY,Ls,Rs\n100,0.001,12.5\n200, 0.002 ,13\n";
        let rows = read_rows(text.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], MeasurementRow { frequency: 200.0, ls: 0.002, rs: 13.0 });
    }

    #[test]
    fn extra_columns_are_ignored() {
        let rows = read_rows("F,L,R,X\n1,2,3,note\n".as_bytes()).unwrap();
        assert_eq!(rows, vec![MeasurementRow { frequency: 1.0, ls: 2.0, rs: 3.0 }]);
    }

    #[test]
    fn short_row_fails_whole_batch() {
        let err = read_rows("FREQUENCY,Ls,Rs\n1,2,3\n4,5\n".as_bytes()).unwrap_err();
        match err {
            AnalysisError::Format { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn non_numeric_field_fails() {
        assert!(matches!(
            read_rows("FREQUENCY,Ls,Rs\n1,abc,3\n".as_bytes()),
            Err(AnalysisError::Format { .. })
        ));
        assert!(matches!(
            read_rows("FREQUENCY,Ls,Rs\n1,2,NaN\n".as_bytes()),
            Err(AnalysisError::Format { .. })
        ));
    }

    #[test]
    fn header_only_file_is_empty() {
        assert!(read_rows("FREQUENCY,Ls,Rs\n".as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn series_name_is_file_stem() {
        assert_eq!(series_name(Path::new("/tmp/core_07.csv")), "core_07");
    }
}
