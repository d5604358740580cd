use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;

use super::average::AverageSeries;
use super::compare::{ComparisonRow, COMPARISON_HEADERS};
use super::model::Kind;

/// Suffix of the contributor list written next to an exported average.
pub const README_SUFFIX: &str = "_README.txt";

/// Contributor list path for an average exported to `csv_path`:
/// `average_data.csv` gets `average_data_README.txt` beside it.
pub fn readme_path(csv_path: &Path) -> PathBuf {
    let stem = csv_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "average".to_string());
    csv_path.with_file_name(format!("{stem}{README_SUFFIX}"))
}

/// Write `average` as `FREQUENCY,Ls,Rs`, with the other column zeroed.
///
/// Values use the shortest representation that parses back to the same
/// `f64`, so re-ingesting the file reproduces the curve exactly.
pub fn write_average_csv<W: Write>(writer: W, average: &AverageSeries) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["FREQUENCY", "Ls", "Rs"])?;
    for (frequency, value) in average.frequencies.iter().zip(&average.values) {
        let (ls, rs) = match average.kind {
            Kind::Ls => (value.to_string(), "0".to_string()),
            Kind::Rs => ("0".to_string(), value.to_string()),
        };
        csv.write_record([frequency.to_string(), ls, rs])?;
    }
    csv.flush()?;
    Ok(())
}

/// List the series an average was computed from.
pub fn write_contributors<W: Write>(mut writer: W, average: &AverageSeries) -> Result<()> {
    writeln!(writer, "Average Graph Data")?;
    writeln!(writer, "Using the following {} series for calculation:", average.kind)?;
    for name in &average.contributors {
        writeln!(writer, "CORE: {name}")?;
    }
    Ok(())
}

/// Write the average CSV to `path` and its [`readme_path`] beside it.
/// Returns the README path.
pub fn export_average(path: &Path, average: &AverageSeries) -> Result<PathBuf> {
    write_average_csv(std::fs::File::create(path)?, average)?;

    let readme = readme_path(path);
    write_contributors(std::fs::File::create(&readme)?, average)?;

    log::info!(
        "Exported {} average ({} points) to {}",
        average.kind,
        average.values.len(),
        path.display()
    );
    Ok(readme)
}

/// Write comparison rows as CSV with the table's column headers.
pub fn write_comparison_csv<W: Write>(writer: W, rows: &[ComparisonRow]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(COMPARISON_HEADERS)?;
    for row in rows {
        csv.write_record(row.cells())?;
    }
    csv.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readme_is_named_after_the_csv() {
        assert_eq!(
            readme_path(Path::new("/out/average_data.csv")),
            PathBuf::from("/out/average_data_README.txt")
        );
        assert_eq!(readme_path(Path::new("rs.csv")), PathBuf::from("rs_README.txt"));
    }

    fn rs_average() -> AverageSeries {
        AverageSeries {
            kind: Kind::Rs,
            frequencies: vec![100.0, 200.5],
            values: vec![12.25, 0.1],
            contributors: vec!["a".into(), "b".into()],
        }
    }

    #[test]
    fn rs_average_fills_third_column() {
        let mut buf = Vec::new();
        write_average_csv(&mut buf, &rs_average()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "FREQUENCY,Ls,Rs\n100,0,12.25\n200.5,0,0.1\n");
    }

    #[test]
    fn contributors_listed_one_per_line() {
        let mut buf = Vec::new();
        write_contributors(&mut buf, &rs_average()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.ends_with("CORE: a\nCORE: b\n"));
    }

    #[test]
    fn comparison_csv_has_headers() {
        let row = ComparisonRow {
            frequency: "1.00 kHz".into(),
            value: "2.00 Ω".into(),
            max_bound: "10.00 kHz".into(),
            min_bound: "100.00 Hz".into(),
            series: "s, with comma".into(),
            distance_ratio: "100.00%".into(),
            absolute_distance: "0.5".into(),
        };
        let mut buf = Vec::new();
        write_comparison_csv(&mut buf, &[row]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("Frequency,Value,Max bound,Min bound,Series name,Distance Ratio (%),Absolute Distance")
        );
        assert!(lines.next().unwrap().contains("\"s, with comma\""));
    }
}
