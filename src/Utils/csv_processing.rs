//! # CSV Processing Module
//!
//! Post-processing of the CSV files written by flame and reactor solvers (one column per quantity,
//! one row per grid point or time step).
//!
//! ## Key Functions
//! - `sum_columns()`: lumps species columns into bins (e.g. soot sections, PAH classes) and writes
//!   `<stem>_sums.<ext>` next to the input, keeping a few reference columns
//! - `postprocess_creck_soot()`: applies `sum_columns` to the mole and mass fraction files of a flame
//! - `read_time_series()`: reads a time column and a species column as a `TimeSeries`
//!
//! A bin whose members are not all present in the file is written as zero for every row.
use crate::Ignition::induction_time::{InductionError, TimeSeries};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// columns kept by default in flame output sums
pub const DEFAULT_KEEP_COLUMNS: [&str; 3] = ["grid", "velocity", "T"];

#[derive(Debug, Error)]
pub enum CsvProcessingError {
    #[error("Failed to access file: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Column '{0}' not found")]
    MissingColumn(String),
    #[error("Row {row}, column '{column}': cannot parse '{value}' as a number")]
    ParseValue {
        row: usize,
        column: String,
        value: String,
    },
    #[error("Invalid file name: {0}")]
    InvalidPath(PathBuf),
    #[error(transparent)]
    Series(#[from] InductionError),
}

/// named group of columns summed into one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesBin {
    pub name: String,
    pub members: Vec<String>,
}

/// ordered list of bins, written in this order after the kept columns
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpeciesBins {
    pub bins: Vec<SpeciesBin>,
}

impl SpeciesBins {
    pub fn new() -> Self {
        Self { bins: Vec::new() }
    }

    pub fn with_bin(mut self, name: &str, members: &[&str]) -> Self {
        self.bins.push(SpeciesBin {
            name: name.to_string(),
            members: members.iter().map(|m| m.to_string()).collect(),
        });
        self
    }

    /// JSON array of `{ "name": ..., "members": [...] }` objects
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, CsvProcessingError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.trim() == name)
}

fn parse_cell(value: &str, row: usize, column: &str) -> Result<f64, CsvProcessingError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    trimmed
        .parse::<f64>()
        .map_err(|_| CsvProcessingError::ParseValue {
            row,
            column: column.to_string(),
            value: value.to_string(),
        })
}

/// `dir/name.ext` -> `dir/name_sums.ext`
pub fn sums_path(path: &Path) -> Result<PathBuf, CsvProcessingError> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| CsvProcessingError::InvalidPath(path.to_path_buf()))?;
    let file_name = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}_sums.{}", stem, ext),
        None => format!("{}_sums", stem),
    };
    Ok(path.with_file_name(file_name))
}

/// Writes the kept columns and one summed column per bin to `<stem>_sums.<ext>`; returns the written path.
pub fn sum_columns<P: AsRef<Path>>(
    path: P,
    keep_columns: &[&str],
    bins: &SpeciesBins,
) -> Result<PathBuf, CsvProcessingError> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();

    let kept: Vec<usize> = keep_columns
        .iter()
        .map(|name| {
            column_index(&headers, name)
                .ok_or_else(|| CsvProcessingError::MissingColumn(name.to_string()))
        })
        .collect::<Result<_, _>>()?;

    // None: at least one member is absent, the bin is zero
    let bin_columns: Vec<Option<Vec<usize>>> = bins
        .bins
        .iter()
        .map(|bin| {
            let indices: Option<Vec<usize>> = bin
                .members
                .iter()
                .map(|member| column_index(&headers, member))
                .collect();
            if indices.is_none() {
                warn!(
                    "bin '{}' has members missing in {}, written as 0",
                    bin.name,
                    path.display()
                );
            }
            indices
        })
        .collect();

    let output = sums_path(path)?;
    let mut writer = csv::Writer::from_path(&output)?;
    let mut header: Vec<&str> = keep_columns.to_vec();
    header.extend(bins.bins.iter().map(|bin| bin.name.as_str()));
    writer.write_record(&header)?;

    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let mut out: Vec<String> = kept
            .iter()
            .map(|&i| record.get(i).unwrap_or("").to_string())
            .collect();
        for columns in bin_columns.iter() {
            let sum = match columns {
                Some(indices) => {
                    let mut sum = 0.0;
                    for &i in indices {
                        sum += parse_cell(record.get(i).unwrap_or(""), row + 1, &headers[i])?;
                    }
                    sum
                }
                None => 0.0,
            };
            out.push(sum.to_string());
        }
        writer.write_record(&out)?;
    }
    writer.flush()?;
    info!("column sums written to {}", output.display());
    Ok(output)
}

/// Lumps the mole fraction (`<label>_X.csv`) and mass fraction (`<label>_y.csv`) outputs of a flame
/// stored under `<dir>/<label>/`.
pub fn postprocess_creck_soot(
    dir: &Path,
    label: &str,
    x_bins: &SpeciesBins,
    y_bins: &SpeciesBins,
) -> Result<(PathBuf, PathBuf), CsvProcessingError> {
    let flame_dir = dir.join(label);
    let x_path = flame_dir.join(format!("{}_X.csv", label));
    let y_path = flame_dir.join(format!("{}_y.csv", label));
    let x_sums = sum_columns(&x_path, &DEFAULT_KEEP_COLUMNS, x_bins)?;
    let y_sums = sum_columns(&y_path, &DEFAULT_KEEP_COLUMNS, y_bins)?;
    Ok((x_sums, y_sums))
}

/// Reads two columns of a solver CSV file as a time series.
pub fn read_time_series<P: AsRef<Path>>(
    path: P,
    time_column: &str,
    value_column: &str,
) -> Result<TimeSeries, CsvProcessingError> {
    let mut reader = csv::Reader::from_path(path.as_ref())?;
    let headers = reader.headers()?.clone();
    let t_index = column_index(&headers, time_column)
        .ok_or_else(|| CsvProcessingError::MissingColumn(time_column.to_string()))?;
    let v_index = column_index(&headers, value_column)
        .ok_or_else(|| CsvProcessingError::MissingColumn(value_column.to_string()))?;
    let mut times = Vec::new();
    let mut values = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        times.push(parse_cell(record.get(t_index).unwrap_or(""), row + 1, time_column)?);
        values.push(parse_cell(record.get(v_index).unwrap_or(""), row + 1, value_column)?);
    }
    Ok(TimeSeries::new(times, values)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tempfile::tempdir;

    const FLAME_X: &str = "grid,velocity,T,BIN1A,BIN1B,BIN2A,C2H2\n\
                           0.0,0.5,400,0.1,0.2,0.01,0.3\n\
                           0.001,0.6,1500,0.3,0.4,0.02,0.1\n";

    fn soot_bins() -> SpeciesBins {
        SpeciesBins::new()
            .with_bin("BIN1", &["BIN1A", "BIN1B"])
            .with_bin("BIN2", &["BIN2A", "BIN2B"])
            .with_bin("ACET", &["C2H2"])
    }

    #[test]
    fn test_sums_path() {
        assert_eq!(
            sums_path(Path::new("out/flame_X.csv")).unwrap(),
            PathBuf::from("out/flame_X_sums.csv")
        );
        assert_eq!(
            sums_path(Path::new("output/output.out")).unwrap(),
            PathBuf::from("output/output_sums.out")
        );
        assert_eq!(
            sums_path(Path::new("data")).unwrap(),
            PathBuf::from("data_sums")
        );
    }

    #[test]
    fn test_sum_columns() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("flame_X.csv");
        fs::write(&path, FLAME_X).unwrap();

        let output = sum_columns(&path, &DEFAULT_KEEP_COLUMNS, &soot_bins()).unwrap();
        assert_eq!(output, dir.path().join("flame_X_sums.csv"));

        let mut reader = csv::Reader::from_path(&output).unwrap();
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, vec!["grid", "velocity", "T", "BIN1", "BIN2", "ACET"]);
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][2], "400");
        let bin1: f64 = rows[1][3].parse().unwrap();
        assert_relative_eq!(bin1, 0.7, epsilon = 1e-12);
        // BIN2B is absent, the whole bin is zero
        assert_eq!(&rows[0][4], "0");
        assert_eq!(&rows[1][5], "0.1");
    }

    #[test]
    fn test_missing_kept_column() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reactor.csv");
        fs::write(&path, "t,T,OH\n0,1000,0\n").unwrap();
        let result = sum_columns(&path, &["t", "P"], &SpeciesBins::new());
        assert!(matches!(result, Err(CsvProcessingError::MissingColumn(c)) if c == "P"));
    }

    #[test]
    fn test_unparsable_value() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        fs::write(&path, "grid,velocity,T,A\n0,0,300,abc\n").unwrap();
        let bins = SpeciesBins::new().with_bin("S", &["A"]);
        let result = sum_columns(&path, &DEFAULT_KEEP_COLUMNS, &bins);
        assert!(matches!(
            result,
            Err(CsvProcessingError::ParseValue { row: 1, .. })
        ));
    }

    #[test]
    fn test_postprocess_creck_soot() {
        let dir = tempdir().unwrap();
        let flame_dir = dir.path().join("ethylene_base");
        fs::create_dir_all(&flame_dir).unwrap();
        fs::write(flame_dir.join("ethylene_base_X.csv"), FLAME_X).unwrap();
        fs::write(flame_dir.join("ethylene_base_y.csv"), FLAME_X).unwrap();
        let y_bins = SpeciesBins::new().with_bin("SOOT", &["BIN1A", "BIN1B", "BIN2A"]);
        let (x_sums, y_sums) =
            postprocess_creck_soot(dir.path(), "ethylene_base", &soot_bins(), &y_bins).unwrap();
        assert!(x_sums.ends_with("ethylene_base/ethylene_base_X_sums.csv"));
        let content = fs::read_to_string(y_sums).unwrap();
        assert!(content.starts_with("grid,velocity,T,SOOT\n"));
    }

    #[test]
    fn test_bins_from_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bins.json");
        let content = r#"[
            {"name": "BIN1", "members": ["BIN1A", "BIN1B"]},
            {"name": "PAH", "members": ["A2", "A3"]}
        ]"#;
        fs::write(&path, content).unwrap();
        let bins = SpeciesBins::from_json_file(&path).unwrap();
        assert_eq!(bins.bins.len(), 2);
        assert_eq!(bins.bins[1].name, "PAH");
        assert_eq!(
            bins,
            SpeciesBins::new()
                .with_bin("BIN1", &["BIN1A", "BIN1B"])
                .with_bin("PAH", &["A2", "A3"])
        );
    }

    #[test]
    fn test_read_time_series() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reactor.csv");
        let content = "t,T,OH\n0,1000,0\n1e-4,1001,1e-6\n2e-4,1500,1e-3\n3e-4,2400,1.1e-3\n";
        fs::write(&path, content).unwrap();
        let series = read_time_series(&path, "t", "OH").unwrap();
        assert_eq!(series.len(), 4);
        let tau = series.induction_time().unwrap();
        assert_eq!(tau.slope_time, 2e-4);

        assert!(matches!(
            read_time_series(&path, "t", "CH"),
            Err(CsvProcessingError::MissingColumn(_))
        ));
        fs::write(&path, "t,OH\n0,0\n0,1\n").unwrap();
        assert!(matches!(
            read_time_series(&path, "t", "OH"),
            Err(CsvProcessingError::Series(InductionError::NonIncreasingTime { index: 1 }))
        ));
    }
}
