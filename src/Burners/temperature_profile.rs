use log::info;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Failed to read temperature profile: {0}")]
    Io(#[from] std::io::Error),
    #[error("Line {line}: expected two numeric columns, got '{content}'")]
    Parse { line: usize, content: String },
    #[error("Positions must be strictly increasing (line {line})")]
    NonIncreasingPosition { line: usize },
    #[error("Temperature profile is empty")]
    Empty,
}

/// Measured or prescribed temperature along the burner axis: position (m) and temperature (K) pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureProfile {
    pub positions: Vec<f64>,
    pub temperatures: Vec<f64>,
}

impl TemperatureProfile {
    /// Reads a whitespace separated two-column file (position, temperature). Blank lines are skipped.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ProfileError> {
        let file = File::open(path.as_ref())?;
        let profile = Self::from_reader(BufReader::new(file))?;
        info!(
            "temperature profile with {} points read from {}",
            profile.positions.len(),
            path.as_ref().display()
        );
        Ok(profile)
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, ProfileError> {
        let mut positions = Vec::new();
        let mut temperatures = Vec::new();
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let parse_error = || ProfileError::Parse {
                line: i + 1,
                content: trimmed.to_string(),
            };
            let columns: Vec<&str> = trimmed.split_whitespace().collect();
            if columns.len() != 2 {
                return Err(parse_error());
            }
            let z: f64 = columns[0].parse().map_err(|_| parse_error())?;
            let t: f64 = columns[1].parse().map_err(|_| parse_error())?;
            if positions.last().is_some_and(|&last| z <= last) {
                return Err(ProfileError::NonIncreasingPosition { line: i + 1 });
            }
            positions.push(z);
            temperatures.push(t);
        }
        if positions.is_empty() {
            return Err(ProfileError::Empty);
        }
        Ok(Self {
            positions,
            temperatures,
        })
    }

    /// Linear interpolation, clamped to the end values outside the measured range.
    pub fn temperature_at(&self, z: f64) -> f64 {
        let n = self.positions.len();
        if z <= self.positions[0] {
            return self.temperatures[0];
        }
        if z >= self.positions[n - 1] {
            return self.temperatures[n - 1];
        }
        // first position strictly greater than z; 1 <= k <= n-1 here
        let k = self.positions.partition_point(|&p| p <= z);
        let (z0, z1) = (self.positions[k - 1], self.positions[k]);
        let (t0, t1) = (self.temperatures[k - 1], self.temperatures[k]);
        t0 + (t1 - t0) * (z - z0) / (z1 - z0)
    }

    /// positions divided by the burner-to-plate distance
    pub fn normalized_positions(&self, height: f64) -> Vec<f64> {
        self.positions.iter().map(|z| z / height).collect()
    }
}
