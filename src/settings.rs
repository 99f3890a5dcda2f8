//! # Settings Module
//!
//! ## Purpose
//! Persistent configuration of ignition-delay sweeps. A sweep is fully described by a JSON file
//! so that a grid of temperatures and mixtures can be rerun without touching code.
//!
//! ## Configuration Format
//! ```json
//! {
//!   "mechanism": "mechs/gri30_highT.yaml",
//!   "reference_species": "OH",
//!   "max_time": 1.0,
//!   "pressure": 400000.0,
//!   "temperatures": { "start": 1100.0, "stop": 1900.0, "points": 3 },
//!   "fuel": { "primary": "CH4", "secondary": "H2", "tertiary": "CH3OH" },
//!   "alphas": [0.0, 10.0, 20.0, 100.0],
//!   "beta": 0.0,
//!   "failure_policy": "Skip",
//!   "report": { "delimiter": "Comma", "metric": "SlopeTime", "output": null }
//! }
//! ```
//! Missing keys take their default values, so a file may contain only the fields that differ.
//! The mixture builder settings (stoichiometry table, O2 fraction, diluter...) live under `"mixture"`.
//!
//! ## Usage
//! ```rust, ignore
//! let config = SweepConfig::load_or_default("sweep_config.json");
//! let sweep = IgnitionSweep::new(config)?;
//! ```
use crate::Ignition::ignition_sweep::linspace;
use crate::Mixtures::stoichiometry::{MixtureError, Species};
use crate::Mixtures::trifuel::{MixtureConfig, TriFuel};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to access config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid JSON in config file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
    #[error("Invalid fuel: {0}")]
    Mixture(#[from] MixtureError),
}

/// what a sweep does with a grid point whose ignition delay cannot be found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FailurePolicy {
    /// log the failure and leave the point empty in the report
    #[default]
    Skip,
    /// stop the sweep and return the error
    Abort,
}

/// which of the two induction times goes into reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IgnitionMetric {
    #[default]
    SlopeTime,
    TangentTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Delimiter {
    #[default]
    Comma,
    Tab,
}

impl Delimiter {
    pub fn as_byte(&self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Tab => b'\t',
        }
    }
}

/// evenly spaced temperatures, endpoints included
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureGrid {
    pub start: f64,
    pub stop: f64,
    pub points: usize,
}

impl Default for TemperatureGrid {
    fn default() -> Self {
        Self {
            start: 1100.0,
            stop: 1900.0,
            points: 3,
        }
    }
}

impl TemperatureGrid {
    pub fn values(&self) -> Vec<f64> {
        linspace(self.start, self.stop, self.points)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub delimiter: Delimiter,
    pub metric: IgnitionMetric,
    /// file the sweep table is written to; printed only when absent
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// kinetic mechanism handed to the reactor integrator
    pub mechanism: String,
    /// species whose trace defines the ignition delay
    pub reference_species: String,
    /// integration horizon, s
    pub max_time: f64,
    /// reactor pressure, Pa
    pub pressure: f64,
    pub temperatures: TemperatureGrid,
    pub fuel: TriFuel,
    /// percentages of fuel supplied by the secondary species, one mixture per value
    pub alphas: Vec<f64>,
    /// percentage of fuel supplied by the tertiary species
    pub beta: f64,
    pub mixture: MixtureConfig,
    pub failure_policy: FailurePolicy,
    pub report: ReportConfig,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            mechanism: "mechs/gri30_highT.yaml".to_string(),
            reference_species: "OH".to_string(),
            max_time: 1.0,
            pressure: 400000.0,
            temperatures: TemperatureGrid::default(),
            fuel: TriFuel::new(Species::CH4, Species::H2, Species::CH3OH),
            alphas: vec![0.0, 10.0, 20.0, 100.0],
            beta: 0.0,
            mixture: MixtureConfig::default(),
            failure_policy: FailurePolicy::default(),
            report: ReportConfig::default(),
        }
    }
}

impl SweepConfig {
    /// Reads and validates a configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SweepConfig = serde_json::from_str(&content)?;
        config.validate()?;
        info!("sweep configuration loaded from {}", path.as_ref().display());
        Ok(config)
    }

    /// Like `load`, but falls back to the default configuration when the file is absent or invalid.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            info!("no sweep configuration at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("ignoring sweep configuration {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |name: &str, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!(
                    "{} must be positive, got {}",
                    name, value
                )))
            }
        };
        positive("max_time", self.max_time)?;
        positive("pressure", self.pressure)?;
        positive("temperatures.start", self.temperatures.start)?;
        positive("temperatures.stop", self.temperatures.stop)?;
        positive("mixture.phi", self.mixture.phi)?;
        positive("mixture.total", self.mixture.total)?;
        if self.temperatures.points == 0 {
            return Err(ConfigError::Invalid(
                "temperature grid must contain at least one point".to_string(),
            ));
        }
        if self.reference_species.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "reference species is empty".to_string(),
            ));
        }
        if self.alphas.is_empty() {
            return Err(ConfigError::Invalid("no alphas to sweep".to_string()));
        }
        let total = self.mixture.total;
        for &fraction in self.alphas.iter().chain(std::iter::once(&self.beta)) {
            if !(0.0..=total).contains(&fraction) {
                return Err(ConfigError::Invalid(format!(
                    "fraction {} is out of range [0, {}]",
                    fraction, total
                )));
            }
        }
        self.fuel.oxygen_demands(&self.mixture.stoich)?;
        Ok(())
    }
}
