//! # Ignition Sweep Module
//!
//! Ignition delay over a grid of initial temperatures and mixtures. The reactor itself is an external
//! collaborator reached through the `ReactorIntegrator` trait: it takes an initial state, integrates the
//! batch reactor up to `max_time` and returns the trace of the tracked species.
//!
//! ## Workflow
//! 1) for every alpha of the configuration a tri-fuel mixture `M_{alpha}_{beta}` is built
//! 2) for every temperature of the grid the reactor is integrated and the induction time extracted
//! 3) results are gathered into a `SweepTable` (temperatures in rows, mixtures in columns)
//! 4) the table is written as a delimited file (times in microseconds) or pretty-printed
//!
//! Grid points that fail are handled according to `FailurePolicy`.
use super::induction_time::{InductionError, InductionTime, TimeSeries};
use crate::Mixtures::composition::MixtureSpec;
use crate::Mixtures::stoichiometry::MixtureError;
use crate::Mixtures::trifuel::MixtureBuilder;
use crate::settings::{ConfigError, Delimiter, FailurePolicy, IgnitionMetric, SweepConfig};
use log::{info, warn};
use prettytable::{Cell, Row, Table};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SweepError {
    #[error("Reactor integration failed: {0}")]
    Integration(String),
    #[error("Induction time extraction failed: {0}")]
    Induction(#[from] InductionError),
    #[error("Mixture construction failed: {0}")]
    Mixture(#[from] MixtureError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// initial state of a batch reactor run
#[derive(Debug, Clone, PartialEq)]
pub struct InitialState {
    /// K
    pub temperature: f64,
    /// Pa
    pub pressure: f64,
    pub mixture: MixtureSpec,
}

/// Seam to the chemistry solver: integrates a homogeneous reactor from `state` up to `max_time`
/// and returns the trace of `tracked_species`.
pub trait ReactorIntegrator {
    fn integrate(
        &mut self,
        state: &InitialState,
        tracked_species: &str,
        max_time: f64,
    ) -> Result<TimeSeries, SweepError>;
}

/// `n` evenly spaced values from `start` to `stop` inclusive
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { stop } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// results of one mixture over the temperature grid
#[derive(Debug, Clone, PartialEq)]
pub struct SweepColumn {
    pub label: String,
    pub mixture: MixtureSpec,
    /// `None` where the point failed and was skipped
    pub results: Vec<Option<InductionTime>>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SweepTable {
    pub temperatures: Vec<f64>,
    pub columns: Vec<SweepColumn>,
}

fn metric_value(result: Option<&InductionTime>, metric: IgnitionMetric) -> Option<f64> {
    result.map(|tau| tau.metric(metric))
}

fn microseconds(value: Option<f64>) -> String {
    value
        .map(|seconds| format!("{:.0}", seconds * 1e6))
        .unwrap_or_default()
}

impl SweepTable {
    pub fn header(&self) -> Vec<String> {
        let mut header = vec!["T".to_string()];
        header.extend(self.columns.iter().map(|column| column.label.clone()));
        header
    }

    /// one row per temperature: temperature in K and ignition delays in microseconds
    pub fn rows(&self, metric: IgnitionMetric) -> Vec<Vec<String>> {
        self.temperatures
            .iter()
            .enumerate()
            .map(|(j, temperature)| {
                let mut row = vec![format!("{:.0}", temperature)];
                row.extend(self.columns.iter().map(|column| {
                    let result = column.results.get(j).and_then(Option::as_ref);
                    microseconds(metric_value(result, metric))
                }));
                row
            })
            .collect()
    }

    pub fn write_delimited<W: Write>(
        &self,
        writer: W,
        delimiter: Delimiter,
        metric: IgnitionMetric,
    ) -> Result<(), SweepError> {
        let mut wtr = csv::WriterBuilder::new()
            .delimiter(delimiter.as_byte())
            .from_writer(writer);
        wtr.write_record(self.header())?;
        for row in self.rows(metric) {
            wtr.write_record(&row)?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn save<P: AsRef<Path>>(
        &self,
        path: P,
        delimiter: Delimiter,
        metric: IgnitionMetric,
    ) -> Result<(), SweepError> {
        let file = File::create(path.as_ref())?;
        self.write_delimited(file, delimiter, metric)?;
        info!("ignition delay table written to {}", path.as_ref().display());
        Ok(())
    }

    pub fn to_pretty_table(&self, metric: IgnitionMetric) -> Table {
        let mut table = Table::new();
        table.add_row(Row::new(
            self.header().iter().map(|title| Cell::new(title)).collect(),
        ));
        for row in self.rows(metric) {
            table.add_row(Row::new(row.iter().map(|value| Cell::new(value)).collect()));
        }
        table
    }

    pub fn print_table(&self, metric: IgnitionMetric) {
        self.to_pretty_table(metric).printstd();
    }
}

/// Runs ignition delay sweeps as described by a `SweepConfig`
#[derive(Debug, Clone)]
pub struct IgnitionSweep {
    config: SweepConfig,
    builder: MixtureBuilder,
}

impl IgnitionSweep {
    pub fn new(config: SweepConfig) -> Result<Self, SweepError> {
        config.validate()?;
        let builder = MixtureBuilder::new(config.mixture.clone());
        Ok(Self { config, builder })
    }

    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    /// Ignition delay of a single reactor run.
    pub fn ignition_delay<I: ReactorIntegrator + ?Sized>(
        &self,
        integrator: &mut I,
        temperature: f64,
        pressure: f64,
        mixture: &MixtureSpec,
    ) -> Result<InductionTime, SweepError> {
        let state = InitialState {
            temperature,
            pressure,
            mixture: mixture.clone(),
        };
        let trace = integrator.integrate(
            &state,
            &self.config.reference_species,
            self.config.max_time,
        )?;
        Ok(trace.induction_time()?)
    }

    /// Ignition delay for each temperature at fixed pressure and composition.
    pub fn temperature_dependence<I: ReactorIntegrator + ?Sized>(
        &self,
        integrator: &mut I,
        temperatures: &[f64],
        pressure: f64,
        mixture: &MixtureSpec,
    ) -> Result<Vec<Option<InductionTime>>, SweepError> {
        let mut taus = Vec::with_capacity(temperatures.len());
        for &temperature in temperatures {
            match self.ignition_delay(integrator, temperature, pressure, mixture) {
                Ok(tau) => {
                    let metric = self.config.report.metric;
                    info!(
                        "T = {:.0}, IDT ({:?}) = {:.0} mks",
                        temperature,
                        metric,
                        tau.metric(metric) * 1e6
                    );
                    taus.push(Some(tau));
                }
                Err(e) => match self.config.failure_policy {
                    FailurePolicy::Skip => {
                        warn!("T = {:.0}: no ignition delay ({}), point skipped", temperature, e);
                        taus.push(None);
                    }
                    FailurePolicy::Abort => return Err(e),
                },
            }
        }
        Ok(taus)
    }

    /// One column per alpha of the configuration, rows over the configured temperature grid.
    pub fn mixture_sweep<I: ReactorIntegrator + ?Sized>(
        &self,
        integrator: &mut I,
    ) -> Result<SweepTable, SweepError> {
        let temperatures = self.config.temperatures.values();
        let beta = self.config.beta;
        let mut table = SweepTable {
            temperatures: temperatures.clone(),
            columns: Vec::with_capacity(self.config.alphas.len()),
        };
        for &alpha in self.config.alphas.iter() {
            let mixture = self.builder.for_o2_default(&self.config.fuel, alpha, beta)?;
            let label = format!("M_{}_{}", alpha, beta);
            info!("Temperature dependency for mixture {} ({}) :", label, mixture);
            let results = self.temperature_dependence(
                integrator,
                &temperatures,
                self.config.pressure,
                &mixture,
            )?;
            table.columns.push(SweepColumn {
                label,
                mixture,
                results,
            });
        }
        Ok(table)
    }

    /// Runs `mixture_sweep` and writes the table to the configured output, or prints it.
    pub fn run<I: ReactorIntegrator + ?Sized>(
        &self,
        integrator: &mut I,
    ) -> Result<SweepTable, SweepError> {
        let table = self.mixture_sweep(integrator)?;
        let report = &self.config.report;
        match &report.output {
            Some(path) => table.save(path, report.delimiter, report.metric)?,
            None => table.print_table(report.metric),
        }
        Ok(table)
    }
}
