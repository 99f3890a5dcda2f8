//! # Flame Sweep Module
//!
//! Solves a set of impinging-jet flames one after another. The stagnation-flame solver is external
//! and reached through the `FlameSolver` trait; this module takes care of the bookkeeping around it.
//!
//! For every flame:
//! 1) the solve report is written to `<root>/<label>/report.txt`
//! 2) the solver writes the mole and mass fraction profiles `<label>_X.csv` and `<label>_y.csv`
//!    into `<root>/<label>/`
//! 3) both files are lumped into species bins (`postprocess_creck_soot`)
//!
//! A flame that fails at any step is skipped or aborts the batch, according to `FailurePolicy`.
use super::impinging_jet::{FlameError, GridRefineCriteria, ImpingingJetData};
use crate::Utils::csv_processing::{CsvProcessingError, SpeciesBins, postprocess_creck_soot};
use crate::settings::FailurePolicy;
use log::{info, warn};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlameSweepError {
    #[error("Flame solver failed: {0}")]
    Solver(String),
    #[error(transparent)]
    Flame(#[from] FlameError),
    #[error("Post-processing failed: {0}")]
    Postprocess(#[from] CsvProcessingError),
    #[error("Failed to write flame output: {0}")]
    Io(#[from] std::io::Error),
}

/// Seam to the stagnation-flame solver.
pub trait FlameSolver {
    /// Solves `flame` with `mech` and writes `<label>_X.csv` (mole fractions) and `<label>_y.csv`
    /// (mass fractions) into `output_dir`, which already exists.
    fn solve(
        &mut self,
        flame: &ImpingingJetData,
        mech: &str,
        criteria: &GridRefineCriteria,
        output_dir: &Path,
    ) -> Result<(), FlameSweepError>;
}

/// files produced for one solved flame
#[derive(Debug, Clone, PartialEq)]
pub struct FlameOutput {
    pub label: String,
    pub report: PathBuf,
    pub x_sums: PathBuf,
    pub y_sums: PathBuf,
}

#[derive(Debug, Clone)]
pub struct FlameSweep {
    pub mech: String,
    pub criteria: GridRefineCriteria,
    /// directory holding one subdirectory per flame
    pub root: PathBuf,
    pub x_bins: SpeciesBins,
    pub y_bins: SpeciesBins,
    pub failure_policy: FailurePolicy,
}

impl FlameSweep {
    pub fn new(mech: &str, root: &Path, x_bins: SpeciesBins, y_bins: SpeciesBins) -> Self {
        Self {
            mech: mech.to_string(),
            criteria: GridRefineCriteria::default(),
            root: root.to_path_buf(),
            x_bins,
            y_bins,
            failure_policy: FailurePolicy::default(),
        }
    }

    pub fn with_criteria(mut self, criteria: GridRefineCriteria) -> Self {
        self.criteria = criteria;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Report, solve and post-process a single flame.
    pub fn solve_one<S: FlameSolver + ?Sized>(
        &self,
        solver: &mut S,
        flame: &ImpingingJetData,
    ) -> Result<FlameOutput, FlameSweepError> {
        let report = flame.write_report(&self.root, &self.mech, &self.criteria)?;
        solver.solve(flame, &self.mech, &self.criteria, &flame.output_dir(&self.root))?;
        let (x_sums, y_sums) =
            postprocess_creck_soot(&self.root, &flame.label, &self.x_bins, &self.y_bins)?;
        Ok(FlameOutput {
            label: flame.label.clone(),
            report,
            x_sums,
            y_sums,
        })
    }

    /// Solves every flame in order. The result has one entry per flame, `None` for skipped ones.
    pub fn multi_solve<S: FlameSolver + ?Sized>(
        &self,
        solver: &mut S,
        flames: &[ImpingingJetData],
    ) -> Result<Vec<Option<FlameOutput>>, FlameSweepError> {
        info!("started processing set of {} flames", flames.len());
        let mut outputs = Vec::with_capacity(flames.len());
        for (i, flame) in flames.iter().enumerate() {
            info!("task {} of {}: {}", i + 1, flames.len(), flame.label);
            match self.solve_one(solver, flame) {
                Ok(output) => outputs.push(Some(output)),
                Err(e) => match self.failure_policy {
                    FailurePolicy::Skip => {
                        warn!("flame {} skipped: {}", flame.label, e);
                        outputs.push(None);
                    }
                    FailurePolicy::Abort => return Err(e),
                },
            }
        }
        info!(
            "finished: {} of {} flames solved",
            outputs.iter().flatten().count(),
            flames.len()
        );
        Ok(outputs)
    }
}
