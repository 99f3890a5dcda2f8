//! # Induction Time Module
//!
//! Estimation of the induction (ignition delay) time from the concentration trace of a tracked species,
//! typically OH produced by a constant-volume or constant-pressure batch reactor.
//!
//! ## Method
//! The trace is scanned pairwise with forward differences
//! ```text
//! slope_i = (c_i - c_{i-1}) / (t_i - t_{i-1}),   i = 1..n-1
//! ```
//! The point of steepest rise gives `slope_time = t_i*`. The tangent to the trace at that point is
//! extrapolated back to zero concentration:
//! ```text
//! tangent_time = slope_time - c_i* / max_slope
//! ```
//! The tangent time may be negative when the extrapolation overshoots the start of the series;
//! this is a property of the tangent method and is returned as is.
//!
//! Times and values are non-negative and finite, times strictly increasing.
//! Only strictly positive slopes qualify and the first of equal maxima wins.
//! A trace without any rise is reported as `InductionError::NoRiseDetected`.
use crate::settings::IgnitionMetric;
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum InductionError {
    #[error("Time and value sequences differ in length: {times} times, {values} values")]
    LengthMismatch { times: usize, values: usize },
    #[error("Time series must contain at least 2 points, got {0}")]
    TooShort(usize),
    #[error("Times are not strictly increasing at index {index}")]
    NonIncreasingTime { index: usize },
    #[error("Non-finite value at index {index}")]
    NonFiniteValue { index: usize },
    #[error("Negative time or value at index {index}")]
    NegativeSample { index: usize },
    #[error("No rise detected: maximum slope of the series is not positive")]
    NoRiseDetected,
    #[error("Invalid condition {name} = {value}: must be positive and finite")]
    InvalidCondition { name: &'static str, value: f64 },
}

/// result of the induction time extraction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InductionTime {
    /// time of maximum forward-difference slope
    pub slope_time: f64,
    /// onset time from the tangent at the steepest point
    pub tangent_time: f64,
}

impl InductionTime {
    pub fn metric(&self, metric: IgnitionMetric) -> f64 {
        match metric {
            IgnitionMetric::SlopeTime => self.slope_time,
            IgnitionMetric::TangentTime => self.tangent_time,
        }
    }
}

/// Scalar trace sampled at strictly increasing times
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    times: Vec<f64>,
    values: Vec<f64>,
}

fn validate(times: &[f64], values: &[f64]) -> Result<(), InductionError> {
    if times.len() != values.len() {
        return Err(InductionError::LengthMismatch {
            times: times.len(),
            values: values.len(),
        });
    }
    if times.len() < 2 {
        return Err(InductionError::TooShort(times.len()));
    }
    for (index, (t, c)) in times.iter().zip(values.iter()).enumerate() {
        if !t.is_finite() || !c.is_finite() {
            return Err(InductionError::NonFiniteValue { index });
        }
        if *t < 0.0 || *c < 0.0 {
            return Err(InductionError::NegativeSample { index });
        }
    }
    if let Some(index) = (1..times.len()).find(|&i| times[i] <= times[i - 1]) {
        return Err(InductionError::NonIncreasingTime { index });
    }
    Ok(())
}

impl TimeSeries {
    pub fn new(times: Vec<f64>, values: Vec<f64>) -> Result<Self, InductionError> {
        validate(&times, &values)?;
        Ok(Self { times, values })
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn induction_time(&self) -> Result<InductionTime, InductionError> {
        steepest_rise(&self.times, &self.values)
    }
}

/// Induction time of a concentration trace: time of steepest rise and its tangent onset.
///
/// # Arguments
/// * `times` - strictly increasing sample times
/// * `concentrations` - tracked species value at each time
///
/// # Returns
/// * `Ok(InductionTime)` - slope and tangent times
/// * `Err(InductionError)` - malformed input or a trace that never rises
///
/// # Example
/// ```
/// use ChemSweep::Ignition::induction_time::compute_induction_time;
/// let t = [0.0, 1.0, 2.0, 3.0];
/// let c = [0.0, 0.1, 1.1, 1.2];
/// let tau = compute_induction_time(&t, &c).unwrap();
/// assert_eq!(tau.slope_time, 2.0);
/// assert!((tau.tangent_time - 0.9).abs() < 1e-12);
/// ```
pub fn compute_induction_time(
    times: &[f64],
    concentrations: &[f64],
) -> Result<InductionTime, InductionError> {
    validate(times, concentrations)?;
    steepest_rise(times, concentrations)
}

// input is validated by the caller
fn steepest_rise(times: &[f64], values: &[f64]) -> Result<InductionTime, InductionError> {
    let mut max_slope = 0.0;
    let mut steepest: Option<usize> = None;
    for i in 1..values.len() {
        let slope = (values[i] - values[i - 1]) / (times[i] - times[i - 1]);
        if slope > max_slope {
            max_slope = slope;
            steepest = Some(i);
        }
    }
    let i = steepest.ok_or(InductionError::NoRiseDetected)?;
    let slope_time = times[i];
    let tangent_time = slope_time - values[i] / max_slope;
    debug!(
        "steepest rise at index {} (t = {:e}, slope = {:e}), tangent onset at {:e}",
        i, slope_time, max_slope, tangent_time
    );
    Ok(InductionTime {
        slope_time,
        tangent_time,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_single_steepest_segment() {
        let times = [0.0, 1.0, 2.0, 3.0, 4.0];
        let values = [0.0, 0.1, 0.3, 2.3, 2.4];
        let tau = compute_induction_time(&times, &values).unwrap();
        assert_eq!(tau.slope_time, 3.0);
        assert_relative_eq!(tau.tangent_time, 3.0 - 2.3 / 2.0);
        assert!(tau.tangent_time < tau.slope_time);
    }

    #[test]
    fn test_non_uniform_steps() {
        // largest jump is not the steepest slope once the step widths are accounted for
        let times = [0.0, 0.5, 0.6, 2.0];
        let values = [0.0, 0.4, 0.5, 1.5];
        let tau = compute_induction_time(&times, &values).unwrap();
        assert_eq!(tau.slope_time, 0.6);
        assert_relative_eq!(tau.tangent_time, 0.6 - 0.5 / 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_ties_keep_first() {
        let times = [0.0, 1.0, 2.0, 3.0];
        let values = [0.0, 1.0, 2.0, 3.0];
        let tau = compute_induction_time(&times, &values).unwrap();
        assert_eq!(tau.slope_time, 1.0);
        assert_eq!(tau.tangent_time, 0.0);
    }

    #[test]
    fn test_negative_tangent_time_preserved() {
        let times = [0.0, 1.0, 2.0];
        let values = [5.0, 6.0, 6.5];
        let tau = compute_induction_time(&times, &values).unwrap();
        assert_eq!(tau.slope_time, 1.0);
        assert_eq!(tau.tangent_time, -5.0);
    }

    #[test]
    fn test_flat_series_has_no_rise() {
        let times = [0.0, 1.0, 2.0, 3.0];
        let values = [0.2, 0.2, 0.2, 0.2];
        assert_eq!(
            compute_induction_time(&times, &values),
            Err(InductionError::NoRiseDetected)
        );
        let decaying = [1.0, 0.5, 0.25, 0.0];
        assert_eq!(
            compute_induction_time(&times, &decaying),
            Err(InductionError::NoRiseDetected)
        );
    }

    #[test]
    fn test_malformed_series() {
        assert_eq!(
            compute_induction_time(&[0.0, 1.0], &[0.0]),
            Err(InductionError::LengthMismatch { times: 2, values: 1 })
        );
        assert_eq!(
            compute_induction_time(&[0.0], &[0.0]),
            Err(InductionError::TooShort(1))
        );
        assert_eq!(
            compute_induction_time(&[0.0, 1.0, 1.0], &[0.0, 1.0, 2.0]),
            Err(InductionError::NonIncreasingTime { index: 2 })
        );
        assert_eq!(
            compute_induction_time(&[0.0, 1.0, 2.0], &[0.0, f64::NAN, 2.0]),
            Err(InductionError::NonFiniteValue { index: 1 })
        );
        assert_eq!(
            compute_induction_time(&[0.0, 1.0, 2.0], &[0.0, 1.0, -1e-20]),
            Err(InductionError::NegativeSample { index: 2 })
        );
        assert_eq!(
            compute_induction_time(&[-1.0, 0.0, 1.0], &[0.0, 1.0, 2.0]),
            Err(InductionError::NegativeSample { index: 0 })
        );
    }

    #[test]
    fn test_time_series_wrapper() {
        assert!(TimeSeries::new(vec![1.0, 0.5], vec![0.0, 1.0]).is_err());
        let series =
            TimeSeries::new(vec![0.0, 1e-4, 2e-4, 3e-4], vec![0.0, 1e-6, 1e-3, 1.1e-3]).unwrap();
        assert_eq!(series.len(), 4);
        let tau = series.induction_time().unwrap();
        assert_eq!(tau.metric(IgnitionMetric::SlopeTime), tau.slope_time);
        assert_eq!(tau.metric(IgnitionMetric::TangentTime), tau.tangent_time);
        assert_eq!(tau.slope_time, 2e-4);
        assert!(tau.tangent_time < tau.slope_time);
        // onset extrapolated slightly before the first sample of the rise
        assert_relative_eq!(tau.tangent_time, 2e-4 - 1e-3 / 9.99, epsilon = 1e-9);
    }
}
