//! # Ignition Module
//!
//! Ignition delay (induction time) tools:
//!
//! - **`induction_time`**: extraction of the induction time from a species trace by the maximum slope
//!   and tangent methods
//! - **`empirical`**: closed-form induction time correlations (acetylene pyrolysis behind shock waves)
//! - **`ignition_sweep`**: ignition delay over temperature and mixture grids, driving an external
//!   reactor integrator, with delimited and pretty-printed reports
pub mod empirical;
pub mod ignition_sweep;
pub mod induction_time;
