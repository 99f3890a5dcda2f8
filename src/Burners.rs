//! # Burners Module
//!
//! Flame case descriptions for burner-stabilized and impinging-jet (stagnation) flames.
//!
//! - **`temperature_profile`**: two-column (position, temperature) profile files with interpolation
//! - **`impinging_jet`**: McKenna burner geometry, grid refinement criteria, flame case data and solve reports
//! - **`flame_presets`**: the ethylene/acetylene base flames, fuel-blend variants and the ethylene-DME series
//! - **`flame_sweep`**: solving a set of flames through an external solver, with reports and species sums
pub mod flame_presets;
pub mod flame_sweep;
pub mod impinging_jet;
pub mod temperature_profile;
