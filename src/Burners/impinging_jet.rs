//! # Impinging Jet Flame Module
//!
//! ## Purpose
//! Description of burner-stabilized flames impinging on a plate (McKenna burner with a stagnation body)
//! in the form needed to set up a stagnation-flame solve: inlet composition and velocity, burner-to-plate
//! distance, boundary temperatures and an optional measured temperature profile.
//!
//! ## Main Structures
//! - **`McKennaBurner`**: burner geometry and boundary temperatures
//! - **`GridRefineCriteria`**: mesh refinement settings passed to the flame solver
//! - **`ImpingingJetData`**: one flame case; can be built from fuel/oxidizer volumetric flows (l/h)
//!
//! ## Reports
//! `solve_report` renders the header written next to every solution, so that an output directory
//! tells which flame, mechanism and grid settings produced it.
use super::temperature_profile::TemperatureProfile;
use crate::Mixtures::composition::MixtureSpec;
use crate::Mixtures::stoichiometry::MixtureError;
use chrono::{Local, NaiveDateTime};
use log::info;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Pa
pub const ONE_ATM: f64 = 101325.0;

#[derive(Debug, Error)]
pub enum FlameError {
    #[error("Invalid {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },
    #[error("Stream '{0}' has no species")]
    EmptyStream(&'static str),
    #[error(transparent)]
    Mixture(#[from] MixtureError),
    #[error("Failed to write flame report: {0}")]
    Io(#[from] std::io::Error),
}

fn check_positive(name: &'static str, value: f64) -> Result<(), FlameError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(FlameError::InvalidParameter { name, value })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct McKennaBurner {
    /// temperature of the supplied gas, K
    pub t_room: f64,
    /// burner surface temperature, K
    pub t_burner: f64,
    /// stagnation body temperature, K
    pub t_body: f64,
    /// burner to body distance, m
    pub height: f64,
    /// porous plug diameter, m
    pub diameter: f64,
}

impl Default for McKennaBurner {
    fn default() -> Self {
        Self {
            t_room: 293.0,
            t_burner: 400.0,
            t_body: 600.0,
            height: 0.023,
            diameter: 0.06,
        }
    }
}

impl McKennaBurner {
    /// m^2
    pub fn exit_area(&self) -> f64 {
        PI * self.diameter * self.diameter / 4.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridRefineCriteria {
    pub ratio: f64,
    pub slope: f64,
    pub curve: f64,
    pub prune: f64,
}

impl Default for GridRefineCriteria {
    fn default() -> Self {
        Self {
            ratio: 3.0,
            slope: 0.1,
            curve: 0.2,
            prune: 0.05,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpingingJetData {
    pub label: String,
    pub mixture: MixtureSpec,
    /// m/s at t_room
    pub inlet_velocity: f64,
    pub height: f64,
    pub t_room: f64,
    pub t_burner: f64,
    pub t_body: f64,
    pub t_profile: Option<TemperatureProfile>,
    /// Pa
    pub pressure: f64,
}

impl ImpingingJetData {
    pub fn new(
        label: &str,
        mixture: MixtureSpec,
        inlet_velocity: f64,
        burner: &McKennaBurner,
    ) -> Self {
        Self {
            label: label.to_string(),
            mixture,
            inlet_velocity,
            height: burner.height,
            t_room: burner.t_room,
            t_burner: burner.t_burner,
            t_body: burner.t_body,
            t_profile: None,
            pressure: ONE_ATM,
        }
    }

    /// Flame fed by separate fuel and oxidizer flows, in liters per hour at room conditions.
    /// Each stream composition is normalised, blended by flow and the inlet velocity is the
    /// total flow over the burner exit area.
    pub fn from_flows(
        label: &str,
        fuel: &MixtureSpec,
        fuel_flow_lph: f64,
        oxidizer: &MixtureSpec,
        oxidizer_flow_lph: f64,
        burner: &McKennaBurner,
    ) -> Result<Self, FlameError> {
        check_positive("fuel flow", fuel_flow_lph)?;
        check_positive("oxidizer flow", oxidizer_flow_lph)?;
        check_positive("burner diameter", burner.diameter)?;
        if fuel.is_empty() {
            return Err(FlameError::EmptyStream("fuel"));
        }
        if oxidizer.is_empty() {
            return Err(FlameError::EmptyStream("oxidizer"));
        }
        let total_flow = fuel_flow_lph + oxidizer_flow_lph;
        let mut mixture = MixtureSpec::new();
        mixture.add_weighted(&fuel.normalized(), fuel_flow_lph / total_flow);
        mixture.add_weighted(&oxidizer.normalized(), oxidizer_flow_lph / total_flow);
        let flow_m3_per_s = total_flow / 1000.0 / 3600.0;
        let inlet_velocity = flow_m3_per_s / burner.exit_area();
        Ok(Self::new(label, mixture, inlet_velocity, burner))
    }

    pub fn with_profile(mut self, profile: TemperatureProfile) -> Self {
        self.t_profile = Some(profile);
        self
    }

    pub fn with_pressure(mut self, pressure: f64) -> Self {
        self.pressure = pressure;
        self
    }

    /// inlet mass flux, kg/m^2/s, for the gas density at room temperature
    pub fn mass_flux(&self, density: f64) -> f64 {
        self.inlet_velocity * density
    }

    pub fn solve_report(
        &self,
        mech: &str,
        criteria: &GridRefineCriteria,
        solved_at: NaiveDateTime,
    ) -> String {
        format!(
            "SOLVING McKenna Stabilized at {}\n\
             Flame \"{}\" with mixture composition\n\t{}\n\
             using kinetic mechanism {}\n\
             with parameters: inlet velocity = {:.3} cm/s\n\
             with grid refine criteria: ratio={:.2}, slope={:.3}, curve={:.3}, prune={:.3}\n",
            solved_at.format("%Y-%m-%d %H:%M:%S"),
            self.label,
            self.mixture,
            mech,
            self.inlet_velocity * 100.0,
            criteria.ratio,
            criteria.slope,
            criteria.curve,
            criteria.prune
        )
    }

    pub fn output_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.label)
    }

    /// Creates `<root>/<label>/` and writes the solve report there as `report.txt`.
    pub fn write_report(
        &self,
        root: &Path,
        mech: &str,
        criteria: &GridRefineCriteria,
    ) -> Result<PathBuf, FlameError> {
        let dir = self.output_dir(root);
        fs::create_dir_all(&dir)?;
        let report = self.solve_report(mech, criteria, Local::now().naive_local());
        info!("{}", report);
        let path = dir.join("report.txt");
        fs::write(&path, report)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn air() -> MixtureSpec {
        MixtureSpec::parse("O2:0.21, N2:0.78, AR:0.01").unwrap()
    }

    #[test]
    fn test_from_flows() {
        let fuel = MixtureSpec::parse("C2H4:1").unwrap();
        let burner = McKennaBurner::default();
        let flame =
            ImpingingJetData::from_flows("ethylene", &fuel, 84.0, &air(), 573.0, &burner).unwrap();
        assert_relative_eq!(flame.mixture.fraction("C2H4").unwrap(), 84.0 / 657.0);
        assert_relative_eq!(
            flame.mixture.fraction("O2").unwrap(),
            0.21 * 573.0 / 657.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(flame.mixture.total(), 1.0, epsilon = 1e-12);
        let expected_velocity = 657.0 / 1000.0 / 3600.0 / (PI * 0.06 * 0.06 / 4.0);
        assert_relative_eq!(flame.inlet_velocity, expected_velocity);
        assert_eq!(flame.height, 0.023);
        assert_eq!(flame.t_body, 600.0);
        assert_eq!(flame.pressure, ONE_ATM);
    }

    #[test]
    fn test_from_flows_errors() {
        let fuel = MixtureSpec::parse("C2H4:1").unwrap();
        let burner = McKennaBurner::default();
        assert!(matches!(
            ImpingingJetData::from_flows("x", &fuel, 0.0, &air(), 573.0, &burner),
            Err(FlameError::InvalidParameter { name: "fuel flow", .. })
        ));
        assert!(matches!(
            ImpingingJetData::from_flows("x", &MixtureSpec::new(), 84.0, &air(), 573.0, &burner),
            Err(FlameError::EmptyStream("fuel"))
        ));
    }

    #[test]
    fn test_mass_flux() {
        let flame = ImpingingJetData::new("x", air(), 0.1, &McKennaBurner::default());
        assert_relative_eq!(flame.mass_flux(1.2), 0.12);
    }

    #[test]
    fn test_solve_report() {
        let flame = ImpingingJetData::new(
            "acetylene_base",
            MixtureSpec::parse("C2H2:0.1 O2:0.9").unwrap(),
            0.0512345,
            &McKennaBurner::default(),
        );
        let solved_at = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(12, 30, 0)
            .unwrap();
        let report = flame.solve_report("gri30.yaml", &GridRefineCriteria::default(), solved_at);
        let expected = "SOLVING McKenna Stabilized at 2024-05-01 12:30:00\n\
                        Flame \"acetylene_base\" with mixture composition\n\
                        \tC2H2:0.100 O2:0.900\n\
                        using kinetic mechanism gri30.yaml\n\
                        with parameters: inlet velocity = 5.123 cm/s\n\
                        with grid refine criteria: \
                        ratio=3.00, slope=0.100, curve=0.200, prune=0.050\n";
        assert_eq!(report, expected);
    }

    #[test]
    fn test_write_report() {
        let dir = tempdir().unwrap();
        let flame = ImpingingJetData::new("case_1", air(), 0.05, &McKennaBurner::default());
        let path = flame
            .write_report(dir.path(), "gri30.yaml", &GridRefineCriteria::default())
            .unwrap();
        assert_eq!(path, dir.path().join("case_1").join("report.txt"));
        let content = fs::read_to_string(path).unwrap();
        assert!(content.contains("Flame \"case_1\""));
    }

    #[test]
    fn test_serde_round_trip() {
        let fuel = MixtureSpec::parse("C2H4:1").unwrap();
        let burner = McKennaBurner::default();
        let flame = ImpingingJetData::from_flows("ethylene", &fuel, 84.0, &air(), 573.0, &burner)
            .unwrap()
            .with_pressure(2.0 * ONE_ATM);
        let json = serde_json::to_string(&flame).unwrap();
        let back: ImpingingJetData = serde_json::from_str(&json).unwrap();
        assert_eq!(back.pressure, 2.0 * ONE_ATM);
        assert_eq!(back.mixture, flame.mixture);
        assert_eq!(back, flame);
    }
}
