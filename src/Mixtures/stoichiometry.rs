use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// errors of mixture construction
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MixtureError {
    #[error("Unknown species '{0}': not present in the stoichiometric oxygen demand table")]
    UnknownSpecies(String),
    #[error("Fraction {name} = {value} is out of range [0, {total}]")]
    FractionOutOfRange { name: &'static str, value: f64, total: f64 },
    #[error("Invalid equivalence ratio {0}: must be positive and finite")]
    InvalidEquivalenceRatio(f64),
    #[error("Invalid total {0}: must be positive and finite")]
    InvalidTotal(f64),
    #[error("Cannot parse composition token '{0}'")]
    ParseError(String),
}

/// Species recognised by the mixture builder. `None` stands for the empty label,
/// i.e. "no species in this slot" (typically the tertiary fuel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Species {
    #[serde(rename = "")]
    None,
    O2,
    H2,
    CH4,
    CO,
    NH3,
    CH3OH,
    CH3OCH3,
}

impl Species {
    pub const ALL: [Species; 8] = [
        Species::None,
        Species::O2,
        Species::H2,
        Species::CH4,
        Species::CO,
        Species::NH3,
        Species::CH3OH,
        Species::CH3OCH3,
    ];

    /// label in the solver notation
    pub fn label(&self) -> &'static str {
        match self {
            Species::None => "",
            Species::O2 => "O2",
            Species::H2 => "H2",
            Species::CH4 => "CH4",
            Species::CO => "CO",
            Species::NH3 => "NH3",
            Species::CH3OH => "CH3OH",
            Species::CH3OCH3 => "CH3OCH3",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Species {
    type Err = MixtureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Species::ALL
            .iter()
            .copied()
            .find(|species| species.label() == s)
            .ok_or_else(|| MixtureError::UnknownSpecies(s.to_string()))
    }
}

/// Stoichiometric oxygen demand: moles of O2 required per mole of species.
/// The table is immutable once built; `with_demand` returns a modified copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoichTable {
    demand: HashMap<Species, f64>,
}

impl Default for StoichTable {
    fn default() -> Self {
        let demand = HashMap::from([
            (Species::None, 0.0),
            (Species::O2, 1.0),
            (Species::H2, 2.0),
            (Species::CH4, 0.5),
            (Species::CO, 2.0),
            (Species::NH3, 4.0 / 3.0),
            (Species::CH3OH, 2.0 / 3.0),
            (Species::CH3OCH3, 1.0 / 3.0),
        ]);
        Self { demand }
    }
}

impl StoichTable {
    /// O2 demand of a species. A species absent from the table is an error.
    pub fn oxygen_demand(&self, species: Species) -> Result<f64, MixtureError> {
        self.demand
            .get(&species)
            .copied()
            .ok_or_else(|| MixtureError::UnknownSpecies(species.label().to_string()))
    }

    pub fn with_demand(&self, species: Species, demand: f64) -> Self {
        let mut table = self.clone();
        table.demand.insert(species, demand);
        table
    }

    /// validate a label and return the matching species
    pub fn lookup(&self, label: &str) -> Result<Species, MixtureError> {
        let species: Species = label.parse()?;
        if self.demand.contains_key(&species) {
            Ok(species)
        } else {
            Err(MixtureError::UnknownSpecies(label.to_string()))
        }
    }
}
