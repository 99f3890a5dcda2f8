use super::composition::MixtureSpec;
use super::stoichiometry::{MixtureError, Species, StoichTable};
use log::debug;
use serde::{Deserialize, Serialize};

/// N2 to O2 molar ratio of air
pub const N2_TO_O2: f64 = 3.77;

/// Immutable settings of the mixture builder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MixtureConfig {
    /// stoichiometric O2 demand of the recognised species
    pub stoich: StoichTable,
    /// equivalence ratio used when none is given
    pub phi: f64,
    /// O2 percentage of oxygen-referenced mixtures
    pub o2_fraction: f64,
    /// inert species balancing oxygen-referenced mixtures
    pub diluter: String,
    /// scale of the percentages (alpha, beta and the resulting fractions)
    pub total: f64,
    pub n2_to_o2: f64,
}

impl Default for MixtureConfig {
    fn default() -> Self {
        Self {
            stoich: StoichTable::default(),
            phi: 1.0,
            o2_fraction: 7.0,
            diluter: "AR".to_string(),
            total: 100.0,
            n2_to_o2: N2_TO_O2,
        }
    }
}

/// primary, secondary and tertiary fuel species, validated against the stoichiometry table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriFuel {
    pub primary: Species,
    pub secondary: Species,
    pub tertiary: Species,
}

impl TriFuel {
    pub fn new(primary: Species, secondary: Species, tertiary: Species) -> Self {
        Self {
            primary,
            secondary,
            tertiary,
        }
    }

    pub fn from_labels(
        table: &StoichTable,
        primary: &str,
        secondary: &str,
        tertiary: &str,
    ) -> Result<Self, MixtureError> {
        Ok(Self {
            primary: table.lookup(primary)?,
            secondary: table.lookup(secondary)?,
            tertiary: table.lookup(tertiary)?,
        })
    }

    /// O2 demand of the primary, secondary and tertiary slots; fails on a species the table lacks
    pub fn oxygen_demands(&self, table: &StoichTable) -> Result<[f64; 3], MixtureError> {
        Ok([
            table.oxygen_demand(self.primary)?,
            table.oxygen_demand(self.secondary)?,
            table.oxygen_demand(self.tertiary)?,
        ])
    }
}

/// fuel amounts of the three slots for a given amount of O2
#[derive(Debug, Clone, Copy, PartialEq)]
struct FuelFractions {
    primary: f64,
    secondary: f64,
    tertiary: f64,
}

#[derive(Debug, Clone, Default)]
pub struct MixtureBuilder {
    config: MixtureConfig,
}

impl MixtureBuilder {
    pub fn new(config: MixtureConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MixtureConfig {
        &self.config
    }

    fn check_percent(name: &'static str, value: f64, total: f64) -> Result<(), MixtureError> {
        if value.is_finite() && (0.0..=total).contains(&value) {
            Ok(())
        } else {
            Err(MixtureError::FractionOutOfRange { name, value, total })
        }
    }

    fn check_inputs(alpha: f64, beta: f64, phi: f64, total: f64) -> Result<(), MixtureError> {
        if !(total.is_finite() && total > 0.0) {
            return Err(MixtureError::InvalidTotal(total));
        }
        if !(phi.is_finite() && phi > 0.0) {
            return Err(MixtureError::InvalidEquivalenceRatio(phi));
        }
        Self::check_percent("alpha", alpha, total)?;
        Self::check_percent("beta", beta, total)?;
        Ok(())
    }

    fn fuel_fractions(
        demands: [f64; 3],
        o2: f64,
        alpha: f64,
        beta: f64,
        phi: f64,
        total: f64,
    ) -> FuelFractions {
        let a = alpha / total;
        let b = beta / total;
        let [primary, secondary, tertiary] = demands;
        FuelFractions {
            primary: ((1.0 - a) * o2 * primary / phi) * (1.0 - b),
            secondary: (a * o2 * secondary / phi) * (1.0 - b),
            tertiary: o2 * b * tertiary / phi,
        }
    }

    /// Oxygen-referenced mixture: the O2 percentage is fixed and `diluter` fills the balance
    /// up to `total`.
    #[allow(clippy::too_many_arguments)]
    pub fn for_o2(
        &self,
        fuel: &TriFuel,
        o2_fraction: f64,
        alpha: f64,
        beta: f64,
        phi: f64,
        diluter: &str,
        total: f64,
    ) -> Result<MixtureSpec, MixtureError> {
        let demands = fuel.oxygen_demands(&self.config.stoich)?;
        Self::check_inputs(alpha, beta, phi, total)?;
        let fuels = Self::fuel_fractions(demands, o2_fraction, alpha, beta, phi, total);
        let diluter_fraction =
            total - o2_fraction - fuels.secondary - fuels.primary - fuels.tertiary;
        debug!(
            "O2-referenced mixture: {} {} {} alpha={} beta={} phi={} diluter {}={}",
            fuel.primary, fuel.secondary, fuel.tertiary, alpha, beta, phi, diluter, diluter_fraction
        );
        Ok(MixtureSpec::new()
            .with(fuel.primary.label(), fuels.primary)
            .with(fuel.secondary.label(), fuels.secondary)
            .with(fuel.tertiary.label(), fuels.tertiary)
            .with("O2", o2_fraction)
            .with(diluter, diluter_fraction))
    }

    /// same as `for_o2` with O2 fraction, phi, diluter and total taken from the configuration
    pub fn for_o2_default(
        &self,
        fuel: &TriFuel,
        alpha: f64,
        beta: f64,
    ) -> Result<MixtureSpec, MixtureError> {
        let config = &self.config;
        self.for_o2(
            fuel,
            config.o2_fraction,
            alpha,
            beta,
            config.phi,
            &config.diluter,
            config.total,
        )
    }

    /// Air-referenced mixture: O2 and N2 in the air ratio, all fractions rescaled to sum to 100.
    pub fn for_air(
        &self,
        fuel: &TriFuel,
        alpha: f64,
        beta: f64,
        phi: f64,
    ) -> Result<MixtureSpec, MixtureError> {
        let percent = 100.0;
        let demands = fuel.oxygen_demands(&self.config.stoich)?;
        Self::check_inputs(alpha, beta, phi, percent)?;
        let o2 = 1.0;
        let n2 = o2 * self.config.n2_to_o2;
        let fuels = Self::fuel_fractions(demands, o2, alpha, beta, phi, percent);
        let sum = fuels.primary + fuels.secondary + fuels.tertiary + o2 + n2;
        let scale = percent / sum;
        debug!(
            "air-referenced mixture: {} {} {} alpha={} beta={} phi={} scale={}",
            fuel.primary, fuel.secondary, fuel.tertiary, alpha, beta, phi, scale
        );
        Ok(MixtureSpec::new()
            .with(fuel.primary.label(), fuels.primary * scale)
            .with(fuel.secondary.label(), fuels.secondary * scale)
            .with(fuel.tertiary.label(), fuels.tertiary * scale)
            .with("O2", o2 * scale)
            .with("N2", n2 * scale))
    }
}

/// Oxygen-referenced tri-fuel mixture with the default stoichiometry table.
/// Species labels are validated before any fraction is computed.
#[allow(clippy::too_many_arguments)]
pub fn build_mixture(
    o2_fraction: f64,
    primary: &str,
    secondary: &str,
    tertiary: &str,
    alpha: f64,
    beta: f64,
    phi: f64,
    diluter: &str,
    total: f64,
) -> Result<MixtureSpec, MixtureError> {
    let builder = MixtureBuilder::default();
    let fuel = TriFuel::from_labels(&builder.config.stoich, primary, secondary, tertiary)?;
    builder.for_o2(&fuel, o2_fraction, alpha, beta, phi, diluter, total)
}

/// Air-referenced tri-fuel mixture with the default stoichiometry table, normalised to 100.
pub fn build_mixture_for_air(
    primary: &str,
    secondary: &str,
    tertiary: &str,
    alpha: f64,
    beta: f64,
    phi: f64,
) -> Result<MixtureSpec, MixtureError> {
    let builder = MixtureBuilder::default();
    let fuel = TriFuel::from_labels(&builder.config.stoich, primary, secondary, tertiary)?;
    builder.for_air(&fuel, alpha, beta, phi)
}
