use super::impinging_jet::{FlameError, ImpingingJetData, McKennaBurner};
use crate::Mixtures::composition::MixtureSpec;

/// synthetic air with argon
pub const AIR: &str = "O2:0.21, N2:0.78, AR:0.01";
/// l/h
pub const FUEL_FLOW: f64 = 84.0;
/// DME shares of the fuel, %, for the ethylene-DME series
pub const DME_FRACTIONS: [u32; 8] = [0, 15, 30, 45, 60, 75, 90, 100];

fn preset(
    label: &str,
    fuel: &str,
    oxidizer_flow_lph: f64,
) -> Result<ImpingingJetData, FlameError> {
    ImpingingJetData::from_flows(
        label,
        &MixtureSpec::parse(fuel)?,
        FUEL_FLOW,
        &MixtureSpec::parse(AIR)?,
        oxidizer_flow_lph,
        &McKennaBurner::default(),
    )
}

pub fn ethylene_flame() -> Result<ImpingingJetData, FlameError> {
    preset("ethylene_base", "C2H4:1", 573.0)
}

pub fn acetylene_flame() -> Result<ImpingingJetData, FlameError> {
    preset("acetylene_base", "C2H2:1", 545.0)
}

/// ethylene with a quarter of the fuel stream replaced by argon
pub fn ethylene_argon_flame() -> Result<ImpingingJetData, FlameError> {
    preset("ethylene_ar", "C2H4:0.75 AR:0.25", 573.0)
}

pub fn ethylene_hydrogen_flame() -> Result<ImpingingJetData, FlameError> {
    preset("ethylene_h2", "C2H4:0.75 H2:0.25", 573.0)
}

pub fn ethylene_propane_flame() -> Result<ImpingingJetData, FlameError> {
    preset("ethylene_c3h8", "C2H4:0.75 C3H8:0.25", 573.0)
}

/// Ethylene flames with part of the fuel replaced by dimethyl ether, one per percentage.
pub fn dme_flames(dme_fractions: &[u32]) -> Result<Vec<ImpingingJetData>, FlameError> {
    dme_fractions
        .iter()
        .map(|&dme| {
            let ethylene = 100u32.saturating_sub(dme);
            preset(
                &format!("C2H4_{}_DME_{}", ethylene, dme),
                &format!("C2H4:{} CH3OCH3:{}", ethylene, dme),
                545.0,
            )
        })
        .collect()
}
