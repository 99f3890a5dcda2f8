/// closed set of fuel and oxidizer species known to the mixture builder, together with
/// their stoichiometric oxygen demand (moles of O2 needed to burn one mole of species).
/// # Examples
/// ```
/// use ChemSweep::Mixtures::stoichiometry::{Species, StoichTable};
/// let table = StoichTable::default();
/// let h2: Species = "H2".parse().unwrap();
/// assert_eq!(table.oxygen_demand(h2).unwrap(), 2.0);
/// ```
pub mod stoichiometry;
/// Gas composition in the textual form accepted by chemistry solvers: "SPECIES:fraction SPECIES:fraction ..."
/// MixtureSpec keeps species in insertion order and writes only strictly positive fractions, with three
/// decimals. Solver strings parse back (tokens may be separated by spaces and/or commas).
/// # Examples
/// ```
/// use ChemSweep::Mixtures::composition::MixtureSpec;
/// let mix = MixtureSpec::parse("CH4:3.5 O2:7 N2:0").unwrap();
/// assert_eq!(mix.to_string(), "CH4:3.500 O2:7.000");
/// ```
pub mod composition;
/// Tri-fuel mixture builder.
///
/// Fuel is split between a primary, a secondary (admixture) and a tertiary species. `alpha` is the
/// percentage of fuel supplied by the secondary species, `beta` the percentage supplied by the tertiary one.
/// Fuel amounts follow from the stoichiometric oxygen demand of each species divided by the equivalence ratio.
///
/// Two references are supported:
/// 1) oxygen referenced: O2 fraction is fixed (7% by default) and an inert diluter fills the balance up to 100
/// 2) air referenced: O2 and N2 come in the 1:3.77 ratio of air and all fractions are rescaled to sum to 100
/// # Examples
/// ```
/// use ChemSweep::Mixtures::trifuel::build_mixture;
/// let mix = build_mixture(7.0, "CH4", "H2", "CH3OH", 100.0, 0.0, 1.0, "AR", 100.0).unwrap();
/// assert_eq!(mix.to_string(), "H2:14.000 O2:7.000 AR:79.000");
/// ```
pub mod trifuel;
