use super::stoichiometry::MixtureError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

fn token_regex() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| {
        Regex::new(
            r"^([A-Za-z][A-Za-z0-9_()\-+*]*):([-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?)$",
        )
        .expect("composition token regex is valid")
    })
}

/// Gas mixture as an ordered list of (species label, mole fraction) pairs.
///
/// Fractions are stored as given (no implicit normalisation). The solver string form
/// keeps only strictly positive fractions, printed with three decimals. Serde uses the
/// same notation with every component at full precision, so stored mixtures read back unchanged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MixtureSpec {
    components: Vec<(String, f64)>,
}

impl MixtureSpec {
    pub fn new() -> Self {
        Self {
            components: Vec::new(),
        }
    }

    /// add a species to the end of the list; a repeated label accumulates into the existing entry
    pub fn push(&mut self, label: &str, fraction: f64) {
        if let Some(entry) = self.components.iter_mut().find(|(name, _)| name == label) {
            entry.1 += fraction;
        } else {
            self.components.push((label.to_string(), fraction));
        }
    }

    pub fn with(mut self, label: &str, fraction: f64) -> Self {
        self.push(label, fraction);
        self
    }

    pub fn components(&self) -> &[(String, f64)] {
        &self.components
    }

    /// components that appear in the solver string (fraction > 0)
    pub fn present(&self) -> impl Iterator<Item = (&str, f64)> {
        self.components
            .iter()
            .filter(|(_, fraction)| *fraction > 0.0)
            .map(|(name, fraction)| (name.as_str(), *fraction))
    }

    pub fn fraction(&self, label: &str) -> Option<f64> {
        self.components
            .iter()
            .find(|(name, _)| name == label)
            .map(|(_, fraction)| *fraction)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.present().any(|(name, _)| name == label)
    }

    /// sum of the strictly positive fractions
    pub fn total(&self) -> f64 {
        self.present().map(|(_, fraction)| fraction).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.present().next().is_none()
    }

    /// copy with every fraction multiplied by `factor`
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            components: self
                .components
                .iter()
                .map(|(name, fraction)| (name.clone(), fraction * factor))
                .collect(),
        }
    }

    /// copy rescaled so that the positive fractions sum to `target`;
    /// an empty mixture is returned unchanged
    pub fn normalized_to(&self, target: f64) -> Self {
        let total = self.total();
        if total > 0.0 {
            self.scaled(target / total)
        } else {
            self.clone()
        }
    }

    pub fn normalized(&self) -> Self {
        self.normalized_to(1.0)
    }

    /// accumulate another mixture multiplied by `weight`
    pub fn add_weighted(&mut self, other: &MixtureSpec, weight: f64) {
        for (name, fraction) in other.components.iter() {
            self.push(name, fraction * weight);
        }
    }

    pub fn to_solver_string(&self) -> String {
        self.present()
            .map(|(name, fraction)| format!("{}:{:.3}", name, fraction))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// all components, including non-positive ones, with the shortest exact float representation
    pub fn to_exact_string(&self) -> String {
        self.components
            .iter()
            .map(|(name, fraction)| format!("{}:{}", name, fraction))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Parse a solver composition string such as "CH4:3.5 O2:7" or "O2:0.21, N2:0.78, AR:0.01".
    pub fn parse(s: &str) -> Result<Self, MixtureError> {
        let re = token_regex();
        let mut spec = MixtureSpec::new();
        for token in s.split(|c: char| c.is_whitespace() || c == ',') {
            if token.is_empty() {
                continue;
            }
            let captures = re
                .captures(token)
                .ok_or_else(|| MixtureError::ParseError(token.to_string()))?;
            let fraction: f64 = captures[2]
                .parse()
                .map_err(|_| MixtureError::ParseError(token.to_string()))?;
            spec.push(&captures[1], fraction);
        }
        Ok(spec)
    }
}

impl fmt::Display for MixtureSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_solver_string())
    }
}

impl std::str::FromStr for MixtureSpec {
    type Err = MixtureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MixtureSpec::parse(s)
    }
}

impl TryFrom<String> for MixtureSpec {
    type Error = MixtureError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        MixtureSpec::parse(&s)
    }
}

impl From<MixtureSpec> for String {
    fn from(spec: MixtureSpec) -> String {
        spec.to_exact_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_solver_string_skips_non_positive() {
        let mix = MixtureSpec::new()
            .with("CH4", 3.5)
            .with("H2", 0.0)
            .with("O2", 7.0)
            .with("AR", -0.2);
        assert_eq!(mix.to_solver_string(), "CH4:3.500 O2:7.000");
        assert_eq!(mix.components().len(), 4);
        assert!(!mix.contains("H2"));
        assert!(mix.contains("O2"));
    }

    #[test]
    fn test_parse_space_and_comma_separated() {
        let mix = MixtureSpec::parse("O2:0.21, N2:0.78, AR:0.01").unwrap();
        assert_eq!(mix.components().len(), 3);
        assert_relative_eq!(mix.fraction("N2").unwrap(), 0.78);
        assert_relative_eq!(mix.total(), 1.0, epsilon = 1e-12);

        let mix = MixtureSpec::parse("C2H4:85 CH3OCH3:15").unwrap();
        assert_eq!(mix.fraction("CH3OCH3"), Some(15.0));
        assert_eq!(mix.fraction("H2"), None);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            MixtureSpec::parse("CH4 O2:7"),
            Err(MixtureError::ParseError("CH4".to_string()))
        );
        assert!(MixtureSpec::parse("CH4:abc").is_err());
        assert!(MixtureSpec::parse(":1.0").is_err());
        assert!(MixtureSpec::parse("").unwrap().is_empty());
    }

    #[test]
    fn test_repeated_label_accumulates() {
        let mix = MixtureSpec::parse("N2:1 O2:1 N2:2").unwrap();
        assert_eq!(mix.components().len(), 2);
        assert_eq!(mix.fraction("N2"), Some(3.0));
    }

    #[test]
    fn test_normalization() {
        let mix = MixtureSpec::parse("C2H4:0.75 AR:0.25").unwrap().normalized_to(100.0);
        assert_relative_eq!(mix.fraction("C2H4").unwrap(), 75.0);
        assert_relative_eq!(mix.total(), 100.0);
        let empty = MixtureSpec::new().normalized();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_weighted_blend() {
        let fuel = MixtureSpec::parse("C2H4:1").unwrap();
        let air = MixtureSpec::parse("O2:0.21 N2:0.79").unwrap();
        let mut blend = MixtureSpec::new();
        blend.add_weighted(&fuel, 1.0);
        blend.add_weighted(&air, 4.0);
        assert_relative_eq!(blend.fraction("O2").unwrap(), 0.84);
        assert_relative_eq!(blend.total(), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_serde_as_string() {
        let mix = MixtureSpec::parse("CH4:3.5 O2:7").unwrap();
        let json = serde_json::to_string(&mix).unwrap();
        assert_eq!(json, "\"CH4:3.5 O2:7\"");
        let back: MixtureSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(back, mix);
        assert!(serde_json::from_str::<MixtureSpec>("\"CH4\"").is_err());
    }

    #[test]
    fn test_serde_keeps_full_precision() {
        let mix = MixtureSpec::new()
            .with("C2H4", 1.0 / 3.0)
            .with("O2", 0.2)
            .with("AR", 0.0004)
            .with("N2", 0.0)
            .with("HE", 1e-20);
        assert_eq!(mix.to_string(), "C2H4:0.333 O2:0.200 AR:0.000 HE:0.000");
        let json = serde_json::to_string(&mix).unwrap();
        let back: MixtureSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(back, mix);
        assert_eq!(back.components().len(), 5);
    }
}
