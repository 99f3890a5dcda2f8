use super::induction_time::InductionError;

/// Arrhenius-type fit of an induction time: t = a * T * exp(E / T) / (P * X_C)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InductionFit {
    /// pre-exponential factor
    pub a: f64,
    /// activation temperature, K
    pub e: f64,
}

impl InductionFit {
    pub fn time(&self, temperature: f64, pressure: f64, carbon_fraction: f64) -> f64 {
        (self.a * temperature * (self.e / temperature).exp()) / (pressure * carbon_fraction)
    }
}

/// acetylene pyrolysis, high temperature branch (Eremin 2012)
pub const C2H2_HIGH: InductionFit = InductionFit {
    a: 2.194E-9,
    e: 27450.0,
};
/// acetylene pyrolysis, low temperature branch (Eremin 2012)
pub const C2H2_LOW: InductionFit = InductionFit {
    a: 1.0803E-4,
    e: 9375.0,
};

fn check_positive(name: &'static str, value: f64) -> Result<(), InductionError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(InductionError::InvalidCondition { name, value })
    }
}

/// Induction time of acetylene pyrolysis behind a shock wave: the shorter of the two branch fits.
/// * `temperature` - post-shock temperature, K
/// * `pressure` - post-shock pressure, Pa
/// * `carbon_fraction` - mole fraction of carbon atoms in the mixture
pub fn c2h2_induction_time(
    temperature: f64,
    pressure: f64,
    carbon_fraction: f64,
) -> Result<f64, InductionError> {
    check_positive("temperature", temperature)?;
    check_positive("pressure", pressure)?;
    check_positive("carbon_fraction", carbon_fraction)?;
    let t_low = C2H2_LOW.time(temperature, pressure, carbon_fraction);
    let t_high = C2H2_HIGH.time(temperature, pressure, carbon_fraction);
    Ok(t_low.min(t_high))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_branch_selection() {
        // the branches cross where a_low*exp(E_low/T) == a_high*exp(E_high/T)
        let crossing = (C2H2_HIGH.e - C2H2_LOW.e) / (C2H2_LOW.a / C2H2_HIGH.a).ln();
        let pressure = 2.0e5;
        let cold = crossing - 200.0;
        let hot = crossing + 200.0;
        assert_relative_eq!(
            c2h2_induction_time(cold, pressure, 1.0).unwrap(),
            C2H2_LOW.time(cold, pressure, 1.0)
        );
        assert_relative_eq!(
            c2h2_induction_time(hot, pressure, 1.0).unwrap(),
            C2H2_HIGH.time(hot, pressure, 1.0)
        );
    }

    #[test]
    fn test_scaling_with_pressure_and_carbon() {
        let base = c2h2_induction_time(1800.0, 1.0e5, 1.0).unwrap();
        let doubled_pressure = c2h2_induction_time(1800.0, 2.0e5, 1.0).unwrap();
        let half_carbon = c2h2_induction_time(1800.0, 1.0e5, 0.5).unwrap();
        assert_relative_eq!(doubled_pressure, base / 2.0, max_relative = 1e-12);
        assert_relative_eq!(half_carbon, base * 2.0, max_relative = 1e-12);
        // hotter gas ignites faster
        assert!(c2h2_induction_time(2200.0, 1.0e5, 1.0).unwrap() < base);
    }

    #[test]
    fn test_known_value() {
        let t = 1500.0;
        let p = 1.0e5;
        let expected_low = 1.0803E-4 * t * (9375.0_f64 / t).exp() / p;
        let expected_high = 2.194E-9 * t * (27450.0_f64 / t).exp() / p;
        assert_relative_eq!(
            c2h2_induction_time(t, p, 1.0).unwrap(),
            expected_low.min(expected_high)
        );
    }

    #[test]
    fn test_invalid_conditions() {
        assert_eq!(
            c2h2_induction_time(0.0, 1.0e5, 1.0),
            Err(InductionError::InvalidCondition {
                name: "temperature",
                value: 0.0
            })
        );
        assert!(c2h2_induction_time(1500.0, -1.0, 1.0).is_err());
        assert!(c2h2_induction_time(1500.0, 1.0e5, f64::NAN).is_err());
    }
}
