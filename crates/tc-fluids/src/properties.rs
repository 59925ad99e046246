//! Ideal-gas constants for a single working fluid.

use crate::error::{FluidError, FluidResult};
use serde::Serialize;
use tc_core::{Tolerances, nearly_equal};

/// Relative tolerance for the cp - cv = R and γ = cp/cv checks.
pub const CONSISTENCY_TOLERANCE: f64 = 1e-9;

/// Constant-property ideal-gas description of a working fluid.
///
/// All heat capacities and the gas constant are in kJ/(kg·K).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FluidProperties {
    /// Canonical name, also the cache-key identity of the fluid.
    pub name: &'static str,
    #[serde(skip)]
    pub aliases: &'static [&'static str],
    /// Specific gas constant R [kJ/(kg·K)]
    pub r: f64,
    /// Heat capacity ratio γ = cp/cv
    pub gamma: f64,
    /// Specific heat at constant pressure [kJ/(kg·K)]
    pub cp: f64,
    /// Specific heat at constant volume [kJ/(kg·K)]
    pub cv: f64,
}

impl FluidProperties {
    /// Fluid from its gas constant and heat capacity ratio.
    ///
    /// `cv = R/(γ − 1)` and `cp = γ·cv`, so every ideal-gas identity holds to round-off
    /// and isentropes carry exactly constant entropy.
    pub const fn from_gas_constant(
        name: &'static str,
        aliases: &'static [&'static str],
        r: f64,
        gamma: f64,
    ) -> Self {
        let cv = r / (gamma - 1.0);
        Self {
            name,
            aliases,
            r,
            gamma,
            cp: gamma * cv,
            cv,
        }
    }

    /// True if `query` names this fluid (canonical name or alias, any case).
    pub fn matches_name(&self, query: &str) -> bool {
        let query = query.trim();
        self.name.eq_ignore_ascii_case(query)
            || self
                .aliases
                .iter()
                .any(|alias| alias.eq_ignore_ascii_case(query))
    }

    /// True if `query` is a substring of the name or an alias (for pickers).
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.trim().to_ascii_lowercase();
        if query.is_empty() {
            return true;
        }

        self.name.to_ascii_lowercase().contains(&query)
            || self
                .aliases
                .iter()
                .any(|alias| alias.to_ascii_lowercase().contains(&query))
    }

    /// Check positivity and the ideal-gas identities.
    pub fn check_consistency(&self) -> FluidResult<()> {
        for (value, what) in [
            (self.r, "R must be positive and finite"),
            (self.cp, "cp must be positive and finite"),
            (self.cv, "cv must be positive and finite"),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(FluidError::NonPhysical {
                    fluid: self.name,
                    what,
                });
            }
        }
        if !self.gamma.is_finite() || self.gamma <= 1.0 {
            return Err(FluidError::NonPhysical {
                fluid: self.name,
                what: "gamma must be > 1 and finite",
            });
        }

        let tol = Tolerances::relative(CONSISTENCY_TOLERANCE);
        if !nearly_equal(self.cp - self.cv, self.r, tol) {
            return Err(FluidError::NonPhysical {
                fluid: self.name,
                what: "cp - cv must equal R",
            });
        }
        if !nearly_equal(self.cp / self.cv, self.gamma, tol) {
            return Err(FluidError::NonPhysical {
                fluid: self.name,
                what: "gamma must equal cp / cv",
            });
        }
        Ok(())
    }

    /// Exponent (γ - 1)/γ used for isentropic pressure-ratio relations.
    pub fn isentropic_pressure_exponent(&self) -> f64 {
        (self.gamma - 1.0) / self.gamma
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn air() -> FluidProperties {
        FluidProperties::from_gas_constant("Air", &["atmosphere"], 0.287, 1.4)
    }

    #[test]
    fn name_matching_ignores_case_and_whitespace() {
        let air = air();
        assert!(air.matches_name("air"));
        assert!(air.matches_name("  AIR "));
        assert!(air.matches_name("Atmosphere"));
        assert!(!air.matches_name("ai"));
        assert!(air.matches_query("ai"));
    }

    #[test]
    fn consistent_constants_pass() {
        assert!(air().check_consistency().is_ok());
    }

    #[test]
    fn mismatched_gas_constant_fails() {
        let bad = FluidProperties { r: 0.3, ..air() };
        assert!(matches!(
            bad.check_consistency(),
            Err(FluidError::NonPhysical {
                what: "cp - cv must equal R",
                ..
            })
        ));
    }

    #[test]
    fn derived_heat_capacities_satisfy_identities() {
        let air = air();
        assert!((air.cp - air.cv - air.r).abs() < 1e-14);
        assert!((air.cp / air.cv - air.gamma).abs() < 1e-14);
        assert!((air.cv - 0.7175).abs() < 1e-12);
        assert!((air.cp - 1.0045).abs() < 1e-12);
    }

    #[test]
    fn rounded_textbook_heat_capacities_fail() {
        let rounded = FluidProperties {
            cp: 1.005,
            cv: 0.718,
            ..air()
        };
        assert!(matches!(
            rounded.check_consistency(),
            Err(FluidError::NonPhysical {
                what: "gamma must equal cp / cv",
                ..
            })
        ));
    }

    #[test]
    fn gamma_at_or_below_one_fails() {
        let bad = FluidProperties { gamma: 1.0, ..air() };
        assert!(bad.check_consistency().is_err());
    }
}
