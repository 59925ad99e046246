//! Thermodynamic state (cycle vertex) definitions.

use crate::error::{CycleError, CycleResult};
use serde::{Serialize, Serializer};
use tc_core::StateId;
use tc_core::units::constants::{P_REF_KPA, T_REF_K};
use tc_core::units::{
    Pressure, SpecEnthalpy, SpecEntropy, SpecInternalEnergy, SpecVolume, Temperature, in_k,
    in_kpa, k, kpa,
};
use tc_fluids::FluidProperties;

/// The parameter a derived state depends on, reported when the state is non-physical.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Driver {
    pub key: &'static str,
    pub value: f64,
}

impl Driver {
    pub(crate) fn new(key: &'static str, value: f64) -> Self {
        Self { key, value }
    }

    pub(crate) fn reject(self, reason: &'static str) -> CycleError {
        CycleError::InvalidParameter {
            key: self.key,
            value: self.value,
            reason,
        }
    }
}

/// One vertex of a cycle.
///
/// Calorically perfect ideal gas: `v = R·T/P`, `h = cp·T`, `u = cv·T`,
/// `s = cp·ln(T/T_ref) − R·ln(P/P_ref)`.
///
/// Only the state solver creates states; they are never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThermodynamicState {
    id: StateId,
    name: String,
    #[serde(rename = "temperature_k", serialize_with = "serialize_kelvin")]
    temperature: Temperature,
    #[serde(rename = "pressure_kpa", serialize_with = "serialize_kilopascal")]
    pressure: Pressure,
    volume: SpecVolume,
    enthalpy: SpecEnthalpy,
    entropy: SpecEntropy,
    internal_energy: SpecInternalEnergy,
}

impl ThermodynamicState {
    /// State from temperature [K] and pressure [kPa].
    pub(crate) fn from_tp(
        index: usize,
        name: &str,
        t_k: f64,
        p_kpa: f64,
        fluid: &FluidProperties,
        driver: Driver,
    ) -> CycleResult<Self> {
        check_positive(t_k, driver, "produces a non-physical temperature")?;
        check_positive(p_kpa, driver, "produces a non-physical pressure")?;
        let v = fluid.r * t_k / p_kpa;
        Self::build(index, name, t_k, p_kpa, v, fluid, driver)
    }

    /// State from temperature [K] and specific volume [m³/kg].
    pub(crate) fn from_tv(
        index: usize,
        name: &str,
        t_k: f64,
        v: f64,
        fluid: &FluidProperties,
        driver: Driver,
    ) -> CycleResult<Self> {
        check_positive(t_k, driver, "produces a non-physical temperature")?;
        check_positive(v, driver, "produces a non-physical specific volume")?;
        let p_kpa = fluid.r * t_k / v;
        Self::build(index, name, t_k, p_kpa, v, fluid, driver)
    }

    fn build(
        index: usize,
        name: &str,
        t_k: f64,
        p_kpa: f64,
        v: f64,
        fluid: &FluidProperties,
        driver: Driver,
    ) -> CycleResult<Self> {
        check_positive(p_kpa, driver, "produces a non-physical pressure")?;
        check_positive(v, driver, "produces a non-physical specific volume")?;

        let entropy = fluid.cp * (t_k / T_REF_K).ln() - fluid.r * (p_kpa / P_REF_KPA).ln();
        if !entropy.is_finite() {
            return Err(driver.reject("produces a non-finite entropy"));
        }

        let id = StateId::from_index(index).ok_or(CycleError::Invariant {
            what: "state index exceeds the id range",
        })?;

        Ok(Self {
            id,
            name: name.to_string(),
            temperature: k(t_k),
            pressure: kpa(p_kpa),
            volume: v,
            enthalpy: fluid.cp * t_k,
            entropy,
            internal_energy: fluid.cv * t_k,
        })
    }

    pub fn id(&self) -> StateId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn temperature(&self) -> Temperature {
        self.temperature
    }

    pub fn pressure(&self) -> Pressure {
        self.pressure
    }

    /// Temperature [K].
    pub fn temperature_k(&self) -> f64 {
        in_k(self.temperature)
    }

    /// Pressure [kPa].
    pub fn pressure_kpa(&self) -> f64 {
        in_kpa(self.pressure)
    }

    /// Specific volume [m³/kg].
    pub fn volume(&self) -> SpecVolume {
        self.volume
    }

    /// Specific enthalpy [kJ/kg].
    pub fn enthalpy(&self) -> SpecEnthalpy {
        self.enthalpy
    }

    /// Specific entropy [kJ/(kg·K)].
    pub fn entropy(&self) -> SpecEntropy {
        self.entropy
    }

    /// Specific internal energy [kJ/kg].
    pub fn internal_energy(&self) -> SpecInternalEnergy {
        self.internal_energy
    }

    /// Specific Gibbs free energy `h − T·s` [kJ/kg].
    pub fn gibbs_free_energy(&self) -> f64 {
        self.enthalpy - self.temperature_k() * self.entropy
    }

    /// Specific Helmholtz free energy `u − T·s` [kJ/kg].
    pub fn helmholtz_free_energy(&self) -> f64 {
        self.internal_energy - self.temperature_k() * self.entropy
    }
}

fn check_positive(value: f64, driver: Driver, reason: &'static str) -> CycleResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(driver.reject(reason))
    }
}

fn serialize_kelvin<S: Serializer>(t: &Temperature, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(in_k(*t))
}

fn serialize_kilopascal<S: Serializer>(p: &Pressure, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(in_kpa(*p))
}
