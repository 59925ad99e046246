// tc-core/src/units.rs
//
// The engine works in fixed SI engineering units: K, kPa, m³/kg, kJ/kg, kJ/(kg·K).
// Temperature and pressure travel as uom quantities; specific properties are plain
// f64 in those units (see the aliases below).

use uom::si::f64::{Pressure as UomPressure, ThermodynamicTemperature as UomThermodynamicTemperature};

// Public canonical unit types (SI, f64)
pub type Pressure = UomPressure;
pub type Temperature = UomThermodynamicTemperature;

/// Specific volume [m³/kg].
pub type SpecVolume = f64;
/// Specific enthalpy [kJ/kg].
pub type SpecEnthalpy = f64;
/// Specific internal energy [kJ/kg].
pub type SpecInternalEnergy = f64;
/// Specific entropy [kJ/(kg·K)].
pub type SpecEntropy = f64;
/// Specific energy transfer (work or heat) [kJ/kg].
pub type SpecEnergy = f64;

#[inline]
pub fn kpa(v: f64) -> Pressure {
    use uom::si::pressure::kilopascal;
    Pressure::new::<kilopascal>(v)
}

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn in_kpa(p: Pressure) -> f64 {
    use uom::si::pressure::kilopascal;
    p.get::<kilopascal>()
}

#[inline]
pub fn in_k(t: Temperature) -> f64 {
    use uom::si::thermodynamic_temperature::kelvin;
    t.get::<kelvin>()
}

pub mod constants {
    /// Reference temperature for enthalpy/entropy offsets [K].
    pub const T_REF_K: f64 = 298.15;
    /// Reference pressure for entropy offsets [kPa].
    pub const P_REF_KPA: f64 = 101.325;
    /// Default dead-state (ambient) temperature for exergy [K].
    pub const DEAD_STATE_K: f64 = 298.15;
}
