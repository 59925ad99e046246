//! State solver: derives the vertices of each cycle from its parameters.
//!
//! States follow the standard numbering 1→2→3→4, each derived from the previous
//! one with closed-form ideal-gas relations. Rankine and refrigeration cycles
//! are evaluated with the same constant-property ideal-gas relations: the
//! working fluid never enters a two-phase region, so these are approximations of
//! the vapour cycles rather than saturation-table calculations.

use crate::config::{
    BraytonParams, CarnotParams, CycleSpec, DieselParams, OttoParams, RankineParams,
    RefrigerationParams, keys,
};
use crate::error::CycleResult;
use crate::process::ProcessKind;
use crate::state::{Driver, ThermodynamicState};
use tc_fluids::FluidProperties;

/// One planned leg: display name plus the relation that governs it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegPlan {
    pub name: &'static str,
    pub kind: ProcessKind,
}

impl LegPlan {
    const fn new(name: &'static str, kind: ProcessKind) -> Self {
        Self { name, kind }
    }
}

/// Compute the ordered vertex states of `spec`.
pub fn solve_states(
    spec: &CycleSpec,
    fluid: &FluidProperties,
) -> CycleResult<Vec<ThermodynamicState>> {
    spec.validate()?;
    let states = match spec {
        CycleSpec::Otto(p) => otto(p, fluid)?,
        CycleSpec::Diesel(p) => diesel(p, fluid)?,
        CycleSpec::Brayton(p) => brayton(p, fluid)?,
        CycleSpec::Rankine(p) => rankine(p, fluid)?,
        CycleSpec::Carnot(p) => carnot(p, fluid)?,
        CycleSpec::Refrigeration(p) => refrigeration(p, fluid)?,
    };
    tracing::trace!(cycle = %spec.kind(), states = states.len(), "solved states");
    Ok(states)
}

/// Legs connecting consecutive states, closing back to state 1.
pub fn leg_plan(spec: &CycleSpec) -> Vec<LegPlan> {
    use ProcessKind::*;

    let compression = |n: Option<f64>| match n {
        Some(index) => LegPlan::new("Polytropic compression", Polytropic { index }),
        None => LegPlan::new("Isentropic compression", Isentropic),
    };
    let expansion = |n: Option<f64>| match n {
        Some(index) => LegPlan::new("Polytropic expansion", Polytropic { index }),
        None => LegPlan::new("Isentropic expansion", Isentropic),
    };

    match spec {
        CycleSpec::Otto(p) => vec![
            compression(p.polytropic_index),
            LegPlan::new("Constant-volume heat addition", Isochoric),
            expansion(p.polytropic_index),
            LegPlan::new("Constant-volume heat rejection", Isochoric),
        ],
        CycleSpec::Diesel(p) => vec![
            compression(p.polytropic_index),
            LegPlan::new("Constant-pressure heat addition", Isobaric),
            expansion(p.polytropic_index),
            LegPlan::new("Constant-volume heat rejection", Isochoric),
        ],
        CycleSpec::Brayton(_) => vec![
            LegPlan::new("Isentropic compression", Isentropic),
            LegPlan::new("Constant-pressure heat addition", Isobaric),
            LegPlan::new("Isentropic expansion", Isentropic),
            LegPlan::new("Constant-pressure heat rejection", Isobaric),
        ],
        CycleSpec::Rankine(_) => vec![
            LegPlan::new("Pump compression", Isentropic),
            LegPlan::new("Boiler heat addition", Isobaric),
            LegPlan::new("Turbine expansion", Isentropic),
            LegPlan::new("Condenser heat rejection", Isobaric),
        ],
        CycleSpec::Carnot(_) => vec![
            LegPlan::new("Isothermal expansion", Isothermal),
            LegPlan::new("Isentropic expansion", Isentropic),
            LegPlan::new("Isothermal compression", Isothermal),
            LegPlan::new("Isentropic compression", Isentropic),
        ],
        CycleSpec::Refrigeration(_) => vec![
            LegPlan::new("Compressor", Isentropic),
            LegPlan::new("Condenser heat rejection", Isobaric),
            LegPlan::new("Expansion", Isentropic),
            LegPlan::new("Evaporator heat absorption", Isobaric),
        ],
    }
}

fn otto(p: &OttoParams, fluid: &FluidProperties) -> CycleResult<Vec<ThermodynamicState>> {
    let r = p.compression_ratio;
    let n = p.polytropic_index.unwrap_or(fluid.gamma);
    let by_ratio = Driver::new(keys::COMPRESSION_RATIO, r);

    let s1 = ThermodynamicState::from_tp(0, "Intake", p.t1, p.p1, fluid, Driver::new(keys::T1, p.t1))?;
    let v1 = s1.volume();
    let v2 = v1 / r;
    let t2 = p.t1 * r.powf(n - 1.0);
    let s2 = ThermodynamicState::from_tv(1, "End of compression", t2, v2, fluid, by_ratio)?;

    let t3 = t2 + p.heat_added / fluid.cv;
    let s3 = ThermodynamicState::from_tv(
        2,
        "End of combustion",
        t3,
        v2,
        fluid,
        Driver::new(keys::HEAT_ADDED, p.heat_added),
    )?;

    let t4 = t3 * (v2 / v1).powf(n - 1.0);
    let s4 = ThermodynamicState::from_tv(3, "End of expansion", t4, v1, fluid, by_ratio)?;

    Ok(vec![s1, s2, s3, s4])
}

fn diesel(p: &DieselParams, fluid: &FluidProperties) -> CycleResult<Vec<ThermodynamicState>> {
    let r = p.compression_ratio;
    let rc = p.cutoff_ratio;
    let n = p.polytropic_index.unwrap_or(fluid.gamma);

    let s1 = ThermodynamicState::from_tp(0, "Intake", p.t1, p.p1, fluid, Driver::new(keys::T1, p.t1))?;
    let v1 = s1.volume();
    let v2 = v1 / r;
    let t2 = p.t1 * r.powf(n - 1.0);
    let s2 = ThermodynamicState::from_tv(
        1,
        "End of compression",
        t2,
        v2,
        fluid,
        Driver::new(keys::COMPRESSION_RATIO, r),
    )?;

    let by_cutoff = Driver::new(keys::CUTOFF_RATIO, rc);
    let v3 = v2 * rc;
    let s3 = ThermodynamicState::from_tv(2, "Fuel cutoff", t2 * rc, v3, fluid, by_cutoff)?;

    let t4 = s3.temperature_k() * (v3 / v1).powf(n - 1.0);
    let s4 = ThermodynamicState::from_tv(3, "End of expansion", t4, v1, fluid, by_cutoff)?;

    Ok(vec![s1, s2, s3, s4])
}

fn brayton(p: &BraytonParams, fluid: &FluidProperties) -> CycleResult<Vec<ThermodynamicState>> {
    let rp = p.pressure_ratio;
    let temp_ratio = rp.powf(fluid.isentropic_pressure_exponent());
    let by_ratio = Driver::new(keys::PRESSURE_RATIO, rp);

    let s1 = ThermodynamicState::from_tp(
        0,
        "Compressor inlet",
        p.t1,
        p.p1,
        fluid,
        Driver::new(keys::T1, p.t1),
    )?;
    let p2 = p.p1 * rp;
    let t2 = p.t1 * temp_ratio;
    let s2 = ThermodynamicState::from_tp(1, "Compressor exit", t2, p2, fluid, by_ratio)?;

    let t3 = t2 + p.heat_added / fluid.cp;
    let s3 = ThermodynamicState::from_tp(
        2,
        "Turbine inlet",
        t3,
        p2,
        fluid,
        Driver::new(keys::HEAT_ADDED, p.heat_added),
    )?;

    let s4 = ThermodynamicState::from_tp(3, "Turbine exit", t3 / temp_ratio, p.p1, fluid, by_ratio)?;

    Ok(vec![s1, s2, s3, s4])
}

fn rankine(p: &RankineParams, fluid: &FluidProperties) -> CycleResult<Vec<ThermodynamicState>> {
    let rp = p.boiler_pressure / p.p1;
    let temp_ratio = rp.powf(fluid.isentropic_pressure_exponent());
    let by_boiler = Driver::new(keys::BOILER_PRESSURE, p.boiler_pressure);

    let s1 = ThermodynamicState::from_tp(
        0,
        "Condenser exit",
        p.t1,
        p.p1,
        fluid,
        Driver::new(keys::T1, p.t1),
    )?;
    let t2 = p.t1 * temp_ratio;
    let s2 = ThermodynamicState::from_tp(1, "Pump exit", t2, p.boiler_pressure, fluid, by_boiler)?;

    let by_max = Driver::new(keys::MAX_TEMPERATURE, p.max_temperature);
    if p.max_temperature <= t2 {
        return Err(by_max.reject("must exceed the pump exit temperature"));
    }
    let s3 = ThermodynamicState::from_tp(
        2,
        "Turbine inlet",
        p.max_temperature,
        p.boiler_pressure,
        fluid,
        by_max,
    )?;

    let t4 = p.max_temperature / temp_ratio;
    let s4 = ThermodynamicState::from_tp(3, "Turbine exit", t4, p.p1, fluid, by_boiler)?;

    Ok(vec![s1, s2, s3, s4])
}

fn carnot(p: &CarnotParams, fluid: &FluidProperties) -> CycleResult<Vec<ThermodynamicState>> {
    let th = p.max_temperature;
    let tl = p.min_temperature;
    // v grows by (T_H/T_L)^(1/(γ-1)) along each isentrope
    let isentropic_volume_ratio = (th / tl).powf(1.0 / (fluid.gamma - 1.0));

    let by_max = Driver::new(keys::MAX_TEMPERATURE, th);
    let by_min = Driver::new(keys::MIN_TEMPERATURE, tl);

    let s1 = ThermodynamicState::from_tp(
        0,
        "Start of heat addition",
        th,
        p.p1,
        fluid,
        Driver::new(keys::P1, p.p1),
    )?;
    let v1 = s1.volume();
    let v2 = v1 * p.expansion_ratio;
    let s2 = ThermodynamicState::from_tv(
        1,
        "End of heat addition",
        th,
        v2,
        fluid,
        Driver::new(keys::EXPANSION_RATIO, p.expansion_ratio),
    )?;
    let s3 = ThermodynamicState::from_tv(
        2,
        "Start of heat rejection",
        tl,
        v2 * isentropic_volume_ratio,
        fluid,
        by_min,
    )?;
    let s4 = ThermodynamicState::from_tv(
        3,
        "End of heat rejection",
        tl,
        v1 * isentropic_volume_ratio,
        fluid,
        by_max,
    )?;

    Ok(vec![s1, s2, s3, s4])
}

fn refrigeration(
    p: &RefrigerationParams,
    fluid: &FluidProperties,
) -> CycleResult<Vec<ThermodynamicState>> {
    let rp = p.condenser_pressure / p.p1;
    let temp_ratio = rp.powf(fluid.isentropic_pressure_exponent());
    let by_condenser = Driver::new(keys::CONDENSER_PRESSURE, p.condenser_pressure);

    let s1 = ThermodynamicState::from_tp(
        0,
        "Compressor inlet",
        p.t1,
        p.p1,
        fluid,
        Driver::new(keys::T1, p.t1),
    )?;
    let t2 = p.t1 * temp_ratio;
    let s2 = ThermodynamicState::from_tp(
        1,
        "Compressor exit",
        t2,
        p.condenser_pressure,
        fluid,
        by_condenser,
    )?;

    let by_exit = Driver::new(keys::CONDENSER_EXIT_TEMPERATURE, p.condenser_exit_temperature);
    if p.condenser_exit_temperature >= t2 {
        return Err(by_exit.reject("must be below the compressor exit temperature"));
    }
    let s3 = ThermodynamicState::from_tp(
        2,
        "Condenser exit",
        p.condenser_exit_temperature,
        p.condenser_pressure,
        fluid,
        by_exit,
    )?;

    let t4 = p.condenser_exit_temperature / temp_ratio;
    let s4 = ThermodynamicState::from_tp(3, "Expansion exit", t4, p.p1, fluid, by_condenser)?;

    Ok(vec![s1, s2, s3, s4])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CycleError;
    use tc_fluids::lookup;

    fn otto_spec(r: f64) -> CycleSpec {
        CycleSpec::Otto(OttoParams {
            t1: 300.0,
            p1: 100.0,
            compression_ratio: r,
            heat_added: 1000.0,
            polytropic_index: None,
        })
    }

    #[test]
    fn otto_compression_matches_textbook() {
        let air = lookup("air").unwrap();
        let states = solve_states(&otto_spec(8.0), air).unwrap();
        assert_eq!(states.len(), 4);
        assert!((states[1].temperature_k() - 300.0 * 8.0_f64.powf(0.4)).abs() < 1e-9);
        assert!((states[1].temperature_k() - 689.2).abs() < 0.1);
        assert!((states[1].pressure_kpa() - 100.0 * 8.0_f64.powf(1.4)).abs() < 1e-6);
        assert!((states[0].volume() / states[1].volume() - 8.0).abs() < 1e-12);
        assert!((states[3].volume() - states[0].volume()).abs() < 1e-15);
    }

    #[test]
    fn state_ids_follow_traversal_order() {
        let air = lookup("air").unwrap();
        let states = solve_states(&otto_spec(8.0), air).unwrap();
        for (i, state) in states.iter().enumerate() {
            assert_eq!(state.id().as_usize(), i);
        }
    }

    #[test]
    fn plan_has_one_leg_per_state() {
        let air = lookup("air").unwrap();
        let spec = otto_spec(8.0);
        assert_eq!(leg_plan(&spec).len(), solve_states(&spec, air).unwrap().len());
    }

    #[test]
    fn polytropic_override_changes_plan() {
        let spec = CycleSpec::Otto(OttoParams {
            polytropic_index: Some(1.3),
            ..match otto_spec(8.0) {
                CycleSpec::Otto(p) => p,
                _ => unreachable!(),
            }
        });
        let plan = leg_plan(&spec);
        assert_eq!(plan[0].kind, ProcessKind::Polytropic { index: 1.3 });
        assert_eq!(plan[2].kind, ProcessKind::Polytropic { index: 1.3 });
    }

    #[test]
    fn unit_compression_ratio_is_rejected() {
        let air = lookup("air").unwrap();
        let err = solve_states(&otto_spec(1.0), air).unwrap_err();
        assert!(matches!(
            err,
            CycleError::InvalidParameter {
                key: "compression_ratio",
                ..
            }
        ));
    }

    #[test]
    fn diesel_heat_addition_is_isobaric() {
        let air = lookup("air").unwrap();
        let spec = CycleSpec::Diesel(DieselParams {
            t1: 300.0,
            p1: 100.0,
            compression_ratio: 18.0,
            cutoff_ratio: 2.0,
            polytropic_index: None,
        });
        let states = solve_states(&spec, air).unwrap();
        assert!((states[1].pressure_kpa() - states[2].pressure_kpa()).abs() < 1e-6);
        assert!((states[2].volume() / states[1].volume() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn brayton_pressures_follow_ratio() {
        let air = lookup("air").unwrap();
        let spec = CycleSpec::Brayton(BraytonParams {
            t1: 300.0,
            p1: 100.0,
            pressure_ratio: 10.0,
            heat_added: 800.0,
        });
        let states = solve_states(&spec, air).unwrap();
        assert!((states[1].pressure_kpa() - 1000.0).abs() < 1e-6);
        assert!((states[2].pressure_kpa() - 1000.0).abs() < 1e-6);
        assert!((states[3].pressure_kpa() - 100.0).abs() < 1e-9);
        assert!((states[2].temperature_k() - states[1].temperature_k() - 800.0 / air.cp).abs() < 1e-9);
    }

    #[test]
    fn rankine_turbine_inlet_must_exceed_pump_exit() {
        let steam = lookup("steam").unwrap();
        let spec = CycleSpec::Rankine(RankineParams {
            t1: 320.0,
            p1: 10.0,
            boiler_pressure: 8000.0,
            max_temperature: 400.0,
        });
        let err = solve_states(&spec, steam).unwrap_err();
        assert!(matches!(
            err,
            CycleError::InvalidParameter {
                key: "max_temperature",
                ..
            }
        ));
    }

    #[test]
    fn carnot_isotherms_hold_canonical_temperatures() {
        let air = lookup("air").unwrap();
        let spec = CycleSpec::Carnot(CarnotParams {
            max_temperature: 1000.0,
            min_temperature: 300.0,
            p1: 800.0,
            expansion_ratio: 3.0,
        });
        let states = solve_states(&spec, air).unwrap();
        let temps: Vec<f64> = states.iter().map(|s| s.temperature_k()).collect();
        assert!((temps[0] - 1000.0).abs() < 1e-9);
        assert!((temps[1] - 1000.0).abs() < 1e-9);
        assert!((temps[2] - 300.0).abs() < 1e-9);
        assert!((temps[3] - 300.0).abs() < 1e-9);
        assert!((states[1].volume() / states[0].volume() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn refrigeration_condenser_exit_must_be_below_compressor_exit() {
        let air = lookup("air").unwrap();
        let spec = CycleSpec::Refrigeration(RefrigerationParams {
            t1: 260.0,
            p1: 100.0,
            condenser_pressure: 400.0,
            condenser_exit_temperature: 500.0,
        });
        let err = solve_states(&spec, air).unwrap_err();
        assert!(matches!(
            err,
            CycleError::InvalidParameter {
                key: "condenser_exit_temperature",
                ..
            }
        ));
    }
}
