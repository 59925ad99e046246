//! Process legs: work, heat and entropy change between two adjacent states.
//!
//! Sign convention: `work` is done *by* the fluid, `heat` is added *to* the fluid,
//! both in kJ/kg.

use crate::error::{CycleError, CycleResult};
use crate::state::ThermodynamicState;
use serde::{Deserialize, Serialize};
use tc_core::units::{SpecEnergy, SpecEntropy};
use tc_core::{ProcessId, StateId, relative_difference};
use tc_fluids::FluidProperties;

/// Relative mismatch tolerated between the invariant of a leg at its two ends.
pub const LEG_TOLERANCE: f64 = 1e-6;

/// Polytropic indices this close to 1 use the isothermal work relation.
const ISOTHERMAL_INDEX_EPS: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProcessKind {
    Isothermal,
    Isobaric,
    Isochoric,
    Isentropic,
    /// `P·v^n = const`
    Polytropic { index: f64 },
}

impl ProcessKind {
    pub fn label(self) -> &'static str {
        match self {
            ProcessKind::Isothermal => "isothermal",
            ProcessKind::Isobaric => "isobaric",
            ProcessKind::Isochoric => "isochoric",
            ProcessKind::Isentropic => "isentropic",
            ProcessKind::Polytropic { .. } => "polytropic",
        }
    }

    /// Exponent `n` of `P·v^n = const` for this leg, if it follows one.
    pub fn volume_exponent(self, fluid: &FluidProperties) -> Option<f64> {
        match self {
            ProcessKind::Isothermal => Some(1.0),
            ProcessKind::Isentropic => Some(fluid.gamma),
            ProcessKind::Polytropic { index } => Some(index),
            ProcessKind::Isobaric | ProcessKind::Isochoric => None,
        }
    }
}

impl std::fmt::Display for ProcessKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessKind::Polytropic { index } => write!(f, "polytropic (n = {index})"),
            other => f.write_str(other.label()),
        }
    }
}

/// One leg of a cycle. `start` and `end` index into the owning cycle's states.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThermodynamicProcess {
    pub id: ProcessId,
    pub name: String,
    pub kind: ProcessKind,
    pub start: StateId,
    pub end: StateId,
    /// Work done by the fluid [kJ/kg]
    pub work: SpecEnergy,
    /// Heat added to the fluid [kJ/kg]
    pub heat: SpecEnergy,
    /// [kJ/(kg·K)]
    pub entropy_change: SpecEntropy,
}

impl ThermodynamicProcess {
    pub fn adds_heat(&self) -> bool {
        self.heat > 0.0
    }

    pub fn rejects_heat(&self) -> bool {
        self.heat < 0.0
    }
}

/// Evaluate the leg `start → end` under the given process relation.
///
/// Fails with [`CycleError::InvalidLeg`] when the two states do not satisfy the
/// relation's invariant (equal volume, pressure, temperature, or `P·v^n`).
pub fn evaluate(
    id: ProcessId,
    name: &str,
    kind: ProcessKind,
    start: &ThermodynamicState,
    end: &ThermodynamicState,
    fluid: &FluidProperties,
) -> CycleResult<ThermodynamicProcess> {
    check_leg(name, kind, start, end, fluid)?;

    let (t1, t2) = (start.temperature_k(), end.temperature_k());
    let (p1, p2) = (start.pressure_kpa(), end.pressure_kpa());
    let (v1, v2) = (start.volume(), end.volume());
    let du = end.internal_energy() - start.internal_energy();
    let dh = end.enthalpy() - start.enthalpy();

    let (work, heat, entropy_change) = match kind {
        ProcessKind::Isentropic => (-du, 0.0, 0.0),
        ProcessKind::Isochoric => (0.0, du, fluid.cv * (t2 / t1).ln()),
        ProcessKind::Isobaric => (p1 * (v2 - v1), dh, fluid.cp * (t2 / t1).ln()),
        ProcessKind::Isothermal => {
            let w = fluid.r * t1 * (v2 / v1).ln();
            (w, w, fluid.r * (v2 / v1).ln())
        }
        ProcessKind::Polytropic { index } => {
            let w = if (index - 1.0).abs() < ISOTHERMAL_INDEX_EPS {
                p1 * v1 * (v2 / v1).ln()
            } else {
                (p1 * v1 - p2 * v2) / (index - 1.0)
            };
            let ds = fluid.cv * (t2 / t1).ln() + fluid.r * (v2 / v1).ln();
            (w, du + w, ds)
        }
    };

    if !(work.is_finite() && heat.is_finite() && entropy_change.is_finite()) {
        return Err(CycleError::InvalidLeg {
            process: name.to_string(),
            reason: "energy transfer is not finite",
        });
    }

    tracing::trace!(
        process = name,
        kind = %kind,
        work,
        heat,
        entropy_change,
        "evaluated leg"
    );

    Ok(ThermodynamicProcess {
        id,
        name: name.to_string(),
        kind,
        start: start.id(),
        end: end.id(),
        work,
        heat,
        entropy_change,
    })
}

fn check_leg(
    name: &str,
    kind: ProcessKind,
    start: &ThermodynamicState,
    end: &ThermodynamicState,
    fluid: &FluidProperties,
) -> CycleResult<()> {
    let invalid = |reason| CycleError::InvalidLeg {
        process: name.to_string(),
        reason,
    };

    let (a, b, reason) = match kind {
        ProcessKind::Isochoric => (start.volume(), end.volume(), "volumes differ"),
        ProcessKind::Isobaric => (
            start.pressure_kpa(),
            end.pressure_kpa(),
            "pressures differ",
        ),
        ProcessKind::Isothermal => (
            start.temperature_k(),
            end.temperature_k(),
            "temperatures differ",
        ),
        ProcessKind::Isentropic | ProcessKind::Polytropic { .. } => {
            let n = kind
                .volume_exponent(fluid)
                .ok_or_else(|| invalid("process has no volume exponent"))?;
            if !n.is_finite() || n <= 0.0 {
                return Err(invalid("polytropic index must be positive and finite"));
            }
            (
                start.pressure_kpa() * start.volume().powf(n),
                end.pressure_kpa() * end.volume().powf(n),
                "P·v^n differs between the end states",
            )
        }
    };

    if relative_difference(a, b) > LEG_TOLERANCE {
        return Err(invalid(reason));
    }
    Ok(())
}
