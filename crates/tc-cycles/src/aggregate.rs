//! Cycle aggregation: totals, efficiency and the optional extended metrics.

use crate::config::{CycleKind, CycleSpec, MetricsRequest, SimulationConfig};
use crate::error::{CycleError, CycleResult};
use crate::process::ThermodynamicProcess;
use crate::state::ThermodynamicState;
use serde::Serialize;
use tc_cache::CacheKey;
use tc_core::{StateId, ensure_positive};
use tc_fluids::FluidProperties;

/// Heat input below this magnitude [kJ/kg] makes efficiency meaningless.
const MIN_HEAT_INPUT: f64 = 1e-9;

/// Allowed |Σ work − net work|, relative to heat input.
const FIRST_LAW_TOLERANCE: f64 = 1e-9;

/// Hash stage under which cycle identities are computed.
pub const CYCLE_STAGE: &str = "cycle";

/// Summary quantities computed only on request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExtendedMetrics {
    /// `Σ (Δs − q/T_res)` [kJ/(kg·K)]
    pub entropy_generation: f64,
    /// Exergy of the heat supplied, `Σ q⁺·(1 − T0/T_res)` [kJ/kg]
    pub exergy: f64,
    /// Vapour quality. Always `None`: the ideal-gas model has no two-phase region.
    pub quality: Option<f64>,
    /// At state 1 [kJ/kg]
    pub gibbs_free_energy: f64,
    /// At state 1 [kJ/kg]
    pub helmholtz_free_energy: f64,
}

/// A fully evaluated cycle.
///
/// Immutable once built; a different configuration yields a new instance with a
/// different [`id`](ThermodynamicCycle::id).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThermodynamicCycle {
    id: String,
    pub name: String,
    pub kind: CycleKind,
    pub fluid: &'static FluidProperties,
    pub spec: CycleSpec,
    pub states: Vec<ThermodynamicState>,
    pub processes: Vec<ThermodynamicProcess>,
    /// Thermal efficiency for power cycles, COP for refrigeration.
    pub efficiency: f64,
    /// [kJ/kg]
    pub net_work: f64,
    /// [kJ/kg]
    pub heat_in: f64,
    /// [kJ/kg], positive
    pub heat_out: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<ExtendedMetrics>,
}

impl ThermodynamicCycle {
    /// Content hash of the configuration that produced this cycle (see [`cycle_key`]).
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self, id: StateId) -> Option<&ThermodynamicState> {
        self.states.get(id.as_usize())
    }

    pub fn start_of(&self, process: &ThermodynamicProcess) -> Option<&ThermodynamicState> {
        self.state(process.start)
    }

    pub fn end_of(&self, process: &ThermodynamicProcess) -> Option<&ThermodynamicState> {
        self.state(process.end)
    }

    /// Σ work over all legs [kJ/kg].
    pub fn work_sum(&self) -> f64 {
        self.processes.iter().map(|p| p.work).sum()
    }

    /// Σ entropy change over all legs [kJ/(kg·K)].
    pub fn entropy_change_sum(&self) -> f64 {
        self.processes.iter().map(|p| p.entropy_change).sum()
    }

    /// True when `efficiency` holds a COP.
    pub fn is_refrigeration(&self) -> bool {
        !self.kind.is_power_cycle()
    }
}

/// Identity of the cycle `config` produces: SHA-256 of the configuration with the
/// fluid name replaced by its canonical table name.
pub fn cycle_key(config: &SimulationConfig, fluid: &FluidProperties) -> CycleResult<CacheKey> {
    let canonical = SimulationConfig {
        fluid: fluid.name.to_string(),
        ..config.clone()
    };
    Ok(CacheKey::from_args(CYCLE_STAGE, &canonical)?)
}

/// Combine solved states and evaluated legs into a cycle.
///
/// Fails with [`CycleError::DegenerateCycle`] when no heat is added, and with
/// [`CycleError::Invariant`] when the legs do not close the state loop or the leg
/// work does not match `heat_in − heat_out`.
pub fn aggregate(
    config: &SimulationConfig,
    fluid: &'static FluidProperties,
    states: Vec<ThermodynamicState>,
    processes: Vec<ThermodynamicProcess>,
) -> CycleResult<ThermodynamicCycle> {
    check_topology(&states, &processes)?;

    let heat_in: f64 = processes.iter().filter(|p| p.adds_heat()).map(|p| p.heat).sum();
    let heat_out: f64 = processes
        .iter()
        .filter(|p| p.rejects_heat())
        .map(|p| -p.heat)
        .sum();

    if heat_in.abs() < MIN_HEAT_INPUT {
        return Err(CycleError::DegenerateCycle {
            what: "no heat is added over the cycle",
        });
    }

    let net_work = heat_in - heat_out;
    let work_sum: f64 = processes.iter().map(|p| p.work).sum();
    if (work_sum - net_work).abs() > FIRST_LAW_TOLERANCE * heat_in {
        return Err(CycleError::Invariant {
            what: "leg work does not close the first law",
        });
    }

    let kind = config.cycle.kind();
    let efficiency = if kind.is_power_cycle() {
        net_work / heat_in
    } else {
        let work_input = heat_out - heat_in;
        if work_input <= MIN_HEAT_INPUT {
            return Err(CycleError::DegenerateCycle {
                what: "refrigeration cycle needs positive work input",
            });
        }
        heat_in / work_input
    };

    let metrics = match config.metrics {
        MetricsRequest::Basic => None,
        MetricsRequest::Extended {
            dead_state_temperature,
        } => Some(extended_metrics(&states, &processes, dead_state_temperature)?),
    };

    Ok(ThermodynamicCycle {
        id: cycle_key(config, fluid)?.into_string(),
        name: format!("{kind} cycle ({})", fluid.name),
        kind,
        fluid,
        spec: config.cycle,
        states,
        processes,
        efficiency,
        net_work,
        heat_in,
        heat_out,
        metrics,
    })
}

fn check_topology(
    states: &[ThermodynamicState],
    processes: &[ThermodynamicProcess],
) -> CycleResult<()> {
    if states.len() < 2 {
        return Err(CycleError::DegenerateCycle {
            what: "a cycle needs at least two states",
        });
    }
    if processes.len() != states.len() {
        return Err(CycleError::Invariant {
            what: "one process per state is required",
        });
    }
    let n = states.len();
    for (i, process) in processes.iter().enumerate() {
        if process.start != states[i].id() || process.end != states[(i + 1) % n].id() {
            return Err(CycleError::Invariant {
                what: "processes must connect consecutive states and close the loop",
            });
        }
    }
    Ok(())
}

fn extended_metrics(
    states: &[ThermodynamicState],
    processes: &[ThermodynamicProcess],
    dead_state_temperature: f64,
) -> CycleResult<ExtendedMetrics> {
    let dead_state_temperature =
        ensure_positive(dead_state_temperature, "dead state temperature")?;

    let mut entropy_generation = 0.0;
    let mut exergy = 0.0;
    for process in processes {
        let start = states[process.start.as_usize()].temperature_k();
        let end = states[process.end.as_usize()].temperature_k();
        let reservoir = if process.adds_heat() {
            start.max(end)
        } else {
            start.min(end)
        };

        entropy_generation += process.entropy_change - process.heat / reservoir;
        if process.adds_heat() {
            exergy += process.heat * (1.0 - dead_state_temperature / reservoir);
        }
    }

    let first = &states[0];
    Ok(ExtendedMetrics {
        entropy_generation,
        exergy,
        quality: None,
        gibbs_free_energy: first.gibbs_free_energy(),
        helmholtz_free_energy: first.helmholtz_free_energy(),
    })
}
