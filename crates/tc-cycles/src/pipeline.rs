//! End-to-end evaluation of one configuration.

use crate::aggregate::{ThermodynamicCycle, aggregate};
use crate::config::SimulationConfig;
use crate::error::{CycleError, CycleResult};
use crate::process::evaluate;
use crate::solver::{leg_plan, solve_states};
use tc_core::ProcessId;

/// Look up the fluid, solve the states, evaluate every leg and aggregate.
///
/// The cycle's identity is the content hash of `config`, so equal configurations
/// always produce equal ids and different ones never share an id.
pub fn run_cycle(config: &SimulationConfig) -> CycleResult<ThermodynamicCycle> {
    let fluid = tc_fluids::lookup(&config.fluid)?;
    let states = solve_states(&config.cycle, fluid)?;
    let plan = leg_plan(&config.cycle);
    if plan.len() != states.len() {
        return Err(CycleError::Invariant {
            what: "leg plan does not match the solved states",
        });
    }

    let n = states.len();
    let processes = plan
        .iter()
        .enumerate()
        .map(|(i, leg)| {
            let id = ProcessId::from_index(i).ok_or(CycleError::Invariant {
                what: "process index exceeds the id range",
            })?;
            evaluate(
                id,
                leg.name,
                leg.kind,
                &states[i],
                &states[(i + 1) % n],
                fluid,
            )
        })
        .collect::<CycleResult<Vec<_>>>()?;

    let cycle = aggregate(config, fluid, states, processes)?;
    tracing::debug!(
        cycle = %cycle.kind,
        fluid = cycle.fluid.name,
        efficiency = cycle.efficiency,
        net_work = cycle.net_work,
        "computed cycle"
    );
    Ok(cycle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CycleSpec, OttoParams};

    fn otto(fluid: &str) -> SimulationConfig {
        SimulationConfig::new(
            fluid,
            CycleSpec::Otto(OttoParams {
                t1: 300.0,
                p1: 100.0,
                compression_ratio: 8.0,
                heat_added: 1000.0,
                polytropic_index: None,
            }),
        )
    }

    #[test]
    fn unknown_fluid_is_reported() {
        let err = run_cycle(&otto("unobtainium")).unwrap_err();
        assert_eq!(
            err,
            CycleError::UnknownFluid {
                name: "unobtainium".into()
            }
        );
    }

    #[test]
    fn fluid_names_resolve_through_aliases() {
        let cycle = run_cycle(&otto("CO2")).unwrap();
        assert_eq!(cycle.fluid.name, "Carbon Dioxide");
        assert_eq!(cycle.name, "Otto cycle (Carbon Dioxide)");
    }

    #[test]
    fn processes_reference_consecutive_states() {
        let cycle = run_cycle(&otto("air")).unwrap();
        assert_eq!(cycle.processes.len(), 4);
        for (i, process) in cycle.processes.iter().enumerate() {
            assert_eq!(process.id.as_usize(), i);
            assert_eq!(process.start.as_usize(), i);
            assert_eq!(process.end.as_usize(), (i + 1) % 4);
        }
    }
}
