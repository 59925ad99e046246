use proptest::prelude::*;
use tc_cycles::{
    BraytonParams, CarnotParams, CycleError, CycleInput, CycleKind, CycleSpec, DiagramKind,
    DieselParams, MetricsRequest, OttoParams, ProcessKind, RankineParams, RefrigerationParams,
    SimulationConfig, run_cycle, sample_diagram, sample_leg,
};

fn otto(compression_ratio: f64) -> CycleSpec {
    CycleSpec::Otto(OttoParams {
        t1: 300.0,
        p1: 100.0,
        compression_ratio,
        heat_added: 1000.0,
        polytropic_index: None,
    })
}

fn one_of_each() -> Vec<CycleSpec> {
    vec![
        otto(8.0),
        CycleSpec::Diesel(DieselParams {
            t1: 300.0,
            p1: 100.0,
            compression_ratio: 8.0,
            cutoff_ratio: 2.0,
            polytropic_index: None,
        }),
        CycleSpec::Brayton(BraytonParams {
            t1: 300.0,
            p1: 100.0,
            pressure_ratio: 10.0,
            heat_added: 800.0,
        }),
        CycleSpec::Rankine(RankineParams {
            t1: 300.0,
            p1: 100.0,
            boiler_pressure: 1000.0,
            max_temperature: 1200.0,
        }),
        CycleSpec::Carnot(CarnotParams {
            max_temperature: 1000.0,
            min_temperature: 300.0,
            p1: 800.0,
            expansion_ratio: 2.0,
        }),
        CycleSpec::Refrigeration(RefrigerationParams {
            t1: 260.0,
            p1: 100.0,
            condenser_pressure: 400.0,
            condenser_exit_temperature: 300.0,
        }),
    ]
}

#[test]
fn otto_air_reference_case() {
    let cycle = run_cycle(&SimulationConfig::new("air", otto(8.0))).unwrap();
    assert!((cycle.states[1].temperature_k() - 689.2).abs() < 0.1);
    assert!((cycle.efficiency - 0.5647).abs() < 1e-4);
}

#[test]
fn diesel_is_less_efficient_than_otto_at_equal_compression() {
    let specs = one_of_each();
    let otto = run_cycle(&SimulationConfig::new("air", specs[0])).unwrap();
    let diesel = run_cycle(&SimulationConfig::new("air", specs[1])).unwrap();
    assert!(diesel.efficiency < otto.efficiency);
}

#[test]
fn carnot_efficiency_is_the_temperature_bound() {
    let config = SimulationConfig::new("nitrogen", one_of_each()[4])
        .with_metrics(MetricsRequest::extended());
    let cycle = run_cycle(&config).unwrap();
    assert!((cycle.efficiency - 0.7).abs() < 1e-9);
    let metrics = cycle.metrics.unwrap();
    assert!(metrics.entropy_generation.abs() < 1e-9);
}

#[test]
fn every_kind_returns_to_its_initial_entropy() {
    for spec in one_of_each() {
        let cycle = run_cycle(&SimulationConfig::new("air", spec)).unwrap();
        assert_eq!(cycle.kind, spec.kind());
        assert_eq!(cycle.states.len(), 4);
        assert_eq!(cycle.processes.len(), 4);
        assert!(
            cycle.entropy_change_sum().abs() < 1e-9,
            "{}: Σ Δs = {}",
            cycle.kind,
            cycle.entropy_change_sum()
        );
        assert!((cycle.net_work - (cycle.heat_in - cycle.heat_out)).abs() < 1e-9);
    }
}

#[test]
fn isentropic_legs_keep_state_entropy_for_every_fluid() {
    for fluid in ["air", "helium", "co2", "steam"] {
        for spec in one_of_each() {
            let cycle = run_cycle(&SimulationConfig::new(fluid, spec)).unwrap();
            for leg in cycle.processes.iter().filter(|p| p.kind == ProcessKind::Isentropic) {
                let start = cycle.start_of(leg).unwrap().entropy();
                let end = cycle.end_of(leg).unwrap().entropy();
                assert!(
                    (end - start).abs() < 1e-12,
                    "{fluid} {}: s {start} -> {end}",
                    cycle.kind
                );
            }
        }
    }
}

#[test]
fn basic_request_omits_extended_metrics() {
    for spec in one_of_each() {
        let cycle = run_cycle(&SimulationConfig::new("air", spec)).unwrap();
        assert!(cycle.metrics.is_none());
        let json = serde_json::to_value(&cycle).unwrap();
        assert!(json.get("metrics").is_none());
    }
}

#[test]
fn unit_compression_ratio_is_invalid() {
    let err = run_cycle(&SimulationConfig::new("air", otto(1.0))).unwrap_err();
    assert!(matches!(
        err,
        CycleError::InvalidParameter {
            key: "compression_ratio",
            value,
            ..
        } if value == 1.0
    ));
}

#[test]
fn yaml_input_runs_end_to_end() {
    let yaml = r#"
fluid: Helium
cycle: brayton
parameters:
  T1: 290
  p1: 100
  pressure-ratio: 6
  heat_added: 2000
"#;
    let input: CycleInput = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(input.cycle, CycleKind::Brayton);
    let config = SimulationConfig::try_from(input).unwrap();
    let cycle = run_cycle(&config).unwrap();
    assert_eq!(cycle.fluid.name, "Helium");
    let k = (1.667 - 1.0) / 1.667;
    assert!((cycle.efficiency - (1.0 - 6.0_f64.powf(-k))).abs() < 1e-9);
}

#[test]
fn diagram_points_cover_every_leg() {
    let cycle = run_cycle(&SimulationConfig::new("air", one_of_each()[2])).unwrap();
    for kind in DiagramKind::ALL {
        let points: Vec<_> = sample_diagram(&cycle, kind, 20).unwrap().collect();
        assert_eq!(points.len(), 80);
        assert!(points.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
    }

    let leg = sample_leg(&cycle, &cycle.processes[2], DiagramKind::Ts, 20).unwrap();
    assert_eq!(leg.len(), 21);
}

proptest! {
    #[test]
    fn otto_first_law_closes(
        t1 in 200.0..400.0f64,
        p1 in 50.0..500.0f64,
        compression_ratio in 2.0..20.0f64,
        heat_added in 100.0..3000.0f64,
        polytropic_index in proptest::option::of(1.1..1.6f64),
    ) {
        let spec = CycleSpec::Otto(OttoParams {
            t1,
            p1,
            compression_ratio,
            heat_added,
            polytropic_index,
        });
        let cycle = run_cycle(&SimulationConfig::new("air", spec)).unwrap();

        let work = cycle.work_sum();
        prop_assert!((work - cycle.net_work).abs() <= 1e-6 * cycle.heat_in);
        prop_assert!((cycle.net_work - (cycle.heat_in - cycle.heat_out)).abs() <= 1e-6 * cycle.heat_in);
        prop_assert!(cycle.efficiency > 0.0 && cycle.efficiency < 1.0);
    }

    #[test]
    fn leg_sampling_hits_both_end_states(segments in 1usize..64) {
        let cycle = run_cycle(&SimulationConfig::new("air", otto(9.5))).unwrap();
        for process in &cycle.processes {
            let points: Vec<_> = sample_leg(&cycle, process, DiagramKind::Pv, segments)
                .unwrap()
                .collect();
            prop_assert_eq!(points.len(), segments + 1);
            let start = cycle.start_of(process).unwrap();
            let end = cycle.end_of(process).unwrap();
            prop_assert_eq!(points[0].x, start.volume());
            prop_assert_eq!(points[0].y, start.pressure_kpa());
            prop_assert_eq!(points[segments].x, end.volume());
            prop_assert_eq!(points[segments].y, end.pressure_kpa());
        }
    }
}
