//! tc-cycles: ideal-gas cycle evaluation for thermocycle.
//!
//! Provides:
//! - Typed cycle configuration (`CycleSpec`) and the loose input form (`CycleInput`)
//! - State solver for Otto, Diesel, Brayton, Rankine, Carnot and gas refrigeration cycles
//! - Process evaluator (work, heat, entropy change per leg)
//! - Cycle aggregator (efficiency or COP, net work, optional extended metrics)
//! - Lazy PV / TS / PH diagram samplers
//!
//! # Example
//!
//! ```
//! use tc_cycles::{CycleSpec, OttoParams, SimulationConfig, run_cycle};
//!
//! let config = SimulationConfig::new(
//!     "air",
//!     CycleSpec::Otto(OttoParams {
//!         t1: 300.0,
//!         p1: 100.0,
//!         compression_ratio: 8.0,
//!         heat_added: 1000.0,
//!         polytropic_index: None,
//!     }),
//! );
//! let cycle = run_cycle(&config).unwrap();
//! assert!((cycle.efficiency - 0.5647).abs() < 1e-3);
//! ```

pub mod aggregate;
pub mod config;
pub mod diagram;
pub mod error;
pub mod process;
pub mod solver;
pub mod state;

mod pipeline;

pub use aggregate::{CYCLE_STAGE, ExtendedMetrics, ThermodynamicCycle, aggregate, cycle_key};
pub use config::{
    BraytonParams, CarnotParams, CycleInput, CycleKind, CycleSpec, DieselParams, MetricsRequest,
    OttoParams, RankineParams, RefrigerationParams, SimulationConfig,
};
pub use diagram::{
    ChartPoint, DEFAULT_SEGMENTS, DiagramKind, DiagramSampler, LegSampler, sample_diagram,
    sample_leg,
};
pub use error::{CycleError, CycleResult};
pub use pipeline::run_cycle;
pub use process::{ProcessKind, ThermodynamicProcess, evaluate};
pub use solver::{LegPlan, leg_plan, solve_states};
pub use state::ThermodynamicState;
