//! Cycle configuration.
//!
//! Each cycle kind has its own parameter struct, so a `CycleSpec` that exists always
//! carries every key its kind needs. The loose "name → value" map used by input files
//! is converted once, in [`CycleSpec::from_parameters`], where missing keys surface as
//! [`CycleError::MissingParameter`].

use crate::error::{CycleError, CycleResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tc_core::units::constants::DEAD_STATE_K;

/// Parameter names accepted in loose parameter maps.
///
/// Lookup ignores case, `_` and `-`, so `compressionRatio` and `T1` also resolve.
pub mod keys {
    /// Initial (state 1) temperature [K]
    pub const T1: &str = "t1";
    /// Initial (state 1) pressure [kPa]
    pub const P1: &str = "p1";
    pub const COMPRESSION_RATIO: &str = "compression_ratio";
    pub const CUTOFF_RATIO: &str = "cutoff_ratio";
    pub const PRESSURE_RATIO: &str = "pressure_ratio";
    /// Heat added per unit mass [kJ/kg]
    pub const HEAT_ADDED: &str = "heat_added";
    pub const POLYTROPIC_INDEX: &str = "polytropic_index";
    /// [kPa]
    pub const BOILER_PRESSURE: &str = "boiler_pressure";
    /// [K]
    pub const MAX_TEMPERATURE: &str = "max_temperature";
    /// [K]
    pub const MIN_TEMPERATURE: &str = "min_temperature";
    pub const EXPANSION_RATIO: &str = "expansion_ratio";
    /// [kPa]
    pub const CONDENSER_PRESSURE: &str = "condenser_pressure";
    /// [K]
    pub const CONDENSER_EXIT_TEMPERATURE: &str = "condenser_exit_temperature";
}

/// Heat added when an Otto or Brayton configuration leaves it unset [kJ/kg].
pub const DEFAULT_HEAT_ADDED: f64 = 1000.0;
/// Carnot isothermal expansion ratio v2/v1 when unset.
pub const DEFAULT_EXPANSION_RATIO: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleKind {
    Otto,
    Diesel,
    Brayton,
    Rankine,
    Carnot,
    Refrigeration,
}

impl CycleKind {
    pub const ALL: [CycleKind; 6] = [
        CycleKind::Otto,
        CycleKind::Diesel,
        CycleKind::Brayton,
        CycleKind::Rankine,
        CycleKind::Carnot,
        CycleKind::Refrigeration,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CycleKind::Otto => "Otto",
            CycleKind::Diesel => "Diesel",
            CycleKind::Brayton => "Brayton",
            CycleKind::Rankine => "Rankine",
            CycleKind::Carnot => "Carnot",
            CycleKind::Refrigeration => "Refrigeration",
        }
    }

    pub fn required_keys(self) -> &'static [&'static str] {
        use keys::*;
        match self {
            CycleKind::Otto => &[T1, P1, COMPRESSION_RATIO],
            CycleKind::Diesel => &[T1, P1, COMPRESSION_RATIO, CUTOFF_RATIO],
            CycleKind::Brayton => &[T1, P1, PRESSURE_RATIO],
            CycleKind::Rankine => &[T1, P1, BOILER_PRESSURE, MAX_TEMPERATURE],
            CycleKind::Carnot => &[MAX_TEMPERATURE, MIN_TEMPERATURE, P1],
            CycleKind::Refrigeration => {
                &[T1, P1, CONDENSER_PRESSURE, CONDENSER_EXIT_TEMPERATURE]
            }
        }
    }

    pub fn optional_keys(self) -> &'static [&'static str] {
        use keys::*;
        match self {
            CycleKind::Otto => &[HEAT_ADDED, POLYTROPIC_INDEX],
            CycleKind::Diesel => &[POLYTROPIC_INDEX],
            CycleKind::Brayton => &[HEAT_ADDED],
            CycleKind::Carnot => &[EXPANSION_RATIO],
            CycleKind::Rankine | CycleKind::Refrigeration => &[],
        }
    }

    /// Power cycles report thermal efficiency; refrigeration reports COP.
    pub fn is_power_cycle(self) -> bool {
        !matches!(self, CycleKind::Refrigeration)
    }
}

impl std::fmt::Display for CycleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

fn default_heat_added() -> f64 {
    DEFAULT_HEAT_ADDED
}

fn default_expansion_ratio() -> f64 {
    DEFAULT_EXPANSION_RATIO
}

/// Spark-ignition air-standard cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OttoParams {
    pub t1: f64,
    pub p1: f64,
    pub compression_ratio: f64,
    #[serde(default = "default_heat_added")]
    pub heat_added: f64,
    /// Replaces the isentropic compression/expansion legs with `P·v^n = const`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polytropic_index: Option<f64>,
}

/// Compression-ignition air-standard cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DieselParams {
    pub t1: f64,
    pub p1: f64,
    pub compression_ratio: f64,
    pub cutoff_ratio: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polytropic_index: Option<f64>,
}

/// Simple gas-turbine cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BraytonParams {
    pub t1: f64,
    pub p1: f64,
    pub pressure_ratio: f64,
    #[serde(default = "default_heat_added")]
    pub heat_added: f64,
}

/// Vapour power cycle, evaluated with ideal-gas relations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankineParams {
    /// Condenser exit temperature [K]
    pub t1: f64,
    /// Condenser pressure [kPa]
    pub p1: f64,
    pub boiler_pressure: f64,
    /// Turbine inlet temperature [K]
    pub max_temperature: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CarnotParams {
    pub max_temperature: f64,
    pub min_temperature: f64,
    /// Pressure at the start of isothermal expansion [kPa]
    pub p1: f64,
    #[serde(default = "default_expansion_ratio")]
    pub expansion_ratio: f64,
}

/// Reversed Brayton (gas refrigeration) cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RefrigerationParams {
    /// Compressor inlet temperature [K]
    pub t1: f64,
    /// Evaporator pressure [kPa]
    pub p1: f64,
    pub condenser_pressure: f64,
    pub condenser_exit_temperature: f64,
}

/// Cycle kind together with its typed parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cycle", rename_all = "snake_case")]
pub enum CycleSpec {
    Otto(OttoParams),
    Diesel(DieselParams),
    Brayton(BraytonParams),
    Rankine(RankineParams),
    Carnot(CarnotParams),
    Refrigeration(RefrigerationParams),
}

impl CycleSpec {
    pub fn kind(&self) -> CycleKind {
        match self {
            CycleSpec::Otto(_) => CycleKind::Otto,
            CycleSpec::Diesel(_) => CycleKind::Diesel,
            CycleSpec::Brayton(_) => CycleKind::Brayton,
            CycleSpec::Rankine(_) => CycleKind::Rankine,
            CycleSpec::Carnot(_) => CycleKind::Carnot,
            CycleSpec::Refrigeration(_) => CycleKind::Refrigeration,
        }
    }

    /// Build a typed spec from a loose parameter map and validate it.
    pub fn from_parameters(kind: CycleKind, parameters: &BTreeMap<String, f64>) -> CycleResult<Self> {
        let params = ParameterMap::new(parameters);
        params.warn_unrecognised(kind);

        let spec = match kind {
            CycleKind::Otto => CycleSpec::Otto(OttoParams {
                t1: params.required(keys::T1)?,
                p1: params.required(keys::P1)?,
                compression_ratio: params.required(keys::COMPRESSION_RATIO)?,
                heat_added: params
                    .optional(keys::HEAT_ADDED)
                    .unwrap_or(DEFAULT_HEAT_ADDED),
                polytropic_index: params.optional(keys::POLYTROPIC_INDEX),
            }),
            CycleKind::Diesel => CycleSpec::Diesel(DieselParams {
                t1: params.required(keys::T1)?,
                p1: params.required(keys::P1)?,
                compression_ratio: params.required(keys::COMPRESSION_RATIO)?,
                cutoff_ratio: params.required(keys::CUTOFF_RATIO)?,
                polytropic_index: params.optional(keys::POLYTROPIC_INDEX),
            }),
            CycleKind::Brayton => CycleSpec::Brayton(BraytonParams {
                t1: params.required(keys::T1)?,
                p1: params.required(keys::P1)?,
                pressure_ratio: params.required(keys::PRESSURE_RATIO)?,
                heat_added: params
                    .optional(keys::HEAT_ADDED)
                    .unwrap_or(DEFAULT_HEAT_ADDED),
            }),
            CycleKind::Rankine => CycleSpec::Rankine(RankineParams {
                t1: params.required(keys::T1)?,
                p1: params.required(keys::P1)?,
                boiler_pressure: params.required(keys::BOILER_PRESSURE)?,
                max_temperature: params.required(keys::MAX_TEMPERATURE)?,
            }),
            CycleKind::Carnot => CycleSpec::Carnot(CarnotParams {
                max_temperature: params.required(keys::MAX_TEMPERATURE)?,
                min_temperature: params.required(keys::MIN_TEMPERATURE)?,
                p1: params.required(keys::P1)?,
                expansion_ratio: params
                    .optional(keys::EXPANSION_RATIO)
                    .unwrap_or(DEFAULT_EXPANSION_RATIO),
            }),
            CycleKind::Refrigeration => CycleSpec::Refrigeration(RefrigerationParams {
                t1: params.required(keys::T1)?,
                p1: params.required(keys::P1)?,
                condenser_pressure: params.required(keys::CONDENSER_PRESSURE)?,
                condenser_exit_temperature: params.required(keys::CONDENSER_EXIT_TEMPERATURE)?,
            }),
        };

        spec.validate()?;
        Ok(spec)
    }

    /// Every parameter with its effective value (defaults filled in).
    pub fn parameters(&self) -> Vec<(&'static str, f64)> {
        use keys::*;
        let mut out = match *self {
            CycleSpec::Otto(p) => vec![
                (T1, p.t1),
                (P1, p.p1),
                (COMPRESSION_RATIO, p.compression_ratio),
                (HEAT_ADDED, p.heat_added),
            ],
            CycleSpec::Diesel(p) => vec![
                (T1, p.t1),
                (P1, p.p1),
                (COMPRESSION_RATIO, p.compression_ratio),
                (CUTOFF_RATIO, p.cutoff_ratio),
            ],
            CycleSpec::Brayton(p) => vec![
                (T1, p.t1),
                (P1, p.p1),
                (PRESSURE_RATIO, p.pressure_ratio),
                (HEAT_ADDED, p.heat_added),
            ],
            CycleSpec::Rankine(p) => vec![
                (T1, p.t1),
                (P1, p.p1),
                (BOILER_PRESSURE, p.boiler_pressure),
                (MAX_TEMPERATURE, p.max_temperature),
            ],
            CycleSpec::Carnot(p) => vec![
                (MAX_TEMPERATURE, p.max_temperature),
                (MIN_TEMPERATURE, p.min_temperature),
                (P1, p.p1),
                (EXPANSION_RATIO, p.expansion_ratio),
            ],
            CycleSpec::Refrigeration(p) => vec![
                (T1, p.t1),
                (P1, p.p1),
                (CONDENSER_PRESSURE, p.condenser_pressure),
                (CONDENSER_EXIT_TEMPERATURE, p.condenser_exit_temperature),
            ],
        };
        if let Some(n) = self.polytropic_index() {
            out.push((POLYTROPIC_INDEX, n));
        }
        out
    }

    /// Polytropic index for the compression/expansion legs, if overridden.
    pub fn polytropic_index(&self) -> Option<f64> {
        match self {
            CycleSpec::Otto(p) => p.polytropic_index,
            CycleSpec::Diesel(p) => p.polytropic_index,
            _ => None,
        }
    }

    /// Range checks that need no fluid constants.
    ///
    /// Checks that depend on derived states (e.g. a turbine inlet temperature below the
    /// compressor exit) are made by the solver.
    pub fn validate(&self) -> CycleResult<()> {
        use keys::*;
        match *self {
            CycleSpec::Otto(p) => {
                positive(T1, p.t1)?;
                positive(P1, p.p1)?;
                ratio_above_one(COMPRESSION_RATIO, p.compression_ratio)?;
                positive(HEAT_ADDED, p.heat_added)?;
                polytropic(p.polytropic_index)?;
            }
            CycleSpec::Diesel(p) => {
                positive(T1, p.t1)?;
                positive(P1, p.p1)?;
                ratio_above_one(COMPRESSION_RATIO, p.compression_ratio)?;
                ratio_above_one(CUTOFF_RATIO, p.cutoff_ratio)?;
                if p.cutoff_ratio >= p.compression_ratio {
                    return Err(CycleError::InvalidParameter {
                        key: CUTOFF_RATIO,
                        value: p.cutoff_ratio,
                        reason: "must be smaller than the compression ratio",
                    });
                }
                polytropic(p.polytropic_index)?;
            }
            CycleSpec::Brayton(p) => {
                positive(T1, p.t1)?;
                positive(P1, p.p1)?;
                ratio_above_one(PRESSURE_RATIO, p.pressure_ratio)?;
                positive(HEAT_ADDED, p.heat_added)?;
            }
            CycleSpec::Rankine(p) => {
                positive(T1, p.t1)?;
                positive(P1, p.p1)?;
                positive(BOILER_PRESSURE, p.boiler_pressure)?;
                positive(MAX_TEMPERATURE, p.max_temperature)?;
                if p.boiler_pressure <= p.p1 {
                    return Err(CycleError::InvalidParameter {
                        key: BOILER_PRESSURE,
                        value: p.boiler_pressure,
                        reason: "must exceed the condenser pressure p1",
                    });
                }
            }
            CycleSpec::Carnot(p) => {
                positive(MAX_TEMPERATURE, p.max_temperature)?;
                positive(MIN_TEMPERATURE, p.min_temperature)?;
                positive(P1, p.p1)?;
                ratio_above_one(EXPANSION_RATIO, p.expansion_ratio)?;
                if p.max_temperature <= p.min_temperature {
                    return Err(CycleError::InvalidParameter {
                        key: MAX_TEMPERATURE,
                        value: p.max_temperature,
                        reason: "must exceed min_temperature",
                    });
                }
            }
            CycleSpec::Refrigeration(p) => {
                positive(T1, p.t1)?;
                positive(P1, p.p1)?;
                positive(CONDENSER_PRESSURE, p.condenser_pressure)?;
                positive(CONDENSER_EXIT_TEMPERATURE, p.condenser_exit_temperature)?;
                if p.condenser_pressure <= p.p1 {
                    return Err(CycleError::InvalidParameter {
                        key: CONDENSER_PRESSURE,
                        value: p.condenser_pressure,
                        reason: "must exceed the evaporator pressure p1",
                    });
                }
            }
        }
        Ok(())
    }
}

fn positive(key: &'static str, value: f64) -> CycleResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(CycleError::InvalidParameter {
            key,
            value,
            reason: "must be positive and finite",
        })
    }
}

fn ratio_above_one(key: &'static str, value: f64) -> CycleResult<f64> {
    positive(key, value)?;
    if value > 1.0 {
        Ok(value)
    } else {
        Err(CycleError::InvalidParameter {
            key,
            value,
            reason: "must be greater than 1",
        })
    }
}

fn polytropic(index: Option<f64>) -> CycleResult<()> {
    match index {
        Some(n) if !n.is_finite() || n < 1.0 => Err(CycleError::InvalidParameter {
            key: keys::POLYTROPIC_INDEX,
            value: n,
            reason: "must be finite and at least 1",
        }),
        _ => Ok(()),
    }
}

/// Normalised view over a loose parameter map.
struct ParameterMap {
    values: BTreeMap<String, f64>,
}

impl ParameterMap {
    fn new(raw: &BTreeMap<String, f64>) -> Self {
        Self {
            values: raw
                .iter()
                .map(|(key, value)| (normalise_key(key), *value))
                .collect(),
        }
    }

    fn optional(&self, key: &'static str) -> Option<f64> {
        self.values.get(&normalise_key(key)).copied()
    }

    fn required(&self, key: &'static str) -> CycleResult<f64> {
        self.optional(key)
            .ok_or(CycleError::MissingParameter { key })
    }

    fn warn_unrecognised(&self, kind: CycleKind) {
        let known: Vec<String> = kind
            .required_keys()
            .iter()
            .chain(kind.optional_keys())
            .map(|key| normalise_key(key))
            .collect();
        for key in self.values.keys().filter(|key| !known.contains(*key)) {
            tracing::warn!(cycle = %kind, parameter = %key, "ignoring unrecognised parameter");
        }
    }
}

fn normalise_key(key: &str) -> String {
    key.trim()
        .chars()
        .filter(|c| *c != '_' && *c != '-')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn default_dead_state() -> f64 {
    DEAD_STATE_K
}

/// Which summary metrics the aggregator computes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum MetricsRequest {
    /// Efficiency, net work, heat in/out only.
    #[default]
    Basic,
    /// Also entropy generation, exergy and free energies.
    Extended {
        /// Ambient temperature for exergy [K]
        #[serde(default = "default_dead_state")]
        dead_state_temperature: f64,
    },
}

impl MetricsRequest {
    /// Extended metrics against the default 298.15 K dead state.
    pub fn extended() -> Self {
        MetricsRequest::Extended {
            dead_state_temperature: DEAD_STATE_K,
        }
    }
}

/// The complete input of one engine evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub fluid: String,
    #[serde(flatten)]
    pub cycle: CycleSpec,
    #[serde(default)]
    pub metrics: MetricsRequest,
}

impl SimulationConfig {
    pub fn new(fluid: impl Into<String>, cycle: CycleSpec) -> Self {
        Self {
            fluid: fluid.into(),
            cycle,
            metrics: MetricsRequest::Basic,
        }
    }

    pub fn with_metrics(mut self, metrics: MetricsRequest) -> Self {
        self.metrics = metrics;
        self
    }
}

/// Loose input form: fluid, cycle kind and an untyped parameter map.
///
/// This is what input files and UI forms provide; it becomes a [`SimulationConfig`]
/// through `TryFrom`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleInput {
    pub fluid: String,
    pub cycle: CycleKind,
    #[serde(default)]
    pub parameters: BTreeMap<String, f64>,
    #[serde(default)]
    pub metrics: MetricsRequest,
}

impl TryFrom<CycleInput> for SimulationConfig {
    type Error = CycleError;

    fn try_from(input: CycleInput) -> CycleResult<Self> {
        let cycle = CycleSpec::from_parameters(input.cycle, &input.parameters)?;
        Ok(SimulationConfig {
            fluid: input.fluid,
            cycle,
            metrics: input.metrics,
        })
    }
}
