use crate::error::{FluidError, FluidResult};
use crate::properties::FluidProperties;

// Gas constant [kJ/(kg·K)] and heat capacity ratio at ~300 K; cp and cv follow.
const FLUID_TABLE: [FluidProperties; 9] = [
    FluidProperties::from_gas_constant("Air", &["atmosphere"], 0.287, 1.4),
    FluidProperties::from_gas_constant("Nitrogen", &["n2"], 0.2968, 1.4),
    FluidProperties::from_gas_constant("Oxygen", &["o2"], 0.2598, 1.395),
    FluidProperties::from_gas_constant("Argon", &["ar"], 0.2081, 1.667),
    FluidProperties::from_gas_constant("Helium", &["he"], 2.0769, 1.667),
    FluidProperties::from_gas_constant("Hydrogen", &["h2"], 4.124, 1.405),
    FluidProperties::from_gas_constant(
        "Carbon Dioxide",
        &["co2", "carbon-dioxide"],
        0.1889,
        1.288,
    ),
    FluidProperties::from_gas_constant(
        "Steam",
        &["water", "water vapour", "water vapor", "h2o"],
        0.4615,
        1.327,
    ),
    FluidProperties::from_gas_constant("R134a", &["r-134a", "tetrafluoroethane"], 0.08149, 1.106),
];

/// Every fluid in the table, in display order.
pub fn fluids() -> &'static [FluidProperties] {
    &FLUID_TABLE
}

/// Resolve a fluid by canonical name or alias (case-insensitive).
pub fn lookup(name: &str) -> FluidResult<&'static FluidProperties> {
    fluids()
        .iter()
        .find(|entry| entry.matches_name(name))
        .ok_or_else(|| FluidError::UnknownFluid {
            name: name.trim().to_string(),
        })
}

/// Table entries whose name or alias contains `query`.
pub fn filter_fluids(query: &str) -> Vec<&'static FluidProperties> {
    fluids()
        .iter()
        .filter(|entry| entry.matches_query(query))
        .collect()
}
