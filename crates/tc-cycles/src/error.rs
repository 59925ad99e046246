//! Error types for cycle evaluation.

use tc_cache::CacheError;
use tc_core::TcError;
use tc_fluids::FluidError;
use thiserror::Error;

/// Errors surfaced by the cycle engine.
///
/// Every variant is deterministic: retrying with the same input reproduces it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CycleError {
    #[error("Unknown fluid: {name}")]
    UnknownFluid { name: String },

    #[error("Missing parameter: {key}")]
    MissingParameter { key: &'static str },

    #[error("Invalid parameter {key} = {value}: {reason}")]
    InvalidParameter {
        key: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("Invalid process leg {process}: {reason}")]
    InvalidLeg {
        process: String,
        reason: &'static str,
    },

    #[error("Degenerate cycle: {what}")]
    DegenerateCycle { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Invariant violated: {what}")]
    Invariant { what: &'static str },
}

pub type CycleResult<T> = Result<T, CycleError>;

impl CycleError {
    /// Name of the offending parameter, if the error is about one.
    pub fn parameter(&self) -> Option<&'static str> {
        match self {
            CycleError::MissingParameter { key } | CycleError::InvalidParameter { key, .. } => {
                Some(*key)
            }
            _ => None,
        }
    }
}

impl From<FluidError> for CycleError {
    fn from(e: FluidError) -> Self {
        match e {
            FluidError::UnknownFluid { name } => CycleError::UnknownFluid { name },
            FluidError::NonPhysical { what, .. } => CycleError::Invariant { what },
        }
    }
}

impl From<CacheError> for CycleError {
    fn from(e: CacheError) -> Self {
        match e {
            CacheError::Key(_) => CycleError::Invariant {
                what: "configuration cannot be hashed",
            },
            CacheError::ZeroCapacity => CycleError::InvalidArg {
                what: "cache capacity must be at least 1",
            },
        }
    }
}

impl From<TcError> for CycleError {
    fn from(e: TcError) -> Self {
        match e {
            TcError::InvalidArg { what } => CycleError::InvalidArg { what },
            TcError::NonFinite { what, .. } | TcError::Invariant { what } => {
                CycleError::Invariant { what }
            }
        }
    }
}
