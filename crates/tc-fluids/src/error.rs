//! Fluid table errors.

use tc_core::TcError;
use thiserror::Error;

/// Result type for fluid operations.
pub type FluidResult<T> = Result<T, FluidError>;

/// Errors that can occur when resolving or checking fluid constants.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FluidError {
    /// No table entry matches the requested name or alias.
    #[error("Unknown fluid: {name}")]
    UnknownFluid { name: String },

    /// Constants violate cp - cv = R or γ = cp/cv.
    #[error("Non-physical constants for {fluid}: {what}")]
    NonPhysical {
        fluid: &'static str,
        what: &'static str,
    },
}

impl From<FluidError> for TcError {
    fn from(err: FluidError) -> Self {
        match err {
            FluidError::UnknownFluid { .. } => TcError::InvalidArg {
                what: "unknown fluid",
            },
            FluidError::NonPhysical { what, .. } => TcError::Invariant { what },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = FluidError::UnknownFluid {
            name: "unobtainium".into(),
        };
        assert!(err.to_string().contains("unobtainium"));

        let err = FluidError::NonPhysical {
            fluid: "Air",
            what: "cp - cv must equal R",
        };
        assert!(err.to_string().contains("Air"));
    }

    #[test]
    fn error_to_tc_error() {
        let err: TcError = FluidError::UnknownFluid { name: "x".into() }.into();
        assert!(matches!(err, TcError::InvalidArg { .. }));
    }
}
