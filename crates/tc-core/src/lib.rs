//! tc-core: stable foundation for thermocycle.
//!
//! Contains:
//! - units (uom SI types + constructors in the engine's fixed units)
//! - numeric (Real + tolerances + float helpers)
//! - ids (compact vertex/leg identifiers)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

pub use error::{TcError, TcResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
