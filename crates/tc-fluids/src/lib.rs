//! tc-fluids: working-fluid constants for thermocycle.
//!
//! Provides:
//! - `FluidProperties`: the four ideal-gas constants (R, γ, cp, cv) of one fluid
//! - a compiled-in, read-only property table with case-insensitive lookup
//!
//! # Example
//!
//! ```
//! use tc_fluids::lookup;
//!
//! let air = lookup("Air").unwrap();
//! assert_eq!(air.gamma, 1.4);
//! assert!(lookup("unobtainium").is_err());
//! ```

pub mod error;
pub mod properties;
pub mod table;

pub use error::{FluidError, FluidResult};
pub use properties::FluidProperties;
pub use table::{filter_fluids, fluids, lookup};
