//! psy-core: stable foundation for psychroflow.
//!
//! Contains:
//! - units (uom SI types + constructors, Celsius/Kelvin shift)
//! - numeric (Real, finite checks, bound snapping)
//! - parse (unit-tagged text input, canonical kPa / °C / fraction)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod parse;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use numeric::*;
pub use parse::{Quantity, UnitError, parse_quantity};
pub use units::*;
