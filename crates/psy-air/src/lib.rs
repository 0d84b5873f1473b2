//! psy-air: moist-air (psychrometric) properties for psychroflow.
//!
//! Provides:
//! - ASHRAE correlations (saturation pressure, humidity ratio, enthalpy, ...)
//! - Standard-atmosphere pressure and temperature from altitude
//! - The state resolver: pressure + dry-bulb + one of wet-bulb, dew point or
//!   relative humidity -> a complete, invariant-checked [`MoistAirState`]
//! - Parallel dry-bulb sweeps for chart lines
//!
//! # Units
//!
//! Pressure in kPa, temperature in °C, humidity ratio in kg/kg dry air,
//! specific volume in m³/kg dry air, specific enthalpy in kJ/kg dry air,
//! relative humidity and degree of saturation as 0-1 fractions.
//!
//! # Example
//!
//! ```
//! use psy_air::resolve_from_relative_humidity;
//!
//! let state = resolve_from_relative_humidity(101.325, 25.0, 0.5).unwrap();
//! assert!((state.humidity_ratio() - 0.00988).abs() < 1e-4);
//! assert!(state.dew_point_c() < state.wet_bulb_c());
//! ```

pub mod atmosphere;
pub mod correlations;
pub mod error;
pub mod estimate;
pub mod resolver;
pub mod solver;
pub mod state;
pub mod sweep;

// Re-exports for ergonomics
pub use atmosphere::{standard_atmosphere_pressure, standard_atmosphere_temperature};
pub use error::{ErrorKind, PsyError, PsyResult, ResolveStep};
pub use estimate::{estimate_dew_point_from_wet_bulb, estimate_wet_bulb_from_dew_point};
pub use psy_core::units::{celsius_to_kelvin, kelvin_to_celsius};
pub use resolver::{
    Resolver, ResolverConfig, resolve_from_dew_point, resolve_from_relative_humidity,
    resolve_from_wet_bulb, resolve_saturated,
};
pub use solver::{BracketConfig, Root};
pub use state::{MoistAirState, Secondary};
pub use sweep::{SweepDefinition, SweepResult, sweep_dry_bulb};
