//! Dry-bulb sweeps at a fixed secondary measurement.
//!
//! Traces lines of constant relative humidity, dew point or wet-bulb across
//! a range of dry-bulb temperatures, the raw material of a psychrometric
//! chart. Points are independent and resolved in parallel.

use crate::error::{PsyError, PsyResult};
use crate::resolver::Resolver;
use crate::state::{MoistAirState, Secondary};
use rayon::prelude::*;
use std::fmt;
use tracing::debug;

/// Linearly spaced dry-bulb temperatures [°C].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepDefinition {
    pub start_c: f64,
    pub end_c: f64,
    pub num_points: usize,
}

impl SweepDefinition {
    pub fn new(start_c: f64, end_c: f64, num_points: usize) -> PsyResult<Self> {
        if num_points < 2 {
            return Err(PsyError::Domain {
                what: "sweep point count",
                value: num_points as f64,
                min: 2.0,
                max: f64::INFINITY,
            });
        }
        if !start_c.is_finite() || !end_c.is_finite() || (start_c - end_c).abs() < 1e-12 {
            return Err(PsyError::Domain {
                what: "sweep bounds must be finite and distinct [°C]",
                value: end_c,
                min: start_c,
                max: start_c,
            });
        }
        Ok(Self {
            start_c,
            end_c,
            num_points,
        })
    }

    /// Generate all points in the sweep.
    pub fn generate_points(&self) -> Vec<f64> {
        let delta = (self.end_c - self.start_c) / (self.num_points - 1) as f64;
        let mut points: Vec<f64> = (0..self.num_points)
            .map(|i| self.start_c + i as f64 * delta)
            .collect();

        // Ensure exact endpoint
        if let Some(last) = points.last_mut() {
            *last = self.end_c;
        }
        points
    }
}

impl fmt::Display for SweepDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Sweep dry-bulb from {} °C to {} °C ({} points)",
            self.start_c, self.end_c, self.num_points
        )
    }
}

/// Result of a dry-bulb sweep. Failed points keep their error.
#[derive(Debug, Clone)]
pub struct SweepResult {
    pub secondary: Secondary,
    pub dry_bulb_c: Vec<f64>,
    pub states: Vec<PsyResult<MoistAirState>>,
    pub num_successful: usize,
    pub num_failed: usize,
}

impl SweepResult {
    /// Successfully resolved states, in sweep order.
    pub fn resolved(&self) -> impl Iterator<Item = &MoistAirState> {
        self.states.iter().filter_map(|s| s.as_ref().ok())
    }

    /// Humidity ratio of each resolved point (failed points skipped).
    pub fn humidity_ratio(&self) -> Vec<f64> {
        self.resolved().map(MoistAirState::humidity_ratio).collect()
    }

    /// Specific enthalpy of each resolved point (failed points skipped).
    pub fn specific_enthalpy_kj_per_kg(&self) -> Vec<f64> {
        self.resolved()
            .map(MoistAirState::specific_enthalpy_kj_per_kg)
            .collect()
    }
}

/// Resolve every point of `sweep` at pressure `p_kpa` with the same
/// secondary measurement.
pub fn sweep_dry_bulb(
    resolver: &Resolver,
    p_kpa: f64,
    sweep: &SweepDefinition,
    secondary: Secondary,
) -> SweepResult {
    let dry_bulb_c = sweep.generate_points();
    let states: Vec<PsyResult<MoistAirState>> = dry_bulb_c
        .par_iter()
        .map(|&t_db_c| resolver.resolve(p_kpa, t_db_c, Some(secondary)))
        .collect();

    let num_failed = states.iter().filter(|s| s.is_err()).count();
    let num_successful = states.len() - num_failed;
    debug!(%sweep, num_successful, num_failed, "sweep finished");

    SweepResult {
        secondary,
        dry_bulb_c,
        states,
        num_successful,
        num_failed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn linear_sweep_generation() {
        let sweep = SweepDefinition::new(0.0, 40.0, 5).unwrap();
        let points = sweep.generate_points();
        assert_eq!(points.len(), 5);
        assert!((points[0] - 0.0).abs() < 1e-12);
        assert!((points[2] - 20.0).abs() < 1e-12);
        assert_eq!(points[4], 40.0);
    }

    #[test]
    fn reject_invalid_point_count() {
        let err = SweepDefinition::new(0.0, 40.0, 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Domain);
    }

    #[test]
    fn reject_identical_bounds() {
        assert!(SweepDefinition::new(20.0, 20.0, 5).is_err());
        assert!(SweepDefinition::new(f64::NAN, 20.0, 5).is_err());
    }

    #[test]
    fn constant_rh_line_rises_with_dry_bulb() {
        let sweep = SweepDefinition::new(0.0, 40.0, 9).unwrap();
        let result = sweep_dry_bulb(
            &Resolver::default(),
            101.325,
            &sweep,
            Secondary::RelativeHumidity(0.5),
        );
        assert_eq!(result.num_successful, 9);
        assert_eq!(result.num_failed, 0);
        let w = result.humidity_ratio();
        assert!(w.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(result.specific_enthalpy_kj_per_kg().len(), 9);
    }

    #[test]
    fn constant_dew_point_line_fails_below_dew_point() {
        let sweep = SweepDefinition::new(0.0, 30.0, 4).unwrap();
        let result = sweep_dry_bulb(
            &Resolver::default(),
            101.325,
            &sweep,
            Secondary::DewPoint(15.0),
        );
        // 0 °C and 10 °C lie below the dew point.
        assert_eq!(result.num_failed, 2);
        assert_eq!(result.num_successful, 2);
        assert!(result.states[0].is_err());
        assert!(result.resolved().all(|s| s.dew_point_c() == 15.0));
        // Same moisture content everywhere on the line.
        let w = result.humidity_ratio();
        assert!((w[0] - w[1]).abs() < 1e-15);
    }
}
