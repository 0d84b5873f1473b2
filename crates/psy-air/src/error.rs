//! Psychrometric errors.

use psy_core::CoreError;
use std::fmt;
use thiserror::Error;

/// Result type for psychrometric operations.
pub type PsyResult<T> = Result<T, PsyError>;

/// Coarse classification of a failure, independent of where it was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An input lies outside a correlation's validated range.
    Domain,
    /// In-range inputs that jointly violate a physical ordering.
    PhysicalImpossibility,
    /// The iterative search did not meet tolerance within its budget.
    Convergence,
}

/// Derivation step of a resolution, attached to errors raised inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveStep {
    Inputs,
    SaturationLine,
    WetBulbSaturation,
    HumidityRatio,
    DegreeOfSaturation,
    RelativeHumidity,
    VaporPressure,
    DewPoint,
    WetBulbSearch,
    Invariants,
}

impl fmt::Display for ResolveStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Inputs => "input validation",
            Self::SaturationLine => "saturation line",
            Self::WetBulbSaturation => "saturation at wet-bulb",
            Self::HumidityRatio => "humidity ratio",
            Self::DegreeOfSaturation => "degree of saturation",
            Self::RelativeHumidity => "relative humidity",
            Self::VaporPressure => "vapor pressure",
            Self::DewPoint => "dew point",
            Self::WetBulbSearch => "wet-bulb search",
            Self::Invariants => "invariant check",
        };
        f.write_str(label)
    }
}

/// Errors that can occur during psychrometric calculations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PsyError {
    /// Input outside the validated range of a correlation.
    #[error("{what} = {value} is outside the valid range [{min}, {max}]")]
    Domain {
        what: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Physical ordering violated (partial pressure above total, etc.).
    #[error("Physically impossible: {what} ({value} exceeds {limit})")]
    PhysicalImpossibility {
        what: &'static str,
        value: f64,
        limit: f64,
    },

    /// Iterative solve did not converge.
    #[error("Convergence failed for {what} after {iterations} iterations (residual {residual:e})")]
    ConvergenceFailed {
        what: &'static str,
        iterations: usize,
        residual: f64,
    },

    #[error(transparent)]
    Core(#[from] CoreError),

    /// Failure raised inside a resolution, tagged with the step that produced it.
    #[error("{step}: {source}")]
    Resolve {
        step: ResolveStep,
        #[source]
        source: Box<PsyError>,
    },
}

impl PsyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain { .. } | Self::Core(_) => ErrorKind::Domain,
            Self::PhysicalImpossibility { .. } => ErrorKind::PhysicalImpossibility,
            Self::ConvergenceFailed { .. } => ErrorKind::Convergence,
            Self::Resolve { source, .. } => source.kind(),
        }
    }

    /// Outermost derivation step, if raised during a resolution.
    pub fn step(&self) -> Option<ResolveStep> {
        match self {
            Self::Resolve { step, .. } => Some(*step),
            _ => None,
        }
    }

    /// The underlying error with any step annotations removed.
    pub fn root(&self) -> &PsyError {
        match self {
            Self::Resolve { source, .. } => source.root(),
            other => other,
        }
    }

    pub(crate) fn at(self, step: ResolveStep) -> Self {
        Self::Resolve {
            step,
            source: Box::new(self),
        }
    }
}

/// Attach a [`ResolveStep`] to the error side of a result.
pub(crate) trait StepContext<T> {
    fn at(self, step: ResolveStep) -> PsyResult<T>;
}

impl<T, E: Into<PsyError>> StepContext<T> for Result<T, E> {
    fn at(self, step: ResolveStep) -> PsyResult<T> {
        self.map_err(|e| e.into().at(step))
    }
}
