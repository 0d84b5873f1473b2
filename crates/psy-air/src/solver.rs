//! Bracketed bisection for the implicit temperature solves.

use crate::error::{PsyError, PsyResult};
use tracing::trace;

/// Bisection configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BracketConfig {
    /// Maximum bisection steps
    pub max_iterations: usize,
    /// Absolute tolerance on the residual
    pub abs_tol: f64,
    /// Tolerance on the half-width of the bracket
    pub x_tol: f64,
}

impl Default for BracketConfig {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            abs_tol: 1e-12,
            x_tol: 1e-9,
        }
    }
}

/// Located root.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Root {
    /// Abscissa of the root
    pub x: f64,
    /// Residual at `x`
    pub residual: f64,
    /// Bisection steps taken
    pub iterations: usize,
}

/// Find `x` in `[lo, hi]` with `f(x) ≈ 0`.
///
/// `f(lo)` and `f(hi)` must have opposite signs (or one of them be within
/// `abs_tol` of zero). Errors from `f` propagate unchanged.
pub fn bisect<F>(
    what: &'static str,
    lo: f64,
    hi: f64,
    f: F,
    config: &BracketConfig,
) -> PsyResult<Root>
where
    F: Fn(f64) -> PsyResult<f64>,
{
    let (mut lo, mut hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };

    let mut f_lo = f(lo)?;
    if f_lo.abs() <= config.abs_tol {
        return Ok(Root {
            x: lo,
            residual: f_lo,
            iterations: 0,
        });
    }
    let f_hi = f(hi)?;
    if f_hi.abs() <= config.abs_tol {
        return Ok(Root {
            x: hi,
            residual: f_hi,
            iterations: 0,
        });
    }
    if (f_lo < 0.0) == (f_hi < 0.0) {
        return Err(PsyError::ConvergenceFailed {
            what,
            iterations: 0,
            residual: f_lo.abs().min(f_hi.abs()),
        });
    }

    let mut f_mid = f_lo;
    for iter in 1..=config.max_iterations {
        let mid = 0.5 * (lo + hi);
        f_mid = f(mid)?;
        trace!(what, iter, x = mid, residual = f_mid, "bisection step");

        if f_mid.abs() <= config.abs_tol || 0.5 * (hi - lo) <= config.x_tol {
            return Ok(Root {
                x: mid,
                residual: f_mid,
                iterations: iter,
            });
        }

        if (f_mid < 0.0) == (f_lo < 0.0) {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
        }
    }

    Err(PsyError::ConvergenceFailed {
        what,
        iterations: config.max_iterations,
        residual: f_mid.abs(),
    })
}
