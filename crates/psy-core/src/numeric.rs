use crate::{CoreError, CoreResult};

/// Floating point type used throughout system
pub type Real = f64;

pub fn ensure_finite(v: Real, what: &'static str) -> CoreResult<Real> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Pull `v` onto `[lo, hi]` when it overshoots by no more than `slack`.
///
/// Returns `None` if the overshoot is larger than `slack` or `v` is NaN.
pub fn snap_into(v: Real, lo: Real, hi: Real, slack: Real) -> Option<Real> {
    if v.is_nan() {
        None
    } else if v < lo {
        (lo - v <= slack).then_some(lo)
    } else if v > hi {
        (v - hi <= slack).then_some(hi)
    } else {
        Some(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_finite_rejects_nan_and_infinity() {
        let err = ensure_finite(Real::NAN, "dry-bulb").unwrap_err();
        assert!(err.to_string().contains("dry-bulb"));
        assert!(ensure_finite(Real::NEG_INFINITY, "pressure").is_err());
        assert_eq!(ensure_finite(-40.0, "dry-bulb").unwrap(), -40.0);
    }

    #[test]
    fn snap_into_respects_slack() {
        assert_eq!(snap_into(0.5, 0.0, 1.0, 1e-6), Some(0.5));
        assert_eq!(snap_into(1.0 + 1e-9, 0.0, 1.0, 1e-6), Some(1.0));
        assert_eq!(snap_into(-1e-9, 0.0, 1.0, 1e-6), Some(0.0));
        assert_eq!(snap_into(1.1, 0.0, 1.0, 1e-6), None);
        assert_eq!(snap_into(Real::NAN, 0.0, 1.0, 1e-6), None);
    }

    #[test]
    fn snap_into_open_upper_bound() {
        assert_eq!(snap_into(5.0, 0.0, Real::INFINITY, 1e-6), Some(5.0));
        assert_eq!(snap_into(-2e-7, 0.0, Real::INFINITY, 1e-6), Some(0.0));
    }
}
