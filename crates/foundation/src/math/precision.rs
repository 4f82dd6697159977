//! Deterministic float ordering.
//!
//! Used to canonicalize arguments of symmetric distances and to build
//! coordinate cache keys.

use core::cmp::Ordering;

/// Canonicalize a floating-point value for deterministic ordering.
///
/// Rules:
/// - `-0.0` becomes `0.0`
/// - all NaNs become a single canonical NaN
pub fn canonical_f64(v: f64) -> f64 {
    if v == 0.0 {
        // Handles +0.0 and -0.0.
        0.0
    } else if v.is_nan() {
        f64::NAN
    } else {
        v
    }
}

/// Deterministic total ordering for floats.
///
/// Prefer this any time you sort floats or use them in ordered keys.
pub fn stable_total_cmp_f64(a: f64, b: f64) -> Ordering {
    canonical_f64(a).total_cmp(&canonical_f64(b))
}

/// Quantizes degrees to integer micro-degrees, suitable as a hash key.
pub fn micro_degrees(v: f64) -> i64 {
    (canonical_f64(v) * 1e6).round() as i64
}

#[cfg(test)]
mod tests {
    use super::{canonical_f64, micro_degrees, stable_total_cmp_f64};
    use core::cmp::Ordering;

    #[test]
    fn canonicalizes_negative_zero() {
        assert_eq!(canonical_f64(-0.0), 0.0);
        assert_eq!(canonical_f64(0.0), 0.0);
        assert_eq!(stable_total_cmp_f64(-0.0, 0.0), Ordering::Equal);
    }

    #[test]
    fn stable_cmp_is_total_and_deterministic() {
        assert_eq!(stable_total_cmp_f64(1.0, 2.0), Ordering::Less);
        assert_eq!(stable_total_cmp_f64(f64::NAN, f64::NAN), Ordering::Equal);
    }

    #[test]
    fn micro_degrees_rounds_to_nearest() {
        assert_eq!(micro_degrees(28.6), 28_600_000);
        assert_eq!(micro_degrees(-0.0000004), 0);
        assert_eq!(micro_degrees(77.2000006), 77_200_001);
    }
}
