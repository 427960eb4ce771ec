//! Tolerance-based answer comparison.
//!
//! Two normalized answers are equivalent when they are within an absolute
//! epsilon of each other, or failing that, within a relative epsilon of the
//! larger magnitude. The scale floors at 1 so sub-unit answers are held to
//! the absolute-ish bound rather than a looser relative one.

/// Differences at or below this are always equal, whatever the magnitude.
pub const ABS_EPSILON: f64 = 1e-6;

/// Allowed difference as a fraction of `max(1, |expected|, |actual|)`.
pub const REL_EPSILON: f64 = 1e-4;

/// Decide whether `actual` matches `expected`.
///
/// Both inputs are expected to be finite, as produced by
/// [`parse_numeric`](crate::answer::parse_numeric). The result is symmetric
/// in its arguments.
pub fn is_nearly_equal(expected: f64, actual: f64) -> bool {
    let diff = (expected - actual).abs();
    if diff <= ABS_EPSILON {
        return true;
    }
    let scale = 1.0_f64.max(expected.abs()).max(actual.abs());
    diff / scale <= REL_EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn within_absolute_epsilon() {
        assert!(is_nearly_equal(10.0, 10.000_000_1));
        assert!(is_nearly_equal(0.0, 0.000_000_05));
        assert!(is_nearly_equal(0.0, 0.0));
        assert!(is_nearly_equal(-3.5, -3.5));
    }

    #[test]
    fn same_gap_depends_on_scale() {
        assert!(is_nearly_equal(10_000.0, 10_000.5));
        assert!(!is_nearly_equal(1.0, 1.5));
    }

    #[test]
    fn small_values_do_not_get_loose_tolerance() {
        assert!(!is_nearly_equal(0.0, 0.001));
        assert!(!is_nearly_equal(0.01, 0.011));
    }

    #[test]
    fn relative_bound_at_large_magnitude() {
        // 1e6 * 1e-4 = 100
        assert!(is_nearly_equal(1_000_000.0, 1_000_090.0));
        assert!(!is_nearly_equal(1_000_000.0, 1_000_200.0));
    }

    #[test]
    fn sign_matters() {
        assert!(!is_nearly_equal(5.0, -5.0));
        assert!(!is_nearly_equal(0.75, -0.75));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(500))]

            #[test]
            fn prop_symmetric(a in -1.0e12f64..1.0e12, b in -1.0e12f64..1.0e12) {
                prop_assert_eq!(is_nearly_equal(a, b), is_nearly_equal(b, a));
            }

            #[test]
            fn prop_reflexive(a in -1.0e12f64..1.0e12) {
                prop_assert!(is_nearly_equal(a, a));
            }
        }
    }
}
