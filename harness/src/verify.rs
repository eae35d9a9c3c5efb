//! Bitwise-strict output comparison.
//!
//! Two values are equal when `a == b`, or when both are NaN. This is the
//! array semantics of NumPy's `assert_equal` and of `operator==` on double
//! vectors in C++, so `0.0` and `-0.0` compare equal.
//!
//! Exact equality only holds when every strategy performs the same IEEE
//! operations in the same order. A backend that fuses `x * x + y * y` into
//! an FMA, or uses its own `atan2`, will fail here even though its results
//! are within an ulp.

use crate::error::MismatchError;

#[inline]
fn same(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

/// Fails on the first differing element.
pub fn assert_equal(reference: &[f64], candidate: &[f64]) -> Result<(), MismatchError> {
    if reference.len() != candidate.len() {
        return Err(MismatchError::Length {
            expected: reference.len(),
            actual: candidate.len(),
        });
    }

    match reference
        .iter()
        .zip(candidate)
        .position(|(&a, &b)| !same(a, b))
    {
        Some(index) => Err(MismatchError::Value {
            index,
            expected: reference[index],
            actual: candidate[index],
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_sequences_pass() {
        let a = [1.0, -2.5, 3.25];
        assert_eq!(assert_equal(&a, &a), Ok(()));
    }

    #[test]
    fn empty_sequences_pass() {
        assert_eq!(assert_equal(&[], &[]), Ok(()));
    }

    #[test]
    fn reports_first_difference() {
        let a = [1.0, 2.0, 3.0, 4.0];
        let b = [1.0, 2.0, 3.5, 4.5];
        assert_eq!(
            assert_equal(&a, &b),
            Err(MismatchError::Value {
                index: 2,
                expected: 3.0,
                actual: 3.5
            })
        );
    }

    #[test]
    fn one_ulp_is_a_mismatch() {
        let a = [1.0];
        let b = [f64::from_bits(1.0f64.to_bits() + 1)];
        assert_eq!(assert_equal(&a, &b).unwrap_err().index(), Some(0));
    }

    #[test]
    fn nan_matches_nan_in_same_slot() {
        assert!(assert_equal(&[f64::NAN, 1.0], &[f64::NAN, 1.0]).is_ok());
        assert!(assert_equal(&[f64::NAN], &[1.0]).is_err());
        assert!(assert_equal(&[1.0], &[f64::NAN]).is_err());
    }

    #[test]
    fn signed_zeros_match() {
        assert!(assert_equal(&[0.0], &[-0.0]).is_ok());
    }

    #[test]
    fn length_difference_is_reported() {
        assert_eq!(
            assert_equal(&[1.0, 2.0], &[1.0]),
            Err(MismatchError::Length {
                expected: 2,
                actual: 1
            })
        );
    }
}
