//! Overflow-checked address arithmetic shared by every walk over a transfer
//! list. Grounded on `math_utils.h`'s `add_overflow`/`round_up_overflow`/
//! `add_with_round_up_overflow` macros, expressed as `Option`-returning
//! functions instead of out-parameters.

/// Adds `a` and `b`, returning `None` on overflow.
#[inline]
#[must_use]
pub fn add_overflow(a: usize, b: usize) -> Option<usize> {
    a.checked_add(b)
}

/// `value % boundary == 0`. `boundary` must be a power of two.
#[inline]
#[must_use]
pub fn is_aligned(value: usize, boundary: usize) -> bool {
    value & (boundary - 1) == 0
}

/// Rounds `value` up to the nearest multiple of `boundary` (a power of two),
/// returning `None` on overflow.
#[inline]
#[must_use]
pub fn round_up_overflow(value: usize, boundary: usize) -> Option<usize> {
    let mask = boundary - 1;
    let bumped = add_overflow(value, mask)?;
    Some(bumped & !mask)
}

/// Adds `a` and `b`, then rounds the sum up to the nearest multiple of
/// `boundary`, returning `None` on overflow in either step.
#[inline]
#[must_use]
pub fn add_with_round_up_overflow(a: usize, b: usize, boundary: usize) -> Option<usize> {
    round_up_overflow(add_overflow(a, b)?, boundary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_overflow_detects_wrap() {
        assert_eq!(add_overflow(2, 3), Some(5));
        assert_eq!(add_overflow(usize::MAX, 1), None);
    }

    #[test]
    fn is_aligned_checks_power_of_two_boundary() {
        assert!(is_aligned(0, 8));
        assert!(is_aligned(16, 8));
        assert!(!is_aligned(9, 8));
    }

    #[test]
    fn round_up_overflow_rounds_to_granule() {
        assert_eq!(round_up_overflow(1, 8), Some(8));
        assert_eq!(round_up_overflow(8, 8), Some(8));
        assert_eq!(round_up_overflow(9, 8), Some(16));
        assert_eq!(round_up_overflow(usize::MAX - 1, 8), None);
    }

    #[test]
    fn add_with_round_up_overflow_combines_both_steps() {
        assert_eq!(add_with_round_up_overflow(3, 4, 8), Some(8));
        assert_eq!(add_with_round_up_overflow(usize::MAX, 1, 8), None);
    }
}
