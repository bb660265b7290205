//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Truncate a non-negative f64 sample to a count, saturating at `usize::MAX`.
/// Returns 0 for NaN and negative values.
#[must_use]
pub fn f64_to_count(value: f64) -> usize {
    if value.is_nan() || value <= 0.0 {
        return 0;
    }
    cast::<f64, usize>(value.trunc()).unwrap_or(usize::MAX)
}

/// Convert a whole number of hours to f64 for reward arithmetic.
#[must_use]
pub fn hours_to_f64(hours: u32) -> f64 {
    f64::from(hours)
}

/// Narrow a `usize` index to `u8`, returning `None` when it does not fit.
#[must_use]
pub fn index_to_u8(value: usize) -> Option<u8> {
    cast::<usize, u8>(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_truncates_and_handles_non_finite() {
        assert_eq!(f64_to_count(3.9), 3);
        assert_eq!(f64_to_count(0.0), 0);
        assert_eq!(f64_to_count(-2.0), 0);
        assert_eq!(f64_to_count(f64::NAN), 0);
        assert_eq!(f64_to_count(f64::INFINITY), usize::MAX);
    }

    #[test]
    fn index_narrowing_rejects_overflow() {
        assert_eq!(index_to_u8(7), Some(7));
        assert_eq!(index_to_u8(255), Some(255));
        assert_eq!(index_to_u8(256), None);
    }

    #[test]
    fn hours_convert_exactly() {
        assert!((hours_to_f64(11) - 11.0).abs() < f64::EPSILON);
    }
}
