// Scalar helpers for axis and fire values

/// Clamp an axis value into `[-1.0, 1.0]`
///
/// NaN reads as neutral so a broken analog source never poisons an axis sum.
pub fn clamp_axis(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(-1.0, 1.0)
    }
}

/// Fire contributions count as active only when strictly positive
pub fn is_active(value: f64) -> bool {
    value > 0.0
}

/// Check if two f64 values are approximately equal
pub fn approx_equal(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_axis() {
        assert_eq!(clamp_axis(0.5), 0.5);
        assert_eq!(clamp_axis(-3.0), -1.0);
        assert_eq!(clamp_axis(7.0), 1.0);
    }

    #[test]
    fn test_clamp_axis_nan_is_neutral() {
        assert_eq!(clamp_axis(f64::NAN), 0.0);
    }

    #[test]
    fn test_is_active() {
        assert!(is_active(1.0));
        assert!(is_active(0.001));
        assert!(!is_active(0.0));
        assert!(!is_active(-1.0));
    }

    #[test]
    fn test_approx_equal() {
        assert!(approx_equal(1.0, 1.00001, 0.0001));
        assert!(!approx_equal(1.0, 1.1, 0.01));
    }
}
