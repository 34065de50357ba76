//! Numerical stability utilities.
//!
//! Provides safe implementations of the nonlinear transforms used by the
//! item response models and the linking criteria that are prone to
//! overflow/underflow in naïve form.
//!
//! # Provided items
//! - [`LINKING_PENALTY`]: finite stand-in for non-finite criterion values.
//! - [`safe_logistic(x)`]: stable `1 / (1 + exp(-x))`.
//! - [`normalize_exponents`]: max-shifted softmax over category exponents.
//! - [`round_to(x, digits)`]: decimal rounding of reported coefficients.

/// Value returned by linking criteria whenever an intermediate quantity is
/// non-finite. Large enough to dominate any attainable criterion value
/// while staying finite for line searches.
pub const LINKING_PENALTY: f64 = 1e12;

/// Numerically stable logistic: `σ(x) = 1 / (1 + exp(-x))`.
///
/// Uses the branch that keeps the exponent non-positive, so neither tail
/// overflows:
///
/// - `x ≥ 0`: `1 / (1 + exp(-x))`
/// - `x < 0`: `exp(x) / (1 + exp(x))`
pub fn safe_logistic(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Turn category exponents `z_k` into probabilities `exp(z_k) / Σ exp(z_j)`
/// in-place.
///
/// The maximum exponent is subtracted before exponentiation. Inputs that
/// are all `-∞` or contain `NaN` produce `NaN` entries; callers decide how
/// to report that.
pub fn normalize_exponents(z: &mut [f64]) {
    let max = z.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let mut total = 0.0;
    for v in z.iter_mut() {
        *v = (*v - max).exp();
        total += *v;
    }
    for v in z.iter_mut() {
        *v /= total;
    }
}

/// Round `x` half away from zero to `digits` decimal places.
///
/// Non-finite inputs are returned unchanged.
pub fn round_to(x: f64, digits: u32) -> f64 {
    if !x.is_finite() {
        return x;
    }
    let scale = 10f64.powi(digits as i32);
    (x * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // The stable logistic agrees with the naïve formula where the latter is
    // safe and saturates cleanly in the tails.
    fn safe_logistic_matches_naive_and_saturates() {
        for &x in &[-5.0_f64, -0.5, 0.0, 0.7, 4.0] {
            approx::assert_abs_diff_eq!(safe_logistic(x), 1.0 / (1.0 + (-x).exp()));
        }
        assert_eq!(safe_logistic(-1000.0), 0.0);
        assert_eq!(safe_logistic(1000.0), 1.0);
        approx::assert_abs_diff_eq!(safe_logistic(2.0) + safe_logistic(-2.0), 1.0);
    }

    #[test]
    // Purpose
    // -------
    // Large exponents normalize without overflow and keep their ratios.
    fn normalize_exponents_sums_to_one_for_large_inputs() {
        // Arrange
        let mut z = [800.0, 801.0, 799.0];

        // Act
        normalize_exponents(&mut z);

        // Assert
        approx::assert_abs_diff_eq!(z.iter().sum::<f64>(), 1.0, epsilon = 1e-15);
        approx::assert_abs_diff_eq!(z[1] / z[0], std::f64::consts::E, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Rounding keeps the requested number of decimals.
    fn round_to_keeps_requested_digits() {
        assert_eq!(round_to(1.234_567_89, 4), 1.2346);
        assert_eq!(round_to(-0.000_049, 4), -0.0);
        assert!(round_to(f64::NAN, 3).is_nan());
    }
}
