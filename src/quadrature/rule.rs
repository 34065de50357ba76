//! QuadratureRule — discrete approximation of an ability distribution.
//!
//! Purpose
//! -------
//! Hold an ordered set of `(point, weight)` pairs used to integrate the
//! linking criteria over a form's ability distribution.
//!
//! Invariants & assumptions
//! ------------------------
//! - At least one point; points finite; weights finite and `≥ 0`.
//! - Weights need not sum to one. Consumers normalize explicitly and the
//!   descriptive accessors divide by the weight sum.
//! - Immutable after construction.
use statrs::distribution::{Continuous, Normal};

use crate::quadrature::errors::{QuadratureError, QuadratureResult};

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuadratureRule {
    points: Vec<f64>,
    weights: Vec<f64>,
}

impl QuadratureRule {
    /// Equal weights `1/n` on `n` evenly spaced points spanning `[min, max]`.
    ///
    /// # Errors
    /// [`QuadratureError::Empty`] for `n == 0`, [`QuadratureError::InvalidRange`]
    /// for non-finite bounds or `min >= max` with `n > 1`.
    pub fn uniform(min: f64, max: f64, n: usize) -> QuadratureResult<Self> {
        let points = evenly_spaced(min, max, n)?;
        let weights = vec![1.0 / n as f64; n];
        Ok(Self { points, weights })
    }

    /// Normal density at `n` evenly spaced points on `[min, max]`,
    /// normalized to sum to one.
    ///
    /// # Errors
    /// As [`uniform`](Self::uniform), plus [`QuadratureError::InvalidDistribution`]
    /// when `statrs` rejects `(mean, sd)`.
    pub fn normal(min: f64, max: f64, n: usize, mean: f64, sd: f64) -> QuadratureResult<Self> {
        let dist = Normal::new(mean, sd)
            .map_err(|e| QuadratureError::InvalidDistribution { reason: e.to_string() })?;
        let points = evenly_spaced(min, max, n)?;
        let density: Vec<f64> = points.iter().map(|&x| dist.pdf(x)).collect();
        let total: f64 = density.iter().sum();
        let weights = if total > 0.0 { density.iter().map(|w| w / total).collect() } else { density };
        Ok(Self { points, weights })
    }

    /// Caller-supplied points and weights, kept as given.
    ///
    /// # Errors
    /// [`QuadratureError::Empty`], [`QuadratureError::LengthMismatch`],
    /// [`QuadratureError::NonFinitePoint`], [`QuadratureError::InvalidWeight`].
    pub fn user_supplied(points: Vec<f64>, weights: Vec<f64>) -> QuadratureResult<Self> {
        if points.is_empty() {
            return Err(QuadratureError::Empty);
        }
        if points.len() != weights.len() {
            return Err(QuadratureError::LengthMismatch {
                points: points.len(),
                weights: weights.len(),
            });
        }
        for (index, &value) in points.iter().enumerate() {
            if !value.is_finite() {
                return Err(QuadratureError::NonFinitePoint { index, value });
            }
        }
        for (index, &value) in weights.iter().enumerate() {
            if !value.is_finite() || value < 0.0 {
                return Err(QuadratureError::InvalidWeight { index, value });
            }
        }
        Ok(Self { points, weights })
    }

    pub fn points(&self) -> &[f64] {
        &self.points
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn total_weight(&self) -> f64 {
        self.weights.iter().sum()
    }

    /// Weights divided by their sum; `None` when the sum is zero.
    pub fn normalized_weights(&self) -> Option<Vec<f64>> {
        let total = self.total_weight();
        if total > 0.0 { Some(self.weights.iter().map(|w| w / total).collect()) } else { None }
    }

    /// Weighted mean of the points; `NaN` for zero total weight.
    pub fn mean(&self) -> f64 {
        let total = self.total_weight();
        if total <= 0.0 {
            return f64::NAN;
        }
        self.points.iter().zip(&self.weights).map(|(x, w)| x * w).sum::<f64>() / total
    }

    /// Weighted population standard deviation; `NaN` for zero total weight.
    pub fn standard_deviation(&self) -> f64 {
        let total = self.total_weight();
        if total <= 0.0 {
            return f64::NAN;
        }
        let m = self.mean();
        let var =
            self.points.iter().zip(&self.weights).map(|(x, w)| w * (x - m).powi(2)).sum::<f64>()
                / total;
        var.sqrt()
    }
}

fn evenly_spaced(min: f64, max: f64, n: usize) -> QuadratureResult<Vec<f64>> {
    if n == 0 {
        return Err(QuadratureError::Empty);
    }
    if !min.is_finite() || !max.is_finite() || (n > 1 && min >= max) {
        return Err(QuadratureError::InvalidRange { min, max });
    }
    if n == 1 {
        return Ok(vec![min]);
    }
    let step = (max - min) / (n - 1) as f64;
    Ok((0..n).map(|i| if i == n - 1 { max } else { min + step * i as f64 }).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Uniform points are evenly spaced, end exactly at `max`, and carry
    // equal weights.
    fn uniform_rule_is_evenly_spaced() {
        // Arrange / Act
        let rule = QuadratureRule::uniform(-4.0, 4.0, 10).expect("valid rule");

        // Assert
        assert_eq!(rule.len(), 10);
        assert_eq!(rule.points()[0], -4.0);
        assert_eq!(rule.points()[9], 4.0);
        approx::assert_abs_diff_eq!(rule.points()[1], -4.0 + 8.0 / 9.0, epsilon = 1e-15);
        approx::assert_abs_diff_eq!(rule.total_weight(), 1.0, epsilon = 1e-15);
        approx::assert_abs_diff_eq!(rule.mean(), 0.0, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // A dense normal rule recovers the mean and standard deviation.
    fn normal_rule_recovers_moments() {
        let rule = QuadratureRule::normal(-6.0, 8.0, 141, 1.0, 1.5).expect("valid rule");
        approx::assert_abs_diff_eq!(rule.total_weight(), 1.0, epsilon = 1e-12);
        approx::assert_abs_diff_eq!(rule.mean(), 1.0, epsilon = 1e-4);
        approx::assert_abs_diff_eq!(rule.standard_deviation(), 1.5, epsilon = 1e-3);
    }

    #[test]
    // Purpose
    // -------
    // User weights are not renormalized, but moments divide by their sum.
    fn user_supplied_weights_are_kept_as_given() {
        // Arrange
        let rule = QuadratureRule::user_supplied(vec![-1.0, 0.0, 1.0], vec![2.0, 4.0, 2.0])
            .expect("valid rule");

        // Act / Assert
        assert_eq!(rule.total_weight(), 8.0);
        assert_eq!(rule.mean(), 0.0);
        approx::assert_abs_diff_eq!(rule.standard_deviation(), 0.5f64.sqrt(), epsilon = 1e-15);
        assert_eq!(rule.normalized_weights(), Some(vec![0.25, 0.5, 0.25]));
    }

    #[test]
    // Purpose
    // -------
    // Zero total weight is allowed and yields NaN moments.
    fn zero_weight_rule_has_nan_moments() {
        let rule = QuadratureRule::user_supplied(vec![0.0, 1.0], vec![0.0, 0.0]).expect("valid");
        assert!(rule.mean().is_nan());
        assert!(rule.standard_deviation().is_nan());
        assert_eq!(rule.normalized_weights(), None);
    }

    #[test]
    // Purpose
    // -------
    // Construction rejects malformed inputs.
    fn invalid_inputs_are_rejected() {
        assert_eq!(QuadratureRule::uniform(0.0, 1.0, 0), Err(QuadratureError::Empty));
        assert!(matches!(
            QuadratureRule::uniform(1.0, -1.0, 5),
            Err(QuadratureError::InvalidRange { .. })
        ));
        assert!(matches!(
            QuadratureRule::user_supplied(vec![0.0], vec![-0.1]),
            Err(QuadratureError::InvalidWeight { index: 0, .. })
        ));
        assert!(matches!(
            QuadratureRule::user_supplied(vec![0.0, 1.0], vec![1.0]),
            Err(QuadratureError::LengthMismatch { points: 2, weights: 1 })
        ));
        assert!(matches!(
            QuadratureRule::normal(-4.0, 4.0, 5, 0.0, -1.0),
            Err(QuadratureError::InvalidDistribution { .. })
        ));
    }
}
