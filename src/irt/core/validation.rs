//! Validation helpers for item construction and parameter vectors.
//!
//! - [`validate_ncat`]: at least two categories.
//! - [`validate_scaling_constant`]: D finite and strictly positive.
//! - [`validate_params`]: length and finiteness of a parameter vector.
//! - [`validate_score_weights`]: length, finiteness, and monotonicity.
//! - [`validate_boundary_order`]: non-decreasing category boundaries.
use crate::irt::errors::{IrmError, IrmResult};
use ndarray::ArrayView1;

/// # Errors
/// [`IrmError::InvalidCategoryCount`] when `ncat < 2`.
pub fn validate_ncat(ncat: usize) -> IrmResult<()> {
    if ncat < 2 {
        return Err(IrmError::InvalidCategoryCount { ncat });
    }
    Ok(())
}

/// # Errors
/// [`IrmError::InvalidScalingConstant`] for non-finite or non-positive `d`.
pub fn validate_scaling_constant(d: f64) -> IrmResult<()> {
    if !d.is_finite() || d <= 0.0 {
        return Err(IrmError::InvalidScalingConstant { value: d });
    }
    Ok(())
}

/// Check a parameter vector against the expected length and for finite
/// entries.
///
/// # Errors
/// - [`IrmError::ParameterDimMismatch`] when `params.len() != expected`.
/// - [`IrmError::NonFiniteParameter`] for the first non-finite entry.
pub fn validate_params(params: ArrayView1<'_, f64>, expected: usize) -> IrmResult<()> {
    validate_param_len(params, expected)?;
    for (index, &value) in params.iter().enumerate() {
        if !value.is_finite() {
            return Err(IrmError::NonFiniteParameter { index, value });
        }
    }
    Ok(())
}

/// Length-only check used by the evaluation entry points, which accept
/// arbitrary trial values.
///
/// # Errors
/// [`IrmError::ParameterDimMismatch`] when `params.len() != expected`.
pub fn validate_param_len(params: ArrayView1<'_, f64>, expected: usize) -> IrmResult<()> {
    if params.len() != expected {
        return Err(IrmError::ParameterDimMismatch { expected, found: params.len() });
    }
    Ok(())
}

/// Boundaries are passed without the leading discrimination; reported
/// indices are 0-based positions within `boundaries`.
///
/// # Errors
/// [`IrmError::UnorderedBoundaries`] for the first decreasing step.
pub fn validate_boundary_order(boundaries: ArrayView1<'_, f64>) -> IrmResult<()> {
    for index in 1..boundaries.len() {
        let (previous, value) = (boundaries[index - 1], boundaries[index]);
        if value < previous {
            return Err(IrmError::UnorderedBoundaries { index, previous, value });
        }
    }
    Ok(())
}

/// # Errors
/// - [`IrmError::ScoreWeightLength`] when `weights.len() != ncat`.
/// - [`IrmError::NonFiniteScoreWeight`] for a non-finite weight.
/// - [`IrmError::NonMonotoneScoreWeights`] for the first decreasing step.
pub fn validate_score_weights(weights: &[f64], ncat: usize) -> IrmResult<()> {
    if weights.len() != ncat {
        return Err(IrmError::ScoreWeightLength { expected: ncat, found: weights.len() });
    }
    for (index, &value) in weights.iter().enumerate() {
        if !value.is_finite() {
            return Err(IrmError::NonFiniteScoreWeight { index, value });
        }
        if index > 0 && value < weights[index - 1] {
            return Err(IrmError::NonMonotoneScoreWeights {
                index,
                previous: weights[index - 1],
                value,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Structural checks reject single-category items and non-positive D.
    fn structural_checks_reject_degenerate_items() {
        assert_eq!(validate_ncat(1), Err(IrmError::InvalidCategoryCount { ncat: 1 }));
        assert!(validate_ncat(2).is_ok());
        assert!(validate_scaling_constant(1.702).is_ok());
        assert!(validate_scaling_constant(0.0).is_err());
        assert!(validate_scaling_constant(f64::NAN).is_err());
    }

    #[test]
    // Purpose
    // -------
    // Parameter vectors are checked for length before finiteness.
    fn validate_params_reports_length_then_finiteness() {
        let short = array![1.0];
        let bad = array![1.0, f64::NAN];
        assert_eq!(
            validate_params(short.view(), 2),
            Err(IrmError::ParameterDimMismatch { expected: 2, found: 1 })
        );
        assert!(matches!(
            validate_params(bad.view(), 2),
            Err(IrmError::NonFiniteParameter { index: 1, .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Score weights must be non-decreasing; ties are allowed.
    fn score_weights_allow_ties_but_not_decreases() {
        assert!(validate_score_weights(&[0.0, 1.0, 1.0, 3.0], 4).is_ok());
        assert_eq!(
            validate_score_weights(&[0.0, 2.0, 1.0], 3),
            Err(IrmError::NonMonotoneScoreWeights { index: 2, previous: 2.0, value: 1.0 })
        );
        assert!(matches!(
            validate_score_weights(&[0.0, 1.0], 3),
            Err(IrmError::ScoreWeightLength { expected: 3, found: 2 })
        ));
    }
}
