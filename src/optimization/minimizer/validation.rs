//! Validation helpers for objective minimization.
//!
//! This module centralizes the consistency checks used across the
//! minimizer interface:
//!
//! - **Tolerance checks**: [`verify_tol_grad`], [`verify_tol_cost`] ensure
//!   numeric tolerances are finite and strictly positive when provided.
//! - **Starting points**: [`validate_start`] enforces dimension and finite
//!   entries before any solver is built.
//! - **Gradient validation**: [`validate_grad`] enforces correct dimension
//!   and finite entries.
//! - **Solver output**: [`validate_point_hat`] and [`validate_value`] check
//!   the best point and objective value reported by Argmin.
//! - **Hessians**: [`validate_hessian`] checks shape and finiteness of
//!   finite-difference Hessians.
use crate::optimization::{
    errors::{OptError, OptResult},
    minimizer::types::{Grad, Hessian, Point},
};

/// Validate the optional gradient‐norm tolerance.
///
/// # Errors
/// Returns [`OptError::InvalidTolGrad`] if the value is non-finite or ≤ 0.0.
pub fn verify_tol_grad(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Validate the optional cost‐change tolerance.
///
/// # Errors
/// Returns [`OptError::InvalidTolCost`] if the value is non-finite or ≤ 0.0.
pub fn verify_tol_cost(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Validate a starting point against the objective's dimension.
///
/// # Errors
/// - [`OptError::StartDimMismatch`] if `x0.len() != dim`.
/// - [`OptError::InvalidStart`] for the first non-finite entry.
pub fn validate_start(x0: &Point, dim: usize) -> OptResult<()> {
    if x0.len() != dim {
        return Err(OptError::StartDimMismatch { expected: dim, found: x0.len() });
    }
    for (index, &value) in x0.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidStart { index, value });
        }
    }
    Ok(())
}

/// Validate a gradient vector against dimension and finiteness.
///
/// # Errors
/// - [`OptError::GradientDimMismatch`] if length does not match `dim`.
/// - [`OptError::InvalidGradient`] with the index/value/reason of the first
///   offending element.
pub fn validate_grad(grad: &Grad, dim: usize) -> OptResult<()> {
    if grad.len() != dim {
        return Err(OptError::GradientDimMismatch { expected: dim, found: grad.len() });
    }
    for (index, &value) in grad.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidGradient {
                index,
                value,
                reason: "Gradient elements must be finite.",
            });
        }
    }
    Ok(())
}

/// Validate and unwrap the best point reported by the solver.
///
/// # Errors
/// - [`OptError::MissingPointHat`] if no vector was provided.
/// - [`OptError::InvalidPointHat`] if any element is non-finite.
pub fn validate_point_hat(point_hat: Option<Point>) -> OptResult<Point> {
    match point_hat {
        Some(x) => {
            for (index, &value) in x.iter().enumerate() {
                if !value.is_finite() {
                    return Err(OptError::InvalidPointHat {
                        index,
                        value,
                        reason: "Minimizer coordinates must be finite.",
                    });
                }
            }
            Ok(x)
        }
        None => Err(OptError::MissingPointHat),
    }
}

/// Validate that a scalar objective value is finite.
///
/// # Errors
/// Returns [`OptError::NonFiniteCost`] if the value is `NaN` or infinite.
pub fn validate_value(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::NonFiniteCost { value });
    }
    Ok(())
}

/// Validate the shape and entries of a Hessian matrix.
///
/// # Errors
/// - [`OptError::HessianDimMismatch`] if dimensions do not match `dim`.
/// - [`OptError::InvalidHessian`] if any entry is non-finite, with offending
///   row/col indices and value.
pub fn validate_hessian(hessian: &Hessian, dim: usize) -> OptResult<()> {
    if hessian.nrows() != dim || hessian.ncols() != dim {
        return Err(OptError::HessianDimMismatch {
            expected: dim,
            found: (hessian.nrows(), hessian.ncols()),
        });
    }
    for ((i, j), &value) in hessian.indexed_iter() {
        if !value.is_finite() {
            return Err(OptError::InvalidHessian { row: i, col: j, value });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, array};

    #[test]
    // Purpose
    // -------
    // A starting point of the wrong length is rejected before any solver work.
    //
    // Given
    // -----
    // - A 1-D start for a 2-D objective.
    //
    // Expect
    // ------
    // - `StartDimMismatch { expected: 2, found: 1 }`.
    fn validate_start_rejects_wrong_dimension() {
        // Arrange
        let x0 = array![0.0];

        // Act
        let err = validate_start(&x0, 2).expect_err("dimension mismatch must be reported");

        // Assert
        assert_eq!(err, OptError::StartDimMismatch { expected: 2, found: 1 });
    }

    #[test]
    // Purpose
    // -------
    // Non-finite coordinates in a starting point are reported with their index.
    fn validate_start_reports_first_non_finite_entry() {
        // Arrange
        let x0 = array![0.0, f64::INFINITY];

        // Act
        let err = validate_start(&x0, 2).expect_err("infinite entry must be reported");

        // Assert
        assert_eq!(err, OptError::InvalidStart { index: 1, value: f64::INFINITY });
    }

    #[test]
    // Purpose
    // -------
    // Tolerances must be strictly positive when supplied and may be absent.
    fn tolerance_checks_accept_none_and_reject_non_positive() {
        assert!(verify_tol_grad(None).is_ok());
        assert!(verify_tol_cost(Some(1e-9)).is_ok());
        assert!(matches!(verify_tol_grad(Some(0.0)), Err(OptError::InvalidTolGrad { .. })));
        assert!(matches!(verify_tol_cost(Some(f64::NAN)), Err(OptError::InvalidTolCost { .. })));
    }

    #[test]
    // Purpose
    // -------
    // A missing best point is surfaced explicitly instead of defaulting.
    fn validate_point_hat_requires_a_point() {
        assert_eq!(validate_point_hat(None), Err(OptError::MissingPointHat));
        assert!(validate_point_hat(Some(array![0.1, 1.2])).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Hessians must be square of the expected size.
    fn validate_hessian_rejects_wrong_shape() {
        // Arrange
        let h = Array2::<f64>::zeros((2, 3));

        // Act
        let err = validate_hessian(&h, 2).expect_err("non-square Hessian must fail");

        // Assert
        assert_eq!(err, OptError::HessianDimMismatch { expected: 2, found: (2, 3) });
    }
}
