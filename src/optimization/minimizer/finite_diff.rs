//! minimizer::finite_diff — finite-difference gradient and Hessian helpers.
//!
//! Purpose
//! -------
//! Provide finite-difference gradient and Hessian approximations around a
//! point, together with validation and symmetry cleanup, so that the rest
//! of the crate can request derivatives without depending directly on the
//! `finitediff` API.
//!
//! Key behaviors
//! -------------
//! - Compute forward-difference gradients with error capture and
//!   post-hoc validation via [`run_fd_diff`].
//! - Construct central-difference Hessians of an analytic gradient,
//!   falling back to forward differences when validation fails, via
//!   [`compute_hessian`]. Item response models use this for their
//!   parameter Hessians.
//! - Enforce symmetry of Hessian matrices in-place.
//!
//! Conventions
//! -----------
//! - Central-difference Hessians are preferred; forward-difference is
//!   used only as a fallback when the central approximation fails
//!   validation.
//! - Domain errors are surfaced as [`OptError`](crate::optimization::errors::OptError)
//!   via `OptResult<T>`; Argmin’s [`Error`] is confined to the thin
//!   boundary where finite-difference closures are invoked.
use crate::optimization::{
    errors::OptResult,
    minimizer::{
        types::{Grad, Hessian, Point},
        validation::{validate_grad, validate_hessian},
    },
};
use argmin::core::Error;
use finitediff::FiniteDiff;
use std::cell::RefCell;

/// run_fd_diff — forward-difference gradient with error capture and validation.
///
/// `func` is expected to park any evaluation error in `closure_err` and
/// return `NaN`; the cell is cleared on entry and inspected afterwards.
///
/// # Errors
/// - The captured Argmin error, converted to `OptError`.
/// - `OptError::GradientDimMismatch` / `OptError::InvalidGradient` from
///   [`validate_grad`].
pub fn run_fd_diff<G: Fn(&Point) -> f64>(
    x: &Point, func: &G, closure_err: &RefCell<Option<Error>>,
) -> OptResult<Grad> {
    closure_err.replace(None);
    let fd_grad = x.forward_diff(func);
    let dim = x.len();
    if let Some(err) = closure_err.take() {
        return Err(err.into());
    }
    validate_grad(&fd_grad, dim)?;
    Ok(fd_grad)
}

/// compute_hessian — finite-difference Hessian with validation and symmetry.
///
/// Purpose
/// -------
/// Approximate the Hessian of a scalar function from its gradient `f` at
/// `x`: central differences first, forward differences when the central
/// matrix fails validation. The result is symmetrized in-place.
///
/// Errors
/// ------
/// - `OptError::HessianDimMismatch` / `OptError::InvalidHessian` when the
///   forward-difference fallback also fails validation.
pub fn compute_hessian<F: Fn(&Point) -> Grad>(f: &F, x: &Point) -> OptResult<Hessian> {
    let dim = x.len();
    let mut cent_hess = x.central_hessian(f);
    match validate_hessian(&cent_hess, dim) {
        Ok(_) => {
            symmetrize_hess(&mut cent_hess);
            Ok(cent_hess)
        }
        Err(_) => {
            let mut forward_hess = x.forward_hessian(f);
            validate_hessian(&forward_hess, dim)?;
            symmetrize_hess(&mut forward_hess);
            Ok(forward_hess)
        }
    }
}

// ---- Helper methods ----

/// Replace each off-diagonal pair with its average; the diagonal is untouched.
fn symmetrize_hess(hess: &mut Hessian) {
    for i in 0..hess.nrows() {
        for j in 0..i {
            let avg = 0.5 * (hess[[i, j]] + hess[[j, i]]);
            hess[[i, j]] = avg;
            hess[[j, i]] = avg;
        }
    }
}
