//! numerical_stability — numerically robust scalar transforms.
//!
//! Purpose
//! -------
//! Collect the numerically stable transforms shared by the item response
//! models and the linking layer: a guarded logistic, a max-shifted softmax
//! over category exponents, decimal rounding of reported coefficients, and
//! the finite penalty that stands in for non-finite criterion values.
//!
//! Invariants & assumptions
//! ------------------------
//! - Transforms assume `f64` inputs and never panic; non-finite inputs
//!   propagate as `NaN` or pass through unchanged.
//!
//! Conventions
//! -----------
//! - This module never logs, performs I/O, or touches global state; it is
//!   pure numerical helpers suitable for tight inner loops over quadrature
//!   points.

pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::transformations::{LINKING_PENALTY, normalize_exponents, round_to, safe_logistic};

pub mod prelude {
    pub use super::transformations::{
        LINKING_PENALTY, normalize_exponents, round_to, safe_logistic,
    };
}
