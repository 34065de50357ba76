//! Errors for the scale linking engine.
//!
//! Degenerate inputs (no common items, zero-weight quadrature) are not
//! errors; they surface as NaN coefficients. The variants below cover
//! configuration mistakes and failures propagated from the layers the
//! engine drives.
use crate::{
    irt::errors::IrmError,
    optimization::{errors::OptError, minimizer::traits::SolverKind},
};

/// Result alias for linking operations.
pub type LinkingResult<T> = Result<T, LinkingError>;

#[derive(Debug, Clone, PartialEq)]
pub enum LinkingError {
    // ---- Configuration ----
    /// Unknown criterion name.
    InvalidCriterion { name: String, reason: &'static str },

    /// Unknown characteristic-curve method name.
    InvalidMethod { name: String, reason: &'static str },

    /// Rounding digits outside the representable range of an `f64`.
    InvalidPrecision { digits: u32 },

    /// Solver that cannot be used for the characteristic-curve searches.
    UnsupportedSolver { solver: SolverKind, reason: &'static str },

    // ---- Transformation ----
    /// Coefficients must be finite with a non-zero slope before they are
    /// applied to a form.
    InvalidCoefficients { intercept: f64, slope: f64 },

    // ---- Propagated ----
    Model(IrmError),
    Optimization(OptError),
}

impl std::error::Error for LinkingError {}

impl std::fmt::Display for LinkingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinkingError::InvalidCriterion { name, reason } => {
                write!(f, "Invalid linking criterion '{name}': {reason}")
            }
            LinkingError::InvalidMethod { name, reason } => {
                write!(f, "Invalid characteristic curve method '{name}': {reason}")
            }
            LinkingError::InvalidPrecision { digits } => {
                write!(f, "Invalid precision {digits}: at most 15 digits are supported")
            }
            LinkingError::UnsupportedSolver { solver, reason } => {
                write!(f, "Solver {solver:?} is not supported for linking: {reason}")
            }
            LinkingError::InvalidCoefficients { intercept, slope } => {
                write!(
                    f,
                    "Cannot transform a form with intercept {intercept} and slope {slope}: \
                     both must be finite and the slope non-zero"
                )
            }
            LinkingError::Model(err) => write!(f, "Item model error: {err}"),
            LinkingError::Optimization(err) => write!(f, "Optimization error: {err}"),
        }
    }
}

impl From<IrmError> for LinkingError {
    fn from(err: IrmError) -> Self {
        LinkingError::Model(err)
    }
}

impl From<OptError> for LinkingError {
    fn from(err: OptError) -> Self {
        LinkingError::Optimization(err)
    }
}

/// Convert a [`LinkingError`] into a Python `ValueError` with the error message.
#[cfg(feature = "python-bindings")]
impl From<LinkingError> for pyo3::PyErr {
    fn from(err: LinkingError) -> pyo3::PyErr {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}
