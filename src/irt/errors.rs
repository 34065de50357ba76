//! Errors for item response models (construction, parameter vectors,
//! score weights, priors) and named item collections.
//!
//! ## Conventions
//! - **Indices are 0-based**, both for parameter vectors and categories.
//! - Only shape and finiteness problems are errors. Evaluating a model at
//!   an out-of-range category or with a negative guessing parameter is
//!   defined behavior (probability 0) and never produces an [`IrmError`].
use crate::optimization::errors::OptError;

/// Result alias for item response model operations.
pub type IrmResult<T> = Result<T, IrmError>;

/// Unified error type for item response models and item collections.
#[derive(Debug, Clone, PartialEq)]
pub enum IrmError {
    // ---- Structure ----
    /// Items need at least two response categories.
    InvalidCategoryCount { ncat: usize },

    /// A parameter vector has the wrong length for the model.
    ParameterDimMismatch { expected: usize, found: usize },

    /// Item parameters must be finite.
    NonFiniteParameter { index: usize, value: f64 },

    /// The scaling constant D must be finite and > 0.
    InvalidScalingConstant { value: f64 },

    /// Graded response boundaries must be non-decreasing; `index` is the
    /// first boundary below its predecessor.
    UnorderedBoundaries { index: usize, previous: f64, value: f64 },

    // ---- Score weights ----
    /// One score weight per category is required.
    ScoreWeightLength { expected: usize, found: usize },

    /// Score weights must be finite.
    NonFiniteScoreWeight { index: usize, value: f64 },

    /// Score weights must be non-decreasing; `index` is the first offender.
    NonMonotoneScoreWeights { index: usize, previous: f64, value: f64 },

    // ---- Priors ----
    /// Prior distribution parameters were rejected.
    InvalidPrior { reason: String },

    /// One optional prior per free parameter is required.
    PriorDimMismatch { expected: usize, found: usize },

    // ---- Collections ----
    /// Item identifiers must be unique within a collection.
    DuplicateItem { id: String },

    /// Requested item is not part of the collection.
    UnknownItem { id: String },

    // ---- Numerics ----
    /// Finite-difference derivatives failed validation.
    DerivativeFailed(OptError),
}

impl std::error::Error for IrmError {}

impl std::fmt::Display for IrmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Structure ----
            IrmError::InvalidCategoryCount { ncat } => {
                write!(f, "Items need at least 2 response categories; got {ncat}")
            }
            IrmError::ParameterDimMismatch { expected, found } => {
                write!(f, "Parameter vector length mismatch: expected {expected}, found {found}")
            }
            IrmError::NonFiniteParameter { index, value } => {
                write!(f, "Item parameter at index {index} is non-finite: {value}")
            }
            IrmError::InvalidScalingConstant { value } => {
                write!(f, "Scaling constant D must be finite and > 0; got {value}")
            }
            IrmError::UnorderedBoundaries { index, previous, value } => {
                write!(
                    f,
                    "Category boundaries must be non-decreasing; boundary {index} is {value} after {previous}"
                )
            }
            // ---- Score weights ----
            IrmError::ScoreWeightLength { expected, found } => {
                write!(f, "Score weight length mismatch: expected {expected}, found {found}")
            }
            IrmError::NonFiniteScoreWeight { index, value } => {
                write!(f, "Score weight at index {index} is non-finite: {value}")
            }
            IrmError::NonMonotoneScoreWeights { index, previous, value } => {
                write!(
                    f,
                    "Score weights must be non-decreasing; index {index} has {value} after {previous}"
                )
            }
            // ---- Priors ----
            IrmError::InvalidPrior { reason } => {
                write!(f, "Invalid prior distribution: {reason}")
            }
            IrmError::PriorDimMismatch { expected, found } => {
                write!(f, "Prior count mismatch: expected {expected}, found {found}")
            }
            // ---- Collections ----
            IrmError::DuplicateItem { id } => {
                write!(f, "Item '{id}' is already part of the collection")
            }
            IrmError::UnknownItem { id } => {
                write!(f, "Item '{id}' is not part of the collection")
            }
            // ---- Numerics ----
            IrmError::DerivativeFailed(err) => {
                write!(f, "Finite-difference derivative failed: {err}")
            }
        }
    }
}

impl From<OptError> for IrmError {
    fn from(err: OptError) -> IrmError {
        IrmError::DerivativeFailed(err)
    }
}

/// Convert an [`IrmError`] into a Python `ValueError` with the error message.
#[cfg(feature = "python-bindings")]
impl From<IrmError> for pyo3::PyErr {
    fn from(err: IrmError) -> pyo3::PyErr {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}
