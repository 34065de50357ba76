//! Errors for quadrature rule construction.

/// Result alias for quadrature operations.
pub type QuadratureResult<T> = Result<T, QuadratureError>;

#[derive(Debug, Clone, PartialEq)]
pub enum QuadratureError {
    /// A rule needs at least one point.
    Empty,

    /// Points and weights must have equal length.
    LengthMismatch { points: usize, weights: usize },

    /// Points must be finite.
    NonFinitePoint { index: usize, value: f64 },

    /// Weights must be finite and non-negative.
    InvalidWeight { index: usize, value: f64 },

    /// Range bounds must be finite with `min < max` when `n > 1`.
    InvalidRange { min: f64, max: f64 },

    /// Density parameters were rejected.
    InvalidDistribution { reason: String },
}

impl std::error::Error for QuadratureError {}

impl std::fmt::Display for QuadratureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuadratureError::Empty => write!(f, "Quadrature rule needs at least one point."),
            QuadratureError::LengthMismatch { points, weights } => {
                write!(f, "Quadrature length mismatch: {points} points, {weights} weights")
            }
            QuadratureError::NonFinitePoint { index, value } => {
                write!(f, "Quadrature point at index {index} is non-finite: {value}")
            }
            QuadratureError::InvalidWeight { index, value } => {
                write!(f, "Quadrature weight at index {index} must be finite and >= 0; got {value}")
            }
            QuadratureError::InvalidRange { min, max } => {
                write!(f, "Quadrature range must be finite with min < max; got [{min}, {max}]")
            }
            QuadratureError::InvalidDistribution { reason } => {
                write!(f, "Invalid quadrature density: {reason}")
            }
        }
    }
}

/// Convert a [`QuadratureError`] into a Python `ValueError`.
#[cfg(feature = "python-bindings")]
impl From<QuadratureError> for pyo3::PyErr {
    fn from(err: QuadratureError) -> pyo3::PyErr {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}
