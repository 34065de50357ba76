//! Errors for true-score equating setup.
//!
//! Unreachable scores are not errors; they are reported with sentinel
//! abilities in the table.

/// Result alias for equating operations.
pub type EquatingResult<T> = Result<T, EquatingError>;

#[derive(Debug, Clone, PartialEq)]
pub enum EquatingError {
    /// A form without items has no test characteristic curve.
    EmptyForm { form: &'static str },

    /// Root-finding tolerance must be finite and positive.
    InvalidTolerance { tol: f64 },

    /// Iteration cap must be positive.
    InvalidMaxIter { max_iter: usize },

    /// Ability bracket half-width must be finite and positive.
    InvalidThetaBound { bound: f64 },

    /// Newton step clamp must be finite and positive.
    InvalidMaxStep { step: f64 },

    /// A form's maximum score must be finite to index raw scores.
    NonFiniteMaxScore { value: f64 },
}

impl std::error::Error for EquatingError {}

impl std::fmt::Display for EquatingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EquatingError::EmptyForm { form } => write!(f, "Form {form} has no items"),
            EquatingError::InvalidTolerance { tol } => {
                write!(f, "Invalid equating tolerance {tol}: must be finite and > 0")
            }
            EquatingError::InvalidMaxIter { max_iter } => {
                write!(f, "Invalid equating iteration cap {max_iter}: must be > 0")
            }
            EquatingError::InvalidThetaBound { bound } => {
                write!(f, "Invalid ability bound {bound}: must be finite and > 0")
            }
            EquatingError::InvalidMaxStep { step } => {
                write!(f, "Invalid Newton step clamp {step}: must be finite and > 0")
            }
            EquatingError::NonFiniteMaxScore { value } => {
                write!(f, "Form X maximum score is not finite: {value}")
            }
        }
    }
}

/// Convert an [`EquatingError`] into a Python `ValueError`.
#[cfg(feature = "python-bindings")]
impl From<EquatingError> for pyo3::PyErr {
    fn from(err: EquatingError) -> pyo3::PyErr {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}
