//! Root-finder settings for true-score equating.
use crate::equating::errors::{EquatingError, EquatingResult};

/// Options for the per-score ability search.
///
/// - `tol`: stop when `|TCC_X(θ) − s| < tol` or the bracket is narrower.
/// - `max_iter`: iteration cap per score.
/// - `theta_bound`: search bracket `[-theta_bound, theta_bound]`.
/// - `max_step`: Newton steps are clamped to `±max_step` logits.
///
/// Default: `tol = 1e-8`, `max_iter = 100`, `theta_bound = 20`,
/// `max_step = 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EquatingOptions {
    pub tol: f64,
    pub max_iter: usize,
    pub theta_bound: f64,
    pub max_step: f64,
}

impl EquatingOptions {
    /// # Errors
    /// One of the `EquatingError::Invalid*` variants for a non-finite or
    /// non-positive setting.
    pub fn new(tol: f64, max_iter: usize, theta_bound: f64, max_step: f64) -> EquatingResult<Self> {
        if !tol.is_finite() || tol <= 0.0 {
            return Err(EquatingError::InvalidTolerance { tol });
        }
        if max_iter == 0 {
            return Err(EquatingError::InvalidMaxIter { max_iter });
        }
        if !theta_bound.is_finite() || theta_bound <= 0.0 {
            return Err(EquatingError::InvalidThetaBound { bound: theta_bound });
        }
        if !max_step.is_finite() || max_step <= 0.0 {
            return Err(EquatingError::InvalidMaxStep { step: max_step });
        }
        Ok(Self { tol, max_iter, theta_bound, max_step })
    }
}

impl Default for EquatingOptions {
    fn default() -> Self {
        Self { tol: 1e-8, max_iter: 100, theta_bound: 20.0, max_step: 1.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Each setting is validated independently.
    fn new_validates_each_setting() {
        assert_eq!(EquatingOptions::new(1e-8, 100, 20.0, 1.0), Ok(EquatingOptions::default()));
        assert!(matches!(
            EquatingOptions::new(0.0, 100, 20.0, 1.0),
            Err(EquatingError::InvalidTolerance { .. })
        ));
        assert!(matches!(
            EquatingOptions::new(1e-8, 0, 20.0, 1.0),
            Err(EquatingError::InvalidMaxIter { .. })
        ));
        assert!(matches!(
            EquatingOptions::new(1e-8, 10, f64::INFINITY, 1.0),
            Err(EquatingError::InvalidThetaBound { .. })
        ));
        assert!(matches!(
            EquatingOptions::new(1e-8, 10, 20.0, -1.0),
            Err(EquatingError::InvalidMaxStep { .. })
        ));
    }
}
