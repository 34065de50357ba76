//! Prior distributions for item parameters.
//!
//! Purpose
//! -------
//! Attach optional prior densities to individual item parameters so that
//! penalized estimators can add log-prior terms to a log-likelihood and its
//! gradient. Evaluation of calibrated items never consults priors; without
//! any prior attached every hook is a no-op.
//!
//! Conventions
//! -----------
//! - Densities come from `statrs`; only their log-density and its first
//!   derivative in the parameter are used.
//! - [`ItemPriors`] holds one optional prior per free parameter, in the
//!   model's parameter-vector order.
//! - A parameter outside a prior's support has log density `-∞` and
//!   derivative `0`.
use ndarray::{Array1, ArrayView1};
use statrs::distribution::{Beta, Continuous, LogNormal, Normal};

use crate::irt::errors::{IrmError, IrmResult};

/// Prior distribution for one item parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamPrior {
    /// Normal(mean, sd); typical for difficulties and thresholds.
    Normal { mean: f64, sd: f64, dist: Normal },
    /// LogNormal(mu, sigma) on the natural scale; typical for discriminations.
    LogNormal { mu: f64, sigma: f64, dist: LogNormal },
    /// Beta(alpha, beta) rescaled to `[lower, upper]`; typical for guessing.
    Beta4 { alpha: f64, beta: f64, lower: f64, upper: f64, dist: Beta },
}

impl ParamPrior {
    /// # Errors
    /// [`IrmError::InvalidPrior`] when `statrs` rejects the parameters.
    pub fn normal(mean: f64, sd: f64) -> IrmResult<Self> {
        let dist = Normal::new(mean, sd).map_err(invalid_prior)?;
        Ok(ParamPrior::Normal { mean, sd, dist })
    }

    /// # Errors
    /// [`IrmError::InvalidPrior`] when `statrs` rejects the parameters.
    pub fn log_normal(mu: f64, sigma: f64) -> IrmResult<Self> {
        let dist = LogNormal::new(mu, sigma).map_err(invalid_prior)?;
        Ok(ParamPrior::LogNormal { mu, sigma, dist })
    }

    /// # Errors
    /// [`IrmError::InvalidPrior`] when the shapes are rejected or the bounds
    /// are not finite with `lower < upper`.
    pub fn beta4(alpha: f64, beta: f64, lower: f64, upper: f64) -> IrmResult<Self> {
        if !lower.is_finite() || !upper.is_finite() || lower >= upper {
            return Err(IrmError::InvalidPrior {
                reason: format!("Beta bounds must be finite with lower < upper; got [{lower}, {upper}]"),
            });
        }
        let dist = Beta::new(alpha, beta).map_err(invalid_prior)?;
        Ok(ParamPrior::Beta4 { alpha, beta, lower, upper, dist })
    }

    pub fn log_density(&self, x: f64) -> f64 {
        match self {
            ParamPrior::Normal { dist, .. } => dist.ln_pdf(x),
            ParamPrior::LogNormal { dist, .. } => {
                if x <= 0.0 {
                    f64::NEG_INFINITY
                } else {
                    dist.ln_pdf(x)
                }
            }
            ParamPrior::Beta4 { lower, upper, dist, .. } => {
                if x <= *lower || x >= *upper {
                    return f64::NEG_INFINITY;
                }
                let width = upper - lower;
                dist.ln_pdf((x - lower) / width) - width.ln()
            }
        }
    }

    /// Derivative of [`log_density`](Self::log_density) with respect to `x`.
    pub fn log_density_deriv(&self, x: f64) -> f64 {
        match self {
            ParamPrior::Normal { mean, sd, .. } => -(x - mean) / (sd * sd),
            ParamPrior::LogNormal { mu, sigma, .. } => {
                if x <= 0.0 {
                    return 0.0;
                }
                -1.0 / x - (x.ln() - mu) / (sigma * sigma * x)
            }
            ParamPrior::Beta4 { alpha, beta, lower, upper, .. } => {
                if x <= *lower || x >= *upper {
                    return 0.0;
                }
                (alpha - 1.0) / (x - lower) - (beta - 1.0) / (upper - x)
            }
        }
    }
}

fn invalid_prior<E: std::fmt::Display>(err: E) -> IrmError {
    IrmError::InvalidPrior { reason: err.to_string() }
}

/// Optional priors, one slot per free item parameter.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ItemPriors {
    slots: Vec<Option<ParamPrior>>,
}

impl ItemPriors {
    /// # Errors
    /// [`IrmError::PriorDimMismatch`] when `slots.len() != n_params`.
    pub fn new(slots: Vec<Option<ParamPrior>>, n_params: usize) -> IrmResult<Self> {
        if slots.len() != n_params {
            return Err(IrmError::PriorDimMismatch { expected: n_params, found: slots.len() });
        }
        Ok(Self { slots })
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn get(&self, index: usize) -> Option<&ParamPrior> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    fn attached<'a, 'b: 'a>(
        &'a self, params: ArrayView1<'b, f64>,
    ) -> impl Iterator<Item = (usize, &'a ParamPrior, f64)> + 'a {
        self.slots
            .iter()
            .zip(params.into_iter())
            .enumerate()
            .filter_map(|(i, (slot, &x))| slot.as_ref().map(|p| (i, p, x)))
    }

    /// `true` when every attached prior has positive density at `params`.
    pub fn non_zero(&self, params: ArrayView1<'_, f64>) -> bool {
        self.attached(params).all(|(_, prior, x)| prior.log_density(x) > f64::NEG_INFINITY)
    }

    /// `loglik + Σ log p(params_i)` over attached priors.
    pub fn add_to_log_likelihood(&self, loglik: f64, params: ArrayView1<'_, f64>) -> f64 {
        loglik + self.attached(params).map(|(_, prior, x)| prior.log_density(x)).sum::<f64>()
    }

    /// Add each attached prior's log-density derivative to `grad`.
    pub fn add_to_gradient(&self, mut grad: Array1<f64>, params: ArrayView1<'_, f64>) -> Array1<f64> {
        for (i, prior, x) in self.attached(params) {
            if i < grad.len() {
                grad[i] += prior.log_density_deriv(x);
            }
        }
        grad
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // The normal prior's log density and derivative match closed forms.
    fn normal_prior_matches_closed_form() {
        // Arrange
        let prior = ParamPrior::normal(0.5, 2.0).expect("valid normal prior");
        let x = 1.5;

        // Act
        let ld = prior.log_density(x);
        let dld = prior.log_density_deriv(x);

        // Assert
        let expected = -0.5 * (2.0 * std::f64::consts::PI).ln() - 2.0f64.ln() - 0.125;
        approx::assert_abs_diff_eq!(ld, expected, epsilon = 1e-12);
        approx::assert_abs_diff_eq!(dld, -0.25, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Analytic derivatives of the log-normal and four-parameter beta agree
    // with central differences of their log densities.
    fn analytic_derivatives_match_finite_differences() {
        let priors = [
            (ParamPrior::log_normal(0.0, 0.5).expect("valid"), 1.3),
            (ParamPrior::beta4(2.0, 5.0, 0.0, 0.5).expect("valid"), 0.12),
        ];
        for (prior, x) in priors {
            let h = 1e-6;
            let fd = (prior.log_density(x + h) - prior.log_density(x - h)) / (2.0 * h);
            approx::assert_abs_diff_eq!(prior.log_density_deriv(x), fd, epsilon = 1e-5);
        }
    }

    #[test]
    // Purpose
    // -------
    // Without attached priors every hook leaves its input unchanged.
    fn empty_priors_are_no_ops() {
        // Arrange
        let priors = ItemPriors::default();
        let params = array![1.0, 0.0, 0.2];

        // Act / Assert
        assert!(priors.non_zero(params.view()));
        assert_eq!(priors.add_to_log_likelihood(-12.5, params.view()), -12.5);
        assert_eq!(priors.add_to_gradient(array![0.1, 0.2, 0.3], params.view()), array![0.1, 0.2, 0.3]);
    }

    #[test]
    // Purpose
    // -------
    // A guessing value outside the beta support has zero prior density.
    fn beta4_support_is_enforced() {
        // Arrange
        let guess = ParamPrior::beta4(5.0, 17.0, 0.0, 1.0).expect("valid");
        let priors = ItemPriors::new(vec![None, None, Some(guess)], 3).expect("three slots");

        // Act / Assert
        assert!(priors.non_zero(array![1.0, 0.0, 0.2].view()));
        assert!(!priors.non_zero(array![1.0, 0.0, -0.1].view()));
        assert!(ParamPrior::beta4(1.0, 1.0, 1.0, 0.0).is_err());
        assert!(matches!(
            ItemPriors::new(vec![None], 3),
            Err(IrmError::PriorDimMismatch { expected: 3, found: 1 })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Priors attached to a model apply to short-lived trial vectors, slot
    // by slot.
    //
    // Given
    // -----
    // A 3PL item with a normal prior on `a` only; trial parameters built
    // inside the call.
    //
    // Expect
    // ------
    // Only index 0 contributes to the log-likelihood and the gradient.
    fn model_prior_hooks_accept_temporary_vectors() {
        use crate::irt::models::{Irm3PL, ItemResponseModel};

        // Arrange
        let mut item = Irm3PL::three_pl(1.0, 0.0, 0.2, 1.7).expect("valid 3PL");
        let prior = ParamPrior::normal(1.0, 0.5).expect("valid normal prior");
        item.set_priors(vec![Some(prior.clone()), None, None]).expect("one slot per parameter");

        // Act
        let loglik = item.add_priors_to_log_likelihood(-3.0, &array![1.4, 9.0, 0.9]);
        let grad =
            item.add_priors_to_log_likelihood_gradient(array![0.0, 0.0, 0.0], &array![1.4, 9.0, 0.9]);

        // Assert
        approx::assert_abs_diff_eq!(loglik, -3.0 + prior.log_density(1.4), epsilon = 1e-14);
        approx::assert_abs_diff_eq!(grad[0], prior.log_density_deriv(1.4), epsilon = 1e-14);
        assert_eq!((grad[1], grad[2]), (0.0, 0.0));
        assert!(item.non_zero_prior(&array![1.4, 9.0, 0.9]));
    }
}
