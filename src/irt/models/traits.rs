//! The shared numeric contract of every item response model.
//!
//! [`ItemResponseModel`] is object safe; forms store items as
//! `Box<dyn ItemResponseModel>` and calling code never branches on the
//! concrete variant. Implementors supply the parameter layout, the
//! category probability and its parameter gradient, information, and θ
//! derivatives of the expected score; everything else (stored-parameter
//! convenience wrappers, Hessians, transformed probabilities, `scale`,
//! prior hooks) is provided on top of those.
use std::fmt;

use ndarray::{Array1, Array2, ArrayView1};

use crate::{
    irt::{
        core::{
            common::ItemCommon,
            priors::{ItemPriors, ParamPrior},
            transform::ScaleTransform,
            validation::{validate_param_len, validate_params},
        },
        errors::{IrmError, IrmResult},
    },
    optimization::minimizer::compute_hessian,
};

/// Concrete model family of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModelKind {
    Rasch,
    OnePL,
    TwoPL,
    ThreePL,
    FourPL,
    Gpcm,
    Gpcm2,
    Pcm,
    Pcm2,
    Grm,
}

impl ModelKind {
    /// Models whose discrimination is fixed at 1, so a change of scale
    /// moves only their locations.
    pub fn is_rasch_family(&self) -> bool {
        matches!(self, ModelKind::Rasch | ModelKind::Pcm | ModelKind::Pcm2)
    }

    pub fn is_binary(&self) -> bool {
        matches!(
            self,
            ModelKind::Rasch
                | ModelKind::OnePL
                | ModelKind::TwoPL
                | ModelKind::ThreePL
                | ModelKind::FourPL
        )
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModelKind::Rasch => "Rasch",
            ModelKind::OnePL => "1PL",
            ModelKind::TwoPL => "2PL",
            ModelKind::ThreePL => "3PL",
            ModelKind::FourPL => "4PL",
            ModelKind::Gpcm => "GPCM",
            ModelKind::Gpcm2 => "GPCM2",
            ModelKind::Pcm => "PCM",
            ModelKind::Pcm2 => "PCM2",
            ModelKind::Grm => "GRM",
        };
        write!(f, "{name}")
    }
}

/// Response function of one calibrated test item.
///
/// Required methods
/// ----------------
/// - Layout: `kind`, `ncat`, `n_params`, `parameters`, `store_parameters`,
///   `discrimination`, `location_parameters`, `rescale_parameters`.
/// - Numerics: `probability_at`, `gradient_at`, `item_information_at`,
///   `deriv_theta`, `deriv2_theta`.
/// - State: `common`, `common_mut`, `apply_transform`, `clone_box`.
///
/// Conventions
/// -----------
/// - `*_at` methods take an explicit parameter vector and scaling constant
///   and assume the vector has length `n_params()`; the `*_with` wrappers
///   check the length first.
/// - Categories outside `0..ncat()` have probability 0 and a zero gradient.
/// - `deriv_theta`/`deriv2_theta` differentiate [`expected_value`]
///   (score-weighted) with respect to θ.
///
/// [`expected_value`]: ItemResponseModel::expected_value
pub trait ItemResponseModel: fmt::Debug + Send + Sync {
    fn kind(&self) -> ModelKind;
    fn common(&self) -> &ItemCommon;
    fn common_mut(&mut self) -> &mut ItemCommon;
    fn ncat(&self) -> usize;
    fn n_params(&self) -> usize;

    /// Stored free parameters in the model's documented order.
    fn parameters(&self) -> ArrayView1<'_, f64>;

    /// Overwrite the stored free parameters; `params` is already validated.
    fn store_parameters(&mut self, params: ArrayView1<'_, f64>);

    fn discrimination(&self) -> f64;

    /// Difficulty, or every step location for polytomous items.
    fn location_parameters(&self) -> Vec<f64>;

    /// Map a parameter vector through `transform` without touching `self`.
    fn rescale_parameters(
        &self, params: ArrayView1<'_, f64>, transform: &ScaleTransform,
    ) -> Array1<f64>;

    fn probability_at(&self, theta: f64, params: ArrayView1<'_, f64>, category: usize, d: f64)
    -> f64;

    fn gradient_at(
        &self, theta: f64, params: ArrayView1<'_, f64>, category: usize, d: f64,
    ) -> Array1<f64>;

    fn item_information_at(&self, theta: f64) -> f64;
    fn deriv_theta(&self, theta: f64) -> f64;
    fn deriv2_theta(&self, theta: f64) -> f64;

    /// Rescale all stored state, including parameters held outside the
    /// free vector. Ignores the fixed flag.
    fn apply_transform(&mut self, transform: &ScaleTransform);

    fn clone_box(&self) -> Box<dyn ItemResponseModel>;

    // ---- Provided: stored state ----

    fn scaling_constant(&self) -> f64 {
        self.common().scaling_constant()
    }

    fn score_weights(&self) -> &[f64] {
        self.common().score_weights()
    }

    /// # Errors
    /// Length, finiteness, and monotonicity errors for the new weights.
    fn set_score_weights(&mut self, weights: Vec<f64>) -> IrmResult<()> {
        self.common_mut().set_score_weights(weights)
    }

    fn is_fixed(&self) -> bool {
        self.common().is_fixed()
    }

    fn set_fixed(&mut self, fixed: bool) {
        self.common_mut().set_fixed(fixed);
    }

    fn item_parameters(&self) -> Array1<f64> {
        self.parameters().to_owned()
    }

    /// Structural check for a candidate stored parameter vector. Models with
    /// constraints beyond length and finiteness extend it.
    ///
    /// # Errors
    /// `IrmError::ParameterDimMismatch` / `IrmError::NonFiniteParameter`.
    fn check_parameters(&self, params: ArrayView1<'_, f64>) -> IrmResult<()> {
        validate_params(params, self.n_params())
    }

    /// # Errors
    /// `IrmError::ParameterDimMismatch` / `IrmError::NonFiniteParameter`,
    /// or a model-specific error from [`check_parameters`](Self::check_parameters).
    fn set_item_parameters(&mut self, params: &Array1<f64>) -> IrmResult<()> {
        self.check_parameters(params.view())?;
        self.store_parameters(params.view());
        Ok(())
    }

    /// # Errors
    /// `IrmError::PriorDimMismatch` unless one slot per free parameter.
    fn set_priors(&mut self, slots: Vec<Option<ParamPrior>>) -> IrmResult<()> {
        let priors = ItemPriors::new(slots, self.n_params())?;
        self.common_mut().set_priors(priors);
        Ok(())
    }

    fn min_score(&self) -> f64 {
        self.score_weights().first().copied().unwrap_or(0.0)
    }

    fn max_score(&self) -> f64 {
        self.score_weights().last().copied().unwrap_or(0.0)
    }

    /// Expected score as θ → −∞.
    fn lower_asymptote_score(&self) -> f64 {
        self.min_score()
    }

    /// Expected score as θ → +∞.
    fn upper_asymptote_score(&self) -> f64 {
        self.max_score()
    }

    // ---- Provided: evaluation ----

    fn probability(&self, theta: f64, category: usize) -> f64 {
        self.probability_at(theta, self.parameters(), category, self.scaling_constant())
    }

    /// # Errors
    /// `IrmError::ParameterDimMismatch` for a vector of the wrong length.
    fn probability_with(
        &self, theta: f64, params: &Array1<f64>, category: usize, d: f64,
    ) -> IrmResult<f64> {
        validate_param_len(params.view(), self.n_params())?;
        Ok(self.probability_at(theta, params.view(), category, d))
    }

    fn category_probabilities(&self, theta: f64) -> Vec<f64> {
        (0..self.ncat()).map(|k| self.probability(theta, k)).collect()
    }

    /// Score-weighted sum of category probabilities.
    fn expected_value(&self, theta: f64) -> f64 {
        self.category_probabilities(theta).iter().zip(self.score_weights()).map(|(p, w)| p * w).sum()
    }

    /// Probability of responding in `category` or above.
    fn cumulative_probability(&self, theta: f64, category: usize) -> f64 {
        (category..self.ncat()).map(|k| self.probability(theta, k)).sum()
    }

    fn gradient(&self, theta: f64, category: usize) -> Array1<f64> {
        self.gradient_at(theta, self.parameters(), category, self.scaling_constant())
    }

    /// # Errors
    /// `IrmError::ParameterDimMismatch` for a vector of the wrong length.
    fn gradient_with(
        &self, theta: f64, params: &Array1<f64>, category: usize, d: f64,
    ) -> IrmResult<Array1<f64>> {
        validate_param_len(params.view(), self.n_params())?;
        Ok(self.gradient_at(theta, params.view(), category, d))
    }

    /// Hessian of `probability(θ, category)` with respect to the stored
    /// free parameters.
    ///
    /// # Errors
    /// `IrmError::DerivativeFailed` when the finite-difference matrix is
    /// not finite.
    fn hessian(&self, theta: f64, category: usize) -> IrmResult<Array2<f64>> {
        self.hessian_with(theta, &self.item_parameters(), category, self.scaling_constant())
    }

    /// Hessian at an explicit parameter vector, from central differences of
    /// the analytic gradient.
    ///
    /// # Errors
    /// - `IrmError::ParameterDimMismatch` for a vector of the wrong length.
    /// - `IrmError::DerivativeFailed` when the matrix is not finite.
    fn hessian_with(
        &self, theta: f64, params: &Array1<f64>, category: usize, d: f64,
    ) -> IrmResult<Array2<f64>> {
        validate_param_len(params.view(), self.n_params())?;
        let grad = |p: &Array1<f64>| self.gradient_at(theta, p.view(), category, d);
        compute_hessian(&grad, params).map_err(IrmError::from)
    }

    // ---- Provided: linear rescaling ----

    /// Copy of this item with `transform` applied to all stored state.
    fn rescaled(&self, transform: &ScaleTransform) -> Box<dyn ItemResponseModel> {
        let mut item = self.clone_box();
        item.apply_transform(transform);
        item
    }

    /// Probability after placing this item on the other form's scale with
    /// the new-to-old transform.
    fn t_star_probability(&self, theta: f64, category: usize, intercept: f64, slope: f64) -> f64 {
        self.rescaled(&ScaleTransform::star(intercept, slope)).probability(theta, category)
    }

    /// Probability under the old-to-new transform.
    fn t_sharp_probability(&self, theta: f64, category: usize, intercept: f64, slope: f64) -> f64 {
        self.rescaled(&ScaleTransform::sharp(intercept, slope)).probability(theta, category)
    }

    /// Rescale stored parameters in place with the new-to-old transform.
    ///
    /// A fixed item is left unchanged.
    ///
    /// # Errors
    /// `IrmError::NonFiniteParameter` when the coefficients would produce
    /// non-finite parameters (e.g. zero slope); the item is then unchanged.
    fn scale(&mut self, intercept: f64, slope: f64) -> IrmResult<()> {
        if self.is_fixed() {
            return Ok(());
        }
        self.check_scale(intercept, slope)?;
        self.apply_transform(&ScaleTransform::star(intercept, slope));
        Ok(())
    }

    /// Verify that `scale(intercept, slope)` would succeed, without
    /// changing anything.
    ///
    /// # Errors
    /// Same as [`scale`](ItemResponseModel::scale).
    fn check_scale(&self, intercept: f64, slope: f64) -> IrmResult<()> {
        if self.is_fixed() {
            return Ok(());
        }
        if !slope.is_finite() || slope == 0.0 {
            return Err(IrmError::NonFiniteParameter { index: 0, value: 1.0 / slope });
        }
        let transform = ScaleTransform::star(intercept, slope);
        let candidate = self.rescale_parameters(self.parameters(), &transform);
        self.check_parameters(candidate.view())
    }

    // ---- Provided: prior hooks ----

    fn non_zero_prior(&self, params: &Array1<f64>) -> bool {
        self.common().priors().non_zero(params.view())
    }

    fn add_priors_to_log_likelihood(&self, loglik: f64, params: &Array1<f64>) -> f64 {
        self.common().priors().add_to_log_likelihood(loglik, params.view())
    }

    fn add_priors_to_log_likelihood_gradient(
        &self, grad: Array1<f64>, params: &Array1<f64>,
    ) -> Array1<f64> {
        self.common().priors().add_to_gradient(grad, params.view())
    }
}

impl Clone for Box<dyn ItemResponseModel> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}
