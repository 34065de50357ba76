//! IrmGrm — Samejima's graded response model.
//!
//! Parameter vector `[a, b_1 … b_m]` of ordered category boundaries. The
//! boundary curves are `P*_k(θ) = σ(D·a·(θ − b_k))` for `k = 1 … m`, with
//! `P*_0 = 1` and `P*_{m+1} = 0`, and category `k` has probability
//! `P*_k − P*_{k+1}` clamped to `[0, 1]`.
use ndarray::{Array1, ArrayView1};

use crate::{
    irt::{
        core::{
            common::ItemCommon,
            transform::ScaleTransform,
            validation::{validate_boundary_order, validate_params},
        },
        errors::IrmResult,
        models::traits::{ItemResponseModel, ModelKind},
    },
    optimization::numerical_stability::safe_logistic,
};

#[derive(Debug, Clone, PartialEq)]
pub struct IrmGrm {
    params: Array1<f64>,
    common: ItemCommon,
}

impl IrmGrm {
    /// # Errors
    /// `IrmError::InvalidCategoryCount` for an empty boundary list,
    /// `IrmError::NonFiniteParameter`, `IrmError::InvalidScalingConstant`,
    /// `IrmError::UnorderedBoundaries` when a boundary is below the one
    /// before it.
    pub fn new(discrimination: f64, boundaries: &[f64], d: f64) -> IrmResult<Self> {
        let common = ItemCommon::new(boundaries.len() + 1, d)?;
        let mut params = Vec::with_capacity(boundaries.len() + 1);
        params.push(discrimination);
        params.extend_from_slice(boundaries);
        let params = Array1::from(params);
        Self::check_layout(params.view())?;
        Ok(Self { params, common })
    }

    fn check_layout(params: ArrayView1<'_, f64>) -> IrmResult<()> {
        validate_params(params, params.len())?;
        validate_boundary_order(params.slice(ndarray::s![1..]))
    }

    pub fn boundaries(&self) -> Vec<f64> {
        self.params.iter().skip(1).copied().collect()
    }

    /// Boundary curves `P*_0 … P*_{m+1}`.
    fn boundary_curves(theta: f64, p: ArrayView1<'_, f64>, d: f64) -> Vec<f64> {
        let m = p.len() - 1;
        let mut star = Vec::with_capacity(m + 2);
        star.push(1.0);
        star.extend(p.iter().skip(1).map(|b| safe_logistic(d * p[0] * (theta - b))));
        star.push(0.0);
        star
    }

    fn probs_from(star: &[f64]) -> Vec<f64> {
        star.windows(2).map(|w| (w[0] - w[1]).clamp(0.0, 1.0)).collect()
    }

    fn d_slope(&self) -> f64 {
        self.common.scaling_constant() * self.params[0]
    }
}

impl ItemResponseModel for IrmGrm {
    fn kind(&self) -> ModelKind {
        ModelKind::Grm
    }

    fn common(&self) -> &ItemCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut ItemCommon {
        &mut self.common
    }

    fn ncat(&self) -> usize {
        self.params.len()
    }

    fn n_params(&self) -> usize {
        self.params.len()
    }

    fn parameters(&self) -> ArrayView1<'_, f64> {
        self.params.view()
    }

    fn store_parameters(&mut self, params: ArrayView1<'_, f64>) {
        self.params.assign(&params);
    }

    fn check_parameters(&self, params: ArrayView1<'_, f64>) -> IrmResult<()> {
        validate_params(params, self.n_params())?;
        Self::check_layout(params)
    }

    fn discrimination(&self) -> f64 {
        self.params[0]
    }

    fn location_parameters(&self) -> Vec<f64> {
        self.boundaries()
    }

    fn rescale_parameters(
        &self, params: ArrayView1<'_, f64>, transform: &ScaleTransform,
    ) -> Array1<f64> {
        Array1::from_shape_fn(params.len(), |i| {
            if i == 0 { transform.discrimination(params[0]) } else { transform.location(params[i]) }
        })
    }

    fn probability_at(
        &self, theta: f64, params: ArrayView1<'_, f64>, category: usize, d: f64,
    ) -> f64 {
        if category >= self.ncat() {
            return 0.0;
        }
        let star = Self::boundary_curves(theta, params, d);
        (star[category] - star[category + 1]).clamp(0.0, 1.0)
    }

    fn gradient_at(
        &self, theta: f64, params: ArrayView1<'_, f64>, category: usize, d: f64,
    ) -> Array1<f64> {
        let n = self.n_params();
        let mut g = Array1::zeros(n);
        if category >= self.ncat() {
            return g;
        }
        let star = Self::boundary_curves(theta, params, d);
        let a = params[0];
        // Boundary k contributes +∂P*_k for the upper category and −∂P*_k
        // for the one below it.
        for (k, sign) in [(category, 1.0), (category + 1, -1.0)] {
            if k == 0 || k > n - 1 {
                continue;
            }
            let ds = star[k] * (1.0 - star[k]);
            g[0] += sign * d * (theta - params[k]) * ds;
            g[k] += sign * -d * a * ds;
        }
        g
    }

    /// `Σ_k (∂P_k/∂θ)² / P_k` over categories with positive probability.
    fn item_information_at(&self, theta: f64) -> f64 {
        let star = Self::boundary_curves(theta, self.params.view(), self.common.scaling_constant());
        let ds: Vec<f64> = star.iter().map(|s| s * (1.0 - s)).collect();
        let da = self.d_slope();
        Self::probs_from(&star)
            .iter()
            .enumerate()
            .filter(|(_, p)| **p > f64::MIN_POSITIVE)
            .map(|(k, p)| (da * (ds[k] - ds[k + 1])).powi(2) / p)
            .sum()
    }

    fn deriv_theta(&self, theta: f64) -> f64 {
        let star = Self::boundary_curves(theta, self.params.view(), self.common.scaling_constant());
        let w = self.common.score_weights();
        let da = self.d_slope();
        (1..w.len()).map(|k| (w[k] - w[k - 1]) * da * star[k] * (1.0 - star[k])).sum()
    }

    fn deriv2_theta(&self, theta: f64) -> f64 {
        let star = Self::boundary_curves(theta, self.params.view(), self.common.scaling_constant());
        let w = self.common.score_weights();
        let da = self.d_slope();
        (1..w.len())
            .map(|k| (w[k] - w[k - 1]) * da * da * star[k] * (1.0 - star[k]) * (1.0 - 2.0 * star[k]))
            .sum()
    }

    /// The boundary curve `P*_k` itself.
    fn cumulative_probability(&self, theta: f64, category: usize) -> f64 {
        if category >= self.ncat() {
            return 0.0;
        }
        Self::boundary_curves(theta, self.params.view(), self.common.scaling_constant())[category]
    }

    fn category_probabilities(&self, theta: f64) -> Vec<f64> {
        let star = Self::boundary_curves(theta, self.params.view(), self.common.scaling_constant());
        Self::probs_from(&star)
    }

    fn apply_transform(&mut self, transform: &ScaleTransform) {
        self.params = self.rescale_parameters(self.params.view(), transform);
    }

    fn clone_box(&self) -> Box<dyn ItemResponseModel> {
        Box::new(self.clone())
    }
}
