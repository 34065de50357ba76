//! IrmPcm — partial credit models (PCM and PCM2).
//!
//! Both fix the discrimination at 1, so category `k` has exponent
//! `z_k = Σ_{v ≤ k} D·(θ − b_v)`.
//!
//! - PCM stores `[b, t_1 … t_m]` with `b_v = b + t_v`.
//! - PCM2 stores raw steps `[s_1 … s_m]` with `b_v = s_v`. The category-0
//!   step is fixed at 0 and not part of the vector; it cancels from every
//!   category probability.
use ndarray::{Array1, ArrayView1};

use crate::irt::{
    core::{
        common::ItemCommon,
        divide_by_total::{
            category_probabilities, expected_score_deriv, expected_score_deriv2,
            probability_gradient, score_variance,
        },
        transform::ScaleTransform,
        validation::validate_params,
    },
    errors::IrmResult,
    models::traits::{ItemResponseModel, ModelKind},
};

/// How a partial credit item stores its step locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PcmParameterization {
    /// Difficulty plus threshold offsets (PCM).
    Thresholds,
    /// Raw step locations (PCM2).
    Steps,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IrmPcm {
    parameterization: PcmParameterization,
    params: Array1<f64>,
    common: ItemCommon,
}

impl IrmPcm {
    /// PCM with `b_v = b + t_v`.
    ///
    /// # Errors
    /// `IrmError::InvalidCategoryCount` for an empty threshold list,
    /// `IrmError::NonFiniteParameter`, `IrmError::InvalidScalingConstant`.
    pub fn pcm(difficulty: f64, thresholds: &[f64], d: f64) -> IrmResult<Self> {
        let mut params = Vec::with_capacity(thresholds.len() + 1);
        params.push(difficulty);
        params.extend_from_slice(thresholds);
        Self::build(PcmParameterization::Thresholds, params, thresholds.len() + 1, d)
    }

    /// PCM2 from raw steps `s_1 … s_m`.
    ///
    /// # Errors
    /// Same as [`IrmPcm::pcm`].
    pub fn pcm2(steps: &[f64], d: f64) -> IrmResult<Self> {
        Self::build(PcmParameterization::Steps, steps.to_vec(), steps.len() + 1, d)
    }

    fn build(
        parameterization: PcmParameterization, params: Vec<f64>, ncat: usize, d: f64,
    ) -> IrmResult<Self> {
        let common = ItemCommon::new(ncat, d)?;
        let params = Array1::from(params);
        validate_params(params.view(), params.len())?;
        Ok(Self { parameterization, params, common })
    }

    pub fn parameterization(&self) -> PcmParameterization {
        self.parameterization
    }

    fn steps(&self, p: ArrayView1<'_, f64>) -> Vec<f64> {
        match self.parameterization {
            PcmParameterization::Thresholds => p.iter().skip(1).map(|t| p[0] + t).collect(),
            PcmParameterization::Steps => p.to_vec(),
        }
    }

    fn probs_at(&self, theta: f64, p: ArrayView1<'_, f64>, d: f64) -> Vec<f64> {
        category_probabilities(theta, d, &self.steps(p))
    }
}

impl ItemResponseModel for IrmPcm {
    fn kind(&self) -> ModelKind {
        match self.parameterization {
            PcmParameterization::Thresholds => ModelKind::Pcm,
            PcmParameterization::Steps => ModelKind::Pcm2,
        }
    }

    fn common(&self) -> &ItemCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut ItemCommon {
        &mut self.common
    }

    fn ncat(&self) -> usize {
        self.common.score_weights().len()
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

    fn discrimination(&self) -> f64 {
        1.0
    }

    fn location_parameters(&self) -> Vec<f64> {
        self.steps(self.params.view())
    }

    fn rescale_parameters(
        &self, params: ArrayView1<'_, f64>, transform: &ScaleTransform,
    ) -> Array1<f64> {
        Array1::from_shape_fn(params.len(), |i| match (self.parameterization, i) {
            (PcmParameterization::Thresholds, 0) => transform.location(params[0]),
            (PcmParameterization::Thresholds, _) => transform.threshold(params[i]),
            (PcmParameterization::Steps, _) => transform.location(params[i]),
        })
    }

    fn probability_at(
        &self, theta: f64, params: ArrayView1<'_, f64>, category: usize, d: f64,
    ) -> f64 {
        if category >= self.ncat() {
            return 0.0;
        }
        self.probs_at(theta, params, d)[category]
    }

    fn gradient_at(
        &self, theta: f64, params: ArrayView1<'_, f64>, category: usize, d: f64,
    ) -> Array1<f64> {
        let n = self.n_params();
        if category >= self.ncat() {
            return Array1::zeros(n);
        }
        let probs = self.probs_at(theta, params, d);
        match self.parameterization {
            PcmParameterization::Thresholds => probability_gradient(&probs, category, n, |p, k| {
                if p == 0 {
                    -d * k as f64
                } else if p <= k {
                    -d
                } else {
                    0.0
                }
            }),
            PcmParameterization::Steps => {
                probability_gradient(&probs, category, n, |p, k| if p < k { -d } else { 0.0 })
            }
        }
    }

    /// `D²` times the variance of the score weights.
    fn item_information_at(&self, theta: f64) -> f64 {
        let d = self.common.scaling_constant();
        let probs = self.probs_at(theta, self.params.view(), d);
        d * d * score_variance(&probs, self.common.score_weights())
    }

    fn deriv_theta(&self, theta: f64) -> f64 {
        let d = self.common.scaling_constant();
        let probs = self.probs_at(theta, self.params.view(), d);
        expected_score_deriv(&probs, self.common.score_weights(), d)
    }

    fn deriv2_theta(&self, theta: f64) -> f64 {
        let d = self.common.scaling_constant();
        let probs = self.probs_at(theta, self.params.view(), d);
        expected_score_deriv2(&probs, self.common.score_weights(), d)
    }

    fn category_probabilities(&self, theta: f64) -> Vec<f64> {
        self.probs_at(theta, self.params.view(), self.common.scaling_constant())
    }

    fn apply_transform(&mut self, transform: &ScaleTransform) {
        self.params = self.rescale_parameters(self.params.view(), transform);
    }

    fn clone_box(&self) -> Box<dyn ItemResponseModel> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // PCM and PCM2 coincide when the raw steps equal b + t.
    fn pcm_and_pcm2_agree_on_equivalent_steps() {
        // Arrange
        let pcm = IrmPcm::pcm(0.3, &[-0.6, 0.0, 0.6], 1.0).expect("valid PCM");
        let pcm2 = IrmPcm::pcm2(&[-0.3, 0.3, 0.9], 1.0).expect("valid PCM2");

        // Act / Assert
        for theta in [-2.0, 0.0, 1.5] {
            let a = pcm.category_probabilities(theta);
            let b = pcm2.category_probabilities(theta);
            for k in 0..4 {
                approx::assert_abs_diff_eq!(a[k], b[k], epsilon = 1e-12);
            }
        }
        assert_eq!(pcm.discrimination(), 1.0);
        assert_eq!(pcm2.n_params(), 3);
    }

    #[test]
    // Purpose
    // -------
    // Analytic gradients agree with central differences for both layouts.
    fn gradients_match_finite_differences() {
        let items = [
            IrmPcm::pcm(0.1, &[-0.7, 0.7], 1.7).expect("valid"),
            IrmPcm::pcm2(&[-1.0, 0.2, 1.1], 1.0).expect("valid"),
        ];
        let theta = -0.2;
        for item in &items {
            let params = item.item_parameters();
            let d = item.scaling_constant();
            for category in 0..item.ncat() {
                let g = item.gradient(theta, category);
                for i in 0..params.len() {
                    let h = 1e-6;
                    let mut up = params.clone();
                    let mut dn = params.clone();
                    up[i] += h;
                    dn[i] -= h;
                    let fd = (item.probability_with(theta, &up, category, d).expect("len")
                        - item.probability_with(theta, &dn, category, d).expect("len"))
                        / (2.0 * h);
                    approx::assert_abs_diff_eq!(g[i], fd, epsilon = 1e-7);
                }
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Star rescaling shifts PCM2 steps like difficulties.
    fn pcm2_steps_rescale_as_locations() {
        let item = IrmPcm::pcm2(&[-1.0, 1.0], 1.0).expect("valid PCM2");
        let out = item.rescale_parameters(item.parameters(), &ScaleTransform::star(0.5, 2.0));
        assert_eq!(out.to_vec(), vec![-1.5, 2.5]);
    }
}
