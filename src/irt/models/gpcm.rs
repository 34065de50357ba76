//! IrmGpcm — generalized partial credit models (GPCM and GPCM2).
//!
//! Parameter vector `[a, b, t_1 … t_m]` with `m = ncat − 1`. Category `k`
//! has exponent `z_k = Σ_{v ≤ k} D·a·(θ − b_v)` where the step location is
//!
//! - GPCM:  `b_v = b + t_v`
//! - GPCM2: `b_v = b − t_v`
//!
//! The two threshold sign conventions describe the same family under two
//! historical parameterizations and are both kept as-is.
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

/// Sign applied to threshold offsets when forming step locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ThresholdSign {
    /// `b_v = b + t_v` (GPCM).
    Plus,
    /// `b_v = b − t_v` (GPCM2).
    Minus,
}

impl ThresholdSign {
    fn factor(self) -> f64 {
        match self {
            ThresholdSign::Plus => 1.0,
            ThresholdSign::Minus => -1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IrmGpcm {
    sign: ThresholdSign,
    params: Array1<f64>,
    common: ItemCommon,
}

impl IrmGpcm {
    /// GPCM with `b_v = b + t_v`.
    ///
    /// # Errors
    /// `IrmError::InvalidCategoryCount` for an empty threshold list,
    /// `IrmError::NonFiniteParameter`, `IrmError::InvalidScalingConstant`.
    pub fn gpcm(discrimination: f64, difficulty: f64, thresholds: &[f64], d: f64) -> IrmResult<Self> {
        Self::build(ThresholdSign::Plus, discrimination, difficulty, thresholds, d)
    }

    /// GPCM2 with `b_v = b − t_v`.
    ///
    /// # Errors
    /// Same as [`IrmGpcm::gpcm`].
    pub fn gpcm2(
        discrimination: f64, difficulty: f64, thresholds: &[f64], d: f64,
    ) -> IrmResult<Self> {
        Self::build(ThresholdSign::Minus, discrimination, difficulty, thresholds, d)
    }

    fn build(
        sign: ThresholdSign, a: f64, b: f64, thresholds: &[f64], d: f64,
    ) -> IrmResult<Self> {
        let common = ItemCommon::new(thresholds.len() + 1, d)?;
        let mut params = Vec::with_capacity(thresholds.len() + 2);
        params.push(a);
        params.push(b);
        params.extend_from_slice(thresholds);
        let params = Array1::from(params);
        validate_params(params.view(), thresholds.len() + 2)?;
        Ok(Self { sign, params, common })
    }

    pub fn threshold_sign(&self) -> ThresholdSign {
        self.sign
    }

    pub fn difficulty(&self) -> f64 {
        self.params[1]
    }

    pub fn thresholds(&self) -> Vec<f64> {
        self.params.iter().skip(2).copied().collect()
    }

    fn steps(&self, p: ArrayView1<'_, f64>) -> Vec<f64> {
        let sign = self.sign.factor();
        p.iter().skip(2).map(|t| p[1] + sign * t).collect()
    }

    fn probs_at(&self, theta: f64, p: ArrayView1<'_, f64>, d: f64) -> Vec<f64> {
        category_probabilities(theta, d * p[0], &self.steps(p))
    }
}

impl ItemResponseModel for IrmGpcm {
    fn kind(&self) -> ModelKind {
        match self.sign {
            ThresholdSign::Plus => ModelKind::Gpcm,
            ThresholdSign::Minus => ModelKind::Gpcm2,
        }
    }

    fn common(&self) -> &ItemCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut ItemCommon {
        &mut self.common
    }

    fn ncat(&self) -> usize {
        self.params.len() - 1
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
        self.params[0]
    }

    fn location_parameters(&self) -> Vec<f64> {
        self.steps(self.params.view())
    }

    fn rescale_parameters(
        &self, params: ArrayView1<'_, f64>, transform: &ScaleTransform,
    ) -> Array1<f64> {
        Array1::from_shape_fn(params.len(), |i| match i {
            0 => transform.discrimination(params[0]),
            1 => transform.location(params[1]),
            _ => transform.threshold(params[i]),
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
        let steps = self.steps(params);
        let probs = category_probabilities(theta, d * params[0], &steps);
        // ∂z_k/∂a = D Σ_{v ≤ k} (θ − b_v)
        let mut cum = vec![0.0; steps.len() + 1];
        for (v, b) in steps.iter().enumerate() {
            cum[v + 1] = cum[v] + d * (theta - b);
        }
        let da = d * params[0];
        let sign = self.sign.factor();
        probability_gradient(&probs, category, n, |p, k| match p {
            0 => cum[k],
            1 => -da * k as f64,
            _ => {
                if p - 1 <= k { -da * sign } else { 0.0 }
            }
        })
    }

    /// `D²a²` times the variance of the score weights.
    fn item_information_at(&self, theta: f64) -> f64 {
        let d = self.common.scaling_constant();
        let probs = self.probs_at(theta, self.params.view(), d);
        (d * self.params[0]).powi(2) * score_variance(&probs, self.common.score_weights())
    }

    fn deriv_theta(&self, theta: f64) -> f64 {
        let d = self.common.scaling_constant();
        let probs = self.probs_at(theta, self.params.view(), d);
        expected_score_deriv(&probs, self.common.score_weights(), d * self.params[0])
    }

    fn deriv2_theta(&self, theta: f64) -> f64 {
        let d = self.common.scaling_constant();
        let probs = self.probs_at(theta, self.params.view(), d);
        expected_score_deriv2(&probs, self.common.score_weights(), d * self.params[0])
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
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // GPCM and GPCM2 agree when their thresholds have opposite signs.
    //
    // Given
    // -----
    // - GPCM with t = (−0.5, 0.5) and GPCM2 with t = (0.5, −0.5), same a, b.
    //
    // Expect
    // ------
    // - Identical step locations and category probabilities.
    fn threshold_sign_conventions_mirror_each_other() {
        // Arrange
        let plus = IrmGpcm::gpcm(1.1, 0.2, &[-0.5, 0.5], 1.7).expect("valid GPCM");
        let minus = IrmGpcm::gpcm2(1.1, 0.2, &[0.5, -0.5], 1.7).expect("valid GPCM2");

        // Act / Assert
        assert_eq!(plus.location_parameters(), minus.location_parameters());
        for k in 0..3 {
            approx::assert_abs_diff_eq!(
                plus.probability(0.4, k),
                minus.probability(0.4, k),
                epsilon = 1e-15
            );
        }
        assert_eq!(plus.kind(), ModelKind::Gpcm);
        assert_eq!(minus.kind(), ModelKind::Gpcm2);
    }

    #[test]
    // Purpose
    // -------
    // Analytic gradients agree with central differences for both signs.
    fn gradients_match_finite_differences() {
        let items = [
            IrmGpcm::gpcm(0.9, -0.1, &[-0.8, 0.1, 0.7], 1.7).expect("valid"),
            IrmGpcm::gpcm2(1.3, 0.3, &[0.6, -0.6], 1.0).expect("valid"),
        ];
        let theta = 0.45;
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
    // Information equals D²a² Var(X) and out-of-range categories are zero.
    fn information_and_out_of_range_categories() {
        // Arrange
        let item = IrmGpcm::gpcm(1.2, 0.0, &[-0.4, 0.4], 1.0).expect("valid GPCM");
        let probs = item.category_probabilities(0.3);
        let mean: f64 = probs.iter().enumerate().map(|(k, p)| k as f64 * p).sum();
        let second: f64 = probs.iter().enumerate().map(|(k, p)| (k * k) as f64 * p).sum();

        // Act
        let info = item.item_information_at(0.3);

        // Assert
        approx::assert_abs_diff_eq!(info, 1.44 * (second - mean * mean), epsilon = 1e-12);
        assert_eq!(item.probability(0.3, 3), 0.0);
        assert_eq!(item.gradient(0.3, 7), array![0.0, 0.0, 0.0, 0.0]);
    }
}
