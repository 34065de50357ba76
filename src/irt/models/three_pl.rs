//! Irm3PL — binary logistic family (Rasch, 1PL, 2PL, 3PL, 4PL).
//!
//! Purpose
//! -------
//! Evaluate `P(θ) = c + (u − c) / (1 + exp(−D·a·(θ − b)))` for a correct
//! response (category 1) and `1 − P(θ)` for category 0.
//!
//! Parameter vectors
//! -----------------
//! | kind | vector | stored outside the vector |
//! |---|---|---|
//! | Rasch | `[b]` | `a = 1`, `c = 0`, `u = 1` |
//! | 1PL | `[b]` | common `a`, `c = 0`, `u = 1` |
//! | 2PL | `[a, b]` | `c = 0`, `u = 1` |
//! | 3PL | `[a, b, c]` | `u = 1` |
//! | 4PL | `[a, b, c, u]` | |
//!
//! Inactive items
//! --------------
//! A guessing parameter `c < 0` marks the item as inactive: every category
//! probability, gradient, information, and θ derivative is 0. This is a
//! sentinel, not an error, and constructors accept it.
use ndarray::{Array1, ArrayView1, array};

use crate::{
    irt::{
        core::{
            common::ItemCommon,
            transform::ScaleTransform,
            validation::validate_params,
        },
        errors::IrmResult,
        models::traits::{ItemResponseModel, ModelKind},
    },
    optimization::numerical_stability::safe_logistic,
};

/// Which free parameters a binary item carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BinaryKind {
    Rasch,
    OnePL,
    TwoPL,
    ThreePL,
    FourPL,
}

impl BinaryKind {
    fn n_params(self) -> usize {
        match self {
            BinaryKind::Rasch | BinaryKind::OnePL => 1,
            BinaryKind::TwoPL => 2,
            BinaryKind::ThreePL => 3,
            BinaryKind::FourPL => 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Irm3PL {
    kind: BinaryKind,
    params: Array1<f64>,
    /// Discrimination used when it is not a free parameter.
    fixed_discrimination: f64,
    common: ItemCommon,
}

/// `(a, b, c, u)` resolved from a free vector plus stored state.
#[derive(Debug, Clone, Copy)]
struct Resolved {
    a: f64,
    b: f64,
    c: f64,
    u: f64,
}

impl Irm3PL {
    /// # Errors
    /// `IrmError::NonFiniteParameter`, `IrmError::InvalidScalingConstant`.
    pub fn rasch(difficulty: f64, d: f64) -> IrmResult<Self> {
        Self::build(BinaryKind::Rasch, array![difficulty], 1.0, d)
    }

    /// 1PL with a discrimination shared by the form and held outside the
    /// free vector.
    ///
    /// # Errors
    /// `IrmError::NonFiniteParameter`, `IrmError::InvalidScalingConstant`.
    pub fn one_pl(discrimination: f64, difficulty: f64, d: f64) -> IrmResult<Self> {
        validate_params(array![discrimination].view(), 1)?;
        Self::build(BinaryKind::OnePL, array![difficulty], discrimination, d)
    }

    /// # Errors
    /// `IrmError::NonFiniteParameter`, `IrmError::InvalidScalingConstant`.
    pub fn two_pl(discrimination: f64, difficulty: f64, d: f64) -> IrmResult<Self> {
        Self::build(BinaryKind::TwoPL, array![discrimination, difficulty], 1.0, d)
    }

    /// # Errors
    /// `IrmError::NonFiniteParameter`, `IrmError::InvalidScalingConstant`.
    pub fn three_pl(discrimination: f64, difficulty: f64, guessing: f64, d: f64) -> IrmResult<Self> {
        Self::build(BinaryKind::ThreePL, array![discrimination, difficulty, guessing], 1.0, d)
    }

    /// # Errors
    /// `IrmError::NonFiniteParameter`, `IrmError::InvalidScalingConstant`.
    pub fn four_pl(
        discrimination: f64, difficulty: f64, guessing: f64, slipping: f64, d: f64,
    ) -> IrmResult<Self> {
        Self::build(
            BinaryKind::FourPL,
            array![discrimination, difficulty, guessing, slipping],
            1.0,
            d,
        )
    }

    fn build(kind: BinaryKind, params: Array1<f64>, fixed_a: f64, d: f64) -> IrmResult<Self> {
        let common = ItemCommon::new(2, d)?;
        validate_params(params.view(), kind.n_params())?;
        Ok(Self { kind, params, fixed_discrimination: fixed_a, common })
    }

    pub fn binary_kind(&self) -> BinaryKind {
        self.kind
    }

    pub fn difficulty(&self) -> f64 {
        self.resolve(self.params.view()).b
    }

    pub fn guessing(&self) -> f64 {
        self.resolve(self.params.view()).c
    }

    pub fn slipping(&self) -> f64 {
        self.resolve(self.params.view()).u
    }

    /// `true` when the guessing sentinel switches the item off.
    pub fn is_inactive(&self) -> bool {
        self.guessing() < 0.0
    }

    fn resolve(&self, p: ArrayView1<'_, f64>) -> Resolved {
        match self.kind {
            BinaryKind::Rasch => Resolved { a: 1.0, b: p[0], c: 0.0, u: 1.0 },
            BinaryKind::OnePL => Resolved { a: self.fixed_discrimination, b: p[0], c: 0.0, u: 1.0 },
            BinaryKind::TwoPL => Resolved { a: p[0], b: p[1], c: 0.0, u: 1.0 },
            BinaryKind::ThreePL => Resolved { a: p[0], b: p[1], c: p[2], u: 1.0 },
            BinaryKind::FourPL => Resolved { a: p[0], b: p[1], c: p[2], u: p[3] },
        }
    }

    /// Logistic kernel `σ(D·a·(θ − b))`.
    fn kernel(r: &Resolved, theta: f64, d: f64) -> f64 {
        safe_logistic(d * r.a * (theta - r.b))
    }

    /// Weight difference `w₁ − w₀` scaling the expected score.
    fn weight_span(&self) -> f64 {
        let w = self.common.score_weights();
        w[1] - w[0]
    }
}

impl ItemResponseModel for Irm3PL {
    fn kind(&self) -> ModelKind {
        match self.kind {
            BinaryKind::Rasch => ModelKind::Rasch,
            BinaryKind::OnePL => ModelKind::OnePL,
            BinaryKind::TwoPL => ModelKind::TwoPL,
            BinaryKind::ThreePL => ModelKind::ThreePL,
            BinaryKind::FourPL => ModelKind::FourPL,
        }
    }

    fn common(&self) -> &ItemCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut ItemCommon {
        &mut self.common
    }

    fn ncat(&self) -> usize {
        2
    }

    fn n_params(&self) -> usize {
        self.kind.n_params()
    }

    fn parameters(&self) -> ArrayView1<'_, f64> {
        self.params.view()
    }

    fn store_parameters(&mut self, params: ArrayView1<'_, f64>) {
        self.params.assign(&params);
    }

    fn discrimination(&self) -> f64 {
        self.resolve(self.params.view()).a
    }

    fn location_parameters(&self) -> Vec<f64> {
        vec![self.difficulty()]
    }

    fn rescale_parameters(
        &self, params: ArrayView1<'_, f64>, transform: &ScaleTransform,
    ) -> Array1<f64> {
        let mut out = params.to_owned();
        match self.kind {
            BinaryKind::Rasch | BinaryKind::OnePL => out[0] = transform.location(params[0]),
            _ => {
                out[0] = transform.discrimination(params[0]);
                out[1] = transform.location(params[1]);
            }
        }
        out
    }

    fn probability_at(
        &self, theta: f64, params: ArrayView1<'_, f64>, category: usize, d: f64,
    ) -> f64 {
        if category > 1 {
            return 0.0;
        }
        let r = self.resolve(params);
        if r.c < 0.0 {
            return 0.0;
        }
        let p1 = r.c + (r.u - r.c) * Self::kernel(&r, theta, d);
        if category == 1 { p1 } else { 1.0 - p1 }
    }

    fn gradient_at(
        &self, theta: f64, params: ArrayView1<'_, f64>, category: usize, d: f64,
    ) -> Array1<f64> {
        let n = self.kind.n_params();
        let r = self.resolve(params);
        if category > 1 || r.c < 0.0 {
            return Array1::zeros(n);
        }
        let s = Self::kernel(&r, theta, d);
        let ds = (r.u - r.c) * s * (1.0 - s);
        let db = -ds * d * r.a;
        let mut g = match self.kind {
            BinaryKind::Rasch | BinaryKind::OnePL => array![db],
            BinaryKind::TwoPL => array![ds * d * (theta - r.b), db],
            BinaryKind::ThreePL => array![ds * d * (theta - r.b), db, 1.0 - s],
            BinaryKind::FourPL => array![ds * d * (theta - r.b), db, 1.0 - s, s],
        };
        if category == 0 {
            g.mapv_inplace(|v| -v);
        }
        g
    }

    /// Fisher information `D²a²(P − c)²(u − P)² / [(u − c)² P (1 − P)]`.
    fn item_information_at(&self, theta: f64) -> f64 {
        let r = self.resolve(self.params.view());
        if r.c < 0.0 {
            return 0.0;
        }
        let p = self.probability(theta, 1);
        let q = 1.0 - p;
        if p <= 0.0 || q <= 0.0 {
            return 0.0;
        }
        let d = self.common.scaling_constant();
        let num = (d * r.a).powi(2) * (p - r.c).powi(2) * (r.u - p).powi(2);
        let den = (r.u - r.c).powi(2) * p * q;
        num / den
    }

    fn deriv_theta(&self, theta: f64) -> f64 {
        let r = self.resolve(self.params.view());
        if r.c < 0.0 {
            return 0.0;
        }
        let d = self.common.scaling_constant();
        let s = Self::kernel(&r, theta, d);
        self.weight_span() * (r.u - r.c) * d * r.a * s * (1.0 - s)
    }

    fn deriv2_theta(&self, theta: f64) -> f64 {
        let r = self.resolve(self.params.view());
        if r.c < 0.0 {
            return 0.0;
        }
        let d = self.common.scaling_constant();
        let s = Self::kernel(&r, theta, d);
        self.weight_span() * (r.u - r.c) * (d * r.a).powi(2) * s * (1.0 - s) * (1.0 - 2.0 * s)
    }

    fn lower_asymptote_score(&self) -> f64 {
        let c = self.guessing();
        if c < 0.0 {
            return 0.0;
        }
        self.min_score() + c * self.weight_span()
    }

    fn upper_asymptote_score(&self) -> f64 {
        let r = self.resolve(self.params.view());
        if r.c < 0.0 {
            return 0.0;
        }
        self.min_score() + r.u * self.weight_span()
    }

    fn expected_value(&self, theta: f64) -> f64 {
        if self.is_inactive() {
            return 0.0;
        }
        let w = self.common.score_weights();
        w[0] * self.probability(theta, 0) + w[1] * self.probability(theta, 1)
    }

    fn apply_transform(&mut self, transform: &ScaleTransform) {
        self.params = self.rescale_parameters(self.params.view(), transform);
        if self.kind == BinaryKind::OnePL {
            self.fixed_discrimination = transform.discrimination(self.fixed_discrimination);
        }
    }

    fn clone_box(&self) -> Box<dyn ItemResponseModel> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::irt::errors::IrmError;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // Closed-form probabilities, gradients, information, and θ derivatives of
    // the binary family, plus the inactive-item sentinel.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // The 3PL probability matches its closed form and categories sum to one.
    //
    // Given
    // -----
    // - a = 1.2, b = 0.3, c = 0.2, D = 1.7 at θ = 0.8.
    //
    // Expect
    // ------
    // - P₁ = 0.2 + 0.8 σ(1.7·1.2·0.5), P₀ = 1 − P₁.
    fn three_pl_probability_matches_closed_form() {
        // Arrange
        let item = Irm3PL::three_pl(1.2, 0.3, 0.2, 1.7).expect("valid 3PL");
        let expected = 0.2 + 0.8 / (1.0 + (-1.7f64 * 1.2 * 0.5).exp());

        // Act
        let p1 = item.probability(0.8, 1);
        let p0 = item.probability(0.8, 0);

        // Assert
        approx::assert_abs_diff_eq!(p1, expected, epsilon = 1e-14);
        approx::assert_abs_diff_eq!(p0 + p1, 1.0, epsilon = 1e-14);
        assert_eq!(item.probability(0.8, 2), 0.0);
        approx::assert_abs_diff_eq!(item.expected_value(0.8), p1, epsilon = 1e-14);
    }

    #[test]
    // Purpose
    // -------
    // Analytic gradients of every binary kind agree with central differences
    // of `probability_with`.
    fn analytic_gradients_match_finite_differences() {
        let items = [
            Irm3PL::rasch(-0.4, 1.0).expect("valid"),
            Irm3PL::one_pl(0.9, 0.1, 1.7).expect("valid"),
            Irm3PL::two_pl(1.4, -0.2, 1.702).expect("valid"),
            Irm3PL::three_pl(0.8, 0.5, 0.15, 1.7).expect("valid"),
            Irm3PL::four_pl(1.1, 0.0, 0.1, 0.95, 1.7).expect("valid"),
        ];
        let theta = 0.35;
        for item in &items {
            for category in 0..2 {
                // Arrange
                let params = item.item_parameters();
                let d = item.scaling_constant();

                // Act
                let g = item.gradient(theta, category);

                // Assert
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
    // Information reduces to the 2PL form D²a²PQ when c = 0 and u = 1.
    fn information_reduces_to_two_pl_form() {
        // Arrange
        let item = Irm3PL::two_pl(1.3, 0.2, 1.7).expect("valid 2PL");
        let theta = -0.6;
        let p = item.probability(theta, 1);

        // Act
        let info = item.item_information_at(theta);

        // Assert
        approx::assert_abs_diff_eq!(info, (1.7f64 * 1.3).powi(2) * p * (1.0 - p), epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // θ derivatives of the expected score agree with finite differences.
    fn theta_derivatives_match_finite_differences() {
        // Arrange
        let item = Irm3PL::four_pl(1.1, 0.4, 0.2, 0.9, 1.7).expect("valid 4PL");
        let theta = 0.1;
        let h = 1e-5;
        let e = |t: f64| item.expected_value(t);

        // Act / Assert
        approx::assert_abs_diff_eq!(
            item.deriv_theta(theta),
            (e(theta + h) - e(theta - h)) / (2.0 * h),
            epsilon = 1e-8
        );
        approx::assert_abs_diff_eq!(
            item.deriv2_theta(theta),
            (e(theta + h) - 2.0 * e(theta) + e(theta - h)) / (h * h),
            epsilon = 1e-4
        );
    }

    #[test]
    // Purpose
    // -------
    // A negative guessing parameter switches the item off without an error.
    fn negative_guessing_marks_item_inactive() {
        // Arrange
        let item = Irm3PL::three_pl(1.0, 0.0, -1.0, 1.7).expect("sentinel is accepted");

        // Act / Assert
        assert!(item.is_inactive());
        assert_eq!(item.probability(0.0, 1), 0.0);
        assert_eq!(item.probability(0.0, 0), 0.0);
        assert_eq!(item.expected_value(2.0), 0.0);
        assert_eq!(item.item_information_at(0.0), 0.0);
        assert!(item.gradient(0.0, 1).iter().all(|&g| g == 0.0));
    }

    #[test]
    // Purpose
    // -------
    // Vector-based evaluation rejects vectors of the wrong length.
    fn probability_with_rejects_wrong_length() {
        let item = Irm3PL::three_pl(1.0, 0.0, 0.2, 1.7).expect("valid 3PL");
        let err = item.probability_with(0.0, &array![1.0, 0.0], 1, 1.7).expect_err("mismatch");
        assert_eq!(err, IrmError::ParameterDimMismatch { expected: 3, found: 2 });
    }

    #[test]
    // Purpose
    // -------
    // Scaling a 1PL item rescales the shared discrimination held outside the
    // free vector; a fixed item is untouched.
    fn scale_updates_one_pl_discrimination_and_respects_fixed() {
        // Arrange
        let mut item = Irm3PL::one_pl(1.0, 0.5, 1.0).expect("valid 1PL");
        let mut fixed = item.clone();
        fixed.set_fixed(true);

        // Act
        item.scale(0.25, 2.0).expect("finite coefficients");
        fixed.scale(0.25, 2.0).expect("no-op");

        // Assert
        approx::assert_abs_diff_eq!(item.discrimination(), 0.5);
        approx::assert_abs_diff_eq!(item.difficulty(), 1.25);
        assert_eq!(fixed.difficulty(), 0.5);
        assert!(item.scale(0.0, 0.0).is_err());
    }
}
