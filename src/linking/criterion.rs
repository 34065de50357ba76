//! Characteristic-curve criteria (Haebara, Stocking-Lord).
//!
//! Purpose
//! -------
//! Measure, for trial coefficients `(B, A)`, the weighted squared
//! discrepancy between the common items of two forms once one form is
//! placed on the other's scale. The criterion is exposed to the minimizer
//! through [`Objective`].
//!
//! Key behaviors
//! -------------
//! - `Q1` integrates over Form X's quadrature and compares Form X items
//!   with Form Y items under the sharp transform.
//! - `Q2` integrates over Form Y's quadrature and compares Form Y items
//!   with Form X items under the star transform.
//! - `Q1Q2` reports `(Q1 + Q2) / 2`.
//! - Haebara sums squared category-probability differences over items and
//!   categories; Stocking-Lord squares the difference of the common-item
//!   test characteristic curves.
//!
//! Invariants & assumptions
//! ------------------------
//! - Evaluation is pure: the forms are never mutated and trial items are
//!   rescaled copies.
//! - Quadrature weights are divided by their sum.
//! - Any finite `(B, A)` yields a finite value; non-finite arithmetic is
//!   replaced by [`LINKING_PENALTY`].
//!
//! Conventions
//! -----------
//! - Full parameter vector `x = [B, A]`. In Rasch mode `x = [B]` and the
//!   slope is fixed at 1.
//! - Rasch mode is also used when every common item on both forms is a
//!   Rasch-family model ([`ModelKind::is_rasch_family`]); their slopes never
//!   move, so the slope is not identified by the criterion.
//!
//! [`ModelKind::is_rasch_family`]: crate::irt::ModelKind::is_rasch_family
use rayon::prelude::*;

use crate::{
    irt::{
        collection::ItemCollection, core::transform::ScaleTransform,
        models::traits::ItemResponseModel,
    },
    linking::{
        anchor::{AnchorPair, anchor_pairs},
        options::{CriterionType, CurveMethod},
    },
    optimization::{
        errors::OptResult,
        minimizer::{
            traits::Objective,
            types::{Cost, Point},
        },
        numerical_stability::LINKING_PENALTY,
    },
    quadrature::rule::QuadratureRule,
};

/// Quadrature points with normalized weights, or `None` for zero weight.
#[derive(Debug, Clone)]
struct Basis {
    points: Vec<f64>,
    weights: Option<Vec<f64>>,
}

impl Basis {
    fn new(rule: &QuadratureRule) -> Self {
        Self { points: rule.points().to_vec(), weights: rule.normalized_weights() }
    }
}

/// Which form supplies the reference curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    X,
    Y,
}

#[derive(Debug, Clone)]
pub struct CharacteristicCurveCriterion<'a> {
    method: CurveMethod,
    criterion: CriterionType,
    pairs: Vec<AnchorPair<'a>>,
    x_basis: Basis,
    y_basis: Basis,
    rasch: bool,
}

impl<'a> CharacteristicCurveCriterion<'a> {
    pub fn new(
        form_x: &'a ItemCollection, form_y: &'a ItemCollection, quad_x: &QuadratureRule,
        quad_y: &QuadratureRule, method: CurveMethod, criterion: CriterionType, rasch: bool,
    ) -> Self {
        let pairs = anchor_pairs(form_x, form_y);
        let rasch_only = !pairs.is_empty()
            && pairs.iter().all(|p| p.x.kind().is_rasch_family() && p.y.kind().is_rasch_family());
        if rasch_only && !rasch {
            tracing::debug!(
                n_common = pairs.len(),
                "all common items are Rasch-family; searching the intercept only"
            );
        }
        Self {
            method,
            criterion,
            pairs,
            x_basis: Basis::new(quad_x),
            y_basis: Basis::new(quad_y),
            rasch: rasch || rasch_only,
        }
    }

    /// `true` when the search runs over the intercept alone.
    pub fn is_intercept_only(&self) -> bool {
        self.rasch
    }

    pub fn method(&self) -> CurveMethod {
        self.method
    }

    pub fn n_common(&self) -> usize {
        self.pairs.len()
    }

    /// `true` when there is nothing to compare: no usable common items or
    /// a zero-weight quadrature on a side the criterion integrates over.
    pub fn is_degenerate(&self) -> bool {
        let y_needed = self.criterion == CriterionType::Q1Q2;
        self.pairs.is_empty()
            || self.x_basis.weights.is_none()
            || (y_needed && self.y_basis.weights.is_none())
    }

    /// Criterion value at `(intercept, slope)`.
    pub fn evaluate(&self, intercept: f64, slope: f64) -> f64 {
        let q1 = self.discrepancy(Side::X, intercept, slope);
        let value = match self.criterion {
            CriterionType::Q1 => q1,
            CriterionType::Q1Q2 => 0.5 * (q1 + self.discrepancy(Side::Y, intercept, slope)),
        };
        if value.is_finite() { value } else { LINKING_PENALTY }
    }

    /// Split an optimizer point into `(intercept, slope)`.
    pub fn coefficients(&self, x: &Point) -> (f64, f64) {
        if self.rasch { (x[0], 1.0) } else { (x[0], x[1]) }
    }

    fn discrepancy(&self, side: Side, intercept: f64, slope: f64) -> f64 {
        let (basis, transform) = match side {
            Side::X => (&self.x_basis, ScaleTransform::sharp(intercept, slope)),
            Side::Y => (&self.y_basis, ScaleTransform::star(intercept, slope)),
        };
        let Some(weights) = basis.weights.as_ref() else {
            return f64::NAN;
        };
        let reference: Vec<&dyn ItemResponseModel> = self
            .pairs
            .iter()
            .map(|p| match side {
                Side::X => p.x,
                Side::Y => p.y,
            })
            .collect();
        let moved: Vec<Box<dyn ItemResponseModel>> = self
            .pairs
            .iter()
            .map(|p| match side {
                Side::X => p.y.rescaled(&transform),
                Side::Y => p.x.rescaled(&transform),
            })
            .collect();

        basis
            .points
            .par_iter()
            .zip(weights.par_iter())
            .filter(|(_, w)| **w > 0.0)
            .map(|(&theta, &w)| w * self.point_discrepancy(theta, &reference, &moved))
            .sum()
    }

    fn point_discrepancy(
        &self, theta: f64, reference: &[&dyn ItemResponseModel], moved: &[Box<dyn ItemResponseModel>],
    ) -> f64 {
        match self.method {
            CurveMethod::Haebara => reference
                .iter()
                .zip(moved)
                .map(|(r, m)| {
                    (0..r.ncat())
                        .map(|k| (r.probability(theta, k) - m.probability(theta, k)).powi(2))
                        .sum::<f64>()
                })
                .sum(),
            CurveMethod::StockingLord => {
                let tcc_ref: f64 = reference.iter().map(|r| r.expected_value(theta)).sum();
                let tcc_moved: f64 = moved.iter().map(|m| m.expected_value(theta)).sum();
                (tcc_ref - tcc_moved).powi(2)
            }
        }
    }
}

impl Objective for CharacteristicCurveCriterion<'_> {
    fn dim(&self) -> usize {
        if self.rasch { 1 } else { 2 }
    }

    fn value(&self, x: &Point) -> OptResult<Cost> {
        let (intercept, slope) = self.coefficients(x);
        Ok(self.evaluate(intercept, slope))
    }
}
