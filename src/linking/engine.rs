//! IrtScaleLinking — orchestration of the four linking methods.
//!
//! Purpose
//! -------
//! Compute Mean/Mean, Mean/Sigma, Haebara, and Stocking-Lord coefficients
//! `(B, A)` placing Form X on Form Y's scale, and apply a chosen pair to a
//! form once every criterion evaluation is done.
//!
//! Key behaviors
//! -------------
//! - The characteristic-curve searches start from Mean/Sigma when those
//!   coefficients are finite with a positive slope, otherwise from `(0, 1)`.
//! - `restarts > 0` adds seeded random starts around that point and keeps
//!   the lowest minimum. A start whose search fails is skipped; the error
//!   surfaces only when every start fails.
//! - Reported values are rounded to `precision` digits; the searches run
//!   on unrounded arithmetic.
//!
//! Invariants & assumptions
//! ------------------------
//! - The forms are only borrowed immutably here; [`transform_form`] is the
//!   single mutation point.
//! - No common items, or a zero-weight quadrature the criterion needs,
//!   gives NaN coefficients without calling the minimizer.
//! - An anchor set made only of Rasch-family items is linked by the
//!   intercept-only search even when `rasch` is off; the slope is reported
//!   as 1.
//! - The Hager–Zhang line search is refused with
//!   [`LinkingError::UnsupportedSolver`] however the options were built.
use ndarray::{Array1, array};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

use crate::{
    irt::collection::ItemCollection,
    linking::{
        criterion::CharacteristicCurveCriterion,
        descriptive::{mean_mean, mean_sigma},
        errors::{LinkingError, LinkingResult},
        options::{CurveMethod, LinkingOptions, check_solver},
    },
    optimization::{
        errors::{OptError, OptResult},
        minimizer::{api::minimize, traits::MinimizeOutcome, types::Point},
        numerical_stability::round_to,
    },
    quadrature::rule::QuadratureRule,
};

/// Half-width of the intercept perturbation used for restarts.
const RESTART_INTERCEPT_SPREAD: f64 = 1.0;
/// Half-width of the log-slope perturbation used for restarts.
const RESTART_LOG_SLOPE_SPREAD: f64 = 0.5;

/// One `(B, A)` pair, with the achieved criterion value for the
/// characteristic-curve methods.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinkingCoefficients {
    pub intercept: f64,
    pub slope: f64,
    pub objective: Option<f64>,
}

impl LinkingCoefficients {
    pub fn new(intercept: f64, slope: f64, objective: Option<f64>) -> Self {
        Self { intercept, slope, objective }
    }

    /// NaN coefficients for inputs with nothing to link.
    pub fn undefined() -> Self {
        Self { intercept: f64::NAN, slope: f64::NAN, objective: None }
    }

    pub fn is_finite(&self) -> bool {
        self.intercept.is_finite() && self.slope.is_finite()
    }

    /// Copy with every value rounded to `digits` decimals.
    pub fn rounded(&self, digits: u32) -> Self {
        Self {
            intercept: round_to(self.intercept, digits),
            slope: round_to(self.slope, digits),
            objective: self.objective.map(|v| round_to(v, digits)),
        }
    }
}

/// Coefficients from all four methods.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinkingSummary {
    pub mean_mean: LinkingCoefficients,
    pub mean_sigma: LinkingCoefficients,
    pub haebara: LinkingCoefficients,
    pub stocking_lord: LinkingCoefficients,
}

#[derive(Debug, Clone)]
pub struct IrtScaleLinking<'a> {
    form_x: &'a ItemCollection,
    form_y: &'a ItemCollection,
    quad_x: &'a QuadratureRule,
    quad_y: &'a QuadratureRule,
    options: LinkingOptions,
}

impl<'a> IrtScaleLinking<'a> {
    pub fn new(
        form_x: &'a ItemCollection, form_y: &'a ItemCollection, quad_x: &'a QuadratureRule,
        quad_y: &'a QuadratureRule, options: LinkingOptions,
    ) -> Self {
        Self { form_x, form_y, quad_x, quad_y, options }
    }

    pub fn options(&self) -> &LinkingOptions {
        &self.options
    }

    pub fn mean_mean(&self) -> LinkingCoefficients {
        mean_mean(self.form_x, self.form_y, self.options.rasch).rounded(self.options.precision)
    }

    pub fn mean_sigma(&self) -> LinkingCoefficients {
        mean_sigma(self.form_x, self.form_y, self.options.rasch).rounded(self.options.precision)
    }

    /// # Errors
    /// Propagates the minimizer failure when no start succeeds.
    pub fn haebara(&self) -> LinkingResult<LinkingCoefficients> {
        Ok(self.characteristic_curve(CurveMethod::Haebara)?.rounded(self.options.precision))
    }

    /// # Errors
    /// Propagates the minimizer failure when no start succeeds.
    pub fn stocking_lord(&self) -> LinkingResult<LinkingCoefficients> {
        Ok(self.characteristic_curve(CurveMethod::StockingLord)?.rounded(self.options.precision))
    }

    /// Run all four methods.
    ///
    /// # Errors
    /// Propagates minimizer failures from either characteristic-curve
    /// method when none of its starts succeed.
    pub fn compute(&self) -> LinkingResult<LinkingSummary> {
        Ok(LinkingSummary {
            mean_mean: self.mean_mean(),
            mean_sigma: self.mean_sigma(),
            haebara: self.haebara()?,
            stocking_lord: self.stocking_lord()?,
        })
    }

    /// Criterion for `method` under the configured options.
    pub fn criterion(&self, method: CurveMethod) -> CharacteristicCurveCriterion<'a> {
        CharacteristicCurveCriterion::new(
            self.form_x,
            self.form_y,
            self.quad_x,
            self.quad_y,
            method,
            self.options.criterion,
            self.options.rasch,
        )
    }

    /// Unrounded characteristic-curve coefficients.
    fn characteristic_curve(&self, method: CurveMethod) -> LinkingResult<LinkingCoefficients> {
        let criterion = self.criterion(method);
        if criterion.is_degenerate() {
            tracing::debug!(?method, "degenerate linking input; returning NaN coefficients");
            return Ok(LinkingCoefficients::undefined());
        }

        if criterion.is_intercept_only() && !self.options.rasch {
            tracing::debug!(?method, "Rasch-family anchor set; slope fixed at 1");
        }
        check_solver(self.options.minimizer.solver)?;

        let (b0, a0) = self.start_values();
        let mut starts = vec![Self::point(&criterion, b0, a0)];
        let mut rng = Pcg64::seed_from_u64(self.options.seed);
        for _ in 0..self.options.restarts {
            let b = b0 + rng.gen_range(-RESTART_INTERCEPT_SPREAD..RESTART_INTERCEPT_SPREAD);
            let a = a0 * rng.gen_range(-RESTART_LOG_SLOPE_SPREAD..RESTART_LOG_SLOPE_SPREAD).exp();
            starts.push(Self::point(&criterion, b, a));
        }

        let mut best: Option<MinimizeOutcome> = None;
        let mut first_err: Option<OptError> = None;
        for (start, x0) in starts.into_iter().enumerate() {
            match self.search(&criterion, x0) {
                Ok(outcome) => {
                    if best.as_ref().is_none_or(|b| outcome.value < b.value) {
                        best = Some(outcome);
                    }
                }
                Err(err) => {
                    tracing::debug!(start, %err, "linking search failed from this start");
                    first_err.get_or_insert(err);
                }
            }
        }
        let best = match (best, first_err) {
            (Some(best), _) => best,
            (None, Some(err)) => return Err(err.into()),
            (None, None) => return Ok(LinkingCoefficients::undefined()),
        };

        let (intercept, slope) = criterion.coefficients(&best.x_hat);
        tracing::debug!(
            ?method,
            intercept,
            slope,
            objective = best.value,
            iterations = best.iterations,
            "characteristic curve linking finished"
        );
        Ok(LinkingCoefficients::new(intercept, slope, Some(best.value)))
    }

    fn search(
        &self, criterion: &CharacteristicCurveCriterion<'_>, x0: Point,
    ) -> OptResult<MinimizeOutcome> {
        let outcome = minimize(criterion, x0, &self.options.minimizer)?;
        if !outcome.converged {
            tracing::debug!(
                method = ?criterion.method(),
                status = %outcome.status,
                "minimizer stopped before convergence"
            );
        }
        Ok(outcome)
    }

    fn start_values(&self) -> (f64, f64) {
        let ms = mean_sigma(self.form_x, self.form_y, self.options.rasch);
        if ms.is_finite() && ms.slope > 0.0 {
            (ms.intercept, ms.slope)
        } else {
            tracing::debug!("mean/sigma start unavailable; starting from (0, 1)");
            (0.0, 1.0)
        }
    }

    fn point(criterion: &CharacteristicCurveCriterion<'_>, intercept: f64, slope: f64) -> Point {
        if criterion.is_intercept_only() {
            Array1::from_elem(1, intercept)
        } else {
            array![intercept, slope]
        }
    }
}

/// Place `form` on the target scale with `coefficients` (star direction).
/// Fixed items are left unchanged.
///
/// # Errors
/// [`LinkingError::InvalidCoefficients`] for non-finite coefficients or a
/// zero slope; model errors from individual items are propagated.
pub fn transform_form(
    form: &mut ItemCollection, coefficients: &LinkingCoefficients,
) -> LinkingResult<()> {
    let LinkingCoefficients { intercept, slope, .. } = *coefficients;
    if !coefficients.is_finite() || slope == 0.0 {
        return Err(LinkingError::InvalidCoefficients { intercept, slope });
    }
    form.scale_all(intercept, slope)?;
    Ok(())
}
