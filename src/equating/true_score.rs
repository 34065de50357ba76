//! TrueScoreEquating — IRT true-score equating of Form X onto Form Y.
//!
//! Purpose
//! -------
//! For every integer raw score `s = 0..=max_score_x`, find `θ(s)` with
//! `TCC_X(θ) = s` and report `TCC_Y(θ(s))` as the Form Y equivalent.
//!
//! Key behaviors
//! -------------
//! - Scores at or below Form X's lower asymptote get [`THETA_LOWER_SENTINEL`]
//!   and scores at or above its upper asymptote get [`THETA_UPPER_SENTINEL`].
//!   Their Y equivalents interpolate linearly between the form minimum and
//!   the lower asymptote (or the upper asymptote and the maximum) on each
//!   form, so score 0 maps to Y's minimum and the maximum to Y's maximum.
//! - Reachable scores: Newton steps on a shrinking bracket, clamped to
//!   `±max_step`, with bisection whenever a step leaves the bracket or the
//!   slope is unusable.
//! - Scores are solved independently and in parallel with `rayon`.
//!
//! Invariants & assumptions
//! ------------------------
//! - `TCC_X` is non-decreasing in θ, which holds for every model here.
//! - Forms are borrowed immutably; the table is the only output.
use rayon::prelude::*;

use crate::{
    equating::{
        errors::{EquatingError, EquatingResult},
        options::EquatingOptions,
    },
    irt::collection::ItemCollection,
};

/// Ability reported for scores at or below the lower asymptote.
pub const THETA_LOWER_SENTINEL: f64 = -99.0;
/// Ability reported for scores at or above the upper asymptote.
pub const THETA_UPPER_SENTINEL: f64 = 99.0;

/// Parallel arrays indexed by Form X raw score.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EquatingTable {
    pub theta: Vec<f64>,
    pub y_equivalent: Vec<f64>,
}

impl EquatingTable {
    pub fn len(&self) -> usize {
        self.theta.len()
    }

    pub fn is_empty(&self) -> bool {
        self.theta.is_empty()
    }
}

/// Score bounds of one form.
#[derive(Debug, Clone, Copy)]
struct ScoreBounds {
    min: f64,
    lower: f64,
    upper: f64,
    max: f64,
}

impl ScoreBounds {
    fn of(form: &ItemCollection) -> Self {
        Self {
            min: form.min_score(),
            lower: form.lower_asymptote_score(),
            upper: form.upper_asymptote_score(),
            max: form.max_score(),
        }
    }
}

/// Linear interpolation of `s` from `[x0, x1]` onto `[y0, y1]`; `y0` for a
/// degenerate source interval.
fn interpolate(s: f64, x0: f64, x1: f64, y0: f64, y1: f64) -> f64 {
    if x1 - x0 <= 0.0 { y0 } else { y0 + (s - x0) * (y1 - y0) / (x1 - x0) }
}

#[derive(Debug, Clone)]
pub struct TrueScoreEquating<'a> {
    form_x: &'a ItemCollection,
    form_y: &'a ItemCollection,
    options: EquatingOptions,
}

impl<'a> TrueScoreEquating<'a> {
    /// # Errors
    /// [`EquatingError::EmptyForm`] when either form has no items;
    /// [`EquatingError::NonFiniteMaxScore`] when Form X's maximum score is
    /// not finite.
    pub fn new(
        form_x: &'a ItemCollection, form_y: &'a ItemCollection, options: EquatingOptions,
    ) -> EquatingResult<Self> {
        if form_x.is_empty() {
            return Err(EquatingError::EmptyForm { form: "X" });
        }
        if form_y.is_empty() {
            return Err(EquatingError::EmptyForm { form: "Y" });
        }
        let max = form_x.max_score();
        if !max.is_finite() {
            return Err(EquatingError::NonFiniteMaxScore { value: max });
        }
        Ok(Self { form_x, form_y, options })
    }

    pub fn options(&self) -> &EquatingOptions {
        &self.options
    }

    /// Equate every integer raw score of Form X.
    pub fn equate(&self) -> EquatingTable {
        let bx = ScoreBounds::of(self.form_x);
        let by = ScoreBounds::of(self.form_y);
        let top = bx.max.max(0.0).floor() as usize;

        let (theta, y_equivalent): (Vec<f64>, Vec<f64>) = (0..=top)
            .into_par_iter()
            .map(|s| self.equate_score(s as f64, &bx, &by))
            .unzip();
        EquatingTable { theta, y_equivalent }
    }

    fn equate_score(&self, s: f64, bx: &ScoreBounds, by: &ScoreBounds) -> (f64, f64) {
        if s <= bx.lower {
            let y = if s <= bx.min {
                by.min
            } else {
                interpolate(s, bx.min, bx.lower, by.min, by.lower)
            };
            return (THETA_LOWER_SENTINEL, y);
        }
        if s >= bx.upper {
            let y = if s >= bx.max {
                by.max
            } else {
                interpolate(s, bx.upper, bx.max, by.upper, by.max)
            };
            return (THETA_UPPER_SENTINEL, y);
        }
        let theta = self.solve_theta(s);
        (theta, self.form_y.tcc(theta))
    }

    /// Ability with `TCC_X(θ) = s` for a score strictly between the
    /// asymptotes.
    pub fn solve_theta(&self, s: f64) -> f64 {
        let EquatingOptions { tol, max_iter, theta_bound, max_step } = self.options;
        let f = |theta: f64| self.form_x.tcc(theta) - s;

        let (mut lo, mut hi) = (-theta_bound, theta_bound);
        if f(lo) >= 0.0 {
            tracing::debug!(score = s, theta = lo, "score below the search bracket");
            return lo;
        }
        if f(hi) <= 0.0 {
            tracing::debug!(score = s, theta = hi, "score above the search bracket");
            return hi;
        }

        let mut theta = 0.0_f64.clamp(lo, hi);
        for _ in 0..max_iter {
            let value = f(theta);
            if value.abs() < tol {
                return theta;
            }
            if value < 0.0 {
                lo = theta;
            } else {
                hi = theta;
            }
            if hi - lo < tol {
                return 0.5 * (lo + hi);
            }

            let slope = self.form_x.tcc_deriv(theta);
            let newton = if slope > 0.0 && slope.is_finite() {
                theta + (-value / slope).clamp(-max_step, max_step)
            } else {
                f64::NAN
            };
            theta = if newton > lo && newton < hi { newton } else { 0.5 * (lo + hi) };
        }

        let mid = 0.5 * (lo + hi);
        tracing::debug!(score = s, theta = mid, max_iter, "true-score search did not converge");
        mid
    }
}
