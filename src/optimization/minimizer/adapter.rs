//! Adapter that exposes a user [`Objective`] as an `argmin` problem.
//!
//! The cost is the objective value itself. Analytic gradients are passed
//! through after validation; when none is provided the cost closure is
//! finite-differenced (central first, forward as fallback).
//!
//! Every cost evaluation, including those made for finite differences,
//! counts against an optional budget. Line searches run their own inner
//! loops that the solver's iteration cap does not reach; the budget is what
//! bounds them.
use std::cell::{Cell, RefCell};

use crate::optimization::{
    errors::OptError,
    minimizer::{
        finite_diff::run_fd_diff,
        traits::Objective,
        types::{Cost, Grad, Point},
        validation::validate_grad,
    },
};
use argmin::core::{CostFunction, Error, Gradient};
use finitediff::FiniteDiff;

/// Bridges a user [`Objective`] to `argmin`'s `CostFunction` and `Gradient`.
#[derive(Debug, Clone)]
pub struct ArgMinAdapter<'a, F: Objective> {
    pub f: &'a F,
    max_evals: Option<usize>,
    evals: Cell<usize>,
}

impl<'a, F: Objective> CostFunction for ArgMinAdapter<'a, F> {
    type Param = Point;
    type Output = Cost;

    /// Evaluate `f(x)`; a non-finite value becomes `OptError::NonFiniteCost`
    /// and an exhausted budget `OptError::EvaluationBudgetExceeded`.
    fn cost(&self, x: &Self::Param) -> Result<Self::Output, Error> {
        let evals = self.evals.get() + 1;
        if let Some(max_evals) = self.max_evals {
            if evals > max_evals {
                return Err((OptError::EvaluationBudgetExceeded { max_evals }).into());
            }
        }
        self.evals.set(evals);
        let output = self.f.value(x)?;
        if !output.is_finite() {
            return Err((OptError::NonFiniteCost { value: output }).into());
        }
        Ok(output)
    }
}

impl<'a, F: Objective> Gradient for ArgMinAdapter<'a, F> {
    type Param = Point;
    type Gradient = Grad;

    /// Evaluate the gradient of the cost at `x`.
    ///
    /// Behavior:
    /// - If the user implements `grad(x)`, we validate it and return it.
    /// - Otherwise, we compute a finite-difference gradient of the cost:
    ///   central differences first; if any cost evaluation failed (captured
    ///   via `closure_err`) or the result fails validation, retry once with
    ///   forward differences.
    ///
    /// The FD closure must return `f64`, so the first error is parked in
    /// `closure_err` and the closure returns `NaN`.
    fn gradient(&self, x: &Self::Param) -> Result<Self::Gradient, Error> {
        let dim = x.len();
        match self.f.grad(x) {
            Ok(g) => {
                validate_grad(&g, dim)?;
                Ok(g)
            }
            Err(OptError::GradientNotImplemented) => {
                let closure_err: RefCell<Option<Error>> = RefCell::new(None);
                let cost_func = |x: &Point| -> f64 {
                    match self.cost(x) {
                        Ok(val) => val,
                        Err(e) => {
                            let mut slot = closure_err.borrow_mut();
                            if slot.is_none() {
                                *slot = Some(e);
                            }
                            f64::NAN
                        }
                    }
                };
                let fd_grad = x.central_diff(&cost_func);
                if closure_err.borrow().is_some() || validate_grad(&fd_grad, dim).is_err() {
                    return Ok(run_fd_diff(x, &cost_func, &closure_err)?);
                }
                Ok(fd_grad)
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl<'a, F: Objective> ArgMinAdapter<'a, F> {
    /// Construct a new adapter over a user [`Objective`] with no
    /// evaluation budget.
    pub fn new(f: &'a F) -> Self {
        Self { f, max_evals: None, evals: Cell::new(0) }
    }

    /// Adapter that fails once more than `max_evals` costs were requested.
    pub fn with_budget(f: &'a F, max_evals: usize) -> Self {
        Self { f, max_evals: Some(max_evals), evals: Cell::new(0) }
    }

    /// Cost evaluations made so far.
    pub fn evaluations(&self) -> usize {
        self.evals.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::errors::OptResult;
    use ndarray::array;

    struct Bowl;

    impl Objective for Bowl {
        fn dim(&self) -> usize {
            2
        }
        fn value(&self, x: &Point) -> OptResult<Cost> {
            Ok((x[0] - 1.0).powi(2) + 3.0 * (x[1] + 2.0).powi(2))
        }
    }

    struct Cliff;

    impl Objective for Cliff {
        fn dim(&self) -> usize {
            1
        }
        fn value(&self, x: &Point) -> OptResult<Cost> {
            Ok(if x[0] > 0.0 { f64::INFINITY } else { x[0] * x[0] })
        }
    }

    #[test]
    // Purpose
    // -------
    // Without an analytic gradient the adapter falls back to central
    // differences that match the closed form.
    //
    // Given
    // -----
    // - f(x, y) = (x − 1)² + 3(y + 2)² evaluated at (0, 0).
    //
    // Expect
    // ------
    // - ∇f ≈ (−2, 12).
    fn finite_difference_gradient_matches_closed_form() {
        // Arrange
        let f = Bowl;
        let adapter = ArgMinAdapter::new(&f);

        // Act
        let g = adapter.gradient(&array![0.0, 0.0]).expect("gradient should be finite");

        // Assert
        approx::assert_abs_diff_eq!(g[0], -2.0, epsilon = 1e-5);
        approx::assert_abs_diff_eq!(g[1], 12.0, epsilon = 1e-5);
    }

    #[test]
    // Purpose
    // -------
    // Non-finite objective values surface as errors at the cost boundary.
    fn non_finite_cost_is_an_error() {
        // Arrange
        let f = Cliff;
        let adapter = ArgMinAdapter::new(&f);

        // Act
        let err = adapter.cost(&array![1.0]).expect_err("infinite cost must fail");

        // Assert
        assert_eq!(OptError::from(err), OptError::NonFiniteCost { value: f64::INFINITY });
    }

    #[test]
    // Purpose
    // -------
    // Finite-difference gradients draw on the same budget as plain costs,
    // and the first request past the budget fails.
    //
    // Given
    // -----
    // - A 2-D bowl with a budget of 5 evaluations.
    //
    // Expect
    // ------
    // - One cost plus a central-difference gradient (4 costs) fit exactly.
    // - The next cost fails with `EvaluationBudgetExceeded`.
    fn evaluation_budget_counts_finite_difference_costs() {
        // Arrange
        let f = Bowl;
        let adapter = ArgMinAdapter::with_budget(&f, 5);

        // Act
        adapter.cost(&array![0.0, 0.0]).expect("within budget");
        adapter.gradient(&array![0.0, 0.0]).expect("within budget");
        let err = adapter.cost(&array![0.5, 0.5]).expect_err("budget exhausted");

        // Assert
        assert_eq!(adapter.evaluations(), 5);
        assert_eq!(OptError::from(err), OptError::EvaluationBudgetExceeded { max_evals: 5 });
    }
}
