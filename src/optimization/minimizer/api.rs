//! High-level entry point for minimizing a user-provided [`Objective`].
//!
//! This selects L-BFGS (Hager–Zhang or More–Thuente line search) or the
//! Nelder–Mead simplex, wraps the objective in an `ArgMinAdapter`, and
//! delegates the run to the matching runner.
use crate::optimization::{
    errors::OptResult,
    minimizer::{
        adapter::ArgMinAdapter,
        builders::{build_optimizer_hager_zhang, build_optimizer_more_thuente, build_simplex},
        run::{run_lbfgs, run_simplex},
        traits::{MinimizeOutcome, MinimizerOptions, Objective, SolverKind},
        types::{EVALS_PER_ITER, Point, UNBOUNDED_BUDGET_ITERS},
        validation::validate_start,
    },
};

/// Minimize `f(x)` starting from `x0` with the solver named in `opts`.
///
/// # Behavior
/// - Validates `x0` against `f.dim()` and runs `f.check(x0)`.
/// - Builds the solver selected by `opts.solver`.
/// - Executes it and returns a [`MinimizeOutcome`].
/// - Caps objective evaluations at [`evaluation_budget`].
///
/// # Errors
/// - `OptError::StartDimMismatch` / `OptError::InvalidStart` for a bad start.
/// - `OptError::EvaluationBudgetExceeded` when a solver (typically a line
///   search that cannot satisfy its conditions) keeps evaluating past the
///   budget.
/// - Propagates any error from `f.check`.
/// - Propagates builder and runtime errors (e.g. line-search failures).
///
/// # Example
/// ```
/// use ndarray::array;
/// use irt_linking::optimization::errors::OptResult;
/// use irt_linking::optimization::minimizer::{minimize, MinimizerOptions, Objective, Point};
///
/// struct Bowl;
/// impl Objective for Bowl {
///     fn dim(&self) -> usize { 2 }
///     fn value(&self, x: &Point) -> OptResult<f64> {
///         Ok((x[0] - 1.0).powi(2) + (x[1] + 0.5).powi(2))
///     }
/// }
///
/// let out = minimize(&Bowl, array![0.0, 0.0], &MinimizerOptions::default())?;
/// assert!((out.x_hat[0] - 1.0).abs() < 1e-4);
/// # Ok::<(), irt_linking::optimization::errors::OptError>(())
/// ```
pub fn minimize<F: Objective>(
    f: &F, x0: Point, opts: &MinimizerOptions,
) -> OptResult<MinimizeOutcome> {
    validate_start(&x0, f.dim())?;
    f.check(&x0)?;
    let problem = ArgMinAdapter::with_budget(f, evaluation_budget(opts, f.dim()));
    match opts.solver {
        SolverKind::LbfgsMoreThuente => {
            let solver = build_optimizer_more_thuente(opts)?;
            run_lbfgs(x0, opts, problem, solver)
        }
        SolverKind::LbfgsHagerZhang => {
            let solver = build_optimizer_hager_zhang(opts)?;
            run_lbfgs(x0, opts, problem, solver)
        }
        SolverKind::NelderMead => {
            let solver = build_simplex(&x0, opts)?;
            run_simplex(opts, problem, solver)
        }
    }
}

/// Cost evaluations allowed for one run: [`EVALS_PER_ITER`] probes of
/// `2·dim + 1` costs per iteration, over `max_iter` iterations or
/// [`UNBOUNDED_BUDGET_ITERS`] when no cap is set.
pub fn evaluation_budget(opts: &MinimizerOptions, dim: usize) -> usize {
    let iters = opts.tols.max_iter.unwrap_or(UNBOUNDED_BUDGET_ITERS);
    iters.saturating_mul(EVALS_PER_ITER).saturating_mul(2 * dim + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::{
        errors::OptError,
        minimizer::{
            traits::Tolerances,
            types::{Cost, Grad},
        },
    };
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // End-to-end runs of `minimize` on small smooth problems for every solver.
    // -------------------------------------------------------------------------

    struct Shifted;

    impl Objective for Shifted {
        fn dim(&self) -> usize {
            2
        }
        fn value(&self, x: &Point) -> OptResult<Cost> {
            Ok((x[0] - 0.3).powi(2) + 2.0 * (x[1] - 1.2).powi(2))
        }
        fn grad(&self, x: &Point) -> OptResult<Grad> {
            Ok(array![2.0 * (x[0] - 0.3), 4.0 * (x[1] - 1.2)])
        }
    }

    struct Rosenbrock;

    impl Objective for Rosenbrock {
        fn dim(&self) -> usize {
            2
        }
        fn value(&self, x: &Point) -> OptResult<Cost> {
            Ok((1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0] * x[0]).powi(2))
        }
    }

    #[test]
    // Purpose
    // -------
    // Both L-BFGS variants locate the minimum of a shifted quadratic.
    //
    // Given
    // -----
    // - f(x, y) = (x − 0.3)² + 2(y − 1.2)² with an analytic gradient.
    //
    // Expect
    // ------
    // - x̂ ≈ (0.3, 1.2) and f(x̂) ≈ 0 for both line searches.
    fn lbfgs_variants_find_quadratic_minimum() {
        for solver in [SolverKind::LbfgsMoreThuente, SolverKind::LbfgsHagerZhang] {
            // Arrange
            let opts = MinimizerOptions { solver, ..MinimizerOptions::default() };

            // Act
            let out = minimize(&Shifted, array![0.0, 0.0], &opts).expect("quadratic converges");

            // Assert
            approx::assert_abs_diff_eq!(out.x_hat[0], 0.3, epsilon = 1e-6);
            approx::assert_abs_diff_eq!(out.x_hat[1], 1.2, epsilon = 1e-6);
            approx::assert_abs_diff_eq!(out.value, 0.0, epsilon = 1e-10);
            assert!(out.grad_norm.is_some());
        }
    }

    #[test]
    // Purpose
    // -------
    // The simplex solves Rosenbrock without gradients.
    fn nelder_mead_solves_rosenbrock() {
        // Arrange
        let tols = Tolerances::new(None, Some(1e-14), Some(5000)).expect("valid tolerances");
        let opts = MinimizerOptions::new(tols, SolverKind::NelderMead, false, None, Some(0.5))
            .expect("valid options");

        // Act
        let out = minimize(&Rosenbrock, array![-1.2, 1.0], &opts).expect("simplex runs");

        // Assert
        approx::assert_abs_diff_eq!(out.x_hat[0], 1.0, epsilon = 1e-3);
        approx::assert_abs_diff_eq!(out.x_hat[1], 1.0, epsilon = 2e-3);
        assert!(out.grad_norm.is_none());
    }

    /// Cost `x²` with a gradient that always claims descent.
    struct UphillGradient;

    impl Objective for UphillGradient {
        fn dim(&self) -> usize {
            1
        }
        fn value(&self, x: &Point) -> OptResult<Cost> {
            Ok(x[0] * x[0])
        }
        fn grad(&self, x: &Point) -> OptResult<Grad> {
            Ok(array![-1.0 / (1.0 + x[0] * x[0])])
        }
    }

    #[test]
    // Purpose
    // -------
    // A line search that can never satisfy its conditions is stopped by the
    // evaluation budget instead of spinning inside one iteration.
    //
    // Given
    // -----
    // - f(x) = x² with a gradient that is negative everywhere, so the
    //   Hager–Zhang bracket never shrinks.
    // - `max_iter = 1`, giving a budget of 1 · 50 · 3 = 150 evaluations.
    //
    // Expect
    // ------
    // - `OptError::EvaluationBudgetExceeded { max_evals: 150 }`.
    fn non_terminating_line_search_hits_evaluation_budget() {
        // Arrange
        let tols = Tolerances::new(None, None, Some(1)).expect("valid tolerances");
        let opts = MinimizerOptions::new(tols, SolverKind::LbfgsHagerZhang, false, None, None)
            .expect("valid options");
        assert_eq!(evaluation_budget(&opts, 1), 150);

        // Act
        let err = minimize(&UphillGradient, array![1.0], &opts).expect_err("budget stops search");

        // Assert
        assert_eq!(err, OptError::EvaluationBudgetExceeded { max_evals: 150 });
    }

    #[test]
    // Purpose
    // -------
    // A start of the wrong dimension is rejected before any solver runs.
    fn wrong_start_dimension_is_rejected() {
        let err = minimize(&Shifted, array![0.0], &MinimizerOptions::default())
            .expect_err("dimension mismatch");
        assert_eq!(err, OptError::StartDimMismatch { expected: 2, found: 1 });
    }
}
