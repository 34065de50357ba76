//! Execution helpers that run an `argmin` solver on an [`Objective`] and
//! return a crate-friendly [`MinimizeOutcome`].
use crate::optimization::{
    errors::OptResult,
    minimizer::{
        adapter::ArgMinAdapter,
        traits::{MinimizeOutcome, MinimizerOptions, Objective},
        types::{FnEvalMap, Grad, Point},
    },
};
#[cfg(feature = "obs_slog")]
use argmin::core::{CostFunction, Gradient};
use argmin::core::{Executor, IterState, State, TerminationStatus};

/// Run an `argmin` gradient-based solver on an objective.
///
/// This is the shared runner used by both line-search variants. It wires up:
/// - the user objective via [`ArgMinAdapter`],
/// - the chosen `Solver` (e.g. L-BFGS with Hager–Zhang/More–Thuente),
/// - initial point `x0`,
/// - optional observers (behind the `obs_slog` feature),
/// - optional `max_iters`,
///   then executes the solver and converts the result into [`MinimizeOutcome`].
///
/// # Feature flags
/// If the `obs_slog` feature is enabled and `opts.verbose == true`, a terminal
/// slog observer is attached with `ObserverMode::Always` and the starting
/// value is logged before the first iteration.
///
/// # Errors
/// - Propagates any `argmin` runtime error (observer failures, solver errors,
///   line-search failures, etc.) via `From<argmin::core::Error>`.
/// - Propagates any validation errors encountered when constructing
///   [`MinimizeOutcome`].
pub fn run_lbfgs<'a, F, S>(
    x0: Point, opts: &MinimizerOptions, problem: ArgMinAdapter<'a, F>, solver: S,
) -> OptResult<MinimizeOutcome>
where
    F: Objective,
    S: argmin::core::Solver<ArgMinAdapter<'a, F>, IterState<Point, Grad, (), (), (), f64>>
        + Send
        + 'static,
{
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        log_initial_state(&x0, &problem)?;
    }
    let mut optimizer = Executor::new(problem, solver);
    optimizer = optimizer.configure(|state| state.param(x0));
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer = optimizer.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }
    if let Some(max_iter) = opts.tols.max_iter {
        optimizer = optimizer.configure(|state| state.max_iters(max_iter as u64));
    }

    let mut result = optimizer.run()?.state().clone();
    let iterations = result.get_iter();
    let function_counts = result.get_func_counts().clone();
    let termination = result.get_termination_status().clone();
    let grad_norm = result.take_gradient().map(|g| g.dot(&g).sqrt());
    finish(
        result.take_best_param(),
        result.get_best_cost(),
        termination,
        iterations,
        function_counts,
        grad_norm,
    )
}

/// Run the Nelder–Mead simplex on an objective.
///
/// The simplex already carries its starting vertices, so no initial
/// parameter is configured on the state. Gradients are never evaluated and
/// `grad_norm` is always `None`.
pub fn run_simplex<'a, F, S>(
    opts: &MinimizerOptions, problem: ArgMinAdapter<'a, F>, solver: S,
) -> OptResult<MinimizeOutcome>
where
    F: Objective,
    S: argmin::core::Solver<ArgMinAdapter<'a, F>, IterState<Point, (), (), (), (), f64>>
        + Send
        + 'static,
{
    let mut optimizer = Executor::new(problem, solver);
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer = optimizer.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }
    if let Some(max_iter) = opts.tols.max_iter {
        optimizer = optimizer.configure(|state| state.max_iters(max_iter as u64));
    }

    let mut result = optimizer.run()?.state().clone();
    let iterations = result.get_iter();
    let function_counts = result.get_func_counts().clone();
    let termination = result.get_termination_status().clone();
    finish(
        result.take_best_param(),
        result.get_best_cost(),
        termination,
        iterations,
        function_counts,
        None,
    )
}

// ---- Helper Methods ----

fn finish(
    x_hat: Option<Point>, value: f64, termination: TerminationStatus, iterations: u64,
    fn_evals: FnEvalMap, grad_norm: Option<f64>,
) -> OptResult<MinimizeOutcome> {
    tracing::debug!(
        iterations,
        value,
        status = ?termination,
        "minimizer finished"
    );
    MinimizeOutcome::new(x_hat, value, termination, iterations, fn_evals, grad_norm)
}

#[cfg(feature = "obs_slog")]
fn log_initial_state<F>(x0: &Point, problem: &ArgMinAdapter<'_, F>) -> OptResult<()>
where
    F: Objective,
{
    let f0 = problem.cost(x0)?;
    let g0n = problem.gradient(x0).ok().map(|g| g.dot(&g).sqrt());
    tracing::info!(f0, grad_norm = ?g0n, "init");
    Ok(())
}
