//! Public API surface for objective minimization.
//!
//! - [`Objective`]: trait users implement for their criterion.
//! - [`MinimizerOptions`] and [`Tolerances`]: configuration for the optimizer.
//! - [`SolverKind`]: choice of L-BFGS line search or the Nelder–Mead simplex.
//! - [`MinimizeOutcome`]: normalized result returned by [`minimize`](super::minimize).
//!
//! Convention: the objective is minimized as-is. If an analytic gradient is
//! provided it must be the gradient of the objective itself.
use crate::optimization::{
    errors::{OptError, OptResult},
    minimizer::{
        types::{Cost, DEFAULT_SIMPLEX_STEP, FnEvalMap, Grad, Point},
        validation::{validate_point_hat, validate_value, verify_tol_cost, verify_tol_grad},
    },
};
use argmin::core::TerminationStatus;
use std::str::FromStr;

/// User-implemented objective interface.
///
/// Required:
/// - `dim()`: number of free coordinates.
/// - `value(&Point) -> OptResult<Cost>`: evaluate `f(x)`. Called with
///   arbitrary trial points, so implementations should stay side-effect free.
///
/// Optional:
/// - `check(&Point)`: validation hook called once before optimization.
/// - `grad(&Point) -> OptResult<Grad>`: analytic gradient `∇f(x)`.
///   If not implemented, finite differences are used automatically.
pub trait Objective {
    // Required methods
    fn dim(&self) -> usize;
    fn value(&self, x: &Point) -> OptResult<Cost>;

    // Optional methods
    fn check(&self, _x: &Point) -> OptResult<()> {
        Ok(())
    }

    fn grad(&self, _x: &Point) -> OptResult<Grad> {
        Err(OptError::GradientNotImplemented)
    }
}

/// Choice of solver.
///
/// Variants:
/// - `LbfgsMoreThuente`: L-BFGS with More–Thuente line search.
/// - `LbfgsHagerZhang`: L-BFGS with Hager–Zhang line search.
/// - `NelderMead`: derivative-free simplex search.
///
/// Parsing:
/// `FromStr` accepts case-insensitive names (`"MoreThuente"`,
/// `"HagerZhang"`, `"NelderMead"`). Unknown names return
/// `OptError::InvalidSolver`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolverKind {
    LbfgsMoreThuente,
    LbfgsHagerZhang,
    NelderMead,
}

impl FromStr for SolverKind {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "morethuente" | "lbfgs" => Ok(SolverKind::LbfgsMoreThuente),
            "hagerzhang" => Ok(SolverKind::LbfgsHagerZhang),
            "neldermead" | "simplex" => Ok(SolverKind::NelderMead),
            _ => Err(OptError::InvalidSolver {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'MoreThuente', 'HagerZhang' or 'NelderMead'.",
            }),
        }
    }
}

/// Optimizer-level configuration.
///
/// Fields:
/// - `tols: Tolerances` — numerical tolerances and iteration limits.
/// - `solver: SolverKind` — algorithm used for the search.
/// - `verbose: bool` — if `true`, attaches an observer (behind the `obs_slog`
///   feature) and prints progress.
/// - `lbfgs_mem: Option<usize>` — L-BFGS history size (default 7).
/// - `simplex_step: f64` — edge length of the initial Nelder–Mead simplex.
///
/// Default:
/// - `tols`: `tol_grad = 1e-10`, `tol_cost = 1e-14`, `max_iter = 500`
/// - `solver`: `LbfgsMoreThuente`
/// - `verbose`: `false`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MinimizerOptions {
    pub tols: Tolerances,
    pub solver: SolverKind,
    pub verbose: bool,
    pub lbfgs_mem: Option<usize>,
    pub simplex_step: f64,
}

impl MinimizerOptions {
    /// Create a new set of optimizer options.
    ///
    /// # Errors
    /// - [`OptError::InvalidLBFGSMem`] when `lbfgs_mem == Some(0)`.
    /// - [`OptError::InvalidSimplexStep`] when `simplex_step` is zero or
    ///   non-finite.
    pub fn new(
        tols: Tolerances, solver: SolverKind, verbose: bool, lbfgs_mem: Option<usize>,
        simplex_step: Option<f64>,
    ) -> OptResult<Self> {
        if let Some(m) = lbfgs_mem {
            if m == 0 {
                return Err(OptError::InvalidLBFGSMem {
                    mem: m,
                    reason: "L-BFGS memory must be greater than zero.",
                });
            }
        }
        let simplex_step = simplex_step.unwrap_or(DEFAULT_SIMPLEX_STEP);
        if !simplex_step.is_finite() || simplex_step == 0.0 {
            return Err(OptError::InvalidSimplexStep {
                step: simplex_step,
                reason: "Simplex step must be finite and non-zero.",
            });
        }
        Ok(Self { tols, solver, verbose, lbfgs_mem, simplex_step })
    }
}

impl Default for MinimizerOptions {
    fn default() -> Self {
        Self {
            tols: Tolerances { tol_grad: Some(1e-10), tol_cost: Some(1e-14), max_iter: Some(500) },
            solver: SolverKind::LbfgsMoreThuente,
            verbose: false,
            lbfgs_mem: None,
            simplex_step: DEFAULT_SIMPLEX_STEP,
        }
    }
}

/// Numerical tolerances and iteration limits used by the optimizer.
///
/// - `tol_grad`: terminate when the gradient norm falls below this threshold
///   (L-BFGS only).
/// - `tol_cost`: terminate when the change in cost falls below this
///   threshold; for Nelder–Mead this is the standard-deviation tolerance of
///   the simplex values.
/// - `max_iter`: hard cap on the number of iterations.
///
/// Any field can be `None` but **at least one** of the three must be provided
/// (see [`Tolerances::new`]).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tolerances {
    pub tol_grad: Option<f64>,
    pub tol_cost: Option<f64>,
    pub max_iter: Option<usize>,
}

impl Tolerances {
    /// Construct validated tolerances.
    ///
    /// # Errors
    /// - [`OptError::NoTolerancesProvided`] if all three are `None`.
    /// - [`OptError::InvalidTolGrad`] / [`OptError::InvalidTolCost`] for
    ///   non-finite or non-positive tolerances.
    /// - [`OptError::InvalidMaxIter`] if `max_iter == 0`.
    pub fn new(
        tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    ) -> OptResult<Self> {
        if tol_grad.is_none() && tol_cost.is_none() && max_iter.is_none() {
            return Err(OptError::NoTolerancesProvided);
        }
        verify_tol_cost(tol_cost)?;
        verify_tol_grad(tol_grad)?;
        if let Some(max_iter) = max_iter {
            if max_iter == 0 {
                return Err(OptError::InvalidMaxIter {
                    max_iter,
                    reason: "Maximum iterations must be greater than zero.",
                });
            }
        }
        Ok(Self { tol_grad, tol_cost, max_iter })
    }
}

/// Canonical result returned by `minimize`.
///
/// - `x_hat`: best point found.
/// - `value`: objective value at `x_hat`.
/// - `converged`: `true` if the solver reported a terminating status other
///   than `NotTerminated`.
/// - `status`: human-readable termination status string.
/// - `iterations`: number of optimizer iterations performed.
/// - `fn_evals`: function-evaluation counters reported by `argmin`.
/// - `grad_norm`: norm of the last available gradient, if present.
#[derive(Debug, Clone, PartialEq)]
pub struct MinimizeOutcome {
    pub x_hat: Point,
    pub value: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
    pub grad_norm: Option<f64>,
}

impl MinimizeOutcome {
    /// Build a validated [`MinimizeOutcome`] from raw solver state.
    ///
    /// # Errors
    /// - Propagates any validation errors for `x_hat` or `value`.
    pub fn new(
        x_hat_opt: Option<Point>, value: f64, termination: TerminationStatus, iterations: u64,
        fn_evals: FnEvalMap, grad_norm: Option<f64>,
    ) -> OptResult<Self> {
        let x_hat = validate_point_hat(x_hat_opt)?;
        validate_value(value)?;
        let (converged, status) = match termination {
            TerminationStatus::NotTerminated => (false, "Not terminated".to_string()),
            other => (true, format!("{other:?}")),
        };
        let iterations = iterations as usize;
        Ok(Self { x_hat, value, converged, status, iterations, fn_evals, grad_norm })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Solver names parse case-insensitively with common separators.
    fn solver_kind_parses_known_names() {
        assert_eq!("MoreThuente".parse::<SolverKind>(), Ok(SolverKind::LbfgsMoreThuente));
        assert_eq!("hager_zhang".parse::<SolverKind>(), Ok(SolverKind::LbfgsHagerZhang));
        assert_eq!("Nelder-Mead".parse::<SolverKind>(), Ok(SolverKind::NelderMead));
        assert!(matches!("bfgs2".parse::<SolverKind>(), Err(OptError::InvalidSolver { .. })));
    }

    #[test]
    // Purpose
    // -------
    // At least one stopping rule is required.
    fn tolerances_require_at_least_one_rule() {
        assert_eq!(Tolerances::new(None, None, None), Err(OptError::NoTolerancesProvided));
        assert!(matches!(
            Tolerances::new(None, None, Some(0)),
            Err(OptError::InvalidMaxIter { max_iter: 0, .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Zero L-BFGS memory and a degenerate simplex edge are configuration errors.
    fn minimizer_options_validate_memory_and_simplex() {
        // Arrange
        let tols = Tolerances::new(Some(1e-6), None, Some(10)).expect("valid tolerances");

        // Act / Assert
        assert!(matches!(
            MinimizerOptions::new(tols, SolverKind::LbfgsMoreThuente, false, Some(0), None),
            Err(OptError::InvalidLBFGSMem { mem: 0, .. })
        ));
        assert!(matches!(
            MinimizerOptions::new(tols, SolverKind::NelderMead, false, None, Some(0.0)),
            Err(OptError::InvalidSimplexStep { .. })
        ));
        let opts = MinimizerOptions::new(tols, SolverKind::NelderMead, false, None, None)
            .expect("defaults are valid");
        assert_eq!(opts.simplex_step, DEFAULT_SIMPLEX_STEP);
    }

    #[test]
    // Purpose
    // -------
    // A terminated status maps to `converged = true` with a readable status.
    fn outcome_maps_termination_status() {
        // Arrange
        let status =
            TerminationStatus::Terminated(argmin::core::TerminationReason::SolverConverged);

        // Act
        let out = MinimizeOutcome::new(
            Some(ndarray::array![0.5, 1.0]),
            0.25,
            status,
            12,
            FnEvalMap::new(),
            None,
        )
        .expect("finite outcome is valid");

        // Assert
        assert!(out.converged);
        assert_eq!(out.iterations, 12);
        assert!(out.status.contains("SolverConverged"));
    }
}
