//! minimizer::types — shared numeric aliases and solver wiring.
//!
//! Purpose
//! -------
//! Centralize the numeric types and solver aliases used by the minimizer.
//! Defining them once keeps the rest of the optimization code agnostic to
//! `ndarray` and Argmin generics.
//!
//! Conventions
//! -----------
//! - `Point` and `Grad` are column vectors whose length equals the number
//!   of free coordinates of the objective (2 for `(B, A)` linking, 1 for
//!   an intercept-only search).
//! - `Hessian` is a dense `dim × dim` matrix when used.
//! - `Cost` is the scalar being minimized; no sign flips happen in this
//!   layer.
use argmin::solver::{
    linesearch::{HagerZhangLineSearch, MoreThuenteLineSearch},
    neldermead::NelderMead,
    quasinewton::LBFGS,
};
use ndarray::{Array1, Array2};
use std::collections::HashMap;

/// Point in the search space of an objective.
pub type Point = Array1<f64>;

/// Gradient vector `∇f(x)`, matching the shape of [`Point`].
pub type Grad = Array1<f64>;

/// Dense Hessian matrix; `n × n` for `n = Point.len()`.
pub type Hessian = Array2<f64>;

/// Scalar objective value.
pub type Cost = f64;

/// Function-evaluation counters as reported by the solver.
///
/// Maps human-readable counter names (e.g., `"cost_count"`) to counts.
pub type FnEvalMap = HashMap<String, u64>;

/// Default history size (`m`) for L-BFGS runs.
pub const DEFAULT_LBFGS_MEM: usize = 7;

/// Default edge length of the initial Nelder–Mead simplex.
pub const DEFAULT_SIMPLEX_STEP: f64 = 0.1;

/// Objective evaluations allowed per iteration and per `2·dim + 1`
/// evaluations of one cost-plus-gradient probe.
pub const EVALS_PER_ITER: usize = 50;

/// Iteration count used to size the evaluation budget when `max_iter` is
/// not set.
pub const UNBOUNDED_BUDGET_ITERS: usize = 10_000;

/// Hager–Zhang line search specialized to this crate’s numeric types.
pub type HagerZhangLS = HagerZhangLineSearch<Point, Grad, Cost>;

/// More–Thuente line search specialized to this crate’s numeric types.
pub type MoreThuenteLS = MoreThuenteLineSearch<Point, Grad, Cost>;

/// L-BFGS solver wired to the Hager–Zhang line search.
pub type LbfgsHagerZhang = LBFGS<HagerZhangLS, Point, Grad, Cost>;

/// L-BFGS solver wired to the More–Thuente line search.
pub type LbfgsMoreThuente = LBFGS<MoreThuenteLS, Point, Grad, Cost>;

/// Derivative-free simplex solver over [`Point`].
pub type Simplex = NelderMead<Point, Cost>;
