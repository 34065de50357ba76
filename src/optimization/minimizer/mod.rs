//! minimizer — argmin-powered minimization of scalar objectives.
//!
//! Purpose
//! -------
//! Provide a high-level, Argmin-backed layer for **minimizing** scalar
//! objectives `f(x)` such as the characteristic-curve linking criteria.
//! Callers implement a single trait, [`Objective`], and invoke
//! [`minimize`] to run L-BFGS or the Nelder–Mead simplex with configurable
//! tolerances and finite-difference fallbacks.
//!
//! Key behaviors
//! -------------
//! - Expose objectives to Argmin via [`adapter::ArgMinAdapter`].
//! - Expose a single, user-facing entrypoint [`minimize`] that:
//!   - validates the starting point and calls [`Objective::check`],
//!   - selects a solver via [`builders`] based on [`SolverKind`],
//!   - executes the solver via [`run`], and
//!   - normalizes results into a [`MinimizeOutcome`].
//! - Provide finite-difference helpers in [`finite_diff`] for gradients and
//!   Hessians when analytic derivatives are missing.
//!
//! Invariants & assumptions
//! ------------------------
//! - [`Objective::value`] and [`Objective::grad`] must report invalid inputs
//!   as recoverable [`OptError`](crate::optimization::errors::OptError)
//!   values, not panics.
//! - Configuration types ([`Tolerances`], [`MinimizerOptions`]) are
//!   validated on construction and are treated as internally consistent by
//!   the solver layer.
//!
//! Testing notes
//! -------------
//! - Unit tests in submodules cover gradient fallbacks in [`adapter`],
//!   solver construction in [`builders`], finite differences and
//!   validation, configuration parsing in [`traits`], and end-to-end runs in
//!   [`api`].

pub mod adapter;
pub mod api;
pub mod builders;
pub mod finite_diff;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::minimize;
pub use self::finite_diff::compute_hessian;
pub use self::traits::{MinimizeOutcome, MinimizerOptions, Objective, SolverKind, Tolerances};
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, Hessian, Point};

pub mod prelude {
    pub use super::api::minimize;
    pub use super::traits::{MinimizeOutcome, MinimizerOptions, Objective, SolverKind, Tolerances};
    pub use super::types::{Cost, Grad, Point};
}
