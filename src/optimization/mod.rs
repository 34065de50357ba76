//! optimization — minimizer stack, numerical helpers, and unified error surface.
//!
//! Purpose
//! -------
//! Provide a cohesive optimization layer for the linking criteria,
//! combining an Argmin-backed minimizer, numerically stable transforms,
//! and a single error/result surface. Callers implement an objective,
//! choose tolerances, and obtain a minimizer with diagnostics without
//! touching backend solver details.
//!
//! Key behaviors
//! -------------
//! - Expose a high-level API for **minimizing objectives** `f(x)`
//!   (`minimizer`), including solver selection and stopping criteria.
//! - Supply shared numerical primitives (`numerical_stability`) used by the
//!   item response models and the linking criteria.
//! - Normalize configuration issues, numerical failures, and backend solver
//!   errors into a single enum (`errors::OptError`) with a common result
//!   alias (`OptResult<T>`).
//!
//! Conventions
//! -----------
//! - Points, gradients, and Hessians are represented using `ndarray`-based
//!   aliases (`Point`, `Grad`, `Hessian`).
//! - Public optimization entrypoints that can fail return `OptResult<T>`;
//!   callers never see raw Argmin errors.
//!
//! Downstream usage
//! ----------------
//! - The linking engine implements `Objective` for the characteristic-curve
//!   criteria and calls `minimize`.
//! - Item models reuse `minimizer::compute_hessian` for parameter Hessians
//!   and `numerical_stability` for stable probabilities.

pub mod errors;
pub mod minimizer;
pub mod numerical_stability;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use irt_linking::optimization::prelude::*;
//
// to import the main optimization surface in a single line.

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::minimizer::prelude::*;
    pub use super::numerical_stability::prelude::*;
}
