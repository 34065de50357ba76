//! minimizer::builders — solver construction helpers.
//!
//! Purpose
//! -------
//! Provide small, focused builders for the solvers used by the minimizer.
//! These helpers hide Argmin’s generic wiring and apply crate-level options
//! (tolerances, L-BFGS memory, simplex size) so higher-level code can
//! request a configured solver without touching Argmin-specific types.
//!
//! Conventions
//! -----------
//! - L-BFGS builders do **not** set the initial point or `max_iters`; these
//!   are runtime concerns applied by the runner.
//! - The Nelder–Mead builder needs the starting point because Argmin seeds
//!   the simplex at construction time; vertex `i + 1` is `x0 + step·eᵢ`.
//! - Errors are always reported via [`OptResult`]; the underlying
//!   `argmin::core::Error` values never leak across module boundaries.
use argmin::solver::quasinewton::LBFGS;

use crate::optimization::{
    errors::OptResult,
    minimizer::{
        traits::MinimizerOptions,
        types::{
            Cost, DEFAULT_LBFGS_MEM, Grad, HagerZhangLS, LbfgsHagerZhang, LbfgsMoreThuente,
            MoreThuenteLS, Point, Simplex,
        },
    },
};

/// Construct L-BFGS with Hager–Zhang line search.
pub fn build_optimizer_hager_zhang(opts: &MinimizerOptions) -> OptResult<LbfgsHagerZhang> {
    let hager_zhang = HagerZhangLS::new();
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    let lbfgs = LbfgsHagerZhang::new(hager_zhang, mem);
    configure_lbfgs(lbfgs, opts)
}

/// Construct L-BFGS with More–Thuente line search.
pub fn build_optimizer_more_thuente(opts: &MinimizerOptions) -> OptResult<LbfgsMoreThuente> {
    let more_thuente = MoreThuenteLS::new();
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    let lbfgs = LbfgsMoreThuente::new(more_thuente, mem);
    configure_lbfgs(lbfgs, opts)
}

/// build_simplex — construct a Nelder–Mead solver around `x0`.
///
/// Parameters
/// ----------
/// - `x0`: `&Point`
///   First vertex of the initial simplex.
/// - `opts`: `&MinimizerOptions`
///   Consults `simplex_step` for the edge length and `tols.tol_cost` for
///   the standard-deviation stopping rule.
///
/// Errors
/// ------
/// - `OptError` (via `From<argmin::core::Error>`) when Argmin rejects the
///   tolerance.
pub fn build_simplex(x0: &Point, opts: &MinimizerOptions) -> OptResult<Simplex> {
    let mut vertices = Vec::with_capacity(x0.len() + 1);
    vertices.push(x0.clone());
    for i in 0..x0.len() {
        let mut vertex = x0.clone();
        vertex[i] += opts.simplex_step;
        vertices.push(vertex);
    }
    let mut simplex = Simplex::new(vertices);
    if let Some(tol) = opts.tols.tol_cost {
        simplex = simplex.with_sd_tolerance(tol)?;
    }
    Ok(simplex)
}

/// configure_lbfgs — apply optional tolerances to an L-BFGS solver.
///
/// When a tolerance is `None`, the corresponding `with_tolerance_*` method
/// is not called and Argmin’s default remains in effect.
pub fn configure_lbfgs<L>(
    mut solver: LBFGS<L, Point, Grad, Cost>, opts: &MinimizerOptions,
) -> OptResult<LBFGS<L, Point, Grad, Cost>> {
    if let Some(g) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(g)?;
    }
    if let Some(c) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(c)?;
    }
    Ok(solver)
}
