//! irt_linking — item response models, IRT scale linking, and true-score
//! equating with optional Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that exposes
//! linking and equating to Python via the `_irt_linking` extension module when
//! the `python-bindings` feature is enabled.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules (`irt`, `quadrature`, `linking`,
//!   `equating`, `optimization`) as the public crate surface.
//! - Define `#[pyclass]` wrappers and the `#[pymodule]` initializer for the
//!   `_irt_linking` Python extension.
//! - Create and register Python submodules (`linking`, `equating`) under
//!   `irt_linking` so that dot-notation imports work as expected.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work is implemented in the inner Rust modules; this file
//!   performs only FFI glue, input validation, and error mapping.
//! - The Python surface builds forms from 3PL item tuples; other model
//!   families are available from Rust.
//!
//! Conventions
//! -----------
//! - Linking coefficients `(B, A)` satisfy `θ_Y = A·θ_X + B`.
//! - Errors from core Rust code are propagated as rich error types internally
//!   and mapped to Python `ValueError`/`RuntimeError` at the boundary.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should depend on the inner modules and can ignore the
//!   PyO3 items guarded by the `python-bindings` feature.
//!
//! Testing notes
//! -------------
//! - Core numerical behavior is covered by unit tests in the inner modules and
//!   by the integration tests under `tests/`.

pub mod equating;
pub mod irt;
pub mod linking;
pub mod optimization;
pub mod quadrature;
pub mod utils;

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    equating::{options::EquatingOptions, true_score::EquatingTable},
    linking::{
        engine::{IrtScaleLinking, LinkingCoefficients, LinkingSummary},
        options::{CriterionType, LinkingOptions},
    },
    utils::{ItemSpec, build_three_pl_form, extract_minimizer_opts, extract_quadrature},
};

/// ScaleLinking — Python-facing wrapper for the four linking methods.
///
/// Purpose
/// -------
/// Link two forms of 3PL items and expose the Mean/Mean, Mean/Sigma, Haebara,
/// and Stocking-Lord coefficients as Python properties.
///
/// Parameters
/// ----------
/// Constructed from Python via
/// `ScaleLinking(form_x, form_y, x_points, x_weights=None, y_points=None, y_weights=None, ...)`:
/// - `form_x`, `form_y`: `list[tuple[str, float, float, float]]`
///   Items as `(id, a, b, c)`; common items share an id.
/// - `x_points`, `x_weights`: array-likes of `f64`
///   Form X quadrature; weights default to uniform.
/// - `y_points`, `y_weights`: array-likes of `f64`
///   Form Y quadrature; defaults to Form X's.
/// - `d`: scaling constant, default `1.7`.
/// - `criterion`: `"Q1"` or `"Q1Q2"` (default).
/// - `precision`, `rasch`, `restarts`, `seed`: see [`LinkingOptions`].
/// - `solver`, `tol_grad`, `tol_cost`, `max_iter`, `lbfgs_mem`: minimizer
///   configuration.
///
/// Notes
/// -----
/// - All coefficients are computed at construction; property access is O(1).
#[cfg(feature = "python-bindings")]
#[pyclass(name = "ScaleLinking", module = "irt_linking.linking")]
pub struct PyScaleLinking {
    inner: LinkingSummary,
}

#[cfg(feature = "python-bindings")]
fn pair(c: &LinkingCoefficients) -> (f64, f64) {
    (c.intercept, c.slope)
}

#[cfg(feature = "python-bindings")]
fn triple(c: &LinkingCoefficients) -> (f64, f64, f64) {
    (c.intercept, c.slope, c.objective.unwrap_or(f64::NAN))
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PyScaleLinking {
    #[new]
    #[pyo3(
        signature = (
            form_x,
            form_y,
            x_points,
            x_weights = None,
            y_points = None,
            y_weights = None,
            d = 1.7,
            criterion = None,
            precision = 6,
            rasch = false,
            restarts = 0,
            seed = 0,
            solver = None,
            tol_grad = None,
            tol_cost = None,
            max_iter = None,
            lbfgs_mem = None,
        ),
        text_signature = "(form_x, form_y, x_points, /, x_weights=None, y_points=None, \
                          y_weights=None, d=1.7, criterion=None, precision=6, rasch=False, \
                          restarts=0, seed=0, solver=None, tol_grad=None, tol_cost=None, \
                          max_iter=None, lbfgs_mem=None)"
    )]
    #[allow(clippy::too_many_arguments)]
    pub fn new<'py>(
        py: Python<'py>, form_x: Vec<ItemSpec>, form_y: Vec<ItemSpec>,
        x_points: &Bound<'py, PyAny>, x_weights: Option<&Bound<'py, PyAny>>,
        y_points: Option<&Bound<'py, PyAny>>, y_weights: Option<&Bound<'py, PyAny>>, d: f64,
        criterion: Option<&str>, precision: u32, rasch: bool, restarts: usize, seed: u64,
        solver: Option<&str>, tol_grad: Option<f64>, tol_cost: Option<f64>,
        max_iter: Option<usize>, lbfgs_mem: Option<usize>,
    ) -> PyResult<Self> {
        let x = build_three_pl_form(&form_x, d)?;
        let y = build_three_pl_form(&form_y, d)?;
        let quad_x = extract_quadrature(py, x_points, x_weights)?;
        let quad_y = match y_points {
            Some(points) => extract_quadrature(py, points, y_weights)?,
            None => quad_x.clone(),
        };

        let criterion = match criterion {
            Some(name) => name.parse::<CriterionType>()?,
            None => CriterionType::Q1Q2,
        };
        let minimizer = extract_minimizer_opts(tol_grad, tol_cost, max_iter, solver, lbfgs_mem)?;
        let options = LinkingOptions::new(criterion, precision, minimizer, restarts, seed, rasch)?;

        let inner = IrtScaleLinking::new(&x, &y, &quad_x, &quad_y, options).compute()?;
        Ok(PyScaleLinking { inner })
    }

    /// `(intercept, slope)` from Mean/Mean.
    #[getter]
    pub fn mean_mean(&self) -> (f64, f64) {
        pair(&self.inner.mean_mean)
    }

    /// `(intercept, slope)` from Mean/Sigma.
    #[getter]
    pub fn mean_sigma(&self) -> (f64, f64) {
        pair(&self.inner.mean_sigma)
    }

    /// `(intercept, slope, objective)` from Haebara.
    #[getter]
    pub fn haebara(&self) -> (f64, f64, f64) {
        triple(&self.inner.haebara)
    }

    /// `(intercept, slope, objective)` from Stocking-Lord.
    #[getter]
    pub fn stocking_lord(&self) -> (f64, f64, f64) {
        triple(&self.inner.stocking_lord)
    }
}

/// TrueScoreEquating — Python-facing wrapper for IRT true-score equating.
///
/// Parameters
/// ----------
/// Constructed from Python via
/// `TrueScoreEquating(form_x, form_y, d=1.7, tol=1e-8, max_iter=100, theta_bound=20.0, max_step=1.0)`
/// with forms given as `(id, a, b, c)` tuples already on a common scale.
///
/// Notes
/// -----
/// - `theta` carries `-99.0`/`99.0` for scores outside the reachable range.
#[cfg(feature = "python-bindings")]
#[pyclass(name = "TrueScoreEquating", module = "irt_linking.equating")]
pub struct PyTrueScoreEquating {
    inner: EquatingTable,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PyTrueScoreEquating {
    #[new]
    #[pyo3(
        signature = (form_x, form_y, d = 1.7, tol = 1e-8, max_iter = 100, theta_bound = 20.0, max_step = 1.0),
        text_signature = "(form_x, form_y, /, d=1.7, tol=1e-8, max_iter=100, theta_bound=20.0, max_step=1.0)"
    )]
    pub fn new(
        form_x: Vec<ItemSpec>, form_y: Vec<ItemSpec>, d: f64, tol: f64, max_iter: usize,
        theta_bound: f64, max_step: f64,
    ) -> PyResult<Self> {
        let x = build_three_pl_form(&form_x, d)?;
        let y = build_three_pl_form(&form_y, d)?;
        let options = EquatingOptions::new(tol, max_iter, theta_bound, max_step)?;
        let inner = equating::TrueScoreEquating::new(&x, &y, options)?.equate();
        Ok(PyTrueScoreEquating { inner })
    }

    /// Ability per Form X raw score.
    #[getter]
    pub fn theta(&self) -> Vec<f64> {
        self.inner.theta.clone()
    }

    /// Form Y equivalent per Form X raw score.
    #[getter]
    pub fn y_equivalent(&self) -> Vec<f64> {
        self.inner.y_equivalent.clone()
    }
}

/// _irt_linking — PyO3 module initializer for the Python extension.
///
/// Key behaviors
/// -------------
/// - Create `linking` and `equating` submodules.
/// - Attach those submodules to the parent `_irt_linking` module.
/// - Register the submodules in `sys.modules` so they are importable via
///   dotted paths from Python.
///
/// Errors
/// ------
/// - `PyErr`
///   If creating submodules or manipulating `sys.modules` fails.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _irt_linking<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let linking_mod = PyModule::new(_py, "linking")?;
    let equating_mod = PyModule::new(_py, "equating")?;
    linking_submodule(_py, m, &linking_mod)?;
    equating_submodule(_py, m, &equating_mod)?;

    // Manually add submodules into sys.modules to allow for dot notation.
    _py.import("sys")?.getattr("modules")?.set_item("irt_linking.linking", linking_mod)?;
    _py.import("sys")?.getattr("modules")?.set_item("irt_linking.equating", equating_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn linking_submodule<'py>(
    _py: Python, irt_linking: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<PyScaleLinking>()?;
    irt_linking.add_submodule(m)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn equating_submodule<'py>(
    _py: Python, irt_linking: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<PyTrueScoreEquating>()?;
    irt_linking.add_submodule(m)?;
    Ok(())
}
