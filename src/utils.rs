#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    irt::{collection::ItemCollection, models::three_pl::Irm3PL},
    optimization::minimizer::traits::{MinimizerOptions, SolverKind, Tolerances},
    quadrature::rule::QuadratureRule,
};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Vec → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1,
};

/// One 3PL item as passed from Python: `(id, a, b, c)`.
#[cfg(feature = "python-bindings")]
pub type ItemSpec = (String, f64, f64, f64);

#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        if arr_ro.as_slice().is_ok() {
            return Ok(arr_ro);
        }
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            if series_ro.as_slice().is_ok() {
                return Ok(series_ro);
            }
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(
            "expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64",
        )
    })?;
    Ok(vec.into_pyarray(py).readonly())
}

/// Copy a Python array-like into an owned vector.
#[cfg(feature = "python-bindings")]
fn extract_f64_vec<'py>(py: Python<'py>, raw: &Bound<'py, PyAny>) -> PyResult<Vec<f64>> {
    let arr = extract_f64_array(py, raw)?;
    Ok(arr.as_slice()?.to_vec())
}

/// Build a form of 3PL items from `(id, a, b, c)` tuples.
#[cfg(feature = "python-bindings")]
pub fn build_three_pl_form(items: &[ItemSpec], d: f64) -> PyResult<ItemCollection> {
    let mut form = ItemCollection::new();
    for (id, a, b, c) in items {
        // Irm3PL::three_pl -> IrmResult -> PyErr
        form.insert(id.clone(), Irm3PL::three_pl(*a, *b, *c, d)?)?;
    }
    Ok(form)
}

/// Quadrature from Python points and optional weights (uniform when
/// weights are omitted).
#[cfg(feature = "python-bindings")]
pub fn extract_quadrature<'py>(
    py: Python<'py>, points: &Bound<'py, PyAny>, weights: Option<&Bound<'py, PyAny>>,
) -> PyResult<QuadratureRule> {
    let points = extract_f64_vec(py, points)?;
    let weights = match weights {
        Some(w) => extract_f64_vec(py, w)?,
        None => {
            if points.is_empty() {
                return Err(PyValueError::new_err("quadrature points must not be empty"));
            }
            vec![1.0 / points.len() as f64; points.len()]
        }
    };
    Ok(QuadratureRule::user_supplied(points, weights)?)
}

#[cfg(feature = "python-bindings")]
pub fn extract_minimizer_opts(
    tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>, solver: Option<&str>,
    lbfgs_mem: Option<usize>,
) -> PyResult<MinimizerOptions> {
    use std::str::FromStr;

    let defaults = MinimizerOptions::default();

    // Tolerances::new -> OptResult<Tolerances> -> PyErr
    let tols = if tol_grad.is_none() && tol_cost.is_none() && max_iter.is_none() {
        defaults.tols
    } else {
        Tolerances::new(tol_grad, tol_cost, max_iter)?
    };

    // SolverKind::from_str -> OptResult<SolverKind> -> PyErr
    let solver = match solver {
        Some(name) => SolverKind::from_str(name)?,
        None => defaults.solver,
    };

    Ok(MinimizerOptions::new(tols, solver, false, lbfgs_mem, None)?)
}
