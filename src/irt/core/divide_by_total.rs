//! Divide-by-total category probabilities for the partial-credit families.
//!
//! With step locations `b_1 … b_m` and slope `D·a`, category `k` has the
//! exponent `z_k = Σ_{v ≤ k} D·a·(θ − b_v)` (`z_0 = 0`) and probability
//! `P_k = exp(z_k) / Σ_j exp(z_j)`. Because `∂z_k/∂θ = D·a·k`, derivatives
//! with respect to θ reduce to moments of the category index under `P`.
use ndarray::Array1;

use crate::optimization::numerical_stability::normalize_exponents;

/// Category probabilities for steps `steps` (length `ncat − 1`).
pub fn category_probabilities(theta: f64, slope: f64, steps: &[f64]) -> Vec<f64> {
    let mut z = Vec::with_capacity(steps.len() + 1);
    let mut acc = 0.0;
    z.push(acc);
    for &b in steps {
        acc += slope * (theta - b);
        z.push(acc);
    }
    normalize_exponents(&mut z);
    z
}

/// Gradient of `P_category` given per-parameter exponent derivatives.
///
/// `dz(p, k)` returns `∂z_k/∂x_p`; the result is
/// `∂P_c/∂x_p = P_c · (∂z_c/∂x_p − Σ_j P_j ∂z_j/∂x_p)`.
pub fn probability_gradient<F>(probs: &[f64], category: usize, n_params: usize, dz: F) -> Array1<f64>
where
    F: Fn(usize, usize) -> f64,
{
    Array1::from_shape_fn(n_params, |p| {
        let mean: f64 = probs.iter().enumerate().map(|(k, pk)| pk * dz(p, k)).sum();
        probs[category] * (dz(p, category) - mean)
    })
}

/// Mean and variance of the category index.
fn index_moments(probs: &[f64]) -> (f64, f64) {
    let mean: f64 = probs.iter().enumerate().map(|(k, p)| k as f64 * p).sum();
    let var: f64 = probs.iter().enumerate().map(|(k, p)| (k as f64 - mean).powi(2) * p).sum();
    (mean, var)
}

/// `dE/dθ` for expected score `E = Σ w_k P_k`.
pub fn expected_score_deriv(probs: &[f64], weights: &[f64], slope: f64) -> f64 {
    let (mean, _) = index_moments(probs);
    slope * probs.iter().zip(weights).enumerate().map(|(k, (p, w))| w * p * (k as f64 - mean)).sum::<f64>()
}

/// `d²E/dθ²` for expected score `E = Σ w_k P_k`.
pub fn expected_score_deriv2(probs: &[f64], weights: &[f64], slope: f64) -> f64 {
    let (mean, var) = index_moments(probs);
    slope
        * slope
        * probs
            .iter()
            .zip(weights)
            .enumerate()
            .map(|(k, (p, w))| w * p * ((k as f64 - mean).powi(2) - var))
            .sum::<f64>()
}

/// Variance of the score weights under `probs`.
pub fn score_variance(probs: &[f64], weights: &[f64]) -> f64 {
    let mean: f64 = probs.iter().zip(weights).map(|(p, w)| p * w).sum();
    let second: f64 = probs.iter().zip(weights).map(|(p, w)| p * w * w).sum();
    (second - mean * mean).max(0.0)
}
