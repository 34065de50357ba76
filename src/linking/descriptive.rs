//! Moment methods: Mean/Mean and Mean/Sigma.
//!
//! Both solve `b_Y = A·b_X + B` from first (and second) moments of the
//! common-item parameters. Every polytomous step or threshold location
//! counts as its own difficulty observation.
//!
//! Conventions
//! -----------
//! - Standard deviations are population SDs (divide by `n`).
//! - With `rasch = true` the slope is pinned to 1 and only the intercept
//!   is estimated.
//! - No common items yields NaN coefficients.
use crate::{
    irt::collection::ItemCollection,
    linking::{anchor::anchor_pairs, engine::LinkingCoefficients},
};

/// Mean and population standard deviation; `(NaN, NaN)` when empty.
fn moments(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (f64::NAN, f64::NAN);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, var.sqrt())
}

struct AnchorMoments {
    mean_a_x: f64,
    mean_a_y: f64,
    mean_b_x: f64,
    mean_b_y: f64,
    sd_b_x: f64,
    sd_b_y: f64,
}

fn anchor_moments(form_x: &ItemCollection, form_y: &ItemCollection) -> Option<AnchorMoments> {
    let pairs = anchor_pairs(form_x, form_y);
    if pairs.is_empty() {
        tracing::debug!("no common items; moment coefficients are undefined");
        return None;
    }
    let a_x: Vec<f64> = pairs.iter().map(|p| p.x.discrimination()).collect();
    let a_y: Vec<f64> = pairs.iter().map(|p| p.y.discrimination()).collect();
    let b_x: Vec<f64> = pairs.iter().flat_map(|p| p.x.location_parameters()).collect();
    let b_y: Vec<f64> = pairs.iter().flat_map(|p| p.y.location_parameters()).collect();
    let (mean_a_x, _) = moments(&a_x);
    let (mean_a_y, _) = moments(&a_y);
    let (mean_b_x, sd_b_x) = moments(&b_x);
    let (mean_b_y, sd_b_y) = moments(&b_y);
    Some(AnchorMoments { mean_a_x, mean_a_y, mean_b_x, mean_b_y, sd_b_x, sd_b_y })
}

fn from_slope(m: &AnchorMoments, slope: f64) -> LinkingCoefficients {
    LinkingCoefficients::new(m.mean_b_y - slope * m.mean_b_x, slope, None)
}

/// `A = mean(a_X) / mean(a_Y)`, `B = mean(b_Y) − A·mean(b_X)`.
pub fn mean_mean(form_x: &ItemCollection, form_y: &ItemCollection, rasch: bool) -> LinkingCoefficients {
    match anchor_moments(form_x, form_y) {
        Some(m) => {
            let slope = if rasch { 1.0 } else { m.mean_a_x / m.mean_a_y };
            from_slope(&m, slope)
        }
        None => LinkingCoefficients::undefined(),
    }
}

/// `A = sd(b_Y) / sd(b_X)`, `B = mean(b_Y) − A·mean(b_X)`.
pub fn mean_sigma(form_x: &ItemCollection, form_y: &ItemCollection, rasch: bool) -> LinkingCoefficients {
    match anchor_moments(form_x, form_y) {
        Some(m) => {
            let slope = if rasch { 1.0 } else { m.sd_b_y / m.sd_b_x };
            from_slope(&m, slope)
        }
        None => LinkingCoefficients::undefined(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::irt::models::{Irm3PL, IrmGpcm};

    fn two_pl_form(items: &[(&str, f64, f64)]) -> ItemCollection {
        let mut form = ItemCollection::new();
        for &(id, a, b) in items {
            form.insert(id, Irm3PL::two_pl(a, b, 1.7).expect("valid")).expect("unique");
        }
        form
    }

    #[test]
    // Purpose
    // -------
    // Moment methods recover an exact linear relation between forms.
    //
    // Given
    // -----
    // Form Y parameters built from Form X by a / 1.25 and 1.25·b + 0.4.
    //
    // Expect
    // ------
    // Both methods return A = 1.25 and B = 0.4.
    fn moment_methods_recover_exact_transform() {
        // Arrange
        let x = [("i1", 1.0, -1.0), ("i2", 1.5, 0.0), ("i3", 0.8, 1.2)];
        let y: Vec<(&str, f64, f64)> =
            x.iter().map(|&(id, a, b)| (id, a / 1.25, 1.25 * b + 0.4)).collect();
        let form_x = two_pl_form(&x);
        let form_y = two_pl_form(&y);

        // Act
        let mm = mean_mean(&form_x, &form_y, false);
        let ms = mean_sigma(&form_x, &form_y, false);

        // Assert
        approx::assert_abs_diff_eq!(mm.slope, 1.25, epsilon = 1e-12);
        approx::assert_abs_diff_eq!(mm.intercept, 0.4, epsilon = 1e-12);
        approx::assert_abs_diff_eq!(ms.slope, 1.25, epsilon = 1e-12);
        approx::assert_abs_diff_eq!(ms.intercept, 0.4, epsilon = 1e-12);
        assert_eq!(ms.objective, None);
    }

    #[test]
    // Purpose
    // -------
    // Each polytomous step is a separate location observation.
    fn polytomous_steps_are_separate_observations() {
        // Arrange: X steps {-1, 1}, Y steps {0, 2} plus one binary item each.
        let mut x = two_pl_form(&[("b", 1.0, 0.0)]);
        x.insert("p", IrmGpcm::gpcm(1.0, 0.0, &[-1.0, 1.0], 1.7).expect("valid")).expect("unique");
        let mut y = two_pl_form(&[("b", 1.0, 1.0)]);
        y.insert("p", IrmGpcm::gpcm(1.0, 1.0, &[-1.0, 1.0], 1.7).expect("valid")).expect("unique");

        // Act
        let ms = mean_sigma(&x, &y, false);

        // Assert: X locations {0, -1, 1}, Y locations {1, 0, 2}.
        approx::assert_abs_diff_eq!(ms.slope, 1.0, epsilon = 1e-12);
        approx::assert_abs_diff_eq!(ms.intercept, 1.0, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // The Rasch flag pins the slope to 1 even when SDs differ.
    fn rasch_flag_pins_slope() {
        let x = two_pl_form(&[("a", 1.0, -1.0), ("b", 1.0, 1.0)]);
        let y = two_pl_form(&[("a", 1.0, -1.5), ("b", 1.0, 2.5)]);
        let ms = mean_sigma(&x, &y, true);
        assert_eq!(ms.slope, 1.0);
        approx::assert_abs_diff_eq!(ms.intercept, 0.5, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // No common items gives NaN coefficients rather than an error.
    fn disjoint_forms_give_nan() {
        let x = two_pl_form(&[("a", 1.0, 0.0)]);
        let y = two_pl_form(&[("z", 1.0, 0.0)]);
        let mm = mean_mean(&x, &y, false);
        assert!(mm.intercept.is_nan() && mm.slope.is_nan());
    }
}
