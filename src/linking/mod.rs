//! linking — IRT scale linking of two calibrated forms.
//!
//! Purpose
//! -------
//! Estimate coefficients `(B, A)` with `θ_Y = A·θ_X + B` from the common
//! items of Form X and Form Y, by moment methods (Mean/Mean, Mean/Sigma)
//! and characteristic-curve methods (Haebara, Stocking-Lord).
//!
//! Key behaviors
//! -------------
//! - [`anchor`] pairs common items by id and drops category-count
//!   mismatches with a warning.
//! - [`descriptive`] computes the moment coefficients.
//! - [`criterion`] exposes the Haebara and Stocking-Lord criteria as an
//!   [`Objective`](crate::optimization::minimizer::Objective), including the
//!   intercept-only Rasch search.
//! - [`engine`] runs the minimizer, handles restarts and reporting
//!   precision, and applies coefficients to a form.
//!
//! Conventions
//! -----------
//! - "Star" places Form X parameters on the Form Y scale, "sharp" the
//!   reverse (see [`ScaleTransform`](crate::irt::ScaleTransform)).
//! - Degenerate inputs produce NaN coefficients, never errors.

pub mod anchor;
pub mod criterion;
pub mod descriptive;
pub mod engine;
pub mod errors;
pub mod options;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::anchor::{AnchorPair, anchor_pairs};
pub use self::criterion::CharacteristicCurveCriterion;
pub use self::descriptive::{mean_mean, mean_sigma};
pub use self::engine::{IrtScaleLinking, LinkingCoefficients, LinkingSummary, transform_form};
pub use self::errors::{LinkingError, LinkingResult};
pub use self::options::{CriterionType, CurveMethod, LinkingOptions, check_solver};

pub mod prelude {
    pub use super::engine::{IrtScaleLinking, LinkingCoefficients, LinkingSummary, transform_form};
    pub use super::errors::{LinkingError, LinkingResult};
    pub use super::options::{CriterionType, CurveMethod, LinkingOptions};
}
