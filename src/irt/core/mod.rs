//! irt::core — building blocks shared by all item response models.
//!
//! - [`common`]: scaling constant, score weights, fixed flag, priors.
//! - [`priors`]: `statrs`-backed parameter priors.
//! - [`transform`]: star/sharp linear rescaling of item parameters.
//! - [`divide_by_total`]: category probabilities and derivatives for the
//!   partial-credit families.
//! - [`validation`]: construction and parameter-vector checks.

pub mod common;
pub mod divide_by_total;
pub mod priors;
pub mod transform;
pub mod validation;
