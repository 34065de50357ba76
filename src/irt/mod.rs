//! irt — item response models and named item collections.
//!
//! Purpose
//! -------
//! Evaluate already-calibrated item response functions under one shared
//! numeric contract, [`ItemResponseModel`], so that linking and equating
//! code never branches on the concrete model family. Items are grouped
//! into id-keyed test forms via [`ItemCollection`].
//!
//! Key behaviors
//! -------------
//! - Category probabilities, expected scores, cumulative probabilities,
//!   item information, and first/second θ derivatives of the expected score
//!   for the binary logistic family ([`Irm3PL`]), generalized partial
//!   credit ([`IrmGpcm`]), partial credit ([`IrmPcm`]), and graded response
//!   ([`IrmGrm`]) models.
//! - Gradients (analytic) and Hessians (finite differences of the gradient)
//!   with respect to the free item parameters, both for stored parameters
//!   and for externally supplied parameter vectors.
//! - Star/sharp linear rescaling of item parameters, either as a trial
//!   evaluation ([`ItemResponseModel::t_star_probability`]) or in place
//!   ([`ItemResponseModel::scale`]).
//! - Optional `statrs`-backed priors per free parameter.
//!
//! Invariants & assumptions
//! ------------------------
//! - `ncat ≥ 2`, score weights have length `ncat` and are non-decreasing,
//!   stored parameters are finite, and the scaling constant `D` is finite,
//!   positive, and kept per item exactly as supplied.
//! - Items are mutated only by `scale`, `set_item_parameters`, and the
//!   score-weight/prior/fixed setters.
//!
//! Conventions
//! -----------
//! - Parameter-vector layouts are documented on each model type.
//! - A 3PL guessing parameter below zero marks an inactive item whose
//!   probabilities are all 0.
//! - Categories outside `0..ncat` evaluate to probability 0.

pub mod collection;
pub mod core;
pub mod errors;
pub mod models;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::collection::ItemCollection;
pub use self::core::{
    common::ItemCommon,
    priors::{ItemPriors, ParamPrior},
    transform::{ScaleTransform, TransformDirection},
};
pub use self::errors::{IrmError, IrmResult};
pub use self::models::{
    BinaryKind, Irm3PL, IrmGpcm, IrmGrm, IrmPcm, ItemResponseModel, ModelKind,
    PcmParameterization, ThresholdSign,
};

pub mod prelude {
    pub use super::collection::ItemCollection;
    pub use super::core::priors::ParamPrior;
    pub use super::core::transform::ScaleTransform;
    pub use super::errors::{IrmError, IrmResult};
    pub use super::models::{Irm3PL, IrmGpcm, IrmGrm, IrmPcm, ItemResponseModel, ModelKind};
}
