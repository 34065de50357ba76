//! ItemCommon — state shared by every item response model.
//!
//! Every model variant owns exactly one [`ItemCommon`] holding the scaling
//! constant `D`, the per-category score weights, the `fixed` flag that
//! suppresses rescaling during linking, and the optional parameter priors.
//! `D` is instance data: a form may mix items calibrated with `D = 1.0`,
//! `1.7`, and `1.702`.
use crate::irt::{
    core::{
        priors::ItemPriors,
        validation::{validate_ncat, validate_scaling_constant, validate_score_weights},
    },
    errors::IrmResult,
};

#[derive(Debug, Clone, PartialEq)]
pub struct ItemCommon {
    scaling_constant: f64,
    score_weights: Vec<f64>,
    fixed: bool,
    priors: ItemPriors,
}

impl ItemCommon {
    /// Build common state with default score weights `0, 1, …, ncat − 1`.
    ///
    /// # Errors
    /// - `IrmError::InvalidCategoryCount` when `ncat < 2`.
    /// - `IrmError::InvalidScalingConstant` for a non-finite or
    ///   non-positive `d`.
    pub fn new(ncat: usize, scaling_constant: f64) -> IrmResult<Self> {
        validate_ncat(ncat)?;
        validate_scaling_constant(scaling_constant)?;
        Ok(Self {
            scaling_constant,
            score_weights: (0..ncat).map(|k| k as f64).collect(),
            fixed: false,
            priors: ItemPriors::default(),
        })
    }

    pub fn scaling_constant(&self) -> f64 {
        self.scaling_constant
    }

    pub fn score_weights(&self) -> &[f64] {
        &self.score_weights
    }

    /// # Errors
    /// Length, finiteness, and monotonicity errors from
    /// [`validate_score_weights`].
    pub fn set_score_weights(&mut self, weights: Vec<f64>) -> IrmResult<()> {
        validate_score_weights(&weights, self.score_weights.len())?;
        self.score_weights = weights;
        Ok(())
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    pub fn set_fixed(&mut self, fixed: bool) {
        self.fixed = fixed;
    }

    pub fn priors(&self) -> &ItemPriors {
        &self.priors
    }

    pub fn set_priors(&mut self, priors: ItemPriors) {
        self.priors = priors;
    }
}
