//! Linking configuration: criterion choice, reporting precision, and the
//! minimizer settings used by the characteristic-curve methods.
use std::str::FromStr;

use crate::{
    linking::errors::{LinkingError, LinkingResult},
    optimization::minimizer::traits::{MinimizerOptions, SolverKind},
};

/// Largest accepted rounding precision.
pub const MAX_PRECISION: u32 = 15;

/// Which directions of the characteristic-curve discrepancy are summed.
///
/// - `Q1`: one direction only, on Form X's ability scale.
/// - `Q1Q2`: average of the Form X and Form Y directions (symmetric).
///
/// `FromStr` accepts case-insensitive `"Q1"`, `"Q1Q2"`, or `"symmetric"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CriterionType {
    Q1,
    Q1Q2,
}

impl FromStr for CriterionType {
    type Err = LinkingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "q1" => Ok(CriterionType::Q1),
            "q1q2" | "symmetric" => Ok(CriterionType::Q1Q2),
            _ => Err(LinkingError::InvalidCriterion {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'Q1' or 'Q1Q2'.",
            }),
        }
    }
}

/// Characteristic-curve discrepancy.
///
/// - `Haebara`: squared category-probability differences per item.
/// - `StockingLord`: squared difference of the common-item TCCs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CurveMethod {
    Haebara,
    StockingLord,
}

impl FromStr for CurveMethod {
    type Err = LinkingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "haebara" | "hb" => Ok(CurveMethod::Haebara),
            "stockinglord" | "sl" => Ok(CurveMethod::StockingLord),
            _ => Err(LinkingError::InvalidMethod {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'Haebara' or 'StockingLord'.",
            }),
        }
    }
}

/// Scale linking options.
///
/// Fields:
/// - `criterion`: [`CriterionType`] for Haebara and Stocking-Lord.
/// - `precision`: decimal digits kept in reported coefficients and
///   objective values. Intermediate arithmetic is never rounded.
/// - `minimizer`: settings handed to
///   [`minimize`](crate::optimization::minimizer::minimize). L-BFGS with
///   More–Thuente line search or Nelder–Mead; the Hager–Zhang line search
///   is rejected (see [`check_solver`]).
/// - `rasch`: pin the slope to 1 and search over the intercept only. An
///   anchor set made only of Rasch-family items is searched this way
///   regardless.
/// - `restarts`: extra randomized starting points; the best minimum wins.
/// - `seed`: seed for the restart generator.
///
/// Default: `Q1Q2`, precision 6, L-BFGS with More–Thuente line search,
/// no restarts, seed 0, `rasch = false`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinkingOptions {
    pub criterion: CriterionType,
    pub precision: u32,
    pub minimizer: MinimizerOptions,
    pub restarts: usize,
    pub seed: u64,
    pub rasch: bool,
}

impl LinkingOptions {
    /// # Errors
    /// - [`LinkingError::InvalidPrecision`] when `precision > 15`.
    /// - [`LinkingError::UnsupportedSolver`] for the Hager–Zhang line search.
    pub fn new(
        criterion: CriterionType, precision: u32, minimizer: MinimizerOptions, restarts: usize,
        seed: u64, rasch: bool,
    ) -> LinkingResult<Self> {
        if precision > MAX_PRECISION {
            return Err(LinkingError::InvalidPrecision { digits: precision });
        }
        check_solver(minimizer.solver)?;
        Ok(Self { criterion, precision, minimizer, restarts, seed, rasch })
    }
}

/// Solvers usable on the linking criteria.
///
/// The Hager–Zhang bracketing loop can fail to terminate on these criteria.
///
/// # Errors
/// [`LinkingError::UnsupportedSolver`] for [`SolverKind::LbfgsHagerZhang`].
pub fn check_solver(solver: SolverKind) -> LinkingResult<()> {
    match solver {
        SolverKind::LbfgsHagerZhang => Err(LinkingError::UnsupportedSolver {
            solver,
            reason: "use 'MoreThuente' or 'NelderMead' for characteristic-curve linking.",
        }),
        SolverKind::LbfgsMoreThuente | SolverKind::NelderMead => Ok(()),
    }
}

impl Default for LinkingOptions {
    fn default() -> Self {
        Self {
            criterion: CriterionType::Q1Q2,
            precision: 6,
            minimizer: MinimizerOptions::default(),
            restarts: 0,
            seed: 0,
            rasch: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Names parse case-insensitively and unknown names are rejected.
    fn criterion_and_method_parse_from_strings() {
        assert_eq!("q1q2".parse::<CriterionType>(), Ok(CriterionType::Q1Q2));
        assert_eq!("Q1".parse::<CriterionType>(), Ok(CriterionType::Q1));
        assert_eq!("Stocking-Lord".parse::<CurveMethod>(), Ok(CurveMethod::StockingLord));
        assert_eq!("HAEBARA".parse::<CurveMethod>(), Ok(CurveMethod::Haebara));
        assert!(matches!(
            "q2".parse::<CriterionType>(),
            Err(LinkingError::InvalidCriterion { .. })
        ));
        assert!(matches!("lord".parse::<CurveMethod>(), Err(LinkingError::InvalidMethod { .. })));
    }

    #[test]
    // Purpose
    // -------
    // The constructor rejects precisions an `f64` cannot represent.
    fn new_rejects_excess_precision() {
        let err = LinkingOptions::new(
            CriterionType::Q1,
            16,
            MinimizerOptions::default(),
            0,
            0,
            false,
        )
        .expect_err("precision too large");
        assert_eq!(err, LinkingError::InvalidPrecision { digits: 16 });
        assert_eq!(LinkingOptions::default().precision, 6);
    }

    #[test]
    // Purpose
    // -------
    // Only the solvers that terminate on the linking criteria are accepted.
    fn new_rejects_hager_zhang_line_search() {
        // Arrange
        let with_solver =
            |solver: SolverKind| MinimizerOptions { solver, ..MinimizerOptions::default() };

        // Act
        let hz = LinkingOptions::new(
            CriterionType::Q1Q2,
            6,
            with_solver(SolverKind::LbfgsHagerZhang),
            0,
            0,
            false,
        );
        let nm = LinkingOptions::new(
            CriterionType::Q1Q2,
            6,
            with_solver(SolverKind::NelderMead),
            0,
            0,
            false,
        );

        // Assert
        assert!(matches!(
            hz,
            Err(LinkingError::UnsupportedSolver { solver: SolverKind::LbfgsHagerZhang, .. })
        ));
        assert!(nm.is_ok());
        assert!(check_solver(SolverKind::LbfgsMoreThuente).is_ok());
    }
}
