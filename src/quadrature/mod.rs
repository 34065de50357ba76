//! quadrature — discrete ability distributions for criterion integration.
//!
//! [`QuadratureRule`] holds ordered `(point, weight)` pairs built from a
//! uniform grid, a normal density, or caller-supplied values. Weights are
//! non-negative but need not sum to one.

pub mod errors;
pub mod rule;

pub use self::errors::{QuadratureError, QuadratureResult};
pub use self::rule::QuadratureRule;
