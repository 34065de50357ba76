//! equating — IRT true-score equating.
//!
//! [`TrueScoreEquating`] maps each integer raw score on Form X to an
//! ability through Form X's test characteristic curve and then to a Form Y
//! equivalent through Form Y's curve. Both forms must already be on a
//! common scale (see [`linking`](crate::linking)).

pub mod errors;
pub mod options;
pub mod true_score;

pub use self::errors::{EquatingError, EquatingResult};
pub use self::options::EquatingOptions;
pub use self::true_score::{
    EquatingTable, THETA_LOWER_SENTINEL, THETA_UPPER_SENTINEL, TrueScoreEquating,
};
