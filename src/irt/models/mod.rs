//! irt::models — the item response model variants.
//!
//! - [`traits`]: the [`ItemResponseModel`] contract and [`ModelKind`].
//! - [`three_pl`]: Rasch, 1PL, 2PL, 3PL, 4PL.
//! - [`gpcm`]: GPCM and GPCM2.
//! - [`pcm`]: PCM and PCM2.
//! - [`grm`]: graded response model.

pub mod gpcm;
pub mod grm;
pub mod pcm;
pub mod three_pl;
pub mod traits;

pub use self::gpcm::{IrmGpcm, ThresholdSign};
pub use self::grm::IrmGrm;
pub use self::pcm::{IrmPcm, PcmParameterization};
pub use self::three_pl::{BinaryKind, Irm3PL};
pub use self::traits::{ItemResponseModel, ModelKind};
