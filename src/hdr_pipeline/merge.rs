//! HDR merge module
//!
//! Recovers a floating-point radiance map from a stack of differently
//! exposed 8-bit frames of the same scene.

mod radiance_recovery;
pub mod types;

#[cfg(test)]
mod tests;

pub use radiance_recovery::{merge, pixel_weight};
pub use types::{MergeOptions, MergeOptionsBuilder, MergeOutput};
