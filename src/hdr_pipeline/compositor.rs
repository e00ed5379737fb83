//! Compositor module
//!
//! Drives the whole pipeline over a batch of photographs: grouping, AEB
//! selection, decoding, merging, tonemapping and encoding, one output per
//! group.

mod pipeline;
pub mod types;


pub use pipeline::HdrCompositor;
pub use types::{
    CompositeReport, CompositorConfig, CompositorConfigBuilder, GroupResult, GroupStatus,
};
