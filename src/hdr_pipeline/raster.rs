//! Raster module
//!
//! Decoded 8-bit images, floating-point radiance maps and the codec seam used
//! to move them between durable storage and the pipeline.

mod codec;
mod standard_codec;
pub mod types;


pub use codec::ImageCodec;
pub use standard_codec::StandardImageCodec;
pub(crate) use standard_codec::to_rgb_image;
pub use types::{CHANNELS, RadianceMap, Raster};
