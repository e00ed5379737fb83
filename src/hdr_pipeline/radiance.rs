//! Radiance TIFF module
//!
//! Persists merged radiance maps as 32-bit float RGB TIFF files with
//! selectable compression.

mod standard_tiff_writer;
pub mod types;
mod writer;


pub use standard_tiff_writer::StandardRadianceWriter;
pub use types::TiffCompression;
pub use writer::RadianceWriter;
