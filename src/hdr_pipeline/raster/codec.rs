use std::path::Path;

use crate::hdr_pipeline::common::error::Result;
use crate::hdr_pipeline::raster::types::Raster;

/// Moves rasters between files and memory.
///
/// A failed decode is reported as an error, but callers in the pipeline treat
/// it as a skip marker for that one image.
pub trait ImageCodec: Sync {
    fn decode(&self, path: &Path) -> Result<Raster>;
    fn encode(&self, raster: &Raster, path: &Path) -> Result<()>;
}
