use std::io::Write;
use std::path::Path;

use crate::hdr_pipeline::common::error::{PipelineError, Result};
use crate::hdr_pipeline::radiance::types::TiffCompression;
use crate::hdr_pipeline::raster::RadianceMap;

pub trait RadianceWriter: Sync {
    fn write_radiance(
        &self,
        radiance: &RadianceMap,
        output: &mut dyn Write,
        compression: TiffCompression,
    ) -> Result<()>;

    fn write_radiance_file(
        &self,
        radiance: &RadianceMap,
        path: &Path,
        compression: TiffCompression,
    ) -> Result<()> {
        let mut file = std::fs::File::create(path)
            .map_err(|e| PipelineError::OutputWriteError(format!("{}: {}", path.display(), e)))?;
        self.write_radiance(radiance, &mut file, compression)
    }
}
