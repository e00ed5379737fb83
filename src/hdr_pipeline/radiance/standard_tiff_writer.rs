use std::io::{Cursor, Write};

use tiff::encoder::colortype::RGB32Float;
use tiff::encoder::compression::DeflateLevel;
use tiff::encoder::{Compression, TiffEncoder};
use tracing::debug;

use crate::hdr_pipeline::common::error::{PipelineError, Result};
use crate::hdr_pipeline::radiance::types::TiffCompression;
use crate::hdr_pipeline::radiance::writer::RadianceWriter;
use crate::hdr_pipeline::raster::RadianceMap;

pub struct StandardRadianceWriter;

impl RadianceWriter for StandardRadianceWriter {
    fn write_radiance(
        &self,
        radiance: &RadianceMap,
        output: &mut dyn Write,
        compression: TiffCompression,
    ) -> Result<()> {
        debug!(
            "Encoding radiance TIFF: {}x{} ({})",
            radiance.width, radiance.height, compression
        );

        let compression = match compression {
            TiffCompression::None => Compression::Uncompressed,
            TiffCompression::Lzw => Compression::Lzw,
            TiffCompression::DeflateFast => Compression::Deflate(DeflateLevel::Fast),
            TiffCompression::DeflateBalanced => Compression::Deflate(DeflateLevel::Balanced),
            TiffCompression::DeflateBest => Compression::Deflate(DeflateLevel::Best),
        };

        // The encoder needs Seek, so encode into memory first.
        let mut buffer = Vec::new();
        TiffEncoder::new(Cursor::new(&mut buffer))
            .map_err(|e| PipelineError::EncodeError(e.to_string()))?
            .with_compression(compression)
            .write_image::<RGB32Float>(radiance.width as u32, radiance.height as u32, &radiance.data)
            .map_err(|e| PipelineError::EncodeError(e.to_string()))?;

        output.write_all(&buffer)?;

        debug!("Radiance TIFF encoding complete ({} bytes)", buffer.len());
        Ok(())
    }
}
