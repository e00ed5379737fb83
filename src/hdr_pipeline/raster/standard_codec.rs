//! Image codec backed by the `image` crate.
//!
//! Decoding accepts every format the crate was built with and converts it to
//! 8-bit RGB. Encoding picks the format from the file extension; JPEG output
//! uses a fixed quality.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::{ImageError, ImageFormat, RgbImage};
use tracing::debug;

use crate::hdr_pipeline::common::error::{PipelineError, Result};
use crate::hdr_pipeline::raster::codec::ImageCodec;
use crate::hdr_pipeline::raster::types::Raster;

/// Quality used for lossy JPEG output.
pub const JPEG_QUALITY: u8 = 95;

pub struct StandardImageCodec;

impl ImageCodec for StandardImageCodec {
    fn decode(&self, path: &Path) -> Result<Raster> {
        let image = image::open(path)
            .map_err(|e| match e {
                ImageError::IoError(io) => {
                    PipelineError::InputReadError(format!("{}: {}", path.display(), io))
                }
                other => PipelineError::DecodeError(format!("{}: {}", path.display(), other)),
            })?
            .to_rgb8();
        let (width, height) = (image.width() as usize, image.height() as usize);

        debug!("Decoded {}: {}x{}", path.display(), width, height);
        Raster::new(width, height, image.into_raw())
    }

    fn encode(&self, raster: &Raster, path: &Path) -> Result<()> {
        debug!("Encoding {}: {}x{}", path.display(), raster.width, raster.height);

        let image = to_rgb_image(raster)?;
        let format = ImageFormat::from_path(path)
            .map_err(|e| PipelineError::EncodeError(format!("{}: {}", path.display(), e)))?;

        match format {
            ImageFormat::Jpeg => {
                let file = File::create(path).map_err(|e| {
                    PipelineError::OutputWriteError(format!("{}: {}", path.display(), e))
                })?;
                let mut writer = BufWriter::new(file);
                let encoder = JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY);
                image
                    .write_with_encoder(encoder)
                    .map_err(|e| PipelineError::EncodeError(e.to_string()))?;
            }
            _ => image
                .save_with_format(path, format)
                .map_err(|e| PipelineError::EncodeError(format!("{}: {}", path.display(), e)))?,
        }

        Ok(())
    }
}

pub(crate) fn to_rgb_image(raster: &Raster) -> Result<RgbImage> {
    RgbImage::from_raw(
        raster.width as u32,
        raster.height as u32,
        raster.data.clone(),
    )
    .ok_or(PipelineError::InvalidDimensions(raster.width, raster.height))
}
