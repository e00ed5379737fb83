//! Raster and radiance map buffers

use crate::hdr_pipeline::common::error::{PipelineError, Result};

/// Interleaved channel count for every buffer in the pipeline.
pub const CHANNELS: usize = 3;

/// A decoded 8-bit image with interleaved RGB channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// Pixel data [R, G, B, R, G, B, ...] in row-major order
    pub data: Vec<u8>,
}

impl Raster {
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        if data.len() != width * height * CHANNELS {
            return Err(PipelineError::InvalidDimensions(width, height));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A raster filled with one color.
    pub fn filled(width: usize, height: usize, rgb: [u8; 3]) -> Self {
        Self {
            width,
            height,
            data: rgb.repeat(width * height),
        }
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        let i = (y * self.width + x) * CHANNELS;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, rgb: [u8; 3]) {
        let i = (y * self.width + x) * CHANNELS;
        self.data[i..i + CHANNELS].copy_from_slice(&rgb);
    }

    pub fn pixels(&self) -> impl Iterator<Item = &[u8]> {
        self.data.chunks_exact(CHANNELS)
    }

    /// Rec. 601 luma per pixel.
    pub fn luma(&self) -> Vec<f32> {
        self.pixels()
            .map(|p| 0.299 * p[0] as f32 + 0.587 * p[1] as f32 + 0.114 * p[2] as f32)
            .collect()
    }
}

/// Floating-point scene radiance, same layout as [`Raster`] but unbounded.
#[derive(Debug, Clone, PartialEq)]
pub struct RadianceMap {
    pub width: usize,
    pub height: usize,
    pub data: Vec<f32>,
}

impl RadianceMap {
    pub fn new(width: usize, height: usize, data: Vec<f32>) -> Result<Self> {
        if data.len() != width * height * CHANNELS {
            return Err(PipelineError::InvalidDimensions(width, height));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Smallest and largest finite sample, or `None` when there is none.
    pub fn finite_range(&self) -> Option<(f32, f32)> {
        self.data
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}
