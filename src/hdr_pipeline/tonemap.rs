//! Tonemapping module
//!
//! Turns a radiance map into a displayable 8-bit image: normalization, a
//! global operator, rescaling, quantization, enhancement, and finally
//! highlight preservation so that blown-out areas stay white.

mod color;
pub mod enhance;
mod operators;
pub mod types;


pub use enhance::enhance;
pub use types::{ToneOperator, ToneParameters, ToneParametersBuilder};

use tracing::{debug, instrument};

use crate::hdr_pipeline::common::error::Result;
use crate::hdr_pipeline::raster::{CHANNELS, RadianceMap, Raster};

/// Quantized pixels whose brightest channel reaches this are forced white.
pub const HIGHLIGHT_THRESHOLD: u8 = 250;

#[instrument(skip(radiance, reference), fields(width = radiance.width, height = radiance.height))]
pub fn tonemap(radiance: &RadianceMap, reference: Option<&Raster>, params: &ToneParameters) -> Result<Raster> {
    params.validate()?;
    let (width, height) = radiance.dimensions();

    let normalized = normalize(radiance);
    let mapped = operators::apply(&normalized, params);
    let ldr = Raster::new(width, height, quantize(&rescale(mapped, params.brightness)))?;

    let highlights: Vec<bool> = ldr
        .pixels()
        .map(|p| p.iter().any(|&c| c >= HIGHLIGHT_THRESHOLD))
        .collect();

    let mut out = enhance(&ldr, reference)?;
    for (pixel, _) in out
        .data
        .chunks_exact_mut(CHANNELS)
        .zip(&highlights)
        .filter(|(_, highlight)| **highlight)
    {
        pixel.fill(u8::MAX);
    }

    debug!(
        "Tonemapped with {} ({} highlight pixels)",
        params.operator,
        highlights.iter().filter(|h| **h).count()
    );
    Ok(out)
}

/// Min-max normalization over all finite samples. A flat map becomes zeros.
fn normalize(radiance: &RadianceMap) -> Vec<f32> {
    match radiance.finite_range() {
        Some((lo, hi)) if (hi - lo).is_finite() && hi > lo => {
            let range = hi - lo;
            radiance.data.iter().map(|&v| (v - lo) / range).collect()
        }
        _ => vec![0.0; radiance.data.len()],
    }
}

/// Peak to 1, brightness, clip.
fn rescale(mut data: Vec<f32>, brightness: f32) -> Vec<f32> {
    let peak = data
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(0.0f32, f32::max);
    let gain = if peak > 0.0 { brightness / peak } else { brightness };
    for v in data.iter_mut() {
        *v = (*v * gain).clamp(0.0, 1.0);
    }
    data
}

fn quantize(data: &[f32]) -> Vec<u8> {
    data.iter()
        .map(|&v| {
            let v = if v.is_nan() || v == f32::NEG_INFINITY {
                0.0
            } else if v == f32::INFINITY {
                1.0
            } else {
                v
            };
            (v * 255.0).round().clamp(0.0, 255.0) as u8
        })
        .collect()
}
