//! Weighted log-domain radiance recovery.
//!
//! Each frame votes for `ln z - ln t` at every sample, weighted by a hat
//! function that trusts mid-tones and distrusts values near 0 or 255. The
//! camera response is taken as linear.

use std::borrow::Cow;

use rayon::prelude::*;
use tracing::{info, instrument};

use crate::hdr_pipeline::alignment::{align, deghost};
use crate::hdr_pipeline::common::{Diagnostic, PipelineError, Result};
use crate::hdr_pipeline::merge::types::{MergeOptions, MergeOutput};
use crate::hdr_pipeline::raster::{CHANNELS, RadianceMap, Raster};

/// Floor for the hat weight so fully clipped stacks still average.
const MIN_WEIGHT: f64 = 1e-3;

const MID_VALUE: f64 = 127.5;

/// Hat weight for an 8-bit sample.
pub fn pixel_weight(z: u8) -> f64 {
    (1.0 - (z as f64 - MID_VALUE).abs() / MID_VALUE).max(MIN_WEIGHT)
}

#[instrument(skip(rasters, exposure_times), fields(frames = rasters.len()))]
pub fn merge(rasters: &[Raster], exposure_times: &[f64], options: MergeOptions) -> Result<MergeOutput> {
    validate(rasters, exposure_times)?;

    let mut diagnostics = Vec::new();
    let mut stack: Cow<'_, [Raster]> = Cow::Borrowed(rasters);

    if rasters.len() < 2 {
        if options.align {
            diagnostics.push(Diagnostic::warning(
                "merge",
                "alignment needs at least two images; skipped",
            ));
        }
        if options.deghost {
            diagnostics.push(Diagnostic::warning(
                "merge",
                "deghosting needs at least two images; skipped",
            ));
        }
    } else {
        if options.align {
            stack = Cow::Owned(align(&stack));
        }
        if options.deghost {
            stack = Cow::Owned(deghost(&stack, options.deghost_threshold));
        }
    }

    let (width, height) = rasters[0].dimensions();
    let radiance = recover(&stack, exposure_times, width, height)?;

    info!(
        "Merged {} exposures into {}x{} radiance map",
        rasters.len(),
        width,
        height
    );
    Ok(MergeOutput {
        radiance,
        diagnostics,
    })
}

fn validate(rasters: &[Raster], exposure_times: &[f64]) -> Result<()> {
    let first = rasters.first().ok_or(PipelineError::NoImages)?;

    if rasters.len() != exposure_times.len() {
        return Err(PipelineError::ExposureCountMismatch {
            images: rasters.len(),
            times: exposure_times.len(),
        });
    }

    if let Some(&bad) = exposure_times.iter().find(|t| !(t.is_finite() && **t > 0.0)) {
        return Err(PipelineError::InvalidExposureTime(bad));
    }

    if let Some(other) = rasters.iter().find(|r| r.dimensions() != first.dimensions()) {
        return Err(PipelineError::DimensionMismatch {
            expected: first.dimensions(),
            actual: other.dimensions(),
        });
    }

    if let Some(bad) = rasters.iter().find(|r| r.data.len() != r.pixel_count() * CHANNELS) {
        return Err(PipelineError::InvalidDimensions(bad.width, bad.height));
    }

    Ok(())
}

fn recover(stack: &[Raster], exposure_times: &[f64], width: usize, height: usize) -> Result<RadianceMap> {
    let weights: Vec<f64> = (0..=255u8).map(pixel_weight).collect();
    let log_values: Vec<f64> = (0..=255u8).map(|z| (z.max(1) as f64).ln()).collect();
    let log_times: Vec<f64> = exposure_times.iter().map(|t| t.ln()).collect();

    let row_len = width * CHANNELS;
    let mut data = vec![0.0f32; row_len * height];
    if row_len == 0 {
        return RadianceMap::new(width, height, data);
    }

    data.par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| {
            let offset = y * row_len;
            for (i, out) in row.iter_mut().enumerate() {
                let mut numerator = 0.0f64;
                let mut denominator = 0.0f64;
                for (raster, log_t) in stack.iter().zip(&log_times) {
                    let z = raster.data[offset + i] as usize;
                    let w = weights[z];
                    numerator += w * (log_values[z] - log_t);
                    denominator += w;
                }
                *out = (numerator / denominator).exp() as f32;
            }
        });

    RadianceMap::new(width, height, data)
}
