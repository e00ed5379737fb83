//! Median-based ghost suppression.
//!
//! For every pixel the per-channel median across frames is taken as the
//! static scene. A frame whose pixel strays too far from it is assumed to
//! show a moving object there, and that pixel is replaced with the reference
//! frame's pixel.

use tracing::{debug, instrument, warn};

use crate::hdr_pipeline::raster::{CHANNELS, Raster};

/// Largest summed channel deviation from the median that is left alone.
pub const DEFAULT_DEGHOST_THRESHOLD: u32 = 25;

#[instrument(skip(rasters), fields(frames = rasters.len()))]
pub fn deghost(rasters: &[Raster], threshold: u32) -> Vec<Raster> {
    let Some(reference) = rasters.first() else {
        return Vec::new();
    };
    if rasters.iter().any(|r| r.dimensions() != reference.dimensions()) {
        warn!("Frames differ in size; deghosting skipped");
        return rasters.to_vec();
    }

    let n = rasters.len();
    let mut output = rasters.to_vec();
    let mut samples = vec![0u8; n];
    let mut doubled_median = [0i32; CHANNELS];
    let mut replaced = 0usize;

    // Medians are kept doubled so even frame counts stay in integers.
    let limit = 2 * u64::from(threshold);

    for pixel in 0..reference.pixel_count() {
        let base = pixel * CHANNELS;

        for (c, median) in doubled_median.iter_mut().enumerate() {
            for (sample, raster) in samples.iter_mut().zip(rasters) {
                *sample = raster.data[base + c];
            }
            samples.sort_unstable();
            *median = if n % 2 == 1 {
                2 * samples[n / 2] as i32
            } else {
                samples[n / 2 - 1] as i32 + samples[n / 2] as i32
            };
        }

        for frame in output.iter_mut().skip(1) {
            let deviation: u64 = (0..CHANNELS)
                .map(|c| {
                    let diff = 2 * frame.data[base + c] as i32 - doubled_median[c];
                    u64::from(diff.unsigned_abs())
                })
                .sum();
            if deviation > limit {
                frame.data[base..base + CHANNELS]
                    .copy_from_slice(&reference.data[base..base + CHANNELS]);
                replaced += 1;
            }
        }
    }

    debug!("Replaced {} ghost pixels", replaced);
    output
}
