//! Alignment module
//!
//! Translational registration of bracket frames against the first frame, and
//! suppression of moving objects ("ghosts") before the merge.

mod deghost;
mod phase_correlation;

#[cfg(test)]
mod tests;

pub use deghost::{DEFAULT_DEGHOST_THRESHOLD, deghost};
pub use phase_correlation::{PhaseCorrelator, estimate_shift, translate};

use rayon::prelude::*;
use tracing::{debug, instrument, warn};

use crate::hdr_pipeline::raster::Raster;

/// Aligns every raster to the first one.
///
/// The offset of each frame is found by phase correlation of luma and undone
/// with bilinear resampling. Frames whose size differs from the reference are
/// passed through untouched.
#[instrument(skip_all, fields(frames = rasters.len()))]
pub fn align(rasters: &[Raster]) -> Vec<Raster> {
    let Some(reference) = rasters.first() else {
        return Vec::new();
    };
    if reference.pixel_count() == 0 {
        return rasters.to_vec();
    }

    let correlator = PhaseCorrelator::new(reference.width, reference.height);
    let reference_luma = reference.luma();

    let others: Vec<Raster> = rasters[1..]
        .par_iter()
        .enumerate()
        .map(|(i, raster)| {
            if raster.dimensions() != reference.dimensions() {
                warn!(
                    "Frame {} is {}x{}, reference is {}x{}; not aligned",
                    i + 1,
                    raster.width,
                    raster.height,
                    reference.width,
                    reference.height
                );
                return raster.clone();
            }

            match correlator.estimate(&reference_luma, &raster.luma()) {
                Some((dx, dy)) => {
                    debug!("Frame {} offset ({:.2}, {:.2})", i + 1, dx, dy);
                    translate(raster, dx, dy)
                }
                None => raster.clone(),
            }
        })
        .collect();

    std::iter::once(reference.clone()).chain(others).collect()
}
