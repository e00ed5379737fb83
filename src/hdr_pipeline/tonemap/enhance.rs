//! Post-tonemap enhancement: saturation boost, local contrast on lightness,
//! and an optional blend with a reference exposure.

use image::imageops::{self, FilterType};

use crate::hdr_pipeline::common::error::Result;
use crate::hdr_pipeline::raster::{CHANNELS, Raster, to_rgb_image};
use crate::hdr_pipeline::tonemap::color::{lab_to_rgb, rgb_to_lab};

pub const SATURATION_BOOST: f32 = 1.3;
pub const CLAHE_GRID: usize = 8;
pub const CLAHE_CLIP_LIMIT: f32 = 2.0;
pub const RESULT_WEIGHT: f32 = 0.7;
pub const REFERENCE_WEIGHT: f32 = 0.3;

const BINS: usize = 256;

pub fn enhance(raster: &Raster, reference: Option<&Raster>) -> Result<Raster> {
    let mut out = boost_saturation(raster, SATURATION_BOOST);
    out = equalize_lightness(&out, CLAHE_GRID, CLAHE_CLIP_LIMIT);
    if let Some(reference) = reference {
        out = blend_reference(&out, reference)?;
    }
    Ok(out)
}

/// Scales HSV saturation by `factor`, keeping hue and value.
pub fn boost_saturation(raster: &Raster, factor: f32) -> Raster {
    let mut out = raster.clone();
    for pixel in out.data.chunks_exact_mut(CHANNELS) {
        let max = pixel.iter().copied().max().unwrap_or(0) as f32;
        let min = pixel.iter().copied().min().unwrap_or(0) as f32;
        if max <= 0.0 || max == min {
            continue;
        }
        let saturation = (max - min) / max;
        let boosted = (saturation * factor).min(1.0);
        let scale = boosted / saturation;
        for c in pixel.iter_mut() {
            let value = max - (max - *c as f32) * scale;
            *c = value.round().clamp(0.0, 255.0) as u8;
        }
    }
    out
}

/// CLAHE on CIE L*, leaving a* and b* untouched.
pub fn equalize_lightness(raster: &Raster, grid: usize, clip_limit: f32) -> Raster {
    let (w, h) = raster.dimensions();
    if w == 0 || h == 0 {
        return raster.clone();
    }

    let labs: Vec<[f32; 3]> = raster
        .pixels()
        .map(|p| rgb_to_lab([p[0], p[1], p[2]]))
        .collect();
    let lightness: Vec<u8> = labs
        .iter()
        .map(|lab| (lab[0] * 2.55).round().clamp(0.0, 255.0) as u8)
        .collect();

    let equalized = clahe(&lightness, w, h, grid, clip_limit);

    let mut out = raster.clone();
    for ((pixel, lab), &l) in out
        .data
        .chunks_exact_mut(CHANNELS)
        .zip(&labs)
        .zip(&equalized)
    {
        pixel.copy_from_slice(&lab_to_rgb([l as f32 / 2.55, lab[1], lab[2]]));
    }
    out
}

/// Contrast-limited adaptive histogram equalization of one 8-bit plane on a
/// `grid` x `grid` layout of tiles, bilinearly interpolated between tile
/// centres.
pub fn clahe(plane: &[u8], width: usize, height: usize, grid: usize, clip_limit: f32) -> Vec<u8> {
    let cols = grid.clamp(1, width.max(1));
    let rows = grid.clamp(1, height.max(1));
    let tile_w = width as f32 / cols as f32;
    let tile_h = height as f32 / rows as f32;

    let tile_of = |pos: usize, size: f32, count: usize| ((pos as f32 / size) as usize).min(count - 1);

    let mut histograms = vec![[0u32; BINS]; cols * rows];
    let mut counts = vec![0usize; cols * rows];
    for y in 0..height {
        let ty = tile_of(y, tile_h, rows);
        for x in 0..width {
            let t = ty * cols + tile_of(x, tile_w, cols);
            histograms[t][plane[y * width + x] as usize] += 1;
            counts[t] += 1;
        }
    }

    let luts: Vec<[u8; BINS]> = histograms
        .iter_mut()
        .zip(&counts)
        .map(|(hist, &count)| {
            clip_histogram(hist, count, clip_limit);
            build_lut(hist, count)
        })
        .collect();

    let mut out = vec![0u8; plane.len()];
    for y in 0..height {
        let fy = (y as f32 + 0.5) / tile_h - 0.5;
        let (ty0, ty1, ay) = neighbours(fy, rows);
        for x in 0..width {
            let fx = (x as f32 + 0.5) / tile_w - 0.5;
            let (tx0, tx1, ax) = neighbours(fx, cols);

            let v = plane[y * width + x] as usize;
            let v00 = luts[ty0 * cols + tx0][v] as f32;
            let v10 = luts[ty0 * cols + tx1][v] as f32;
            let v01 = luts[ty1 * cols + tx0][v] as f32;
            let v11 = luts[ty1 * cols + tx1][v] as f32;

            let value = v00 * (1.0 - ax) * (1.0 - ay)
                + v10 * ax * (1.0 - ay)
                + v01 * (1.0 - ax) * ay
                + v11 * ax * ay;
            out[y * width + x] = value.round().clamp(0.0, 255.0) as u8;
        }
    }
    out
}

/// The two tiles around a fractional tile coordinate and the weight of the
/// second one.
fn neighbours(f: f32, count: usize) -> (usize, usize, f32) {
    if f <= 0.0 {
        return (0, 0, 0.0);
    }
    let lo = (f.floor() as usize).min(count - 1);
    let hi = (lo + 1).min(count - 1);
    if lo == hi {
        (lo, hi, 0.0)
    } else {
        (lo, hi, f - lo as f32)
    }
}

/// Caps each bin at `clip_limit` times the uniform count and spreads the
/// excess evenly.
fn clip_histogram(hist: &mut [u32; BINS], total: usize, clip_limit: f32) {
    if clip_limit <= 0.0 {
        return;
    }
    let clip = ((total as f32 / BINS as f32) * clip_limit).ceil().max(1.0) as u32;

    let mut excess = 0u32;
    for bin in hist.iter_mut() {
        if *bin > clip {
            excess += *bin - clip;
            *bin = clip;
        }
    }

    let per_bin = excess / BINS as u32;
    let remainder = (excess % BINS as u32) as usize;
    for (i, bin) in hist.iter_mut().enumerate() {
        *bin += per_bin + u32::from(i < remainder);
    }
}

fn build_lut(hist: &[u32; BINS], total: usize) -> [u8; BINS] {
    let mut lut = [0u8; BINS];
    if total == 0 {
        return lut;
    }
    let scale = 255.0 / total as f32;
    let mut cumulative = 0u32;
    for (entry, &count) in lut.iter_mut().zip(hist.iter()) {
        cumulative += count;
        *entry = (cumulative as f32 * scale).round().clamp(0.0, 255.0) as u8;
    }
    lut
}

/// `0.7 * raster + 0.3 * reference`, resizing the reference to match.
pub fn blend_reference(raster: &Raster, reference: &Raster) -> Result<Raster> {
    let resized;
    let reference = if reference.dimensions() == raster.dimensions() {
        reference
    } else {
        let image = imageops::resize(
            &to_rgb_image(reference)?,
            raster.width as u32,
            raster.height as u32,
            FilterType::Triangle,
        );
        resized = Raster::new(raster.width, raster.height, image.into_raw())?;
        &resized
    };

    let data = raster
        .data
        .iter()
        .zip(&reference.data)
        .map(|(&a, &b)| {
            (RESULT_WEIGHT * a as f32 + REFERENCE_WEIGHT * b as f32)
                .round()
                .clamp(0.0, 255.0) as u8
        })
        .collect();
    Raster::new(raster.width, raster.height, data)
}
