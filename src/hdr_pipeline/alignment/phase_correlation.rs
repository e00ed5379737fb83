//! Phase correlation for translation estimation.
//!
//! The normalized cross-power spectrum of two images has an inverse transform
//! that peaks at their relative offset. The peak is refined to sub-pixel
//! precision with a parabolic fit over its neighbours.

use std::sync::Arc;

use rustfft::{Fft, FftPlanner, num_complex::Complex};

use crate::hdr_pipeline::raster::{CHANNELS, Raster};

/// FFT plans for one image size.
pub struct PhaseCorrelator {
    width: usize,
    height: usize,
    row_forward: Arc<dyn Fft<f32>>,
    row_inverse: Arc<dyn Fft<f32>>,
    col_forward: Arc<dyn Fft<f32>>,
    col_inverse: Arc<dyn Fft<f32>>,
}

impl PhaseCorrelator {
    pub fn new(width: usize, height: usize) -> Self {
        let mut planner = FftPlanner::new();
        Self {
            width,
            height,
            row_forward: planner.plan_fft_forward(width),
            row_inverse: planner.plan_fft_inverse(width),
            col_forward: planner.plan_fft_forward(height),
            col_inverse: planner.plan_fft_inverse(height),
        }
    }

    /// Offset `(dx, dy)` such that `target(x, y) ≈ reference(x - dx, y - dy)`.
    ///
    /// Returns `None` when the planes do not match the planned size or the
    /// correlation surface has no usable peak.
    pub fn estimate(&self, reference: &[f32], target: &[f32]) -> Option<(f64, f64)> {
        let (w, h) = (self.width, self.height);
        if w == 0 || h == 0 || reference.len() != w * h || target.len() != w * h {
            return None;
        }

        let ref_fft = self.fft_2d(reference);
        let tar_fft = self.fft_2d(target);

        let cross_power: Vec<Complex<f32>> = tar_fft
            .iter()
            .zip(ref_fft.iter())
            .map(|(&t, &r)| {
                let product = t * r.conj();
                let magnitude = product.norm();
                if magnitude > 1e-10 {
                    product / magnitude
                } else {
                    Complex::new(0.0, 0.0)
                }
            })
            .collect();

        let correlation = self.ifft_2d(cross_power);
        let (peak_x, peak_y, peak) = find_peak(&correlation, w);
        if !peak.is_finite() || peak <= 0.0 {
            return None;
        }

        let dx = wrap(peak_x, w);
        let dy = wrap(peak_y, h);

        let at = |x: isize, y: isize| -> f32 {
            let xx = x.rem_euclid(w as isize) as usize;
            let yy = y.rem_euclid(h as isize) as usize;
            correlation[yy * w + xx]
        };
        let (px, py) = (peak_x as isize, peak_y as isize);
        let sub_x = parabolic_offset(at(px - 1, py), peak, at(px + 1, py));
        let sub_y = parabolic_offset(at(px, py - 1), peak, at(px, py + 1));

        Some((dx + sub_x, dy + sub_y))
    }

    /// Row-column 2-D FFT of a real plane, mean-subtracted.
    fn fft_2d(&self, plane: &[f32]) -> Vec<Complex<f32>> {
        let (w, h) = (self.width, self.height);
        let mean = plane.iter().sum::<f32>() / plane.len() as f32;
        let mut data: Vec<Complex<f32>> = plane.iter().map(|&v| Complex::new(v - mean, 0.0)).collect();

        for row in data.chunks_exact_mut(w) {
            self.row_forward.process(row);
        }
        process_columns(&mut data, w, h, self.col_forward.as_ref());
        data
    }

    /// Inverse 2-D FFT, real part, normalized.
    fn ifft_2d(&self, mut data: Vec<Complex<f32>>) -> Vec<f32> {
        let (w, h) = (self.width, self.height);
        for row in data.chunks_exact_mut(w) {
            self.row_inverse.process(row);
        }
        process_columns(&mut data, w, h, self.col_inverse.as_ref());

        let norm = 1.0 / (w * h) as f32;
        data.iter().map(|c| c.re * norm).collect()
    }
}

fn process_columns(data: &mut [Complex<f32>], width: usize, height: usize, fft: &dyn Fft<f32>) {
    let mut column = vec![Complex::new(0.0, 0.0); height];
    for x in 0..width {
        for (y, value) in column.iter_mut().enumerate() {
            *value = data[y * width + x];
        }
        fft.process(&mut column);
        for (y, value) in column.iter().enumerate() {
            data[y * width + x] = *value;
        }
    }
}

fn find_peak(correlation: &[f32], width: usize) -> (usize, usize, f32) {
    let mut best = (0, f32::NEG_INFINITY);
    for (i, &v) in correlation.iter().enumerate() {
        if v > best.1 {
            best = (i, v);
        }
    }
    (best.0 % width, best.0 / width, best.1)
}

/// Maps a peak index to a signed offset.
fn wrap(peak: usize, len: usize) -> f64 {
    if peak > len / 2 {
        peak as f64 - len as f64
    } else {
        peak as f64
    }
}

fn parabolic_offset(left: f32, center: f32, right: f32) -> f64 {
    let denom = 2.0 * (left + right - 2.0 * center);
    if denom.abs() > 1e-10 {
        let offset = ((left - right) / denom) as f64;
        offset.clamp(-0.5, 0.5)
    } else {
        0.0
    }
}

/// Estimates the offset of `target` relative to `reference` from their luma.
pub fn estimate_shift(reference: &Raster, target: &Raster) -> Option<(f64, f64)> {
    if reference.dimensions() != target.dimensions() {
        return None;
    }
    PhaseCorrelator::new(reference.width, reference.height).estimate(&reference.luma(), &target.luma())
}

/// Resamples `raster` so that content at `(x + dx, y + dy)` moves to
/// `(x, y)`. Samples outside the image are clamped to the nearest edge.
pub fn translate(raster: &Raster, dx: f64, dy: f64) -> Raster {
    let (w, h) = raster.dimensions();
    let mut out = raster.clone();
    if w == 0 || h == 0 {
        return out;
    }

    let max_x = (w - 1) as f64;
    let max_y = (h - 1) as f64;

    for y in 0..h {
        let sy = (y as f64 + dy).clamp(0.0, max_y);
        let y0 = sy.floor() as usize;
        let y1 = (y0 + 1).min(h - 1);
        let ty = sy - y0 as f64;

        for x in 0..w {
            let sx = (x as f64 + dx).clamp(0.0, max_x);
            let x0 = sx.floor() as usize;
            let x1 = (x0 + 1).min(w - 1);
            let tx = sx - x0 as f64;

            let dst = (y * w + x) * CHANNELS;
            for c in 0..CHANNELS {
                let sample = |xx: usize, yy: usize| raster.data[(yy * w + xx) * CHANNELS + c] as f64;
                let top = sample(x0, y0) * (1.0 - tx) + sample(x1, y0) * tx;
                let bottom = sample(x0, y1) * (1.0 - tx) + sample(x1, y1) * tx;
                let value = top * (1.0 - ty) + bottom * ty;
                out.data[dst + c] = value.round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    out
}
