//! Global tonemapping operators.
//!
//! Each operator maps a min-max normalized radiance buffer to display
//! values. Luminance is compressed, then color is restored per channel as
//! `(C / L)^saturation * L_out` and the result is gamma-encoded.

use crate::hdr_pipeline::raster::CHANNELS;
use crate::hdr_pipeline::tonemap::types::{ToneOperator, ToneParameters};

/// Keeps logarithms and ratios of black pixels defined.
const EPSILON: f32 = 1e-6;

fn luminance(p: &[f32]) -> f32 {
    0.299 * p[0] + 0.587 * p[1] + 0.114 * p[2]
}

pub(crate) fn apply(normalized: &[f32], params: &ToneParameters) -> Vec<f32> {
    let lum: Vec<f32> = normalized.chunks_exact(CHANNELS).map(luminance).collect();
    let max_lum = lum.iter().copied().fold(0.0f32, f32::max);
    if lum.is_empty() || max_lum <= 0.0 {
        return vec![0.0; normalized.len()];
    }

    let mapped = match params.operator {
        ToneOperator::Mantiuk => mantiuk(&lum, params.contrast),
        ToneOperator::Drago => drago(&lum, max_lum, params.contrast),
        ToneOperator::Reinhard => reinhard(&lum, params.contrast),
    };

    let inv_gamma = 1.0 / params.gamma;
    let mut out = Vec::with_capacity(normalized.len());
    for ((pixel, &l_in), &l_out) in normalized.chunks_exact(CHANNELS).zip(&lum).zip(&mapped) {
        let l_in = l_in.max(EPSILON);
        for &c in pixel {
            let ratio = (c.max(0.0) / l_in).powf(params.saturation);
            out.push((ratio * l_out).max(0.0).powf(inv_gamma));
        }
    }
    out
}

/// Scales log-luminance contrast around the log-mean by `scale`.
fn mantiuk(lum: &[f32], scale: f32) -> Vec<f32> {
    let logs: Vec<f32> = lum.iter().map(|&l| (l + EPSILON).ln()).collect();
    let mean = logs.iter().sum::<f32>() / logs.len() as f32;
    let compressed: Vec<f32> = logs.iter().map(|&v| (mean + (v - mean) * scale).exp()).collect();
    let peak = compressed.iter().copied().fold(0.0f32, f32::max);
    compressed.iter().map(|&v| v / peak).collect()
}

/// Logarithmic mapping with a bias-controlled base.
fn drago(lum: &[f32], max_lum: f32, bias: f32) -> Vec<f32> {
    let exponent = bias.ln() / 0.5f32.ln();
    let denom = (1.0 + max_lum).ln();
    lum.iter()
        .map(|&l| {
            let base = (2.0 + 8.0 * (l / max_lum).powf(exponent)).log10();
            (1.0 + l).ln() / denom / base
        })
        .collect()
}

/// `L_m / (1 + L_m)` with `L_m` scaled so the log-average maps to `key`.
fn reinhard(lum: &[f32], key: f32) -> Vec<f32> {
    let log_avg = (lum.iter().map(|&l| (l + EPSILON).ln()).sum::<f32>() / lum.len() as f32).exp();
    lum.iter()
        .map(|&l| {
            let scaled = key / log_avg * l;
            scaled / (1.0 + scaled)
        })
        .collect()
}
