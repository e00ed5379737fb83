//! Perceptual hash module
//!
//! 64-bit average hash: luma, area-averaged down to 8x8, one bit per cell
//! set when the cell is brighter than the mean of all cells.

use std::fmt;

use crate::hdr_pipeline::raster::Raster;


/// Side length of the hash grid.
pub const HASH_SIZE: usize = 8;

/// Number of bits in a [`Fingerprint`].
pub const HASH_BITS: u32 = (HASH_SIZE * HASH_SIZE) as u32;

/// Average hash of an image. Bit 63 is the top-left cell, raster-scan order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint(pub u64);

impl Fingerprint {
    pub fn hamming(&self, other: &Fingerprint) -> u32 {
        (self.0 ^ other.0).count_ones()
    }

    /// Hamming distance as a percentage of the hash length.
    pub fn distance_percent(&self, other: &Fingerprint) -> f64 {
        self.hamming(other) as f64 * 100.0 / HASH_BITS as f64
    }

    pub fn to_hex(&self) -> String {
        format!("{:016x}", self.0)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

pub fn average_hash(raster: &Raster) -> Fingerprint {
    let cells = downscale_area(&raster.luma(), raster.width, raster.height);
    let mean = cells.iter().sum::<f32>() / cells.len() as f32;

    let bits = cells
        .iter()
        .fold(0u64, |acc, &v| (acc << 1) | u64::from(v > mean));
    Fingerprint(bits)
}

/// Area-average resample of a single-channel plane to `HASH_SIZE` square.
fn downscale_area(plane: &[f32], width: usize, height: usize) -> [f32; HASH_SIZE * HASH_SIZE] {
    let mut cells = [0.0f32; HASH_SIZE * HASH_SIZE];
    if width == 0 || height == 0 {
        return cells;
    }

    let col_weights = overlap_weights(width);
    let row_weights = overlap_weights(height);

    for (cy, rows) in row_weights.iter().enumerate() {
        for (cx, cols) in col_weights.iter().enumerate() {
            let mut sum = 0.0f32;
            let mut area = 0.0f32;
            for &(y, wy) in rows {
                let row = &plane[y * width..(y + 1) * width];
                for &(x, wx) in cols {
                    let w = wx * wy;
                    sum += row[x] * w;
                    area += w;
                }
            }
            cells[cy * HASH_SIZE + cx] = if area > 0.0 { sum / area } else { 0.0 };
        }
    }

    cells
}

/// For each output cell, the source indices it covers and how much of each.
fn overlap_weights(len: usize) -> Vec<Vec<(usize, f32)>> {
    let scale = len as f32 / HASH_SIZE as f32;
    (0..HASH_SIZE)
        .map(|cell| {
            let start = cell as f32 * scale;
            let end = (cell + 1) as f32 * scale;
            let first = start.floor() as usize;
            let last = (end.ceil() as usize).min(len);
            (first..last)
                .filter_map(|i| {
                    let overlap = end.min(i as f32 + 1.0) - start.max(i as f32);
                    (overlap > 0.0).then_some((i, overlap))
                })
                .collect()
        })
        .collect()
}
