use crate::hdr_pipeline::alignment::{
    DEFAULT_DEGHOST_THRESHOLD, align, deghost, estimate_shift, translate,
};
use crate::hdr_pipeline::raster::Raster;

/// Deterministic texture with structure at several scales.
fn textured(width: usize, height: usize) -> Raster {
    let mut raster = Raster::filled(width, height, [0; 3]);
    let mut state: u32 = 0x1234_5678;
    for y in 0..height {
        for x in 0..width {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            let noise = (state % 64) as u8;
            let blob = if (x / 6 + y / 5) % 2 == 0 { 150 } else { 40 };
            let v = blob + noise;
            raster.set_pixel(x, y, [v, v / 2, 255 - v]);
        }
    }
    raster
}

/// `target(x, y) = source(x - dx, y - dy)` with wraparound.
fn circular_shift(source: &Raster, dx: usize, dy: usize) -> Raster {
    let (w, h) = source.dimensions();
    let mut out = source.clone();
    for y in 0..h {
        for x in 0..w {
            let sx = (x + w - dx) % w;
            let sy = (y + h - dy) % h;
            out.set_pixel(x, y, source.pixel(sx, sy));
        }
    }
    out
}

#[test]
fn test_phase_correlation_recovers_integer_shift() {
    let reference = textured(48, 40);
    let target = circular_shift(&reference, 5, 3);

    let (dx, dy) = estimate_shift(&reference, &target).unwrap();
    assert!((dx - 5.0).abs() < 0.25, "dx = {}", dx);
    assert!((dy - 3.0).abs() < 0.25, "dy = {}", dy);
}

#[test]
fn test_phase_correlation_identical_images() {
    let reference = textured(32, 32);
    let (dx, dy) = estimate_shift(&reference, &reference).unwrap();
    assert!(dx.abs() < 1e-6 && dy.abs() < 1e-6);
}

#[test]
fn test_align_undoes_shift() {
    let reference = textured(48, 40);
    let target = circular_shift(&reference, 4, 2);
    let aligned = align(&[reference.clone(), target]);

    assert_eq!(aligned.len(), 2);
    assert_eq!(aligned[0], reference);
    // Compare away from the wrapped border.
    for y in 0..30 {
        for x in 0..40 {
            let a = aligned[1].pixel(x, y);
            let b = reference.pixel(x, y);
            for c in 0..3 {
                assert!((a[c] as i32 - b[c] as i32).abs() <= 1, "({}, {})", x, y);
            }
        }
    }
}

#[test]
fn test_align_single_and_empty() {
    assert!(align(&[]).is_empty());
    let raster = textured(8, 8);
    assert_eq!(align(std::slice::from_ref(&raster)), vec![raster]);
}

#[test]
fn test_align_passes_through_mismatched_sizes() {
    let reference = textured(16, 16);
    let other = textured(8, 8);
    let aligned = align(&[reference, other.clone()]);
    assert_eq!(aligned[1], other);
}

#[test]
fn test_translate_clamps_edges() {
    let mut raster = Raster::filled(4, 1, [0; 3]);
    for x in 0..4 {
        raster.set_pixel(x, 0, [(x * 10) as u8; 3]);
    }
    let shifted = translate(&raster, 2.0, 0.0);
    let row: Vec<u8> = (0..4).map(|x| shifted.pixel(x, 0)[0]).collect();
    assert_eq!(row, vec![20, 30, 30, 30]);

    let half = translate(&raster, 0.5, 0.0);
    assert_eq!(half.pixel(0, 0)[0], 5);
}

#[test]
fn test_deghost_identical_frames_is_noop() {
    let raster = textured(12, 12);
    let frames = vec![raster.clone(), raster.clone()];
    assert_eq!(deghost(&frames, DEFAULT_DEGHOST_THRESHOLD), frames);
}

#[test]
fn test_deghost_replaces_outlier_pixel() {
    let background = Raster::filled(4, 4, [100; 3]);
    let mut ghosted = background.clone();
    ghosted.set_pixel(1, 2, [250, 10, 10]);
    let frames = vec![background.clone(), background.clone(), ghosted];

    let output = deghost(&frames, DEFAULT_DEGHOST_THRESHOLD);
    assert_eq!(output[2], background);
    assert_eq!(output[0], background);
}

#[test]
fn test_deghost_keeps_small_deviation() {
    let background = Raster::filled(2, 2, [100; 3]);
    let mut noisy = background.clone();
    noisy.set_pixel(0, 0, [105, 105, 105]);
    let frames = vec![background.clone(), background, noisy.clone()];

    let output = deghost(&frames, DEFAULT_DEGHOST_THRESHOLD);
    assert_eq!(output[2], noisy);
}

#[test]
fn test_deghost_max_threshold_never_replaces() {
    let frames = vec![Raster::filled(3, 3, [10; 3]), Raster::filled(3, 3, [200; 3])];
    let output = deghost(&frames, u32::MAX);
    assert_eq!(output, frames);
}

#[test]
fn test_deghost_empty() {
    assert!(deghost(&[], DEFAULT_DEGHOST_THRESHOLD).is_empty());
}
