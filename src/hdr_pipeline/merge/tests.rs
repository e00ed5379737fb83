use crate::hdr_pipeline::common::{DiagnosticKind, PipelineError};
use crate::hdr_pipeline::merge::{MergeOptions, merge, pixel_weight};
use crate::hdr_pipeline::raster::Raster;

fn ramp(width: usize, height: usize, offset: u8) -> Raster {
    let mut raster = Raster::filled(width, height, [0; 3]);
    for y in 0..height {
        for x in 0..width {
            let v = ((x + y * width) * 8) as u8 + offset;
            raster.set_pixel(x, y, [v, v, v]);
        }
    }
    raster
}

fn bracket() -> (Vec<Raster>, Vec<f64>) {
    (
        vec![ramp(4, 4, 0), ramp(4, 4, 20), ramp(4, 4, 40)],
        vec![1.0 / 30.0, 1.0 / 60.0, 1.0 / 125.0],
    )
}

#[test]
fn test_hat_weight() {
    assert!((pixel_weight(128) - (1.0 - 0.5 / 127.5)).abs() < 1e-12);
    assert_eq!(pixel_weight(0), 1e-3);
    assert_eq!(pixel_weight(255), 1e-3);
    assert!(pixel_weight(64) < pixel_weight(100));
}

#[test]
fn test_merge_rejects_empty_stack() {
    let result = merge(&[], &[], MergeOptions::default());
    assert!(matches!(result, Err(PipelineError::NoImages)));
}

#[test]
fn test_merge_rejects_count_mismatch() {
    let (rasters, _) = bracket();
    let result = merge(&rasters, &[1.0, 0.5], MergeOptions::default());
    assert!(matches!(
        result,
        Err(PipelineError::ExposureCountMismatch { images: 3, times: 2 })
    ));
}

#[test]
fn test_merge_rejects_bad_exposure_times() {
    let (rasters, _) = bracket();
    for bad in [0.0, -0.5, f64::NAN, f64::INFINITY] {
        let result = merge(&rasters, &[1.0, bad, 0.25], MergeOptions::default());
        assert!(matches!(result, Err(PipelineError::InvalidExposureTime(_))));
    }
}

#[test]
fn test_merge_rejects_mixed_dimensions() {
    let rasters = vec![ramp(4, 4, 0), ramp(2, 2, 0)];
    let result = merge(&rasters, &[1.0, 0.5], MergeOptions::default());
    assert!(matches!(
        result,
        Err(PipelineError::DimensionMismatch {
            expected: (4, 4),
            actual: (2, 2)
        })
    ));
}

#[test]
fn test_merge_rejects_short_pixel_buffer() {
    let mut short = ramp(4, 4, 0);
    short.data.truncate(10);
    let rasters = vec![ramp(4, 4, 0), short];
    let result = merge(&rasters, &[1.0, 0.5], MergeOptions::default());
    assert!(matches!(result, Err(PipelineError::InvalidDimensions(4, 4))));
}

#[test]
fn test_merge_single_frame_recovers_value_over_time() {
    let raster = Raster::filled(2, 2, [100, 50, 200]);
    let output = merge(&[raster], &[0.5], MergeOptions::default()).unwrap();
    let expected = [200.0f32, 100.0, 400.0];
    for (value, want) in output.radiance.data.iter().zip(expected.iter().cycle()) {
        assert!((value - want).abs() / want < 1e-4);
    }
    assert!(output.diagnostics.is_empty());
}

#[test]
fn test_merge_consistent_stack() {
    // Linear response: z = radiance * t.
    let long = Raster::filled(1, 1, [200; 3]);
    let short = Raster::filled(1, 1, [100; 3]);
    let output = merge(&[long, short], &[1.0, 0.5], MergeOptions::default()).unwrap();
    for &v in &output.radiance.data {
        assert!((v - 200.0).abs() < 0.01);
    }
}

#[test]
fn test_merge_ramp_bracket() {
    let (rasters, times) = bracket();
    let output = merge(&rasters, &times, MergeOptions::default()).unwrap();
    assert_eq!(output.radiance.dimensions(), (4, 4));
    assert_eq!(output.radiance.data.len(), 4 * 4 * 3);
    assert!(output.radiance.data.iter().all(|v| v.is_finite() && *v > 0.0));
}

#[test]
fn test_merge_warns_on_single_frame_align() {
    let options = MergeOptions::builder().align(true).deghost(true).build();
    let output = merge(&[ramp(4, 4, 0)], &[0.1], options).unwrap();
    assert_eq!(output.diagnostics.len(), 2);
    assert!(output
        .diagnostics
        .iter()
        .all(|d| d.kind == DiagnosticKind::Warning));
}

#[test]
fn test_merge_with_align_and_deghost() {
    let (rasters, times) = bracket();
    let options = MergeOptions::builder().align(true).deghost(true).build();
    let output = merge(&rasters, &times, options).unwrap();
    assert_eq!(output.radiance.dimensions(), (4, 4));
    assert!(output.diagnostics.is_empty());
}

#[test]
fn test_options_builder_defaults() {
    let options = MergeOptions::builder().deghost_threshold(40).build();
    assert!(!options.align);
    assert!(!options.deghost);
    assert_eq!(options.deghost_threshold, 40);
}
