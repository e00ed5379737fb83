use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use aeb_hdr::hdr_pipeline::{
    MergeOptions, RadianceMap, Raster, ToneOperator, ToneParameters, merge, tonemap,
};

fn generate_bracket(width: usize, height: usize) -> (Vec<Raster>, Vec<f64>) {
    let frames = [0u8, 40, 80]
        .iter()
        .map(|&offset| {
            let mut data = Vec::with_capacity(width * height * 3);
            for y in 0..height {
                for x in 0..width {
                    let value = ((x + y) % 176) as u8 + offset;
                    data.extend_from_slice(&[value, value / 2, 255 - value]);
                }
            }
            Raster::new(width, height, data).unwrap()
        })
        .collect();
    (frames, vec![1.0 / 30.0, 1.0 / 60.0, 1.0 / 125.0])
}

fn benchmark_merge_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge_by_size");

    for (width, height, label) in [(100, 100, "100x100"), (500, 500, "500x500"), (1000, 1000, "1000x1000")] {
        let (frames, times) = generate_bracket(width, height);
        group.bench_with_input(BenchmarkId::from_parameter(label), &frames, |b, frames| {
            b.iter(|| merge(black_box(frames), black_box(&times), MergeOptions::default()))
        });
    }

    group.finish();
}

fn benchmark_merge_options(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge_options");
    let (frames, times) = generate_bracket(256, 256);

    for (label, options) in [
        ("plain", MergeOptions::default()),
        ("align", MergeOptions::builder().align(true).build()),
        ("deghost", MergeOptions::builder().deghost(true).build()),
    ] {
        group.bench_function(label, |b| {
            b.iter(|| merge(black_box(&frames), black_box(&times), options))
        });
    }

    group.finish();
}

fn benchmark_tonemap_operators(c: &mut Criterion) {
    let mut group = c.benchmark_group("tonemap_by_operator");
    let (frames, times) = generate_bracket(500, 500);
    let radiance: RadianceMap = merge(&frames, &times, MergeOptions::default())
        .unwrap()
        .radiance;

    for operator in ToneOperator::ALL {
        let params = ToneParameters::for_operator(operator);
        group.bench_with_input(BenchmarkId::from_parameter(operator), &params, |b, params| {
            b.iter(|| tonemap(black_box(&radiance), Some(&frames[1]), params))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_merge_sizes,
    benchmark_merge_options,
    benchmark_tonemap_operators
);
criterion_main!(benches);
