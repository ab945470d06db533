use bsdiffhs::compress::{self, Params};
use bsdiffhs::{diff, patch};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use std::fs;
use std::path::Path;

fn gen_data(size: usize, seed: u64) -> Vec<u8> {
    let mut s = seed;
    let mut out = Vec::with_capacity(size);
    for _ in 0..size {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        out.push((s >> 33) as u8);
    }
    out
}

fn mutate(base: &[u8], stride: usize) -> Vec<u8> {
    let mut out = base.to_vec();
    for i in (0..out.len()).step_by(stride.max(1)) {
        out[i] = out[i].wrapping_add(1);
    }
    out
}

fn write_ratio_snapshot() {
    let source = gen_data(512 * 1024, 123);
    let target = mutate(&source, 2048);
    let mut csv = String::from("window_bits,lookahead_bits,patch_bytes,target_bytes,ratio\n");
    for (w, l) in [(8u8, 4u8), (10, 4), (11, 4), (12, 6), (14, 7)] {
        let params = Params::new(w, l).unwrap();
        let stream = diff(&source, &target, params);
        let ratio = stream.len() as f64 / target.len() as f64;
        csv.push_str(&format!(
            "{w},{l},{},{},{}\n",
            stream.len(),
            target.len(),
            ratio
        ));
    }
    let out_dir = Path::new("target/criterion/custom_reports");
    let _ = fs::create_dir_all(out_dir);
    let _ = fs::write(out_dir.join("ratio_snapshot.csv"), csv);
}

fn bench_diff_speed(c: &mut Criterion) {
    let mut g = c.benchmark_group("diff_speed_mb_s");
    for size in [64 * 1024usize, 256 * 1024, 1024 * 1024] {
        let source = gen_data(size, 1);
        let target = mutate(&source, 1024);
        g.throughput(Throughput::Bytes(size as u64));
        g.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                let stream = diff(black_box(&source), black_box(&target), Params::default());
                black_box(stream);
            });
        });
    }
    g.finish();
}

fn bench_patch_speed(c: &mut Criterion) {
    let mut g = c.benchmark_group("patch_speed_vs_patch_size");
    for size in [64 * 1024usize, 256 * 1024, 1024 * 1024] {
        let source = gen_data(size, 2);
        let target = mutate(&source, 2048);
        let stream = diff(&source, &target, Params::default());
        g.throughput(Throughput::Bytes(stream.len() as u64));
        g.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                let out = patch(black_box(&source), black_box(&stream), Params::default()).unwrap();
                black_box(out);
            });
        });
    }
    g.finish();
}

fn bench_ratio_vs_params(c: &mut Criterion) {
    write_ratio_snapshot();
    let mut g = c.benchmark_group("ratio_vs_window_bits");
    let source = gen_data(512 * 1024, 3);
    let target = mutate(&source, 2048);
    for w in [8u8, 10, 12, 14] {
        let params = Params::new(w, 4).unwrap();
        g.bench_with_input(BenchmarkId::from_parameter(w), &w, |b, _| {
            b.iter(|| {
                let stream = diff(&source, &target, params);
                let ratio = stream.len() as f64 / target.len() as f64;
                black_box(ratio);
            });
        });
    }
    g.finish();
}

fn bench_segment_codec(c: &mut Criterion) {
    let mut g = c.benchmark_group("segment_codec");
    let input = mutate(&vec![0x40u8; 256 * 1024], 97);
    let params = Params::default();
    let packed = compress::compress(&input, params);

    g.throughput(Throughput::Bytes(input.len() as u64));
    g.bench_function("compress", |b| {
        b.iter(|| {
            let out = compress::compress(black_box(&input), params);
            black_box(out);
        });
    });
    g.bench_function("decompress", |b| {
        b.iter(|| {
            let out = compress::decompress(black_box(&packed), params).unwrap();
            black_box(out);
        });
    });
    g.finish();
}

fn bench_real_world_scenarios(c: &mut Criterion) {
    let mut g = c.benchmark_group("real_world_scenarios");
    let scenarios = [
        ("firmware_update", 1024 * 1024usize, 1024usize),
        ("config_blob", 64 * 1024usize, 256usize),
        ("asset_bundle", 2 * 1024 * 1024usize, 4096usize),
    ];

    for (name, size, stride) in scenarios {
        let source = gen_data(size, size as u64);
        let target = mutate(&source, stride);
        g.throughput(Throughput::Bytes(size as u64));
        g.bench_function(name, |b| {
            b.iter(|| {
                let stream = diff(&source, &target, Params::default());
                let out = patch(&source, &stream, Params::default()).unwrap();
                black_box(out);
            });
        });
    }
    g.finish();
}

criterion_group!(
    benches,
    bench_diff_speed,
    bench_patch_speed,
    bench_ratio_vs_params,
    bench_segment_codec,
    bench_real_world_scenarios
);
criterion_main!(benches);
