//! Storage backend benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use sdfidx_bench::utils::generate_record_file;
use sdfidx_storage::{FileBackend, InMemoryBackend, StorageBackend};
use tempfile::TempDir;

/// Benchmark chunked reads from memory.
fn bench_inmemory_read_available(c: &mut Criterion) {
    let mut group = c.benchmark_group("inmemory_read_available");
    let backend = InMemoryBackend::with_data(generate_record_file(1_000, 1024).into_bytes());

    for chunk in [512, 8 * 1024, 64 * 1024].iter() {
        group.throughput(Throughput::Bytes(*chunk as u64));
        group.bench_with_input(BenchmarkId::from_parameter(chunk), chunk, |b, &chunk| {
            b.iter(|| {
                let bytes = backend.read_available(black_box(1024), chunk).unwrap();
                black_box(bytes);
            });
        });
    }

    group.finish();
}

/// Benchmark read-only file reads.
fn bench_file_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("file_read");
    group.sample_size(50);

    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("bench.sdf");
    std::fs::write(&path, generate_record_file(1_000, 1024)).unwrap();
    let backend = FileBackend::open_read_only(&path).unwrap();

    for chunk in [512, 8 * 1024, 64 * 1024].iter() {
        group.throughput(Throughput::Bytes(*chunk as u64));
        group.bench_with_input(BenchmarkId::from_parameter(chunk), chunk, |b, &chunk| {
            b.iter(|| {
                let bytes = backend.read_available(black_box(4096), chunk).unwrap();
                black_box(bytes);
            });
        });
    }

    group.finish();
}

/// Benchmark appending records to a file.
fn bench_file_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("file_append");
    group.sample_size(50);

    for size in [256, 1024, 4096].iter() {
        group.throughput(Throughput::Bytes(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let temp_dir = TempDir::new().unwrap();
            let mut backend = FileBackend::create(&temp_dir.path().join("out.sdf")).unwrap();
            let data = generate_record_file(1, size).into_bytes();

            b.iter(|| {
                let offset = backend.append(black_box(&data)).unwrap();
                black_box(offset);
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_inmemory_read_available,
    bench_file_read,
    bench_file_append,
);
criterion_main!(benches);
