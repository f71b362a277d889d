//! Merge and filter benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sdfidx_bench::utils::{generate_molecule_file, generate_record_file, random_molecule};
use sdfidx_core::{
    build_index_default, filter_records, merge, CarbonSizeFilter, ChiralCarbonFilter, MergeConfig,
    MergeMode, Record,
};
use tempfile::TempDir;

/// Benchmark batch and streaming merges of four inputs.
fn bench_merge_modes(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge");
    group.sample_size(20);

    let temp_dir = TempDir::new().unwrap();
    let mut config = MergeConfig::new(
        temp_dir.path().join("out.sdf"),
        temp_dir.path().join("out.index"),
    );
    for i in 0..4 {
        let records = temp_dir.path().join(format!("in{i}.sdf"));
        let index = temp_dir.path().join(format!("in{i}.index"));
        std::fs::write(&records, generate_record_file(2_000, 256)).unwrap();
        build_index_default(&records, &index).unwrap();
        config = config.input(records, index);
    }

    for mode in [MergeMode::Batch, MergeMode::Streaming] {
        let config = config.clone().mode(mode);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{mode:?}")),
            &config,
            |b, config| {
                b.iter(|| {
                    let report = merge(config, &CarbonSizeFilter::default()).unwrap();
                    black_box(report);
                });
            },
        );
    }

    group.finish();
}

/// Benchmark the carbon-size and chiral filters over the same molecules.
fn bench_filters(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter");

    let file = generate_molecule_file(500, 24);
    let records: Vec<Record> = file
        .split_inclusive("$$$$\n")
        .map(Record::from)
        .collect();

    group.bench_function("carbon_size", |b| {
        b.iter(|| {
            let kept = filter_records(records.clone(), &CarbonSizeFilter::default());
            black_box(kept);
        });
    });
    group.bench_function("chiral", |b| {
        b.iter(|| {
            let kept = filter_records(records.clone(), &ChiralCarbonFilter::default());
            black_box(kept);
        });
    });

    group.finish();
}

/// Benchmark chiral carbon detection by molecule size.
fn bench_chiral_by_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("chiral_carbons");
    let mut rng = rand::thread_rng();

    for atoms in [8, 32, 128].iter() {
        let record = random_molecule(&mut rng, *atoms).to_record();
        let filter = ChiralCarbonFilter::new(1);
        group.bench_with_input(BenchmarkId::from_parameter(atoms), &record, |b, record| {
            b.iter(|| black_box(sdfidx_core::RecordFilter::accepts(&filter, record)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_merge_modes, bench_filters, bench_chiral_by_size);
criterion_main!(benches);
