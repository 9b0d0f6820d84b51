//! Benchmarks for lag search and the inter-region aggregator.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::collections::BTreeMap;
use tfr_correlate::analysis::{
    best_lag, correlate_regions, preprocess, CorrelationConfig, InterRegionConfig, LagSearchConfig,
};
use tfr_correlate::core::{DataSource, Dataset, DatasetKey, RegionRegistry, Storage, Year};

fn generate_series(n: usize, phase: f64) -> BTreeMap<Year, f64> {
    (0..n)
        .map(|i| {
            let t = i as f64;
            (1960 + i as Year, 2.0 - 0.01 * t + 0.1 * (t * 0.7 + phase).sin())
        })
        .collect()
}

fn generate_storage(datasets: usize) -> Storage {
    let regions = RegionRegistry::european();
    let codes: Vec<_> = regions.codes().cloned().collect();

    let mut source = DataSource::new("bench", "Synthetic");
    for d in 0..datasets {
        let id = if d == 0 { "tfr".to_string() } else { format!("indicator_{}", d) };
        let mut dataset = Dataset::new("bench", &id, &id);
        for (r, code) in codes.iter().enumerate() {
            let series = generate_series(60, (d * 31 + r) as f64 * 0.1);
            dataset.add_raw_points(code.clone(), series.into_iter().map(|(y, v)| (y, Some(v))));
        }
        // Only fails on a data source id mismatch
        let _ = source.add_dataset(dataset);
    }

    let mut storage = Storage::new(regions);
    storage.add_data_source(source);
    let _ = storage.set_tfr_dataset(DatasetKey::new("bench", "tfr"));
    storage
}

fn bench_best_lag(c: &mut Criterion) {
    let mut group = c.benchmark_group("best_lag");

    for size in [20, 60, 120, 240].iter() {
        let reference = generate_series(*size, 0.0);
        let other = generate_series(*size, 1.3);

        for max_lag in [0, 5, 10].iter() {
            let config = LagSearchConfig::default().with_max_lag(*max_lag);
            group.bench_with_input(
                BenchmarkId::new(format!("max_lag_{}", max_lag), size),
                size,
                |b, _| b.iter(|| best_lag(black_box(&reference), black_box(&other), &config)),
            );
        }
    }

    group.finish();
}

fn bench_stages(c: &mut Criterion) {
    let mut group = c.benchmark_group("stages");

    for datasets in [2, 8, 32].iter() {
        let storage = generate_storage(*datasets);

        group.bench_with_input(BenchmarkId::new("preprocess", datasets), datasets, |b, _| {
            b.iter(|| preprocess(black_box(&storage)))
        });

        group.bench_with_input(BenchmarkId::new("inter_region", datasets), datasets, |b, _| {
            let config = InterRegionConfig::default();
            let correlation = CorrelationConfig::default();
            b.iter(|| correlate_regions(black_box(&storage), &config, &correlation))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_best_lag, bench_stages);
criterion_main!(benches);
