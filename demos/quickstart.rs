//! Quickstart example demonstrating a complete tfr-correlate run.
//!
//! Run with: cargo run --example quickstart

use tfr_correlate::analysis::LagSearchConfig;
use tfr_correlate::collect::{Collection, StaticCollector};
use tfr_correlate::core::{DataSource, Dataset, DatasetKey, RegionRegistry, Year};
use tfr_correlate::forecast::DriftForecaster;
use tfr_correlate::persistence::{MemoryRepository, Repository};
use tfr_correlate::pipeline::{Pipeline, PipelineConfig};

const REGIONS: [&str; 6] = ["aut", "cze", "deu", "hun", "pol", "svk"];

fn main() {
    println!("=== tfr-correlate Quickstart ===\n");

    // 1. Build a data source by hand: fertility plus two indicators
    let mut tfr =
        Dataset::new("demo", "tfr", "Total fertility rate").with_unit("children per woman");
    let mut housing = Dataset::new("demo", "housing", "Dwellings completed").with_unit("per 1000");
    let mut tourism = Dataset::new("demo", "tourism", "Nights spent by tourists");

    for (r, code) in REGIONS.iter().enumerate() {
        let shock = |year: Year| (0.9 * year as f64 + r as f64).sin() * 0.05;
        tfr.add_raw_points(
            (*code).into(),
            (1995..2020).map(|y| {
                let trend = 1.3 + 0.01 * (y - 1995) as f64 + 0.05 * r as f64;
                (y, Some(trend + shock(y)))
            }),
        );
        // Housing construction leads fertility by three years
        housing.add_raw_points(
            (*code).into(),
            (1995..2020).map(|y| (y, Some(4.0 + 40.0 * shock(y - 3) + 0.1 * r as f64))),
        );
        // Tourism has a missing year that gets interpolated
        tourism.add_raw_points(
            (*code).into(),
            (1995..2020).map(|y| {
                let value = ((y + r as Year) % 7) as f64;
                (y, if y == 2003 { None } else { Some(value) })
            }),
        );
    }

    let mut source = DataSource::new("demo", "Hand-made demo data");
    source.add_dataset(tfr).unwrap();
    source.add_dataset(housing).unwrap();
    source.add_dataset(tourism).unwrap();
    let collector = StaticCollector::new("demo", Collection::new(source).with_tfr_dataset("tfr"));

    // 2. Configure and run the pipeline
    let config = PipelineConfig::default()
        .with_lag_search(LagSearchConfig::default().with_max_lag(5))
        .with_excluded_from_env();
    let pipeline = Pipeline::new(config);

    let regions = REGIONS
        .iter()
        .fold(RegionRegistry::new(), |registry, code| registry.with_region(code, code));
    let mut repository = MemoryRepository::new();
    let snapshot = pipeline
        .run(
            regions,
            &[&collector],
            Some(&DriftForecaster::new()),
            Some(&mut repository),
        )
        .unwrap();

    // 3. Per-series best lags
    println!("--- Best lag per series ---");
    println!(
        "{:<10} {:<6} {:>4} {:>10} {:>10} {:>12}",
        "Dataset", "Region", "Lag", "r", "p", "Correlated"
    );
    println!("{:-<57}", "");
    for (key, result) in snapshot.results.pair_correlations() {
        println!(
            "{:<10} {:<6} {:>4} {:>10.4} {:>10.2e} {:>12}",
            key.dataset_id,
            key.region,
            result.lag,
            result.r_value,
            result.p_value,
            match result.correlation {
                Some(true) => "yes",
                Some(false) => "no",
                None => "-",
            }
        );
    }

    // 4. Inter-region correlation, one cross-section per year
    println!("\n--- Inter-region correlation ---");
    for dataset in ["tfr", "housing", "tourism"] {
        let key = DatasetKey::new("demo", dataset);
        match snapshot
            .results
            .inter_region(&key)
            .and_then(|result| result.yearly.as_ref())
        {
            Some(yearly) => {
                let correlated = yearly
                    .correlation_values_per_year
                    .values()
                    .filter(|&&c| c)
                    .count();
                println!(
                    "{:<10} {} of {} years correlated",
                    dataset,
                    correlated,
                    yearly.len()
                );
            }
            None => println!("{:<10} not enough data", dataset),
        }
    }

    // 5. Forecasts are stored next to the collected data
    println!("\n--- Drift forecast ---");
    let forecast = snapshot
        .storage
        .dataset(&DatasetKey::new("forecast", "tfr_forecast"))
        .unwrap();
    for series in forecast.all_time_series() {
        let last = series.last_year().unwrap();
        println!(
            "{:<6} {}: {:.3}",
            series.region(),
            last,
            series.value(last).unwrap()
        );
    }

    // 6. The snapshot was saved to the repository
    let saved = repository.load().unwrap().unwrap();
    println!("\nSnapshot saved at {}", saved.created_at);

    println!("\n=== Quickstart Complete ===");
}
