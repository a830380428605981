//! Benchmarks for the view composer
//!
//! Run with: cargo bench

use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use persimmon::dataset::{Dataset, DatasetRow};
use persimmon::session::compose;
use persimmon::selection::{Selection, AGE_GROUPS, COVID, ELECTIVES};
use persimmon::view::{ComparativeTable, PairPlot, ViewTable};

/// One row per week for every (age group, elective) pair; COVID is among the electives
fn create_dataset(weeks: usize) -> Dataset {
    let start = NaiveDate::from_ymd_opt(2019, 1, 7).unwrap();
    let mut rows = Vec::new();

    for (a, age) in AGE_GROUPS.iter().enumerate() {
        for (e, elective) in ELECTIVES.iter().enumerate() {
            for w in 0..weeks {
                let base = ((a + 1) * (e + 3) * (w + 11) % 997) as i64;
                rows.push(DatasetRow::new(
                    *age,
                    *elective,
                    start + Duration::weeks(w as i64),
                    base + 40,
                    base / 3 + 5,
                    base * 2 + 17,
                ));
            }
        }
    }

    Dataset::new("CA", rows)
}

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter");

    for weeks in [52, 156, 520] {
        let dataset = create_dataset(weeks);
        group.throughput(Throughput::Elements(dataset.len() as u64));

        group.bench_function(format!("filter_{}_weeks", weeks), |b| {
            b.iter(|| ViewTable::filter(black_box(&dataset), "50-64", "CATARACT"))
        });
    }

    group.finish();
}

fn bench_join(c: &mut Criterion) {
    let mut group = c.benchmark_group("join");

    for weeks in [52, 156, 520] {
        let dataset = create_dataset(weeks);
        let covid = ViewTable::filter(&dataset, "50-64", COVID);
        let elective = ViewTable::filter(&dataset, "50-64", "CATARACT");

        group.bench_function(format!("aligned_{}_weeks", weeks), |b| {
            b.iter(|| ComparativeTable::join(black_box(&covid), black_box(&elective)).unwrap())
        });

        // Offset by one row so the positional fast path does not apply
        let shifted = ViewTable {
            rows: elective.rows[1..].to_vec(),
        };
        group.bench_function(format!("by_week_{}_weeks", weeks), |b| {
            b.iter(|| ComparativeTable::join(black_box(&covid), black_box(&shifted)).unwrap())
        });
    }

    group.finish();
}

fn bench_pair_plot(c: &mut Criterion) {
    let mut group = c.benchmark_group("pair_plot");
    group.sample_size(20);

    for weeks in [52, 156] {
        let dataset = create_dataset(weeks);
        let covid = ViewTable::filter(&dataset, "50-64", COVID);
        let elective = ViewTable::filter(&dataset, "50-64", "CATARACT");
        let table = ComparativeTable::join(&covid, &elective).unwrap();

        group.bench_function(format!("build_{}_weeks", weeks), |b| {
            b.iter(|| PairPlot::build(black_box(&table)).unwrap())
        });
    }

    group.finish();
}

fn bench_compose(c: &mut Criterion) {
    let dataset = create_dataset(156);
    let selection = Selection::new("CA", "50-64", "CATARACT");

    c.bench_function("compose_156_weeks", |b| {
        b.iter(|| compose(black_box(&dataset), black_box(&selection)).unwrap())
    });
}

criterion_group!(benches, bench_filter, bench_join, bench_pair_plot, bench_compose);
criterion_main!(benches);
