// ============================================================================
// Period Algebra Benchmarks
// ============================================================================
//
// Benchmark Categories:
// 1. Conversion - Rolling period to span and back
// 2. Set Operations - overlap_any and diff against growing operand lists
// 3. Backend Comparison - Same workload through both span API generations
// ============================================================================

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use period_algebra::prelude::*;
use std::hint::black_box;

/// `count` one-week periods, each starting two weeks after the previous
fn fortnightly(count: u32) -> Vec<RollingPeriod> {
    let origin = parse_instant("2018-01-01").unwrap_or_default();
    (0..count)
        .map(|i| {
            let start = origin + chrono::TimeDelta::days(14 * i64::from(i));
            RollingPeriod::days().since(start).until(start + chrono::TimeDelta::days(6))
        })
        .collect()
}

fn year() -> RollingPeriod {
    RollingPeriod::create("2018-01-01", "2018-12-31").unwrap_or_else(|_| RollingPeriod::days())
}

// ============================================================================
// Conversion Benchmarks
// ============================================================================

fn benchmark_conversion(c: &mut Criterion) {
    let mut group = c.benchmark_group("conversion");
    let algebra = PeriodAlgebra::default();
    let period = RollingPeriod::hours()
        .since(parse_instant("2019-09-01 08:02").unwrap_or_default())
        .until(parse_instant("2019-09-01 15:03").unwrap_or_default());

    group.bench_function("to_span", |b| b.iter(|| black_box(algebra.to_span(black_box(&period)))));

    if let Ok(span) = algebra.to_span(&period) {
        group.bench_function("from_span", |b| {
            b.iter(|| black_box(algebra.from_span(black_box(&span), true)))
        });
    }

    group.bench_function("operand_args", |b| {
        b.iter(|| {
            black_box(algebra.resolve_operand(black_box(("2019-09-01 15:10", "2019-09-01 18:03", "1 hour"))))
        })
    });

    group.finish();
}

// ============================================================================
// Set Operation Benchmarks
// ============================================================================

fn benchmark_set_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_operations");
    let current = year();

    for count in [4_u32, 16, 26] {
        let others = fortnightly(count);

        for config in [AlgebraConfig::legacy_compatible(), AlgebraConfig::modern()] {
            let Ok(algebra) = create_from_config(config) else {
                continue;
            };

            group.bench_with_input(
                BenchmarkId::new(format!("overlap_any/{}", algebra.backend_name()), count),
                &others,
                |b, others| b.iter(|| black_box(algebra.overlap_any(&current, others))),
            );

            group.bench_with_input(
                BenchmarkId::new(format!("diff/{}", algebra.backend_name()), count),
                &others,
                |b, others| b.iter(|| black_box(algebra.diff(&current, others))),
            );
        }
    }

    group.finish();
}

fn benchmark_gap(c: &mut Criterion) {
    let algebra = PeriodAlgebra::default();
    let periods = fortnightly(2);

    c.bench_function("gap", |b| {
        b.iter(|| black_box(algebra.gap(&periods[0], &periods[1])))
    });
}

criterion_group!(benches, benchmark_conversion, benchmark_set_operations, benchmark_gap);
criterion_main!(benches);
