//! Solver benchmarks for castle_core.
//!
//! Run with: `cargo bench -p castle_core`

// Benchmark binaries don't need docs on macro-generated functions
#![allow(missing_docs)]

use castle_core::prelude::*;
use castle_test_utils::fixtures::{fresh_castle, small_targets, standard_catalog};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// Single solves of increasing size, then one full strategy search.
pub fn solver_benchmark(c: &mut Criterion) {
    let catalog = standard_catalog();
    let options = SolverOptions::default();
    let initial = fresh_castle();

    let small = small_targets();
    c.bench_function("solve_small_targets", |b| {
        let solver = Solver::new(&catalog, &small, &options);
        b.iter(|| black_box(solver.solve(black_box(&initial))));
    });

    let castle = Targets::default_castle();
    c.bench_function("solve_default_castle", |b| {
        let solver = Solver::new(&catalog, &castle, &options);
        b.iter(|| black_box(solver.solve(black_box(&initial))));
    });

    let mut group = c.benchmark_group("strategy_search");
    group.sample_size(10);
    group.bench_function("search_small_targets", |b| {
        let solver = Solver::new(&catalog, &small, &options);
        let config = SearchConfig::default();
        b.iter(|| black_box(solver.search(&initial, &config)));
    });
    group.finish();
}

criterion_group!(benches, solver_benchmark);
criterion_main!(benches);
