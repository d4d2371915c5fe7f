//! Criterion benchmarks for the magic-cube search engine.
//!
//! Measures the scoring kernels and one short run of each strategy
//! family on 5-cubes, the size the solver is typically used at.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use magiccube::cube::{neighbor_pairs, CubeState, ScoringMode};
use magiccube::ga::{GaConfig, GaRunner};
use magiccube::hc::{HcConfig, HcRunner, Neighborhood};
use magiccube::random::create_rng;
use magiccube::sa::{SaConfig, SaRunner};

fn bench_scoring(c: &mut Criterion) {
    let mut group = c.benchmark_group("scoring");
    for &size in &[3usize, 5] {
        let mut rng = create_rng(42);
        let state = CubeState::random(size, &mut rng).unwrap();

        group.bench_with_input(BenchmarkId::new("discrete", size), &state, |b, state| {
            b.iter(|| {
                let swapped = state.swapped((0, 0, 0), (1, 1, 1)).unwrap();
                black_box(swapped.score())
            })
        });
        group.bench_with_input(BenchmarkId::new("continuous", size), &state, |b, state| {
            b.iter(|| black_box(state.continuous_score(1.0)))
        });
    }
    group.finish();
}

fn bench_exhaustive_step(c: &mut Criterion) {
    let mut rng = create_rng(42);
    let state = CubeState::random(5, &mut rng).unwrap();

    c.bench_function("exhaustive_neighborhood_scan_n5", |b| {
        b.iter(|| {
            let mut best = f64::NEG_INFINITY;
            for (p1, p2) in neighbor_pairs(5) {
                let score = state.swapped(p1, p2).unwrap().score() as f64;
                if score > best {
                    best = score;
                }
            }
            black_box(best)
        })
    });
}

fn bench_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("strategies");
    group.sample_size(10);

    group.bench_function("hc_sampled_n5", |b| {
        let config = HcConfig::default()
            .with_neighborhood(Neighborhood::Sampled(100))
            .with_max_iterations(50)
            .with_seed(42);
        b.iter(|| {
            let mut rng = create_rng(42);
            let initial = CubeState::random(5, &mut rng).unwrap();
            black_box(HcRunner::run(initial, &config).unwrap().best_score)
        })
    });

    group.bench_function("sa_short_n5", |b| {
        let config = SaConfig::default()
            .with_initial_temperature(100.0)
            .with_min_temperature(1.0)
            .with_max_iterations(2000)
            .with_seed(42);
        b.iter(|| {
            let mut rng = create_rng(42);
            let initial = CubeState::random(5, &mut rng).unwrap();
            black_box(SaRunner::run(initial, &config).unwrap().best_score)
        })
    });

    group.bench_function("ga_short_n5", |b| {
        let config = GaConfig::default()
            .with_population_size(30)
            .with_elite_count(5)
            .with_max_generations(20)
            .with_parallel(false)
            .with_seed(42);
        b.iter(|| {
            let mut rng = create_rng(42);
            let initial = CubeState::random(5, &mut rng).unwrap();
            black_box(GaRunner::run(initial, &config).unwrap().best_fitness)
        })
    });

    group.finish();
}

criterion_group!(benches, bench_scoring, bench_exhaustive_step, bench_strategies);
criterion_main!(benches);
