//! Criterion benchmarks for u-gga.
//!
//! Uses synthetic clustered object sets to measure the cost of the
//! PROMETHEE kernel, the construction heuristics and whole GGA runs.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use u_gga::gga::{GgaConfig, Instance, Ranking, ScalarWeights};
use u_gga::groups::{Groups, Object, ObjectSet};
use u_gga::heuristic::{run_heuristic, BestFit, FirstFit, GroupingConfig};
use u_gga::promethee::{Direction, PrometheeKernel};
use u_gga::random::RandomSource;

// ===========================================================================
// Synthetic data
// ===========================================================================

/// `n` objects in `clusters` clusters, each linked to its `k` nearest
/// identifiers on both sides.
fn clustered(n: usize, clusters: usize, k: usize) -> ObjectSet {
    let cluster = |i: usize| i * clusters / n;
    let objects = (0..n)
        .map(|i| {
            let mut obj = Object::new(i);
            for j in i.saturating_sub(k)..(i + k + 1).min(n) {
                if j != i {
                    let same = cluster(i) == cluster(j);
                    obj = obj.with_similarity(j, if same { 0.9 } else { 0.05 });
                }
            }
            obj
        })
        .collect();
    ObjectSet::new(objects).expect("valid synthetic objects")
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_promethee(c: &mut Criterion) {
    let mut group = c.benchmark_group("promethee_ii");

    for n in [20usize, 100, 400] {
        let mut rng = RandomSource::new(42);
        let values: Vec<[f64; 3]> = (0..n)
            .map(|_| [rng.next_double(), rng.next_double(), rng.next_double()])
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &values, |b, values| {
            b.iter(|| {
                let mut kernel = PrometheeKernel::new();
                let crits = [
                    kernel.add_criterion("a", Direction::Maximize, 0.05, 0.2, 1.0),
                    kernel.add_criterion("b", Direction::Maximize, 0.05, 0.2, 1.0),
                    kernel.add_criterion("c", Direction::Minimize, 0.05, 0.2, 1.0),
                ]
                .map(|h| h.expect("valid criterion"));
                for v in values {
                    let s = kernel.new_solution();
                    for (crit, &x) in crits.iter().zip(v) {
                        kernel.assign(s, *crit, x).expect("known handles");
                    }
                }
                kernel.compute_promethee_ii().expect("solutions registered");
                black_box(kernel.best_solution().map(|s| s.fi()).ok())
            })
        });
    }
    group.finish();
}

fn bench_heuristics(c: &mut Criterion) {
    let mut group = c.benchmark_group("heuristic_construct");
    let config = GroupingConfig::default()
        .with_min_similarity(0.5)
        .with_max_group_size(20);
    let first_fit = FirstFit::from_config(&config);
    let best_fit = BestFit::from_config(&config);

    for n in [100usize, 500] {
        let objects = clustered(n, n / 10, 8);
        group.bench_with_input(BenchmarkId::new("first_fit", n), &objects, |b, objects| {
            let mut rng = RandomSource::new(1);
            b.iter(|| {
                let mut groups = Groups::new(objects.len(), objects.len());
                let pending = (0..objects.len()).collect();
                let report = run_heuristic(&first_fit, objects, &mut groups, pending, &mut rng);
                black_box(report.is_ok())
            })
        });
        group.bench_with_input(BenchmarkId::new("best_fit", n), &objects, |b, objects| {
            let mut rng = RandomSource::new(1);
            b.iter(|| {
                let mut groups = Groups::new(objects.len(), objects.len());
                let pending = (0..objects.len()).collect();
                let report = run_heuristic(&best_fit, objects, &mut groups, pending, &mut rng);
                black_box(report.is_ok())
            })
        });
    }
    group.finish();
}

fn bench_gga_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("gga_run");
    group.sample_size(10);
    let heuristic = FirstFit::from_config(
        &GroupingConfig::default()
            .with_min_similarity(0.5)
            .with_max_group_size(15),
    );

    for (n, pop, gen) in [(50usize, 20usize, 20usize), (200, 30, 20)] {
        let objects = clustered(n, n / 10, 6);
        for (label, ranking) in [
            ("scalar", Ranking::Scalar(ScalarWeights::default())),
            ("promethee", Ranking::default()),
        ] {
            let config = GgaConfig::default()
                .with_population_size(pop)
                .with_max_generations(gen)
                .with_ranking(ranking)
                .with_verify(false)
                .with_seed(42);
            group.bench_with_input(
                BenchmarkId::new(format!("{label}_n{n}_p{pop}_g{gen}"), n),
                &config,
                |b, config| {
                    b.iter(|| {
                        let mut instance: Instance =
                            Instance::new(&objects, &heuristic, config.clone())
                                .expect("valid config");
                        black_box(instance.run().map(|r| r.fitness.sim_j).ok())
                    })
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_promethee, bench_heuristics, bench_gga_run);
criterion_main!(benches);
