//! Criterion benchmarks for u-stepopt.
//!
//! Fitness is a cheap Sphere function so the numbers reflect the
//! optimizer's per-report bookkeeping, not the caller's simulation.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use u_stepopt::driver::run;
use u_stepopt::ga::GaConfig;
use u_stepopt::optimizer::{Optimizer, OptimizerConfig, Strategy};
use u_stepopt::problem::VectorEncoding;
use u_stepopt::pso::PsoConfig;
use u_stepopt::space::ParameterSpace;

fn sphere(x: &Vec<f64>) -> f64 {
    -x.iter().map(|v| v * v).sum::<f64>()
}

fn optimizer(dim: usize, strategy: Strategy, generations: usize) -> Optimizer<VectorEncoding> {
    let encoding = VectorEncoding::new(
        ParameterSpace::uniform("x", dim, -5.0, 5.0).expect("valid bounds"),
    );
    let config = OptimizerConfig::default()
        .with_seed(42)
        .with_max_generations(generations)
        .with_convergence_threshold(1e-12);
    Optimizer::new(encoding, strategy, config).expect("valid config")
}

fn bench_ga_sphere(c: &mut Criterion) {
    let mut group = c.benchmark_group("ga_sphere");
    group.sample_size(10);

    for (dim, pop, gen) in [(2usize, 20usize, 50usize), (10, 50, 30), (50, 100, 20)] {
        let strategy = Strategy::Ga(GaConfig::default().with_population_size(pop));
        group.bench_with_input(
            BenchmarkId::new(format!("d{}_p{}_g{}", dim, pop, gen), dim),
            &(dim, strategy, gen),
            |b, (dim, strategy, gen)| {
                b.iter(|| {
                    let mut opt = optimizer(*dim, strategy.clone(), *gen);
                    let summary = run(black_box(&mut opt), sphere);
                    black_box(summary)
                })
            },
        );
    }
    group.finish();
}

fn bench_pso_sphere(c: &mut Criterion) {
    let mut group = c.benchmark_group("pso_sphere");
    group.sample_size(10);

    for (dim, swarm, steps) in [(2usize, 20usize, 50usize), (10, 50, 30), (50, 100, 20)] {
        let strategy = Strategy::Pso(PsoConfig::default().with_swarm_size(swarm));
        group.bench_with_input(
            BenchmarkId::new(format!("d{}_s{}_n{}", dim, swarm, steps), dim),
            &(dim, strategy, steps),
            |b, (dim, strategy, steps)| {
                b.iter(|| {
                    let mut opt = optimizer(*dim, strategy.clone(), *steps);
                    let summary = run(black_box(&mut opt), sphere);
                    black_box(summary)
                })
            },
        );
    }
    group.finish();
}

fn bench_record_fitness(c: &mut Criterion) {
    let mut group = c.benchmark_group("record_fitness");

    for (name, strategy) in [
        ("ga", Strategy::Ga(GaConfig::default().with_population_size(40))),
        ("pso", Strategy::Pso(PsoConfig::default().with_swarm_size(40))),
    ] {
        group.bench_function(BenchmarkId::from_parameter(name), |b| {
            let mut opt = optimizer(8, strategy.clone(), 10_000);
            opt.start_evolving();
            let mut index = 0;
            b.iter(|| {
                let params = opt.translate(index).expect("index in range");
                let converged = opt
                    .record_fitness(index, sphere(&params))
                    .expect("valid report");
                index = (index + 1) % opt.size();
                black_box(converged)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_ga_sphere, bench_pso_sphere, bench_record_fitness);
criterion_main!(benches);
