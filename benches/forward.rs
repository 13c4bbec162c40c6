use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::hint::black_box;
use williams::{MultiArmBandit, StochasticUnit, Trainer, TrainerConfig, UnitConfig};

fn bench_forward(c: &mut Criterion) {
    let mut group = c.benchmark_group("unit_step");
    for &(batch, len) in &[(1usize, 20usize), (10, 20), (100, 64)] {
        let mut rng = StdRng::seed_from_u64(123);
        let mut unit = StochasticUnit::new(UnitConfig::batched(batch, len).unwrap(), &mut rng).unwrap();
        let rewards = vec![1.0; batch];
        let id = format!("{batch}x{len}");

        group.bench_with_input(BenchmarkId::new("forward", &id), &batch, |b, &_n| {
            b.iter(|| {
                let y = unit.forward(None, &mut rng).unwrap();
                black_box(y.len());
            })
        });

        group.bench_with_input(BenchmarkId::new("forward_reinforce", &id), &batch, |b, &_n| {
            b.iter(|| {
                unit.forward(None, &mut rng).unwrap();
                black_box(unit.reinforce(0.01, &rewards).unwrap());
            })
        });
    }
    group.finish();
}

fn bench_epoch(c: &mut Criterion) {
    c.bench_function("trainer_epoch_100_trials", |b| {
        let mut rng = StdRng::seed_from_u64(0);
        let unit = StochasticUnit::new(UnitConfig::vector(20).unwrap(), &mut rng).unwrap();
        let bandit = MultiArmBandit::new(vec![0.1, 0.9]).unwrap();
        let mut trainer = Trainer::new(unit, bandit, TrainerConfig::default()).unwrap();
        b.iter(|| black_box(trainer.train(1).unwrap()))
    });
}

criterion_group!(benches, bench_forward, bench_epoch);
criterion_main!(benches);
