use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fatigue_cycles::four_point::four_point_cycles;
use fatigue_cycles::rainflow::rainflow_cycles;
use fatigue_cycles::range_pair::range_pair_cycles;
use fatigue_cycles::turning_points::{hysteresis_gate, turning_points};
use rand::distributions::{Distribution, Uniform};

fn random_history(len: usize) -> Vec<f64> {
    let step = Uniform::new(0.0, 50.0);
    let mut rng = rand::thread_rng();
    step.sample_iter(&mut rng).take(len).collect()
}

fn bench_filters(c: &mut Criterion) {
    let history = random_history(100000);
    c.bench_function("turning points on large dataset", |b| {
        b.iter(|| turning_points(black_box(&history), true).unwrap());
    });
    c.bench_function("hysteresis gate on large dataset", |b| {
        b.iter(|| hysteresis_gate(black_box(&history), 5.0).unwrap());
    });
}

fn bench_counting(c: &mut Criterion) {
    let history = random_history(100000);
    c.bench_function("Rainflow counting algorithm on large dataset", |b| {
        b.iter(|| rainflow_cycles(black_box(&history)).unwrap());
    });
    c.bench_function("Range-pair counting on large dataset", |b| {
        b.iter(|| range_pair_cycles(black_box(&history)).unwrap());
    });
    c.bench_function("Four-point rainflow on large dataset", |b| {
        b.iter(|| four_point_cycles(black_box(&history)).unwrap());
    });
}

criterion_group!(benches, bench_filters, bench_counting);
criterion_main!(benches);
