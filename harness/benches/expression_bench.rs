//! Criterion benchmark harness: per-strategy evaluation time for both
//! expressions at a few array sizes, with byte throughput so the numbers are
//! comparable to the binary's GB/s column. A second group times the matrix
//! multiplication kernels on small square shapes.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use exprbench::dataset::generate;
use exprbench::expression::Expression;
use exprbench::matmul::{self, generate_matrices, MatmulShape, DEFAULT_TILE};
use exprbench::measure::working_set_bytes;
use exprbench::strategy::registry;
use std::hint::black_box;
use std::time::Duration;

/// Array sizes: L2-resident, L3-ish, and main-memory bound.
fn sizes() -> Vec<(&'static str, usize)> {
    vec![("16k", 16_384), ("1m", 1 << 20), ("16m", 16 << 20)]
}

fn bench_expression(c: &mut Criterion, expr: Expression) {
    let mut group = c.benchmark_group(format!("eval/{}", expr.name()));
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(30);

    for (label, n) in sizes() {
        let data = generate(n, Some(42)).expect("dataset");
        let mut out = vec![0.0f64; n];
        group.throughput(Throughput::Bytes(
            working_set_bytes(n).expect("working set"),
        ));

        for strategy in registry() {
            let id = BenchmarkId::new(strategy.key(), label);
            group.bench_with_input(id, &data, |b, data| {
                b.iter(|| {
                    strategy
                        .evaluate(expr, black_box(data.x()), black_box(data.y()), &mut out)
                        .expect("evaluate failed");
                    black_box(&out);
                });
            });
        }
    }
    group.finish();
}

fn bench_algebraic(c: &mut Criterion) {
    bench_expression(c, Expression::Algebraic);
}

fn bench_transcendental(c: &mut Criterion) {
    bench_expression(c, Expression::Transcendental);
}

fn bench_matmul(c: &mut Criterion) {
    let mut group = c.benchmark_group("matmul");
    group.sample_size(20);

    for edge in [64usize, 128, 256] {
        let shape = MatmulShape::new(edge, edge, edge).expect("shape");
        let matrices = generate_matrices(shape, Some(42));
        let mut z = vec![0.0f64; shape.z_len()];
        group.throughput(Throughput::Elements(shape.flop() as u64));

        for kernel in matmul::registry(DEFAULT_TILE).expect("kernels") {
            let id = BenchmarkId::new(kernel.name(), shape);
            group.bench_with_input(id, &matrices, |b, m| {
                b.iter(|| {
                    z.fill(0.0);
                    kernel
                        .multiply(shape, black_box(m.x()), black_box(m.y()), &mut z)
                        .expect("multiply failed");
                    black_box(&z);
                });
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_algebraic, bench_transcendental, bench_matmul);
criterion_main!(benches);
