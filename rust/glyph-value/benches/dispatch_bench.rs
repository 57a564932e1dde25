//! Criterion benchmarks for operator dispatch across representations.
//!
//! Measures scalar arithmetic on each rung of the promotion ladder, broadcast
//! over vectors of increasing length, and a few transcendental functions at
//! the default precision.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use glyph_value::{eval_binary, eval_unary, inner_product, reduce, BigFloat, Session, Value};
use num_bigint::BigInt;
use num_rational::BigRational;

fn bench_scalar_add(c: &mut Criterion) {
    let s = Session::default();
    let mut group = c.benchmark_group("scalar_add");
    let cases = [
        ("int", Value::Int(12345)),
        ("big_int", Value::BigInt(BigInt::from(7).pow(60))),
        ("rational", Value::BigRat(BigRational::new(22.into(), 7.into()))),
        ("float", Value::BigFloat(BigFloat::from_ratio(&BigRational::new(22.into(), 7.into()), 256))),
    ];
    for (name, v) in cases {
        group.bench_with_input(BenchmarkId::from_parameter(name), &v, |b, v| {
            b.iter(|| eval_binary(&s, black_box(v), "+", black_box(v)));
        });
    }
    group.finish();
}

fn bench_broadcast(c: &mut Criterion) {
    let s = Session::default();
    let sizes = [10, 100, 1000, 10000];
    let mut group = c.benchmark_group("broadcast_mul");

    for size in sizes {
        let v = eval_unary(&s, "iota", &Value::Int(size)).expect("iota");
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &v, |b, v| {
            b.iter(|| eval_binary(&s, black_box(&Value::Int(3)), "*", black_box(v)));
        });
    }

    group.finish();
}

fn bench_reduce(c: &mut Criterion) {
    let s = Session::default();
    let v = eval_unary(&s, "iota", &Value::Int(1000)).expect("iota");
    let m = eval_binary(&s, &Value::int_vector(&[20, 20]), "rho", &v).expect("reshape");
    c.bench_function("reduce_plus_1000", |b| b.iter(|| reduce(&s, "+", black_box(&v))));
    c.bench_function("inner_product_20x20", |b| {
        b.iter(|| inner_product(&s, black_box(&m), "+", "*", black_box(&m)))
    });
}

fn bench_transcendental(c: &mut Criterion) {
    let s = Session::default();
    let mut group = c.benchmark_group("transcendental");
    let x = Value::BigRat(BigRational::new(1.into(), 3.into()));
    for op in ["sqrt", "**", "log", "sin", "atan"] {
        group.bench_with_input(BenchmarkId::from_parameter(op), &x, |b, x| {
            b.iter(|| eval_unary(&s, op, black_box(x)));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_scalar_add,
    bench_broadcast,
    bench_reduce,
    bench_transcendental
);
criterion_main!(benches);
