//! # Spellbook Benchmarks
//!
//! Performance benchmarks for the kast-core step pipeline.
//!
//! Run with: `cargo bench -p kast-core`

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use kast_core::{
    Frame, KasterDefinition, Params, PddlSpellbook, PredicateDefinition, ReplaySource, Runtime,
    TransformError, Value,
};
use std::hint::black_box;

/// Scale the single input by two.
fn double(params: &Params<'_>) -> Result<Frame, TransformError> {
    let (_, value) = params
        .inputs()
        .next()
        .ok_or_else(|| TransformError::Failed("no input".to_string()))?;
    let x = value
        .as_f64()
        .ok_or_else(|| TransformError::invalid("input", "not a number"))?;
    let out = params
        .outputs()
        .first()
        .cloned()
        .ok_or_else(|| TransformError::Failed("no output".to_string()))?;
    Ok(Frame::from([(out, Value::Float(x * 2.0))]))
}

/// Build a book with N inputs, N Kasters (one per input) and N predicates.
fn create_book(size: usize) -> PddlSpellbook {
    let inputs: Vec<String> = (0..size).map(|i| format!("raw{}", i)).collect();
    let kasters = (0..size)
        .map(|i| KasterDefinition::new(format!("k{}", i), [format!("raw{}", i)], [format!("hl{}", i)], double))
        .collect();
    let predicates: Vec<PredicateDefinition> = (0..size)
        .map(|i| PredicateDefinition::new(format!("p{}", i), format!("hl{}", i), ">=", 10))
        .collect();

    PddlSpellbook::new(&inputs, kasters, &predicates).expect("init")
}

fn create_frame(size: usize, seed: usize) -> Frame {
    (0..size)
        .map(|i| (format!("raw{}", i), Value::Float(((i + seed) % 17) as f64)))
        .collect()
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_initialization(c: &mut Criterion) {
    let mut group = c.benchmark_group("initialization");

    for size in [10, 100, 1000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| black_box(create_book(size)));
        });
    }

    group.finish();
}

fn bench_update_low_level(c: &mut Criterion) {
    let mut group = c.benchmark_group("update_low_level_knowledge");

    for size in [10, 100, 1000].iter() {
        let mut book = create_book(*size);
        let frame = create_frame(*size, 0);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(book.update_low_level_knowledge(&frame)));
        });
    }

    group.finish();
}

fn bench_kast(c: &mut Criterion) {
    let mut group = c.benchmark_group("kast");

    for size in [10, 100, 1000].iter() {
        let mut book = create_book(*size);
        book.update_low_level_knowledge(&create_frame(*size, 3));

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(book.kast()));
        });
    }

    group.finish();
}

fn bench_evaluate_predicates(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate_predicates");

    for size in [10, 100, 1000].iter() {
        let mut book = create_book(*size);
        book.update_low_level_knowledge(&create_frame(*size, 5));
        book.kast().expect("kast");

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(book.evaluate_predicates()));
        });
    }

    group.finish();
}

fn bench_runtime_replay(c: &mut Criterion) {
    let mut group = c.benchmark_group("runtime_replay");

    for size in [10, 100].iter() {
        let frames: Vec<Frame> = (0..100).map(|seed| create_frame(*size, seed)).collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| {
                let mut runtime = Runtime::new(create_book(size));
                let mut source = ReplaySource::from_frames(frames.clone());
                black_box(runtime.execute(&mut source, |_, _| {}))
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_initialization,
    bench_update_low_level,
    bench_kast,
    bench_evaluate_predicates,
    bench_runtime_replay,
);

criterion_main!(benches);
