use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use rand::Rng;
use std::hint::black_box;
use tandemsort::prelude::*;

fn bench_integers(c: &mut Criterion) {
    let mut group = c.benchmark_group("Integer Sort");
    group.sample_size(10);

    let mut rng = rand::rng();
    let count = 100_000;
    let input: Vec<i64> = (0..count).map(|_| rng.random_range(-1_000_000..1_000_000)).collect();

    group.bench_function("tandemsort::sort", |b| {
        b.iter_batched(
            || input.clone(),
            |mut data| sort(black_box(&mut data)).unwrap(),
            BatchSize::SmallInput,
        )
    });

    group.bench_function("slice::sort_unstable", |b| {
        b.iter_batched(
            || input.clone(),
            |mut data| data.sort_unstable(),
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

fn bench_strings(c: &mut Criterion) {
    let mut group = c.benchmark_group("String Sort");
    group.sample_size(10);

    let mut rng = rand::rng();
    let count = 10_000;
    let input: Vec<String> = (0..count)
        .map(|_| {
            let len = rng.random_range(5..20);
            (0..len).map(|_| rng.random::<char>()).collect()
        })
        .collect();

    group.bench_function("tandemsort::sort", |b| {
        b.iter_batched(
            || input.clone(),
            |mut data| sort(black_box(&mut data)).unwrap(),
            BatchSize::SmallInput,
        )
    });

    group.bench_function("slice::sort_unstable", |b| {
        b.iter_batched(
            || input.clone(),
            |mut data| data.sort_unstable(),
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

fn bench_paired(c: &mut Criterion) {
    let mut group = c.benchmark_group("Paired Sort");
    group.sample_size(10);

    let mut rng = rand::rng();
    let count = 100_000;
    let keys: Vec<u32> = (0..count).map(|_| rng.random::<u32>()).collect();
    let values: Vec<usize> = (0..count as usize).collect();

    group.bench_function("tandemsort::sort_pairs", |b| {
        b.iter_batched(
            || (keys.clone(), values.clone()),
            |(mut keys, mut values)| {
                sort_pairs(black_box(&mut keys), black_box(&mut values)).unwrap()
            },
            BatchSize::SmallInput,
        )
    });

    // The zip-into-tuples alternative the paired variant exists to avoid.
    group.bench_function("zip + slice::sort_unstable", |b| {
        b.iter_batched(
            || {
                keys.iter()
                    .copied()
                    .zip(values.iter().copied())
                    .collect::<Vec<_>>()
            },
            |mut pairs| pairs.sort_unstable_by_key(|(key, _)| *key),
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(benches, bench_integers, bench_strings, bench_paired);
criterion_main!(benches);
